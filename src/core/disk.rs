//! Disk-head seek scheduling
//!
//! Computes the order in which pending track requests are serviced and the
//! total head movement. The visited sequence always starts with the initial
//! head position.
//!
//! SCAN and C-SCAN split requests around the *initial* head (`>= head` vs
//! `< head`) and always travel to the disk edges, charging that movement
//! even when no request sits there. Each call performs exactly one sweep:
//! SCAN reverses once, C-SCAN wraps once. LOOK and C-LOOK are the variants
//! that turn around at the last request instead of the edge.

use crate::error::{EngineError, Result};
use crate::validation::ensure_track;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

/// Disk scheduling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiskPolicy {
    Fcfs,
    Sstf,
    Scan,
    CScan,
    Look,
    CLook,
}

impl DiskPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiskPolicy::Fcfs => "fcfs",
            DiskPolicy::Sstf => "sstf",
            DiskPolicy::Scan => "scan",
            DiskPolicy::CScan => "c-scan",
            DiskPolicy::Look => "look",
            DiskPolicy::CLook => "c-look",
        }
    }

    /// Whether the policy sweeps to the physical disk edges
    pub fn needs_disk_size(&self) -> bool {
        matches!(self, DiskPolicy::Scan | DiskPolicy::CScan)
    }
}

impl fmt::Display for DiskPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiskPolicy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fcfs" => Ok(DiskPolicy::Fcfs),
            "sstf" => Ok(DiskPolicy::Sstf),
            "scan" | "elevator" => Ok(DiskPolicy::Scan),
            "c-scan" | "cscan" => Ok(DiskPolicy::CScan),
            "look" => Ok(DiskPolicy::Look),
            "c-look" | "clook" => Ok(DiskPolicy::CLook),
            _ => Err(EngineError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Initial sweep direction for SCAN and LOOK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Toward higher track numbers
    #[default]
    Up,
    /// Toward track 0
    Down,
}

impl FromStr for Direction {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "right" | "high" => Ok(Direction::Up),
            "down" | "left" | "low" => Ok(Direction::Down),
            _ => Err(EngineError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Visited positions and total head movement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskSchedule {
    pub policy: DiskPolicy,
    /// Visited tracks; the first entry is the initial head
    pub sequence: Vec<u64>,
    pub total_seek: u64,
    /// Number of real requests serviced (boundary visits excluded)
    pub requests_serviced: usize,
}

impl DiskSchedule {
    /// Average head movement per serviced request
    pub fn average_seek(&self) -> f64 {
        if self.requests_serviced == 0 {
            0.0
        } else {
            self.total_seek as f64 / self.requests_serviced as f64
        }
    }
}

/// Head position plus the path it has travelled
struct Head {
    sequence: Vec<u64>,
    total: u64,
}

impl Head {
    fn new(start: u64, capacity: usize) -> Self {
        let mut sequence = Vec::with_capacity(capacity + 3);
        sequence.push(start);
        Head { sequence, total: 0 }
    }

    fn position(&self) -> u64 {
        // `sequence` is never empty: it starts with the initial head
        self.sequence.last().copied().unwrap_or(0)
    }

    fn charge(&mut self, cost: u64) -> Result<()> {
        self.total = self
            .total
            .checked_add(cost)
            .ok_or(EngineError::Overflow("seek total"))?;
        Ok(())
    }

    fn seek(&mut self, track: u64) -> Result<()> {
        let distance = self.position().abs_diff(track);
        self.charge(distance)?;
        self.sequence.push(track);
        trace!("Head -> {} (+{}, total {})", track, distance, self.total);
        Ok(())
    }

    fn seek_all(&mut self, tracks: impl IntoIterator<Item = u64>) -> Result<()> {
        for track in tracks {
            self.seek(track)?;
        }
        Ok(())
    }

    /// Jump to `track` charging exactly `cost`
    fn wrap(&mut self, track: u64, cost: u64) -> Result<()> {
        self.charge(cost)?;
        self.sequence.push(track);
        trace!("Head wraps -> {} (+{}, total {})", track, cost, self.total);
        Ok(())
    }
}

/// Compute the service order for `requests` starting at `head`
///
/// `disk_size` (valid tracks `0..disk_size`) is required for SCAN and
/// C-SCAN and optional otherwise; when given, every track is checked against
/// it. `direction` only affects SCAN and LOOK. C-SCAN and C-LOOK always
/// sweep upward.
///
/// An empty request list yields `[head]` with zero seek for every policy.
///
/// # Errors
///
/// - `MissingDiskSize` for SCAN/C-SCAN without `disk_size`
/// - `ZeroDiskSize` if `disk_size` is `Some(0)`
/// - `TrackOutOfRange` if the head or a request lies outside the disk
/// - `Overflow` if the total seek distance does not fit in a `u64`
///
/// # Examples
///
/// ```
/// use osalgo_rs::{schedule_disk, Direction, DiskPolicy};
///
/// let requests = [82, 170, 43, 140, 24, 16, 190];
/// let s = schedule_disk(&requests, 50, DiskPolicy::Sstf, None, Direction::Up).unwrap();
/// assert_eq!(s.total_seek, 208);
/// ```
pub fn schedule_disk(
    requests: &[u64],
    head: u64,
    policy: DiskPolicy,
    disk_size: Option<u64>,
    direction: Direction,
) -> Result<DiskSchedule> {
    if let Some(size) = disk_size {
        if size == 0 {
            return Err(EngineError::ZeroDiskSize);
        }
        ensure_track(head, size)?;
        for &track in requests {
            ensure_track(track, size)?;
        }
    }
    let edge = match (policy.needs_disk_size(), disk_size) {
        (true, None) => return Err(EngineError::MissingDiskSize(policy.to_string())),
        (_, Some(size)) => size - 1,
        (false, None) => 0,
    };

    debug!(
        "Scheduling {} disk requests from head {} with {} ({:?}, disk size {:?})",
        requests.len(),
        head,
        policy,
        direction,
        disk_size
    );

    let mut arm = Head::new(head, requests.len());
    if !requests.is_empty() {
        match policy {
            DiskPolicy::Fcfs => arm.seek_all(requests.iter().copied())?,
            DiskPolicy::Sstf => sstf(&mut arm, requests)?,
            DiskPolicy::Scan => scan(&mut arm, requests, head, edge, direction, true)?,
            DiskPolicy::Look => scan(&mut arm, requests, head, edge, direction, false)?,
            DiskPolicy::CScan => {
                if direction == Direction::Down {
                    debug!("C-SCAN always sweeps upward; ignoring direction");
                }
                circular(&mut arm, requests, head, edge, true)?
            }
            DiskPolicy::CLook => circular(&mut arm, requests, head, edge, false)?,
        }
    }

    Ok(DiskSchedule {
        policy,
        sequence: arm.sequence,
        total_seek: arm.total,
        requests_serviced: requests.len(),
    })
}

/// Split requests around the initial head: `(>= head ascending, < head descending)`
fn partition(requests: &[u64], head: u64) -> (Vec<u64>, Vec<u64>) {
    let (mut upper, mut lower): (Vec<u64>, Vec<u64>) =
        requests.iter().partition(|&&track| track >= head);
    upper.sort_unstable();
    lower.sort_unstable_by(|a, b| b.cmp(a));
    (upper, lower)
}

fn sstf(arm: &mut Head, requests: &[u64]) -> Result<()> {
    let mut pending = requests.to_vec();

    while !pending.is_empty() {
        let position = arm.position();
        let mut nearest = 0;
        for (i, &track) in pending.iter().enumerate().skip(1) {
            if track.abs_diff(position) < pending[nearest].abs_diff(position) {
                nearest = i;
            }
        }
        let track = pending.remove(nearest);
        arm.seek(track)?;
    }
    Ok(())
}

/// SCAN (`to_edges`) or LOOK: one pass in `direction`, reverse, one pass back
fn scan(
    arm: &mut Head,
    requests: &[u64],
    head: u64,
    edge: u64,
    direction: Direction,
    to_edges: bool,
) -> Result<()> {
    let (mut upper, mut lower) = partition(requests, head);
    if to_edges {
        upper.push(edge);
        lower.push(0);
    }

    match direction {
        Direction::Up => {
            arm.seek_all(upper)?;
            arm.seek_all(lower)
        }
        Direction::Down => {
            arm.seek_all(lower)?;
            arm.seek_all(upper)
        }
    }
}

/// C-SCAN (`to_edges`) or C-LOOK: sweep up, wrap around, sweep up again
fn circular(arm: &mut Head, requests: &[u64], head: u64, edge: u64, to_edges: bool) -> Result<()> {
    let (mut upper, mut lower) = partition(requests, head);
    lower.reverse();

    if to_edges {
        upper.push(edge);
        arm.seek_all(upper)?;
        arm.wrap(0, edge)?;
        arm.seek_all(lower)
    } else {
        arm.seek_all(upper)?;
        // C-LOOK jumps straight to the lowest pending request at its real cost
        arm.seek_all(lower)
    }
}
