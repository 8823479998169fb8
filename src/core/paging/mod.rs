//! Page replacement simulation
//!
//! Replays a reference string against a fixed number of frames and records
//! a full per-step trace. Frames fill left to right; once full, the policy
//! picks a victim slot and the incoming page takes that slot.
//!
//! Policies:
//! - FIFO: oldest loaded page, hits do not count
//! - LRU: least recently referenced page
//! - Optimal: page used farthest in the future (never again = infinitely far)
//! - LFU / MFU: least / most referenced page since it was loaded, ties to
//!   the earliest loaded

mod replacer;

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use tracing::{debug, trace, warn};

/// Page replacement policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PagePolicy {
    Fifo,
    Lru,
    Optimal,
    Lfu,
    Mfu,
}

impl PagePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PagePolicy::Fifo => "fifo",
            PagePolicy::Lru => "lru",
            PagePolicy::Optimal => "optimal",
            PagePolicy::Lfu => "lfu",
            PagePolicy::Mfu => "mfu",
        }
    }
}

impl fmt::Display for PagePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PagePolicy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fifo" => Ok(PagePolicy::Fifo),
            "lru" => Ok(PagePolicy::Lru),
            "optimal" | "opt" => Ok(PagePolicy::Optimal),
            "lfu" => Ok(PagePolicy::Lfu),
            "mfu" => Ok(PagePolicy::Mfu),
            _ => Err(EngineError::UnknownPolicy(s.to_string())),
        }
    }
}

/// One position of the reference string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageStep {
    pub page: u32,
    pub step: usize,
    /// Frame contents after this step; unfilled slots are absent
    pub frames: Vec<u32>,
    pub fault: bool,
    /// Page evicted to make room, if any
    pub evicted: Option<u32>,
}

/// Full trace of a replay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageReplay {
    pub policy: PagePolicy,
    pub capacity: usize,
    pub steps: Vec<PageStep>,
}

impl PageReplay {
    pub fn faults(&self) -> usize {
        self.steps.iter().filter(|s| s.fault).count()
    }

    pub fn hits(&self) -> usize {
        self.steps.len() - self.faults()
    }

    /// Fraction of references that hit (0.0 for an empty reference string)
    pub fn hit_ratio(&self) -> f64 {
        if self.steps.is_empty() {
            0.0
        } else {
            self.hits() as f64 / self.steps.len() as f64
        }
    }

    /// Frames left resident after the last reference
    pub fn final_frames(&self) -> &[u32] {
        self.steps.last().map(|s| s.frames.as_slice()).unwrap_or(&[])
    }
}

/// Replay `reference` against `capacity` frames using `policy`
///
/// # Errors
///
/// Returns `ZeroFrameCapacity` if `capacity` is 0.
///
/// # Examples
///
/// ```
/// use osalgo_rs::{replay_pages, PagePolicy};
///
/// let replay = replay_pages(&[1, 2, 3, 4, 1, 2, 5], 3, PagePolicy::Fifo).unwrap();
/// assert_eq!(replay.faults(), 7);
/// assert_eq!(replay.final_frames(), &[5, 1, 2]);
/// ```
pub fn replay_pages(reference: &[u32], capacity: usize, policy: PagePolicy) -> Result<PageReplay> {
    let frame_count = NonZeroUsize::new(capacity).ok_or(EngineError::ZeroFrameCapacity)?;

    debug!(
        "Replaying {} references over {} frames with {}",
        reference.len(),
        capacity,
        policy
    );

    let mut replacer = replacer::for_policy(policy, frame_count);
    let mut frames: Vec<u32> = Vec::with_capacity(capacity);
    let mut steps = Vec::with_capacity(reference.len());

    for (step, &page) in reference.iter().enumerate() {
        let mut evicted = None;
        let fault = !frames.contains(&page);

        if !fault {
            replacer.touch(page, step);
        } else if frames.len() < capacity {
            frames.push(page);
            replacer.loaded(page, step);
        } else {
            let slot = match replacer.victim(&frames, reference, step) {
                Some(slot) => slot,
                None => {
                    warn!("{} found no victim at step {}, using slot 0", policy, step);
                    0
                }
            };
            evicted = Some(frames[slot]);
            frames[slot] = page;
            replacer.loaded(page, step);
        }

        trace!(
            "Step {}: page {} {} frames {:?}",
            step,
            page,
            if fault { "fault" } else { "hit" },
            frames
        );

        steps.push(PageStep {
            page,
            step,
            frames: frames.clone(),
            fault,
            evicted,
        });
    }

    Ok(PageReplay {
        policy,
        capacity,
        steps,
    })
}
