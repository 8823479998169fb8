//! CPU process scheduling
//!
//! Four policies over a caller-supplied process list:
//! - FCFS: stable arrival order
//! - SJF: non-preemptive, shortest burst among arrived processes
//! - Priority: non-preemptive, lowest numeric priority among arrived processes
//! - Round Robin: preemptive, fixed quantum (see [`round_robin`])
//!
//! Only final per-process times are produced. No execution-slice log exists.

pub mod round_robin;

use crate::error::{EngineError, Result};
use crate::validation::ensure_unique_ids;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

/// A process to be scheduled, annotated with its computed times on output
///
/// Invariants on output:
/// - `turnaround_time = completion_time - arrival_time`
/// - `waiting_time = turnaround_time - burst_time`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub id: u32,
    pub arrival_time: u64,
    pub burst_time: u64,

    /// Lower value = higher priority
    #[serde(default)]
    pub priority: i32,

    #[serde(default)]
    pub remaining_time: u64,
    #[serde(default)]
    pub completion_time: u64,
    #[serde(default)]
    pub waiting_time: u64,
    #[serde(default)]
    pub turnaround_time: u64,
}

impl Process {
    pub fn new(id: u32, arrival_time: u64, burst_time: u64) -> Self {
        Process {
            id,
            arrival_time,
            burst_time,
            priority: 0,
            remaining_time: burst_time,
            completion_time: 0,
            waiting_time: 0,
            turnaround_time: 0,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Clear any previously computed times
    fn reset(&mut self) {
        self.remaining_time = self.burst_time;
        self.completion_time = 0;
        self.waiting_time = 0;
        self.turnaround_time = 0;
    }

    /// Record completion at `clock` and derive turnaround and waiting times
    ///
    /// Every policy only completes a process after it arrived and ran for its
    /// full burst, so both subtractions stay non-negative.
    fn finish(&mut self, clock: u64) {
        self.remaining_time = 0;
        self.completion_time = clock;
        self.turnaround_time = clock - self.arrival_time;
        self.waiting_time = self.turnaround_time - self.burst_time;
    }
}

/// CPU scheduling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CpuPolicy {
    Fcfs,
    Sjf,
    Priority,
    RoundRobin,
}

impl CpuPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CpuPolicy::Fcfs => "fcfs",
            CpuPolicy::Sjf => "sjf",
            CpuPolicy::Priority => "priority",
            CpuPolicy::RoundRobin => "round-robin",
        }
    }

    pub fn is_preemptive(&self) -> bool {
        matches!(self, CpuPolicy::RoundRobin)
    }
}

impl fmt::Display for CpuPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CpuPolicy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fcfs" => Ok(CpuPolicy::Fcfs),
            "sjf" => Ok(CpuPolicy::Sjf),
            "priority" => Ok(CpuPolicy::Priority),
            "round-robin" | "rr" => Ok(CpuPolicy::RoundRobin),
            _ => Err(EngineError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Result of a scheduling run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuSchedule {
    pub policy: CpuPolicy,

    /// Processes in input order, with times filled in
    pub processes: Vec<Process>,

    /// Process ids in the order they completed
    pub completion_order: Vec<u32>,
}

impl CpuSchedule {
    pub fn average_waiting_time(&self) -> f64 {
        average(self.processes.iter().map(|p| p.waiting_time))
    }

    pub fn average_turnaround_time(&self) -> f64 {
        average(self.processes.iter().map(|p| p.turnaround_time))
    }

    /// Time at which the last process completes (0 for an empty schedule)
    pub fn makespan(&self) -> u64 {
        self.processes
            .iter()
            .map(|p| p.completion_time)
            .max()
            .unwrap_or(0)
    }

    pub fn process(&self, id: u32) -> Option<&Process> {
        self.processes.iter().find(|p| p.id == id)
    }
}

fn average(values: impl Iterator<Item = u64>) -> f64 {
    let (sum, count) = values.fold((0f64, 0u64), |(s, c), v| (s + v as f64, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Schedule `processes` under `policy`
///
/// `quantum` is required for Round Robin and ignored otherwise. Incoming
/// `remaining_time` and computed fields are overwritten.
///
/// # Errors
///
/// - `DuplicateId` if two processes share an id
/// - `MissingQuantum` / `ZeroQuantum` for Round Robin without a usable quantum
/// - `Overflow` if the clock would pass `u64::MAX`
///
/// # Examples
///
/// ```
/// use osalgo_rs::{schedule_cpu, CpuPolicy, Process};
///
/// let procs = vec![Process::new(1, 0, 5), Process::new(2, 1, 3)];
/// let schedule = schedule_cpu(&procs, CpuPolicy::Fcfs, None).unwrap();
/// assert_eq!(schedule.process(2).unwrap().completion_time, 8);
/// ```
pub fn schedule_cpu(
    processes: &[Process],
    policy: CpuPolicy,
    quantum: Option<u64>,
) -> Result<CpuSchedule> {
    ensure_unique_ids("process", processes.iter().map(|p| p.id))?;

    let mut procs = processes.to_vec();
    for p in &mut procs {
        p.reset();
    }

    debug!(
        "Scheduling {} processes with {} (quantum {:?})",
        procs.len(),
        policy,
        quantum
    );

    let order = match policy {
        CpuPolicy::Fcfs => fcfs(&mut procs)?,
        CpuPolicy::Sjf => run_non_preemptive(&mut procs, |p| p.burst_time)?,
        CpuPolicy::Priority => run_non_preemptive(&mut procs, |p| p.priority)?,
        CpuPolicy::RoundRobin => {
            let quantum = match quantum {
                Some(0) => return Err(EngineError::ZeroQuantum),
                Some(q) => q,
                None => return Err(EngineError::MissingQuantum),
            };
            round_robin::run(&mut procs, quantum)?
        }
    };

    let completion_order = order.iter().map(|&i| procs[i].id).collect();

    Ok(CpuSchedule {
        policy,
        processes: procs,
        completion_order,
    })
}

/// Advance `clock` by `burst`
pub(crate) fn advance(clock: u64, burst: u64) -> Result<u64> {
    clock
        .checked_add(burst)
        .ok_or(EngineError::Overflow("cpu clock"))
}

/// Indices of `procs` sorted by arrival time, ties keeping input order
pub(crate) fn arrival_order(procs: &[Process]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..procs.len()).collect();
    order.sort_by_key(|&i| procs[i].arrival_time);
    order
}

fn fcfs(procs: &mut [Process]) -> Result<Vec<usize>> {
    let order = arrival_order(procs);
    let mut clock = 0u64;

    for &i in &order {
        let p = &mut procs[i];
        if clock < p.arrival_time {
            clock = p.arrival_time;
        }
        clock = advance(clock, p.burst_time)?;
        p.finish(clock);
        trace!("FCFS ran process {} until {}", p.id, clock);
    }

    Ok(order)
}

/// Shared scaffold for SJF and Priority
///
/// Repeatedly picks the arrived, unfinished process with the smallest
/// `key`, breaking ties by earliest arrival and then input position. When
/// nothing has arrived yet, the clock jumps to the next arrival.
fn run_non_preemptive<K, F>(procs: &mut [Process], key: F) -> Result<Vec<usize>>
where
    K: Ord,
    F: Fn(&Process) -> K,
{
    let n = procs.len();
    let mut done = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut clock = 0u64;

    while order.len() < n {
        let pick = (0..n)
            .filter(|&i| !done[i] && procs[i].arrival_time <= clock)
            .min_by_key(|&i| (key(&procs[i]), procs[i].arrival_time, i));

        let Some(i) = pick else {
            match (0..n)
                .filter(|&i| !done[i])
                .map(|i| procs[i].arrival_time)
                .min()
            {
                Some(next_arrival) => clock = next_arrival,
                None => break,
            }
            continue;
        };

        clock = advance(clock, procs[i].burst_time)?;
        procs[i].finish(clock);
        done[i] = true;
        order.push(i);
        trace!("Dispatched process {} until {}", procs[i].id, clock);
    }

    Ok(order)
}
