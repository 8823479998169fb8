//! # osalgo - Classic OS Resource-Management Algorithms
//!
//! `osalgo-rs` is a deterministic engine for the textbook algorithms an
//! operating system uses to hand out CPU time, memory, frames, disk head
//! movement and file blocks:
//!
//! - **CPU scheduling**: FCFS, SJF, non-preemptive Priority, Round Robin
//! - **Memory fit**: first, best and worst fit over fixed partitions
//! - **Page replacement**: FIFO, LRU, Optimal, LFU, MFU with a per-step trace
//! - **Disk scheduling**: FCFS, SSTF, SCAN, C-SCAN, LOOK, C-LOOK
//! - **Deadlock avoidance**: Banker's safety check and resource requests
//! - **File allocation**: contiguous, linked and indexed block tables
//!
//! Every operation is a pure function of its inputs. Identical inputs always
//! produce identical outputs, so calls can run on any thread.
//!
//! ## Quick Start
//!
//! ```rust
//! use osalgo_rs::{schedule_disk, DiskPolicy, Direction, Result};
//!
//! # fn main() -> Result<()> {
//! let schedule = schedule_disk(
//!     &[82, 170, 43, 140, 24, 16, 190],
//!     50,
//!     DiskPolicy::Sstf,
//!     None,
//!     Direction::Up,
//! )?;
//! assert_eq!(schedule.total_seek, 208);
//! # Ok(())
//! # }
//! ```
//!
//! ## Scenario Files
//!
//! ```rust,no_run
//! use osalgo_rs::{Outcome, Scenario};
//!
//! # fn main() -> osalgo_rs::Result<()> {
//! let scenario = Scenario::from_path("workloads/round-robin.toml")?;
//! if let Outcome::Cpu(schedule) = scenario.run()? {
//!     println!("avg wait {:.2}", schedule.average_waiting_time());
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod scenario;

// Re-export core modules internally so crate:: paths in core still work
#[allow(unused_imports)]
pub(crate) use crate::core::{allocator, banker, cpu, disk, error, paging, validation};

pub use crate::core::{
    allocate_files, allocate_fit, check_safety, replay_pages, request_resources, schedule_cpu,
    schedule_disk, CpuPolicy, CpuSchedule, DeadlockState, Direction, DiskBlock, DiskPolicy,
    DiskSchedule, FileInfo, FilePolicy, FileTable, FitOutcome, FitPolicy, MemoryBlock, PagePolicy,
    PageReplay, PageStep, Process, ProcessRequest, RequestOutcome, SafetyReport,
};
pub use crate::core::allocator::{BestFit, FirstFit, FitStrategy, WorstFit};
pub use crate::core::error::{EngineError, Result};
pub use crate::scenario::{DeadlockOutcome, Outcome, Scenario};
