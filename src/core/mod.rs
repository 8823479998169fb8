//! Engine modules
//!
//! Each module is an independent family of pure functions: inputs are
//! copied, computed in a single pass and returned. Nothing is shared
//! between calls.

pub mod allocator;
pub mod banker;
pub mod cpu;
pub mod disk;
pub mod error;
pub mod paging;
pub mod validation;

pub use allocator::file::{allocate_files, DiskBlock, FileInfo, FilePolicy, FileTable};
pub use allocator::fit::{allocate_fit, FitOutcome, FitPolicy, MemoryBlock, ProcessRequest};
pub use banker::{check_safety, request_resources, DeadlockState, RequestOutcome, SafetyReport};
pub use cpu::{schedule_cpu, CpuPolicy, CpuSchedule, Process};
pub use disk::{schedule_disk, Direction, DiskPolicy, DiskSchedule};
pub use paging::{replay_pages, PagePolicy, PageReplay, PageStep};
