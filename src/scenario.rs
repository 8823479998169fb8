//! Scenario documents
//!
//! A scenario describes one engine invocation as data, so callers can keep
//! workloads in TOML or JSON files instead of code:
//!
//! ```toml
//! engine = "disk"
//! policy = "sstf"
//! head = 50
//! requests = [82, 170, 43, 140, 24, 16, 190]
//! ```
//!
//! Documents are checked with `validator` rules on load and again by the
//! engine itself when run.

use crate::core::{
    allocate_files, allocate_fit, replay_pages, schedule_cpu, schedule_disk, CpuPolicy,
    CpuSchedule, DeadlockState, Direction, DiskPolicy, DiskSchedule, FileTable, FilePolicy,
    FitOutcome, FitPolicy, MemoryBlock, PagePolicy, PageReplay, Process, ProcessRequest,
    RequestOutcome, SafetyReport,
};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CpuScenario {
    pub policy: CpuPolicy,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub quantum: Option<u64>,
    pub processes: Vec<Process>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct FitScenario {
    pub policy: FitPolicy,
    pub blocks: Vec<MemoryBlock>,
    pub requests: Vec<ProcessRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PagingScenario {
    pub policy: PagePolicy,
    #[validate(range(min = 1))]
    pub capacity: usize,
    pub reference: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DiskScenario {
    pub policy: DiskPolicy,
    pub head: u64,
    pub requests: Vec<u64>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub disk_size: Option<u64>,
    #[serde(default)]
    pub direction: Direction,
}

/// A resource request to evaluate after the safety check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRequest {
    pub process: usize,
    pub amounts: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DeadlockScenario {
    pub allocation: Vec<Vec<u32>>,
    pub max: Vec<Vec<u32>>,
    pub available: Vec<u32>,
    #[serde(default)]
    pub request: Option<ResourceRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct FilesScenario {
    pub policy: FilePolicy,
    pub total_blocks: usize,
    /// File sizes in blocks
    pub files: Vec<usize>,
}

/// One engine invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "engine", rename_all = "kebab-case")]
pub enum Scenario {
    Cpu(CpuScenario),
    Fit(FitScenario),
    Paging(PagingScenario),
    Disk(DiskScenario),
    Deadlock(DeadlockScenario),
    Files(FilesScenario),
}

/// Safety report plus the optional request decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlockOutcome {
    pub safety: SafetyReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestOutcome>,
}

/// Result of running a [`Scenario`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "engine", rename_all = "kebab-case")]
pub enum Outcome {
    Cpu(CpuSchedule),
    Fit(FitOutcome),
    Paging(PageReplay),
    Disk(DiskSchedule),
    Deadlock(DeadlockOutcome),
    Files(FileTable),
}

impl Scenario {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(text: &str) -> Result<Self> {
        let scenario: Scenario = serde_json::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Load a scenario file; `.json` files are read as JSON, anything else as TOML
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading scenario from {:?}", path);
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_str(&text),
            _ => Self::from_toml_str(&text),
        }
    }

    pub fn engine(&self) -> &'static str {
        match self {
            Scenario::Cpu(_) => "cpu",
            Scenario::Fit(_) => "fit",
            Scenario::Paging(_) => "paging",
            Scenario::Disk(_) => "disk",
            Scenario::Deadlock(_) => "deadlock",
            Scenario::Files(_) => "files",
        }
    }

    /// Check the document-level rules
    pub fn validate(&self) -> Result<()> {
        match self {
            Scenario::Cpu(s) => s.validate()?,
            Scenario::Fit(s) => s.validate()?,
            Scenario::Paging(s) => s.validate()?,
            Scenario::Disk(s) => s.validate()?,
            Scenario::Deadlock(s) => s.validate()?,
            Scenario::Files(s) => s.validate()?,
        }
        Ok(())
    }

    /// Run the engine the scenario names
    pub fn run(&self) -> Result<Outcome> {
        debug!("Running {} scenario", self.engine());
        let outcome = match self {
            Scenario::Cpu(s) => Outcome::Cpu(schedule_cpu(&s.processes, s.policy, s.quantum)?),
            Scenario::Fit(s) => Outcome::Fit(allocate_fit(&s.blocks, &s.requests, s.policy)?),
            Scenario::Paging(s) => {
                Outcome::Paging(replay_pages(&s.reference, s.capacity, s.policy)?)
            }
            Scenario::Disk(s) => Outcome::Disk(schedule_disk(
                &s.requests,
                s.head,
                s.policy,
                s.disk_size,
                s.direction,
            )?),
            Scenario::Deadlock(s) => {
                let state =
                    DeadlockState::new(s.allocation.clone(), s.max.clone(), s.available.clone())?;
                let request = match &s.request {
                    Some(r) => Some(state.request(r.process, &r.amounts)?),
                    None => None,
                };
                Outcome::Deadlock(DeadlockOutcome {
                    safety: state.safety(),
                    request,
                })
            }
            Scenario::Files(s) => {
                Outcome::Files(allocate_files(s.total_blocks, &s.files, s.policy))
            }
        };
        Ok(outcome)
    }
}
