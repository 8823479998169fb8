//! Contiguous-memory fit allocation
//!
//! Requests are served in the given order against blocks in the given
//! order; neither list is sorted. A block serves at most one request and is
//! never split, so any leftover space stays inside the block as internal
//! fragmentation. Requests that fit nowhere stay `allocated = false`.

use super::{BestFit, FirstFit, FitStrategy, WorstFit};
use crate::error::{EngineError, Result};
use crate::validation::ensure_unique_ids;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

/// A fixed memory partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryBlock {
    pub id: u32,
    pub size: u64,
    #[serde(default)]
    pub allocated: bool,
    /// Id of the request occupying this block
    #[serde(default)]
    pub request_id: Option<u32>,
}

impl MemoryBlock {
    pub fn new(id: u32, size: u64) -> Self {
        MemoryBlock {
            id,
            size,
            allocated: false,
            request_id: None,
        }
    }
}

/// A process asking for a contiguous region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRequest {
    pub id: u32,
    pub size: u64,
    #[serde(default)]
    pub allocated: bool,
    /// Id of the block assigned to this request
    #[serde(default)]
    pub block_id: Option<u32>,
}

impl ProcessRequest {
    pub fn new(id: u32, size: u64) -> Self {
        ProcessRequest {
            id,
            size,
            allocated: false,
            block_id: None,
        }
    }
}

/// Fit allocation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitPolicy {
    FirstFit,
    BestFit,
    WorstFit,
}

impl FitPolicy {
    pub fn strategy(&self) -> &'static dyn FitStrategy {
        match self {
            FitPolicy::FirstFit => &FirstFit,
            FitPolicy::BestFit => &BestFit,
            FitPolicy::WorstFit => &WorstFit,
        }
    }
}

impl fmt::Display for FitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.strategy().name())
    }
}

impl FromStr for FitPolicy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "first-fit" | "first" => Ok(FitPolicy::FirstFit),
            "best-fit" | "best" => Ok(FitPolicy::BestFit),
            "worst-fit" | "worst" => Ok(FitPolicy::WorstFit),
            _ => Err(EngineError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Blocks and requests after allocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitOutcome {
    pub policy: FitPolicy,
    pub blocks: Vec<MemoryBlock>,
    pub requests: Vec<ProcessRequest>,
}

impl FitOutcome {
    /// Total leftover space inside blocks that serve a request
    pub fn internal_fragmentation(&self) -> u64 {
        self.requests
            .iter()
            .filter_map(|r| {
                let block_id = r.block_id?;
                let block = self.blocks.iter().find(|b| b.id == block_id)?;
                Some(block.size - r.size)
            })
            .sum()
    }

    /// Total size of blocks left unallocated
    pub fn external_free(&self) -> u64 {
        self.blocks
            .iter()
            .filter(|b| !b.allocated)
            .map(|b| b.size)
            .sum()
    }

    pub fn allocated_count(&self) -> usize {
        self.requests.iter().filter(|r| r.allocated).count()
    }

    pub fn unallocated_requests(&self) -> impl Iterator<Item = &ProcessRequest> {
        self.requests.iter().filter(|r| !r.allocated)
    }
}

/// Assign each request to a block using `policy`
///
/// # Errors
///
/// Returns `DuplicateId` if two blocks or two requests share an id.
///
/// # Examples
///
/// ```
/// use osalgo_rs::{allocate_fit, FitPolicy, MemoryBlock, ProcessRequest};
///
/// let blocks = vec![MemoryBlock::new(0, 100), MemoryBlock::new(1, 500)];
/// let requests = vec![ProcessRequest::new(0, 212)];
/// let outcome = allocate_fit(&blocks, &requests, FitPolicy::FirstFit).unwrap();
/// assert_eq!(outcome.requests[0].block_id, Some(1));
/// ```
pub fn allocate_fit(
    blocks: &[MemoryBlock],
    requests: &[ProcessRequest],
    policy: FitPolicy,
) -> Result<FitOutcome> {
    ensure_unique_ids("block", blocks.iter().map(|b| b.id))?;
    ensure_unique_ids("request", requests.iter().map(|r| r.id))?;

    debug!(
        "Allocating {} requests over {} blocks with {}",
        requests.len(),
        blocks.len(),
        policy
    );

    let strategy = policy.strategy();
    let mut blocks = blocks.to_vec();
    let mut requests = requests.to_vec();

    for request in &mut requests {
        request.allocated = false;
        request.block_id = None;

        match strategy.select(&blocks, request.size) {
            Some(i) => {
                let block = &mut blocks[i];
                block.allocated = true;
                block.request_id = Some(request.id);
                request.allocated = true;
                request.block_id = Some(block.id);
                trace!(
                    "Request {} ({}) -> block {} ({}), leftover {}",
                    request.id,
                    request.size,
                    block.id,
                    block.size,
                    block.size - request.size
                );
            }
            None => debug!("Request {} ({}) left unallocated", request.id, request.size),
        }
    }

    Ok(FitOutcome {
        policy,
        blocks,
        requests,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classic() -> (Vec<MemoryBlock>, Vec<ProcessRequest>) {
        let blocks = [100, 500, 200, 300, 600]
            .iter()
            .enumerate()
            .map(|(i, &s)| MemoryBlock::new(i as u32, s))
            .collect();
        let requests = [212, 417, 112, 426]
            .iter()
            .enumerate()
            .map(|(i, &s)| ProcessRequest::new(i as u32, s))
            .collect();
        (blocks, requests)
    }

    fn assignment(outcome: &FitOutcome) -> Vec<Option<u32>> {
        outcome.requests.iter().map(|r| r.block_id).collect()
    }

    #[test]
    fn test_first_fit_classic() {
        let (blocks, requests) = classic();
        let out = allocate_fit(&blocks, &requests, FitPolicy::FirstFit).unwrap();
        assert_eq!(assignment(&out), vec![Some(1), Some(4), Some(2), None]);
        assert_eq!(out.allocated_count(), 3);
        assert_eq!(out.unallocated_requests().count(), 1);
    }

    #[test]
    fn test_best_fit_classic() {
        let (blocks, requests) = classic();
        let out = allocate_fit(&blocks, &requests, FitPolicy::BestFit).unwrap();
        assert_eq!(assignment(&out), vec![Some(3), Some(1), Some(2), Some(4)]);
        // 88 + 83 + 88 + 174
        assert_eq!(out.internal_fragmentation(), 433);
        assert_eq!(out.external_free(), 100);
    }

    #[test]
    fn test_worst_fit_classic() {
        let (blocks, requests) = classic();
        let out = allocate_fit(&blocks, &requests, FitPolicy::WorstFit).unwrap();
        assert_eq!(assignment(&out), vec![Some(4), Some(1), Some(3), None]);
    }

    #[test]
    fn test_blocks_record_owner() {
        let (blocks, requests) = classic();
        let out = allocate_fit(&blocks, &requests, FitPolicy::FirstFit).unwrap();
        assert_eq!(out.blocks[1].request_id, Some(0));
        assert!(out.blocks[1].allocated);
        assert_eq!(out.blocks[0].request_id, None);
        assert!(!out.blocks[0].allocated);
    }

    #[test]
    fn test_no_block_serves_two_requests() {
        let blocks = vec![MemoryBlock::new(0, 1000)];
        let requests = vec![ProcessRequest::new(0, 10), ProcessRequest::new(1, 10)];
        let out = allocate_fit(&blocks, &requests, FitPolicy::BestFit).unwrap();
        assert!(out.requests[0].allocated);
        assert!(!out.requests[1].allocated);
    }

    #[test]
    fn test_empty_inputs() {
        let out = allocate_fit(&[], &[], FitPolicy::WorstFit).unwrap();
        assert!(out.blocks.is_empty());
        assert_eq!(out.internal_fragmentation(), 0);

        let requests = vec![ProcessRequest::new(0, 5)];
        let out = allocate_fit(&[], &requests, FitPolicy::FirstFit).unwrap();
        assert!(!out.requests[0].allocated);
    }

    #[test]
    fn test_duplicate_block_ids_rejected() {
        let blocks = vec![MemoryBlock::new(3, 10), MemoryBlock::new(3, 20)];
        assert!(matches!(
            allocate_fit(&blocks, &[], FitPolicy::FirstFit),
            Err(EngineError::DuplicateId { kind: "block", id: 3 })
        ));
    }

    #[test]
    fn test_policy_parse_and_display() {
        assert_eq!("best".parse::<FitPolicy>().unwrap(), FitPolicy::BestFit);
        assert_eq!("Worst-Fit".parse::<FitPolicy>().unwrap(), FitPolicy::WorstFit);
        assert_eq!(FitPolicy::FirstFit.to_string(), "first-fit");
        assert!("next-fit".parse::<FitPolicy>().is_err());
    }
}
