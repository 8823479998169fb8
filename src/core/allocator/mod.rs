//! Allocation strategies over fixed block lists
//!
//! Two families live here:
//! - Contiguous-memory fit allocation (first/best/worst fit) over a list of
//!   memory blocks that are never split or merged
//! - File-block allocation (contiguous/linked/indexed) over a numbered disk

pub mod file;
pub mod fit;

use fit::MemoryBlock;

/// Block selection strategy for fit allocation
///
/// Implementors pick one block for a single request. Blocks already marked
/// allocated are never eligible.
pub trait FitStrategy {
    /// Return the index into `blocks` to assign, or `None` if no block fits
    fn select(&self, blocks: &[MemoryBlock], request_size: u64) -> Option<usize>;

    /// Human-readable strategy name
    fn name(&self) -> &'static str;
}

/// Blocks that are free and large enough for `request_size`, with their indices
fn eligible<'a>(
    blocks: &'a [MemoryBlock],
    request_size: u64,
) -> impl Iterator<Item = (usize, &'a MemoryBlock)> {
    blocks
        .iter()
        .enumerate()
        .filter(move |(_, b)| !b.allocated && b.size >= request_size)
}

/// First unallocated block, in list order, that is large enough
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFit;

impl FitStrategy for FirstFit {
    fn select(&self, blocks: &[MemoryBlock], request_size: u64) -> Option<usize> {
        eligible(blocks, request_size).map(|(i, _)| i).next()
    }

    fn name(&self) -> &'static str {
        "first-fit"
    }
}

/// Block leaving the smallest leftover; earliest block wins ties
#[derive(Debug, Clone, Copy, Default)]
pub struct BestFit;

impl FitStrategy for BestFit {
    fn select(&self, blocks: &[MemoryBlock], request_size: u64) -> Option<usize> {
        let mut best: Option<(usize, u64)> = None;
        for (i, block) in eligible(blocks, request_size) {
            let leftover = block.size - request_size;
            match best {
                Some((_, current)) if leftover >= current => {}
                _ => best = Some((i, leftover)),
            }
        }
        best.map(|(i, _)| i)
    }

    fn name(&self) -> &'static str {
        "best-fit"
    }
}

/// Block leaving the largest leftover; earliest block wins ties
#[derive(Debug, Clone, Copy, Default)]
pub struct WorstFit;

impl FitStrategy for WorstFit {
    fn select(&self, blocks: &[MemoryBlock], request_size: u64) -> Option<usize> {
        let mut worst: Option<(usize, u64)> = None;
        for (i, block) in eligible(blocks, request_size) {
            let leftover = block.size - request_size;
            match worst {
                Some((_, current)) if leftover <= current => {}
                _ => worst = Some((i, leftover)),
            }
        }
        worst.map(|(i, _)| i)
    }

    fn name(&self) -> &'static str {
        "worst-fit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(sizes: &[u64]) -> Vec<MemoryBlock> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, &s)| MemoryBlock::new(i as u32, s))
            .collect()
    }

    #[test]
    fn test_first_fit_takes_first_large_enough() {
        let b = blocks(&[100, 500, 200, 300, 600]);
        assert_eq!(FirstFit.select(&b, 212), Some(1));
        assert_eq!(FirstFit.select(&b, 700), None);
    }

    #[test]
    fn test_best_fit_exact_tie_goes_to_earliest() {
        let b = blocks(&[300, 250, 250, 400]);
        assert_eq!(BestFit.select(&b, 240), Some(1));
    }

    #[test]
    fn test_worst_fit_tie_goes_to_earliest() {
        let b = blocks(&[600, 100, 600]);
        assert_eq!(WorstFit.select(&b, 50), Some(0));
    }

    #[test]
    fn test_allocated_blocks_are_skipped() {
        let mut b = blocks(&[500, 400]);
        b[0].allocated = true;
        assert_eq!(FirstFit.select(&b, 100), Some(1));
        assert_eq!(BestFit.select(&b, 100), Some(1));
        assert_eq!(WorstFit.select(&b, 100), Some(1));
    }

    #[test]
    fn test_strategy_names() {
        let strategies: [&dyn FitStrategy; 3] = [&FirstFit, &BestFit, &WorstFit];
        let names: Vec<&str> = strategies.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["first-fit", "best-fit", "worst-fit"]);
    }
}
