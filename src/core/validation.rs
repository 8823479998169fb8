//! Input validation shared by the engine modules
//!
//! Every public operation rejects malformed input before computing anything.
//! Unsatisfiable outcomes (a request with no fitting block, an unsafe state)
//! are not checked here: they are valid results, not errors.

use crate::error::{EngineError, Result};
use std::collections::HashSet;

/// Ensure that no id appears twice
///
/// # Errors
///
/// Returns `DuplicateId` naming the first repeated id in iteration order.
///
/// # Examples
///
/// ```
/// use osalgo_rs::core::validation::ensure_unique_ids;
///
/// assert!(ensure_unique_ids("block", [1, 2, 3]).is_ok());
/// assert!(ensure_unique_ids("block", [1, 2, 1]).is_err());
/// ```
pub fn ensure_unique_ids<I>(kind: &'static str, ids: I) -> Result<()>
where
    I: IntoIterator<Item = u32>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(EngineError::DuplicateId { kind, id });
        }
    }
    Ok(())
}

/// Ensure a flattened vector or matrix has the expected number of entries
pub fn ensure_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(EngineError::DimensionMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Ensure a track lies on a disk with `disk_size` tracks (valid tracks `0..disk_size`)
pub fn ensure_track(track: u64, disk_size: u64) -> Result<()> {
    if track >= disk_size {
        return Err(EngineError::TrackOutOfRange { track, disk_size });
    }
    Ok(())
}
