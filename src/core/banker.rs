//! Deadlock avoidance with the Banker's algorithm
//!
//! The safety check restarts its scan from process 0 after every grant
//! rather than continuing from the process it just granted. Among several
//! valid safe sequences this picks a specific one, and callers rely on it.

use crate::error::{EngineError, Result};
use crate::validation::ensure_len;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Resource-allocation state: `n` processes over `m` resource types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DeadlockRows")]
pub struct DeadlockState {
    /// Units currently held, one row per process
    allocation: Vec<Vec<u32>>,
    /// Maximum claim, one row per process
    max: Vec<Vec<u32>>,
    /// Free units per resource type
    available: Vec<u32>,
}

/// Unvalidated wire form of [`DeadlockState`]
#[derive(Deserialize)]
struct DeadlockRows {
    allocation: Vec<Vec<u32>>,
    max: Vec<Vec<u32>>,
    available: Vec<u32>,
}

impl TryFrom<DeadlockRows> for DeadlockState {
    type Error = EngineError;

    fn try_from(rows: DeadlockRows) -> Result<Self> {
        DeadlockState::new(rows.allocation, rows.max, rows.available)
    }
}

/// Outcome of a safety check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyReport {
    pub is_safe: bool,
    /// Completion order; empty when the state is unsafe
    pub sequence: Vec<usize>,
}

/// Outcome of a resource request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum RequestOutcome {
    /// The request was granted; the new state is safe with this sequence
    Granted {
        state: DeadlockState,
        sequence: Vec<usize>,
    },
    /// Not enough units are free right now
    MustWait,
    /// Granting would leave the system unsafe
    Unsafe,
}

impl DeadlockState {
    /// Build a state from flattened row-major `n x m` matrices
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if a matrix is not `n * m` long or `available` is not `m` long
    /// - `NegativeNeed` if some `max[i][j] < allocation[i][j]`
    /// - `Overflow` if `n * m` does not fit in a `usize`
    pub fn from_flat(
        n: usize,
        m: usize,
        allocation: &[u32],
        max: &[u32],
        available: &[u32],
    ) -> Result<Self> {
        let cells = n.checked_mul(m).ok_or(EngineError::Overflow("matrix size"))?;
        ensure_len("allocation", cells, allocation.len())?;
        ensure_len("max", cells, max.len())?;
        ensure_len("available", m, available.len())?;

        let rows = |flat: &[u32]| -> Vec<Vec<u32>> {
            (0..n).map(|i| flat[i * m..(i + 1) * m].to_vec()).collect()
        };
        Self::new(rows(allocation), rows(max), available.to_vec())
    }

    /// Build a state from per-process rows
    ///
    /// # Errors
    ///
    /// Same as [`DeadlockState::from_flat`].
    pub fn new(allocation: Vec<Vec<u32>>, max: Vec<Vec<u32>>, available: Vec<u32>) -> Result<Self> {
        let m = available.len();
        ensure_len("max rows", allocation.len(), max.len())?;
        for (i, (alloc_row, max_row)) in allocation.iter().zip(&max).enumerate() {
            ensure_len("allocation row", m, alloc_row.len())?;
            ensure_len("max row", m, max_row.len())?;
            for (j, (&held, &claim)) in alloc_row.iter().zip(max_row).enumerate() {
                if claim < held {
                    return Err(EngineError::NegativeNeed {
                        process: i,
                        resource: j,
                        max: claim,
                        allocation: held,
                    });
                }
            }
        }

        Ok(DeadlockState {
            allocation,
            max,
            available,
        })
    }

    pub fn process_count(&self) -> usize {
        self.allocation.len()
    }

    pub fn resource_count(&self) -> usize {
        self.available.len()
    }

    pub fn allocation(&self) -> &[Vec<u32>] {
        &self.allocation
    }

    pub fn max(&self) -> &[Vec<u32>] {
        &self.max
    }

    pub fn available(&self) -> &[u32] {
        &self.available
    }

    /// Remaining demand per process: `max - allocation`
    pub fn need(&self) -> Vec<Vec<u32>> {
        self.allocation
            .iter()
            .zip(&self.max)
            .map(|(alloc_row, max_row)| {
                max_row
                    .iter()
                    .zip(alloc_row)
                    .map(|(&claim, &held)| claim - held)
                    .collect()
            })
            .collect()
    }

    /// Run the safety algorithm
    pub fn safety(&self) -> SafetyReport {
        let n = self.process_count();
        let need = self.need();
        let mut work: Vec<u64> = self.available.iter().map(|&a| u64::from(a)).collect();
        let mut finished = vec![false; n];
        let mut sequence = Vec::with_capacity(n);

        while sequence.len() < n {
            let candidate = (0..n).find(|&i| {
                !finished[i]
                    && need[i]
                        .iter()
                        .zip(&work)
                        .all(|(&demand, &free)| u64::from(demand) <= free)
            });

            let Some(i) = candidate else {
                break;
            };

            for (free, &held) in work.iter_mut().zip(&self.allocation[i]) {
                *free += u64::from(held);
            }
            finished[i] = true;
            sequence.push(i);
            trace!("Process {} can finish; work now {:?}", i, work);
        }

        if sequence.len() == n {
            SafetyReport {
                is_safe: true,
                sequence,
            }
        } else {
            debug!(
                "Unsafe state: {} of {} processes cannot finish",
                n - sequence.len(),
                n
            );
            SafetyReport {
                is_safe: false,
                sequence: Vec::new(),
            }
        }
    }

    /// Decide whether `process` may receive `request` now
    ///
    /// # Errors
    ///
    /// - `ProcessOutOfRange` for an unknown process
    /// - `DimensionMismatch` if `request` is not one entry per resource type
    /// - `RequestExceedsNeed` if the request goes beyond the process's remaining claim
    pub fn request(&self, process: usize, request: &[u32]) -> Result<RequestOutcome> {
        let n = self.process_count();
        if process >= n {
            return Err(EngineError::ProcessOutOfRange { process, count: n });
        }
        ensure_len("request", self.resource_count(), request.len())?;

        let need = self.need();
        for (j, (&asked, &demand)) in request.iter().zip(&need[process]).enumerate() {
            if asked > demand {
                return Err(EngineError::RequestExceedsNeed {
                    process,
                    resource: j,
                    requested: asked,
                    need: demand,
                });
            }
        }

        if request
            .iter()
            .zip(&self.available)
            .any(|(&asked, &free)| asked > free)
        {
            debug!("Process {} must wait for {:?}", process, request);
            return Ok(RequestOutcome::MustWait);
        }

        let mut pending = self.clone();
        for (j, &asked) in request.iter().enumerate() {
            pending.available[j] -= asked;
            pending.allocation[process][j] += asked;
        }

        let report = pending.safety();
        if report.is_safe {
            Ok(RequestOutcome::Granted {
                state: pending,
                sequence: report.sequence,
            })
        } else {
            debug!("Request {:?} by process {} would be unsafe", request, process);
            Ok(RequestOutcome::Unsafe)
        }
    }
}

/// Banker's safety check over flattened row-major matrices
///
/// # Examples
///
/// ```
/// use osalgo_rs::check_safety;
///
/// let allocation = [0, 1, 0, 2, 0, 0, 3, 0, 2, 2, 1, 1, 0, 0, 2];
/// let max = [7, 5, 3, 3, 2, 2, 9, 0, 2, 2, 2, 2, 4, 3, 3];
/// let report = check_safety(5, 3, &allocation, &max, &[3, 3, 2]).unwrap();
/// assert!(report.is_safe);
/// assert_eq!(report.sequence, vec![1, 3, 0, 2, 4]);
/// ```
///
/// # Errors
///
/// Same as [`DeadlockState::from_flat`].
pub fn check_safety(
    n: usize,
    m: usize,
    allocation: &[u32],
    max: &[u32],
    available: &[u32],
) -> Result<SafetyReport> {
    debug!("Checking safety for {} processes, {} resource types", n, m);
    let state = DeadlockState::from_flat(n, m, allocation, max, available)?;
    Ok(state.safety())
}

/// Banker's resource-request check over flattened matrices
pub fn request_resources(
    state: &DeadlockState,
    process: usize,
    request: &[u32],
) -> Result<RequestOutcome> {
    state.request(process, request)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textbook() -> DeadlockState {
        DeadlockState::new(
            vec![
                vec![0, 1, 0],
                vec![2, 0, 0],
                vec![3, 0, 2],
                vec![2, 1, 1],
                vec![0, 0, 2],
            ],
            vec![
                vec![7, 5, 3],
                vec![3, 2, 2],
                vec![9, 0, 2],
                vec![2, 2, 2],
                vec![4, 3, 3],
            ],
            vec![3, 3, 2],
        )
        .unwrap()
    }

    #[test]
    fn test_need_matrix() {
        let need = textbook().need();
        assert_eq!(need[0], vec![7, 4, 3]);
        assert_eq!(need[4], vec![4, 3, 1]);
    }

    #[test]
    fn test_safe_sequence_restarts_from_zero() {
        let report = textbook().safety();
        assert!(report.is_safe);
        // After P3, the scan restarts and finds P0 before P4
        assert_eq!(report.sequence, vec![1, 3, 0, 2, 4]);
    }

    #[test]
    fn test_unsafe_state() {
        let state = DeadlockState::new(
            vec![vec![1, 0], vec![0, 1]],
            vec![vec![2, 1], vec![1, 2]],
            vec![0, 0],
        )
        .unwrap();
        let report = state.safety();
        assert!(!report.is_safe);
        assert!(report.sequence.is_empty());
    }

    #[test]
    fn test_partial_progress_is_still_unsafe() {
        let state = DeadlockState::new(
            vec![vec![1], vec![0], vec![0]],
            vec![vec![1], vec![5], vec![5]],
            vec![0],
        )
        .unwrap();
        let report = state.safety();
        assert!(!report.is_safe);
        assert!(report.sequence.is_empty());
    }

    #[test]
    fn test_degenerate_dimensions() {
        let report = check_safety(0, 3, &[], &[], &[1, 1, 1]).unwrap();
        assert!(report.is_safe);
        assert!(report.sequence.is_empty());

        let report = check_safety(3, 0, &[], &[], &[]).unwrap();
        assert_eq!(report.sequence, vec![0, 1, 2]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = check_safety(2, 2, &[0, 0, 0], &[1, 1, 1, 1], &[1, 1]).unwrap_err();
        assert!(matches!(
            err,
            EngineError::DimensionMismatch {
                what: "allocation",
                expected: 4,
                actual: 3
            }
        ));
        assert!(check_safety(1, 2, &[0, 0], &[1, 1], &[1]).is_err());
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        let err = check_safety(usize::MAX / 2 + 1, 2, &[], &[], &[0, 0]).unwrap_err();
        assert!(matches!(err, EngineError::Overflow("matrix size")));

        let err = DeadlockState::from_flat(2, usize::MAX, &[], &[], &[]).unwrap_err();
        assert!(matches!(err, EngineError::Overflow(_)));
    }

    #[test]
    fn test_negative_need_rejected() {
        let err = check_safety(1, 2, &[0, 3], &[1, 2], &[0, 0]).unwrap_err();
        assert!(matches!(
            err,
            EngineError::NegativeNeed {
                process: 0,
                resource: 1,
                max: 2,
                allocation: 3
            }
        ));
    }

    #[test]
    fn test_request_granted() {
        let outcome = textbook().request(1, &[1, 0, 2]).unwrap();
        match outcome {
            RequestOutcome::Granted { state, sequence } => {
                assert_eq!(state.available(), &[2, 3, 0]);
                assert_eq!(state.allocation()[1], vec![3, 0, 2]);
                assert_eq!(sequence, vec![1, 3, 0, 2, 4]);
            }
            other => panic!("expected grant, got {:?}", other),
        }
    }

    #[test]
    fn test_request_must_wait_or_unsafe() {
        let state = match textbook().request(1, &[1, 0, 2]).unwrap() {
            RequestOutcome::Granted { state, .. } => state,
            other => panic!("expected grant, got {:?}", other),
        };
        // Available is now [2, 3, 0]: P4 wants 3 units of A
        assert_eq!(
            state.request(4, &[3, 3, 0]).unwrap(),
            RequestOutcome::MustWait
        );
        // P0's request fits but leaves nobody able to finish
        assert_eq!(state.request(0, &[0, 2, 0]).unwrap(), RequestOutcome::Unsafe);
        // The original state is untouched by a refused request
        assert_eq!(state.available(), &[2, 3, 0]);
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{"allocation":[[2]],"max":[[1]],"available":[0]}"#;
        assert!(serde_json::from_str::<DeadlockState>(json).is_err());

        let json = serde_json::to_string(&textbook()).unwrap();
        let state: DeadlockState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, textbook());
    }

    #[test]
    fn test_request_errors() {
        let state = textbook();
        assert!(matches!(
            state.request(9, &[0, 0, 0]),
            Err(EngineError::ProcessOutOfRange { process: 9, count: 5 })
        ));
        assert!(matches!(
            state.request(1, &[2, 0, 0]),
            Err(EngineError::RequestExceedsNeed { resource: 0, .. })
        ));
        assert!(request_resources(&state, 1, &[1, 0]).is_err());
    }
}
