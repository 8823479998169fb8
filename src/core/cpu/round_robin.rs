//! Preemptive Round Robin
//!
//! The ready queue is seeded in arrival order. After each slice, processes
//! that arrived up to and including the new clock are enqueued *before* the
//! preempted process is re-enqueued, so a new arrival at the same instant
//! runs ahead of it.

use super::{advance, arrival_order, Process};
use crate::error::Result;
use std::collections::VecDeque;
use tracing::trace;

/// Run Round Robin over `procs`, returning indices in completion order
///
/// `quantum` must be non-zero. Fails with `Overflow` if the clock would
/// pass `u64::MAX`.
pub(crate) fn run(procs: &mut [Process], quantum: u64) -> Result<Vec<usize>> {
    run_observed(procs, quantum, |_, _| {})
}

/// [`run`] with an observation hook
///
/// `on_slice` sees `(index, slice_length)` for every dispatch. It has no
/// effect on scheduling; unit tests use it to inspect the slice sequence.
fn run_observed<F>(procs: &mut [Process], quantum: u64, mut on_slice: F) -> Result<Vec<usize>>
where
    F: FnMut(usize, u64),
{
    let n = procs.len();
    let arrivals = arrival_order(procs);
    let mut queue: VecDeque<usize> = VecDeque::with_capacity(n);
    let mut order = Vec::with_capacity(n);
    let mut next = 0usize;
    let mut clock = 0u64;

    while order.len() < n {
        admit(procs, &arrivals, &mut next, &mut queue, clock);

        let Some(i) = queue.pop_front() else {
            // Queue drained: idle until the next unfinished process arrives
            match arrivals.get(next) {
                Some(&j) => clock = procs[j].arrival_time,
                None => break,
            }
            continue;
        };

        let slice = quantum.min(procs[i].remaining_time);
        clock = advance(clock, slice)?;
        procs[i].remaining_time -= slice;
        on_slice(i, slice);
        trace!(
            "RR ran process {} for {} (remaining {}) until {}",
            procs[i].id,
            slice,
            procs[i].remaining_time,
            clock
        );

        admit(procs, &arrivals, &mut next, &mut queue, clock);

        if procs[i].remaining_time > 0 {
            queue.push_back(i);
        } else {
            procs[i].finish(clock);
            order.push(i);
        }
    }

    Ok(order)
}

/// Enqueue every not-yet-admitted process with `arrival_time <= clock`
fn admit(
    procs: &[Process],
    arrivals: &[usize],
    next: &mut usize,
    queue: &mut VecDeque<usize>,
    clock: u64,
) {
    while let Some(&j) = arrivals.get(*next) {
        if procs[j].arrival_time > clock {
            break;
        }
        queue.push_back(j);
        *next += 1;
    }
}
