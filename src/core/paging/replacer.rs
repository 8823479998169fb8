//! Victim selection for page replacement
//!
//! Each policy keeps its own bookkeeping alongside the frame slots. The
//! simulator tells a replacer about hits and loads; on a fault with full
//! frames it asks for the slot to overwrite. Slots never move, so the
//! visible frame layout stays stable across replacements.

use super::PagePolicy;
use lru::LruCache;
use std::collections::{HashMap, VecDeque};
use std::num::NonZeroUsize;

pub(crate) trait Replacer {
    /// `page` was referenced while resident
    fn touch(&mut self, page: u32, step: usize);

    /// `page` was brought into a frame at `step`
    fn loaded(&mut self, page: u32, step: usize);

    /// Choose the frame slot to overwrite at `step` and forget its page
    fn victim(&mut self, frames: &[u32], reference: &[u32], step: usize) -> Option<usize>;
}

pub(crate) fn for_policy(policy: PagePolicy, capacity: NonZeroUsize) -> Box<dyn Replacer> {
    match policy {
        PagePolicy::Fifo => Box::new(FifoReplacer::default()),
        PagePolicy::Lru => Box::new(LruReplacer::new(capacity)),
        PagePolicy::Optimal => Box::new(OptimalReplacer),
        PagePolicy::Lfu => Box::new(FrequencyReplacer::new(FrequencyRule::Least)),
        PagePolicy::Mfu => Box::new(FrequencyReplacer::new(FrequencyRule::Most)),
    }
}

fn slot_of(frames: &[u32], page: u32) -> Option<usize> {
    frames.iter().position(|&p| p == page)
}

/// Evicts the page loaded earliest; hits do not refresh its position
#[derive(Debug, Default)]
struct FifoReplacer {
    queue: VecDeque<u32>,
}

impl Replacer for FifoReplacer {
    fn touch(&mut self, _page: u32, _step: usize) {}

    fn loaded(&mut self, page: u32, _step: usize) {
        self.queue.push_back(page);
    }

    fn victim(&mut self, frames: &[u32], _reference: &[u32], _step: usize) -> Option<usize> {
        let page = self.queue.pop_front()?;
        slot_of(frames, page)
    }
}

/// Evicts the resident page whose last reference is oldest
struct LruReplacer {
    recency: LruCache<u32, ()>,
}

impl LruReplacer {
    fn new(capacity: NonZeroUsize) -> Self {
        LruReplacer {
            recency: LruCache::new(capacity),
        }
    }
}

impl Replacer for LruReplacer {
    fn touch(&mut self, page: u32, _step: usize) {
        self.recency.promote(&page);
    }

    fn loaded(&mut self, page: u32, _step: usize) {
        self.recency.put(page, ());
    }

    fn victim(&mut self, frames: &[u32], _reference: &[u32], _step: usize) -> Option<usize> {
        let (page, _) = self.recency.pop_lru()?;
        slot_of(frames, page)
    }
}

/// Evicts the page whose next use lies farthest ahead
///
/// A page never referenced again counts as infinitely far. Ties go to the
/// lowest slot.
struct OptimalReplacer;

impl Replacer for OptimalReplacer {
    fn touch(&mut self, _page: u32, _step: usize) {}

    fn loaded(&mut self, _page: u32, _step: usize) {}

    fn victim(&mut self, frames: &[u32], reference: &[u32], step: usize) -> Option<usize> {
        let future = reference.get(step + 1..).unwrap_or(&[]);
        let mut chosen: Option<(usize, usize)> = None;

        for (slot, &page) in frames.iter().enumerate() {
            let distance = future
                .iter()
                .position(|&p| p == page)
                .unwrap_or(usize::MAX);
            match chosen {
                Some((_, farthest)) if distance <= farthest => {}
                _ => chosen = Some((slot, distance)),
            }
            if distance == usize::MAX {
                break;
            }
        }

        chosen.map(|(slot, _)| slot)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrequencyRule {
    Least,
    Most,
}

/// LFU / MFU
///
/// A page's count is the number of references since it was last loaded, so
/// an evicted page starts again from 1. Among equal counts the page loaded
/// earliest is evicted.
struct FrequencyReplacer {
    rule: FrequencyRule,
    /// page -> (reference count, step it was loaded)
    counters: HashMap<u32, (u64, usize)>,
}

impl FrequencyReplacer {
    fn new(rule: FrequencyRule) -> Self {
        FrequencyReplacer {
            rule,
            counters: HashMap::new(),
        }
    }
}

impl Replacer for FrequencyReplacer {
    fn touch(&mut self, page: u32, _step: usize) {
        if let Some((count, _)) = self.counters.get_mut(&page) {
            *count += 1;
        }
    }

    fn loaded(&mut self, page: u32, step: usize) {
        self.counters.insert(page, (1, step));
    }

    fn victim(&mut self, frames: &[u32], _reference: &[u32], _step: usize) -> Option<usize> {
        let mut chosen: Option<(usize, u64, usize)> = None;

        for (slot, page) in frames.iter().enumerate() {
            let (count, loaded_at) = self.counters.get(page).copied().unwrap_or((0, 0));
            let better = match chosen {
                None => true,
                Some((_, best_count, best_loaded)) => {
                    let count_wins = match self.rule {
                        FrequencyRule::Least => count < best_count,
                        FrequencyRule::Most => count > best_count,
                    };
                    count_wins || (count == best_count && loaded_at < best_loaded)
                }
            };
            if better {
                chosen = Some((slot, count, loaded_at));
            }
        }

        let (slot, _, _) = chosen?;
        self.counters.remove(&frames[slot]);
        Some(slot)
    }
}
