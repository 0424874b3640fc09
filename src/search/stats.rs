//! Per-call search counters.

use serde::{Deserialize, Serialize};

/// Counters collected during one [`solve`](super::LabelSearch::solve) call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Labels settled and offered to the target predicate, siblings included.
    pub settled: u64,
    /// Pops of heads flagged with an in-place update.
    pub updates: u64,
    /// Edges relaxed into a candidate.
    pub relaxations: u64,
    /// Labels allocated.
    pub created: u64,
    /// Labels reclaimed before the call returned.
    pub reclaimed: u64,
    /// Largest queue length observed.
    pub peak_queue: usize,
    /// Labels still alive when the call returned.
    pub live_labels: usize,
}

impl SearchStats {
    pub(crate) fn observe_queue(&mut self, len: usize) {
        self.peak_queue = self.peak_queue.max(len);
    }
}
