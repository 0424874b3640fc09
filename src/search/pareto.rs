//! Multi-criteria search: every node ends up with its full Pareto front.
//!
//! Labels carry a cost vector. A candidate joins the chain at a node unless some
//! member is at least as good on every criterion, and it evicts every member it is
//! at least as good as. Heads are kept lexicographically smallest so the queue
//! processes chains in lexicographic order.

use super::label::{Label, LabelComparison};
use super::policy::SearchPolicy;
use crate::graph::{EdgeRef, NodeId};
use core::cmp::Ordering;
use core::fmt;
use core::marker::PhantomData;
use core::ops::Add;
use num_traits::Zero;

/// Pareto policy over `N` additive criteria of type `W`.
pub struct Pareto<W, const N: usize> {
    _weight: PhantomData<fn() -> W>,
}

impl<W, const N: usize> Pareto<W, N> {
    /// Creates the policy.
    pub const fn new() -> Self {
        Self {
            _weight: PhantomData,
        }
    }
}

impl<W, const N: usize> Default for Pareto<W, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W, const N: usize> Clone for Pareto<W, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<W, const N: usize> Copy for Pareto<W, N> {}

impl<W, const N: usize> fmt::Debug for Pareto<W, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pareto<{N}>")
    }
}

/// Returns `true` if `a` is no worse than `b` on every criterion.
///
/// Equal vectors dominate each other.
pub fn dominates<W: PartialOrd>(a: &[W], b: &[W]) -> bool {
    a.iter().zip(b).all(|(x, y)| x <= y)
}

impl<W, const N: usize> SearchPolicy for Pareto<W, N>
where
    W: Clone + Add<Output = W> + PartialOrd + Zero,
{
    type Weight = [W; N];
    type Payload = [W; N];
    type Key = [W; N];
    type Cost = [W; N];

    fn start_payload(&self, _source: NodeId) -> [W; N] {
        core::array::from_fn(|_| W::zero())
    }

    fn construct_label(&self, pred: &Label<[W; N]>, _edge: EdgeRef, weight: [W; N]) -> Option<[W; N]> {
        let base = pred.payload();
        Some(core::array::from_fn(|i| base[i].clone() + weight[i].clone()))
    }

    fn compare_labels(&self, old: &Label<[W; N]>, new: &Label<[W; N]>) -> LabelComparison {
        let (old, new) = (old.payload(), new.payload());
        if dominates(old, new) {
            LabelComparison::DiscardNew
        } else if dominates(new, old) {
            LabelComparison::DiscardOldKeepSiblings
        } else if self.compare_keys(new, old) == Ordering::Less {
            LabelComparison::ReplaceOld
        } else {
            LabelComparison::KeepNewAsSibling
        }
    }

    fn queue_key(&self, label: &Label<[W; N]>) -> [W; N] {
        label.payload().clone()
    }

    fn compare_keys(&self, a: &[W; N], b: &[W; N]) -> Ordering {
        a.partial_cmp(b).unwrap_or(Ordering::Equal)
    }

    fn cost(&self, label: &Label<[W; N]>) -> [W; N] {
        label.payload().clone()
    }
}
