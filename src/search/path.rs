//! Path extraction from a terminal label back to the source.

use super::label::{Label, LabelId};
use super::policy::SearchPolicy;
use super::store::LabelStore;
use crate::graph::{EdgeId, NodeId};
use core::fmt;
use core::iter::FusedIterator;

/// One label on an extracted path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathStep<C> {
    /// Node of the label.
    pub node: NodeId,
    /// Edge the label was reached through; `None` at the source.
    pub edge: Option<EdgeId>,
    /// Cost the policy reports for the label.
    pub cost: C,
}

/// Walks a path backwards, from its terminal label to the source.
///
/// The iterator only reads labels; cloning it gives an independent cursor over the
/// same path. An iterator that starts at end means no path was found.
pub struct PathIter<'s, P: SearchPolicy> {
    labels: &'s LabelStore<P::Payload>,
    policy: &'s P,
    terminal: Option<LabelId>,
    cursor: Option<LabelId>,
}

impl<'s, P: SearchPolicy> PathIter<'s, P> {
    pub(crate) fn new(
        labels: &'s LabelStore<P::Payload>,
        policy: &'s P,
        terminal: Option<LabelId>,
    ) -> Self {
        Self {
            labels,
            policy,
            terminal,
            cursor: terminal,
        }
    }

    /// Returns `true` once every step has been yielded, or if there was no path.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.cursor.is_none()
    }

    /// The label the path ends at.
    #[inline]
    pub fn terminal(&self) -> Option<LabelId> {
        self.terminal
    }

    /// Cost of the terminal label.
    pub fn terminal_cost(&self) -> Option<P::Cost> {
        self.terminal.map(|id| self.policy.cost(&self.labels[id]))
    }

    /// The label under the cursor.
    pub fn label(&self) -> Option<&'s Label<P::Payload>> {
        let labels = self.labels;
        self.cursor.map(|id| &labels[id])
    }

    /// Remaining nodes in source-to-target order.
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self.clone().map(|step| step.node).collect();
        nodes.reverse();
        nodes
    }

    /// Remaining edges in source-to-target order.
    pub fn edges(&self) -> Vec<EdgeId> {
        let mut edges: Vec<EdgeId> = self.clone().filter_map(|step| step.edge).collect();
        edges.reverse();
        edges
    }
}

impl<P: SearchPolicy> Iterator for PathIter<'_, P> {
    type Item = PathStep<P::Cost>;

    fn next(&mut self) -> Option<Self::Item> {
        let label = &self.labels[self.cursor?];
        self.cursor = label.predecessor;
        Some(PathStep {
            node: label.node(),
            edge: label.via_edge(),
            cost: self.policy.cost(label),
        })
    }
}

impl<P: SearchPolicy> FusedIterator for PathIter<'_, P> {}

impl<P: SearchPolicy> Clone for PathIter<'_, P> {
    fn clone(&self) -> Self {
        Self {
            labels: self.labels,
            policy: self.policy,
            terminal: self.terminal,
            cursor: self.cursor,
        }
    }
}

impl<P: SearchPolicy> fmt::Debug for PathIter<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathIter")
            .field("terminal", &self.terminal)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}
