//! The capability trait that specializes [`LabelSearch`](super::LabelSearch).

use super::label::{Label, LabelComparison};
use crate::graph::{EdgeRef, NodeId};
use core::cmp::Ordering;

/// Everything the search core needs to know about labels of one kind.
///
/// A policy decides what a label carries, how a label is extended across an edge,
/// how a new candidate relates to a resident label, and in which order labels leave
/// the queue. The core itself never looks inside a payload.
pub trait SearchPolicy {
    /// Per-edge weight read from the [`EdgeWeights`](crate::graph::EdgeWeights) source.
    type Weight;
    /// Data carried by every label.
    type Payload;
    /// Queue priority of a label.
    type Key;
    /// Value reported per step during path extraction.
    type Cost;

    /// Payload of the start label.
    fn start_payload(&self, source: NodeId) -> Self::Payload;

    /// Payload of the candidate obtained by extending `pred` across `edge`, or `None`
    /// if the edge cannot be taken from `pred`.
    fn construct_label(
        &self,
        pred: &Label<Self::Payload>,
        edge: EdgeRef,
        weight: Self::Weight,
    ) -> Option<Self::Payload>;

    /// Classifies a candidate against a label already at the same node.
    fn compare_labels(
        &self,
        old: &Label<Self::Payload>,
        new: &Label<Self::Payload>,
    ) -> LabelComparison;

    /// Queue priority of `label`.
    fn queue_key(&self, label: &Label<Self::Payload>) -> Self::Key;

    /// Orders queue keys; `Less` leaves the queue first.
    fn compare_keys(&self, a: &Self::Key, b: &Self::Key) -> Ordering;

    /// Cost reported for `label` in a [`PathStep`](super::PathStep).
    fn cost(&self, label: &Label<Self::Payload>) -> Self::Cost;

    /// Merges `from` into `into` for [`LabelComparison::KeepNewUpdateOld`] and when an
    /// update propagates to a descendant. Returns `true` if `into` changed.
    fn update_label(&self, into: &mut Self::Payload, from: &Self::Payload) -> bool {
        let _ = (into, from);
        false
    }

    /// After `head` was updated in place, returns `true` if `sibling` no longer adds
    /// anything to the chain and should be dropped.
    fn is_redundant_after_update(
        &self,
        head: &Label<Self::Payload>,
        sibling: &Label<Self::Payload>,
    ) -> bool {
        let _ = (head, sibling);
        false
    }
}
