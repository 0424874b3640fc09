//! Label records and the comparison taxonomy.
//!
//! A label is one candidate path ending at one node. The header fields are owned by
//! the engine; the payload is whatever the active [`SearchPolicy`] needs to rank
//! and extend paths.
//!
//! [`SearchPolicy`]: super::SearchPolicy

use crate::graph::{EdgeId, NodeId};

/// Handle of a label inside a [`LabelStore`](super::LabelStore).
///
/// Handles are slot indices: once a label is reclaimed its handle may be reused by a
/// later label, so a handle is only meaningful while the label is referenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelId(u32);

impl LabelId {
    /// # Panics
    /// Panics if `index` does not fit the 32-bit handle range.
    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        match u32::try_from(index) {
            Ok(raw) => Self(raw),
            Err(_) => panic!("label index {index} exceeds the 32-bit handle range"),
        }
    }

    /// Slot index of this label.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// `heap_pos` of a label that is not in the queue.
pub(crate) const NOT_QUEUED: u32 = u32::MAX;

/// One path candidate at one node.
#[derive(Debug, Clone)]
pub struct Label<P> {
    node: NodeId,
    via: Option<EdgeId>,
    pub(crate) predecessor: Option<LabelId>,
    pub(crate) sibling: Option<LabelId>,
    pub(crate) refc: u32,
    pub(crate) heap_pos: u32,
    pub(crate) resident: bool,
    pub(crate) settled: bool,
    pub(crate) updated: bool,
    payload: P,
}

impl<P> Label<P> {
    pub(crate) fn new(node: NodeId, via: Option<EdgeId>, predecessor: Option<LabelId>, payload: P) -> Self {
        Self {
            node,
            via,
            predecessor,
            sibling: None,
            refc: 0,
            heap_pos: NOT_QUEUED,
            resident: false,
            settled: false,
            updated: false,
            payload,
        }
    }

    /// Node this label sits at.
    #[inline]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Edge traversed to reach this label; `None` for the start label.
    #[inline]
    pub fn via_edge(&self) -> Option<EdgeId> {
        self.via
    }

    /// The label one step closer to the source.
    #[inline]
    pub fn predecessor(&self) -> Option<LabelId> {
        self.predecessor
    }

    /// Next label in this label's sibling chain.
    #[inline]
    pub fn sibling(&self) -> Option<LabelId> {
        self.sibling
    }

    /// Number of owners: successors pointing here, plus one while resident.
    #[inline]
    pub fn ref_count(&self) -> u32 {
        self.refc
    }

    /// Current queue index, `None` when not queued.
    #[inline]
    pub fn heap_position(&self) -> Option<usize> {
        (self.heap_pos != NOT_QUEUED).then_some(self.heap_pos as usize)
    }

    /// Returns `true` while the label sits in the priority queue.
    #[inline]
    pub fn is_queued(&self) -> bool {
        self.heap_pos != NOT_QUEUED
    }

    /// Returns `true` while the label is a node's resident head or a member of its
    /// sibling chain.
    #[inline]
    pub fn is_resident(&self) -> bool {
        self.resident
    }

    /// Returns `true` once the label's edges have been relaxed.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Returns `true` while a settled label waits to push an in-place update to its
    /// descendants.
    #[inline]
    pub fn is_updated(&self) -> bool {
        self.updated
    }

    /// Policy-defined payload.
    #[inline]
    pub fn payload(&self) -> &P {
        &self.payload
    }

    #[inline]
    pub(crate) fn payload_mut(&mut self) -> &mut P {
        &mut self.payload
    }

    #[inline]
    pub(crate) fn into_payload(self) -> P {
        self.payload
    }
}

/// Outcome of comparing a freshly relaxed candidate with the label already resident
/// at the same node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelComparison {
    /// The resident is at least as good on every criterion; the candidate is dropped.
    DiscardNew,
    /// The candidate is better on every criterion; the resident and its whole sibling
    /// chain are dropped and the candidate takes over.
    DiscardOldAndSiblings,
    /// Both should be kept as independent search branches. Not supported: the search
    /// call fails with [`SearchError::PropagateBothUnsupported`](crate::SearchError).
    PropagateBoth,
    /// The candidate becomes the head; the resident stays as its sibling.
    ReplaceOld,
    /// The candidate replaces the resident and inherits the resident's siblings.
    DiscardOldKeepSiblings,
    /// The resident stays head; the candidate joins its sibling chain.
    KeepNewAsSibling,
    /// The resident absorbs the candidate's information in place; the candidate is
    /// dropped.
    KeepNewUpdateOld,
}

impl LabelComparison {
    /// Returns `true` for outcomes after which the candidate survives as a label.
    pub fn keeps_candidate(self) -> bool {
        !matches!(self, Self::DiscardNew | Self::KeepNewUpdateOld | Self::PropagateBoth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_label_is_detached() {
        let label = Label::new(3, Some(5), None, 1.5f64);
        assert_eq!(label.node(), 3);
        assert_eq!(label.via_edge(), Some(5));
        assert_eq!(label.heap_position(), None);
        assert!(!label.is_queued());
        assert!(!label.is_resident());
        assert_eq!(label.ref_count(), 0);
        assert_eq!(*label.payload(), 1.5);
    }

    #[test]
    fn test_keeps_candidate() {
        assert!(LabelComparison::ReplaceOld.keeps_candidate());
        assert!(LabelComparison::KeepNewAsSibling.keeps_candidate());
        assert!(!LabelComparison::KeepNewUpdateOld.keeps_candidate());
        assert!(!LabelComparison::DiscardNew.keeps_candidate());
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    #[should_panic(expected = "32-bit handle range")]
    fn test_handle_overflow_panics() {
        let _ = LabelId::from_index(u32::MAX as usize + 1);
    }
}
