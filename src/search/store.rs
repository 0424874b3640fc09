//! `LabelStore`: typed label arena with reference counting.
//!
//! Labels are kept in a [`ChunkPool`]. A label owns one reference on its predecessor;
//! residency at a node (as head or sibling) is one more reference on the label
//! itself. When the last reference goes away the label is reclaimed on the spot and
//! the reference it held on its predecessor is released in turn, which can cascade
//! back toward the start label.

use super::label::{Label, LabelId};
use crate::alloc::ChunkPool;
use crate::config::PoolConfig;
use crate::graph::{EdgeId, NodeId};
use core::ops::{Index, IndexMut};

/// Arena of labels with payload `P`.
pub struct LabelStore<P> {
    pool: ChunkPool<Label<P>>,
    created: u64,
    reclaimed: u64,
}

impl<P> LabelStore<P> {
    /// Creates an empty store.
    pub fn new(config: &PoolConfig) -> Self {
        Self {
            pool: ChunkPool::with_config(config),
            created: 0,
            reclaimed: 0,
        }
    }

    /// Allocates a detached label (refcount 0, not queued, not resident) and takes a
    /// reference on its predecessor.
    pub fn create(
        &mut self,
        node: NodeId,
        via: Option<EdgeId>,
        predecessor: Option<LabelId>,
        payload: P,
    ) -> LabelId {
        if let Some(pred) = predecessor {
            self[pred].refc += 1;
        }
        self.created += 1;
        LabelId::from_index(self.pool.allocate(Label::new(node, via, predecessor, payload)))
    }

    /// Returns the label behind `id`, or `None` if the slot is vacant.
    #[inline]
    pub fn get(&self, id: LabelId) -> Option<&Label<P>> {
        self.pool.get(id.index())
    }

    /// Takes one more reference on `id`.
    #[inline]
    pub fn retain(&mut self, id: LabelId) {
        self[id].refc += 1;
    }

    /// Drops one reference on `id`, reclaiming it and cascading to its predecessors
    /// as counts reach zero.
    pub fn release(&mut self, id: LabelId) {
        let mut next = Some(id);
        while let Some(current) = next {
            let label = &mut self[current];
            debug_assert!(label.refc > 0, "release of unreferenced label {current:?}");
            label.refc -= 1;
            if label.refc > 0 {
                break;
            }
            next = self.reclaim(current).predecessor;
        }
    }

    /// Reclaims a label nobody references and returns it, releasing its predecessor.
    ///
    /// # Panics
    /// Panics if the label is still referenced.
    pub fn take(&mut self, id: LabelId) -> Label<P> {
        assert_eq!(self[id].refc, 0, "label {id:?} is still referenced");
        let label = self.reclaim(id);
        if let Some(pred) = label.predecessor {
            self.release(pred);
        }
        label
    }

    /// Drops a candidate nobody references.
    #[inline]
    pub fn discard(&mut self, id: LabelId) {
        drop(self.take(id));
    }

    fn reclaim(&mut self, id: LabelId) -> Label<P> {
        match self.pool.reclaim(id.index()) {
            Some(label) => {
                debug_assert!(!label.is_queued(), "reclaimed label {id:?} is still queued");
                debug_assert!(!label.resident, "reclaimed label {id:?} is still resident");
                self.reclaimed += 1;
                label
            }
            None => panic!("label {id:?} reclaimed twice"),
        }
    }

    /// Iterates `head` and the labels reachable through its sibling links.
    pub fn chain(&self, head: LabelId) -> Siblings<'_, P> {
        Siblings {
            store: self,
            next: Some(head),
        }
    }

    /// A chain iterator that yields nothing.
    pub fn empty_chain(&self) -> Siblings<'_, P> {
        Siblings {
            store: self,
            next: None,
        }
    }

    /// Number of live labels.
    #[inline]
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    /// Returns `true` if no label is live.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Labels allocated since the last [`clear`](Self::clear).
    #[inline]
    pub fn created(&self) -> u64 {
        self.created
    }

    /// Labels reclaimed since the last [`clear`](Self::clear).
    #[inline]
    pub fn reclaimed(&self) -> u64 {
        self.reclaimed
    }

    /// Bytes held by the underlying pool.
    #[inline]
    pub fn reserved_bytes(&self) -> usize {
        self.pool.reserved_bytes()
    }

    /// Drops every label and releases the pool's chunks.
    pub fn clear(&mut self) {
        self.pool.clear();
        self.created = 0;
        self.reclaimed = 0;
    }
}

impl<P> Index<LabelId> for LabelStore<P> {
    type Output = Label<P>;

    #[inline]
    fn index(&self, id: LabelId) -> &Label<P> {
        self.pool
            .get(id.index())
            .unwrap_or_else(|| panic!("stale label handle {id:?}"))
    }
}

impl<P> IndexMut<LabelId> for LabelStore<P> {
    #[inline]
    fn index_mut(&mut self, id: LabelId) -> &mut Label<P> {
        self.pool
            .get_mut(id.index())
            .unwrap_or_else(|| panic!("stale label handle {id:?}"))
    }
}

impl<P> core::fmt::Debug for LabelStore<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LabelStore")
            .field("live", &self.pool.len())
            .field("created", &self.created)
            .field("reclaimed", &self.reclaimed)
            .finish()
    }
}

/// Iterator over a sibling chain, head first.
pub struct Siblings<'s, P> {
    store: &'s LabelStore<P>,
    next: Option<LabelId>,
}

impl<P> Iterator for Siblings<'_, P> {
    type Item = LabelId;

    fn next(&mut self) -> Option<LabelId> {
        let current = self.next?;
        self.next = self.store[current].sibling;
        Some(current)
    }
}

impl<P> Clone for Siblings<'_, P> {
    fn clone(&self) -> Self {
        Self {
            store: self.store,
            next: self.next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> LabelStore<u32> {
        LabelStore::new(&PoolConfig::default())
    }

    #[test]
    fn test_predecessor_reference_counting() {
        let mut s = store();
        let root = s.create(0, None, None, 0);
        s.retain(root);
        let child = s.create(1, Some(0), Some(root), 1);
        assert_eq!(s[root].ref_count(), 2);
        assert_eq!(s[child].ref_count(), 0);

        s.discard(child);
        assert_eq!(s[root].ref_count(), 1);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_release_cascades_to_ancestors() {
        let mut s = store();
        let a = s.create(0, None, None, 0);
        s.retain(a);
        let b = s.create(1, Some(0), Some(a), 1);
        s.retain(b);
        let c = s.create(2, Some(1), Some(b), 2);
        s.retain(c);

        // a and b lose residency but stay alive through c.
        s.release(a);
        s.release(b);
        assert_eq!(s.len(), 3);

        s.release(c);
        assert!(s.is_empty());
        assert_eq!(s.created(), 3);
        assert_eq!(s.reclaimed(), 3);
    }

    #[test]
    fn test_cascade_stops_at_shared_ancestor() {
        let mut s = store();
        let root = s.create(0, None, None, 0);
        s.retain(root);
        let left = s.create(1, Some(0), Some(root), 1);
        let right = s.create(2, Some(1), Some(root), 1);
        s.retain(left);
        s.retain(right);

        s.release(left);
        assert_eq!(s[root].ref_count(), 2);
        assert!(s.get(left).is_none());
        assert!(s.get(right).is_some());
    }

    #[test]
    fn test_take_returns_payload() {
        let mut s = store();
        let root = s.create(0, None, None, 7);
        s.retain(root);
        let cand = s.create(1, Some(3), Some(root), 9);
        let label = s.take(cand);
        assert_eq!(label.into_payload(), 9);
        assert_eq!(s[root].ref_count(), 1);
    }

    #[test]
    fn test_chain_iteration() {
        let mut s = store();
        let a = s.create(4, None, None, 0);
        let b = s.create(4, None, None, 1);
        let c = s.create(4, None, None, 2);
        s[a].sibling = Some(b);
        s[b].sibling = Some(c);
        assert_eq!(s.chain(a).collect::<Vec<_>>(), vec![a, b, c]);
        assert_eq!(s.chain(c).count(), 1);
    }

    #[test]
    #[should_panic(expected = "still referenced")]
    fn test_take_of_referenced_label_panics() {
        let mut s = store();
        let a = s.create(0, None, None, 0);
        s.retain(a);
        let _ = s.take(a);
    }
}
