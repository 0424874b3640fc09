//! `IndexedHeap`: a binary min-heap whose elements know their own position.
//!
//! The heap stores small `Copy` handles. Everything else is supplied by a
//! [`HeapPolicy`] passed into each mutating call: the policy records where each
//! element currently sits, extracts its key and orders keys. Because positions are
//! kept up to date, an element can be repositioned after its key changed or removed
//! from the middle of the heap in logarithmic time.

use core::cmp::Ordering;
use core::fmt;

/// Position bookkeeping and ordering for the elements of an [`IndexedHeap`].
pub trait HeapPolicy {
    /// Handle stored in the heap.
    type Element: Copy;
    /// Priority extracted from an element.
    type Key;

    /// Current index of `element` in the heap, or `None` if it is not queued.
    fn position(&self, element: Self::Element) -> Option<usize>;

    /// Records that `element` moved from `old` to `new`. `None` means "not queued".
    fn update_position(&mut self, element: Self::Element, old: Option<usize>, new: Option<usize>);

    /// Extracts the priority of `element`.
    fn key(&self, element: Self::Element) -> Self::Key;

    /// Orders two keys. `Less` is popped first.
    fn compare(&self, a: &Self::Key, b: &Self::Key) -> Ordering;
}

/// A binary heap of element handles ordered by a [`HeapPolicy`].
///
/// Every mutating operation is O(log n); [`top`](Self::top) and
/// [`is_empty`](Self::is_empty) are O(1). After each operation the policy's recorded
/// position of every queued element equals its index in [`as_slice`](Self::as_slice).
#[derive(Clone)]
pub struct IndexedHeap<E> {
    data: Vec<E>,
}

impl<E: Copy> IndexedHeap<E> {
    /// Creates an empty heap.
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Creates an empty heap with a specific capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of queued elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the heap is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the minimum element without removing it.
    #[inline]
    pub fn top(&self) -> Option<E> {
        self.data.first().copied()
    }

    /// The backing sequence in heap order.
    #[inline]
    pub fn as_slice(&self) -> &[E] {
        &self.data
    }

    /// Inserts `element`, or repositions it if the policy reports it as already queued.
    pub fn push<P>(&mut self, policy: &mut P, element: E)
    where
        P: HeapPolicy<Element = E>,
    {
        if let Some(pos) = policy.position(element) {
            debug_assert!(pos < self.data.len(), "stale heap position {pos}");
            self.reposition(policy, pos);
            return;
        }
        let pos = self.data.len();
        self.data.push(element);
        policy.update_position(element, None, Some(pos));
        self.sift_up(policy, pos);
    }

    /// Restores heap order around `element` after its key changed.
    ///
    /// Returns `false` (and does nothing) if the element is not queued.
    pub fn update<P>(&mut self, policy: &mut P, element: E) -> bool
    where
        P: HeapPolicy<Element = E>,
    {
        match policy.position(element) {
            Some(pos) => {
                self.reposition(policy, pos);
                true
            }
            None => false,
        }
    }

    /// Removes and returns the minimum element.
    pub fn pop<P>(&mut self, policy: &mut P) -> Option<E>
    where
        P: HeapPolicy<Element = E>,
    {
        if self.data.is_empty() {
            return None;
        }
        Some(self.erase_at(policy, 0))
    }

    /// Removes the element at `pos`.
    ///
    /// # Panics
    /// Panics if `pos` is out of bounds.
    pub fn erase_at<P>(&mut self, policy: &mut P, pos: usize) -> E
    where
        P: HeapPolicy<Element = E>,
    {
        assert!(pos < self.data.len(), "heap position {pos} out of bounds (len {})", self.data.len());
        let last = self.data.len() - 1;
        let removed = self.data[pos];
        if pos != last {
            self.data.swap(pos, last);
            policy.update_position(self.data[pos], Some(last), Some(pos));
        }
        self.data.pop();
        policy.update_position(removed, Some(pos), None);
        if pos < self.data.len() {
            self.reposition(policy, pos);
        }
        removed
    }

    /// Restores heap order after the key of the top element changed in place.
    pub fn update_top<P>(&mut self, policy: &mut P)
    where
        P: HeapPolicy<Element = E>,
    {
        if !self.data.is_empty() {
            self.sift_down(policy, 0);
        }
    }

    /// Removes every element, marking each as not queued.
    pub fn clear<P>(&mut self, policy: &mut P)
    where
        P: HeapPolicy<Element = E>,
    {
        for (pos, element) in self.data.drain(..).enumerate() {
            policy.update_position(element, Some(pos), None);
        }
    }

    fn reposition<P>(&mut self, policy: &mut P, pos: usize)
    where
        P: HeapPolicy<Element = E>,
    {
        let settled = self.sift_up(policy, pos);
        if settled == pos {
            self.sift_down(policy, pos);
        }
    }

    fn sift_up<P>(&mut self, policy: &mut P, mut node: usize) -> usize
    where
        P: HeapPolicy<Element = E>,
    {
        while node > 0 {
            let parent = (node - 1) / 2;
            if self.less(policy, node, parent) {
                self.swap(policy, node, parent);
                node = parent;
            } else {
                break;
            }
        }
        node
    }

    fn sift_down<P>(&mut self, policy: &mut P, mut node: usize)
    where
        P: HeapPolicy<Element = E>,
    {
        let len = self.data.len();
        loop {
            let left = 2 * node + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut smaller = left;
            if right < len && self.less(policy, right, left) {
                smaller = right;
            }

            if self.less(policy, smaller, node) {
                self.swap(policy, node, smaller);
                node = smaller;
            } else {
                break;
            }
        }
    }

    fn swap<P>(&mut self, policy: &mut P, a: usize, b: usize)
    where
        P: HeapPolicy<Element = E>,
    {
        self.data.swap(a, b);
        policy.update_position(self.data[a], Some(b), Some(a));
        policy.update_position(self.data[b], Some(a), Some(b));
    }

    // Helper to compare two elements in the heap
    fn less<P>(&self, policy: &P, a: usize, b: usize) -> bool
    where
        P: HeapPolicy<Element = E>,
    {
        let key_a = policy.key(self.data[a]);
        let key_b = policy.key(self.data[b]);
        policy.compare(&key_a, &key_b) == Ordering::Less
    }
}

impl<E: Copy> Default for IndexedHeap<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: fmt::Debug> fmt::Debug for IndexedHeap<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexedHeap")
            .field("len", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Elements are indices into `keys`; positions live in a side table.
    struct TablePolicy {
        keys: Vec<i64>,
        positions: Vec<Option<usize>>,
    }

    impl TablePolicy {
        fn new(keys: &[i64]) -> Self {
            Self {
                keys: keys.to_vec(),
                positions: vec![None; keys.len()],
            }
        }
    }

    impl HeapPolicy for TablePolicy {
        type Element = usize;
        type Key = i64;

        fn position(&self, element: usize) -> Option<usize> {
            self.positions[element]
        }

        fn update_position(&mut self, element: usize, old: Option<usize>, new: Option<usize>) {
            assert_eq!(self.positions[element], old);
            self.positions[element] = new;
        }

        fn key(&self, element: usize) -> i64 {
            self.keys[element]
        }

        fn compare(&self, a: &i64, b: &i64) -> Ordering {
            a.cmp(b)
        }
    }

    fn assert_positions(heap: &IndexedHeap<usize>, policy: &TablePolicy) {
        for (pos, &e) in heap.as_slice().iter().enumerate() {
            assert_eq!(policy.positions[e], Some(pos));
        }
        let queued = policy.positions.iter().filter(|p| p.is_some()).count();
        assert_eq!(queued, heap.len());
    }

    #[test]
    fn test_pop_in_key_order() {
        let mut policy = TablePolicy::new(&[5, 1, 10, 2, 8, 3, 7]);
        let mut heap = IndexedHeap::new();
        for e in 0..7 {
            heap.push(&mut policy, e);
            assert_positions(&heap, &policy);
        }
        assert_eq!(heap.top(), Some(1));

        let mut keys = Vec::new();
        while let Some(e) = heap.pop(&mut policy) {
            assert_eq!(policy.positions[e], None);
            assert_positions(&heap, &policy);
            keys.push(policy.keys[e]);
        }
        assert_eq!(keys, vec![1, 2, 3, 5, 7, 8, 10]);
    }

    #[test]
    fn test_push_of_queued_element_repositions() {
        let mut policy = TablePolicy::new(&[4, 6, 8, 9]);
        let mut heap = IndexedHeap::new();
        for e in 0..4 {
            heap.push(&mut policy, e);
        }

        policy.keys[3] = 1;
        heap.push(&mut policy, 3);
        assert_eq!(heap.len(), 4);
        assert_eq!(heap.top(), Some(3));

        policy.keys[3] = 20;
        assert!(heap.update(&mut policy, 3));
        assert_positions(&heap, &policy);
        assert_eq!(heap.top(), Some(0));
    }

    #[test]
    fn test_erase_at_middle() {
        let mut policy = TablePolicy::new(&[1, 5, 2, 9, 6, 3]);
        let mut heap = IndexedHeap::new();
        for e in 0..6 {
            heap.push(&mut policy, e);
        }
        let pos = policy.positions[4].unwrap();
        assert_eq!(heap.erase_at(&mut policy, pos), 4);
        assert_positions(&heap, &policy);

        let order: Vec<_> = core::iter::from_fn(|| heap.pop(&mut policy)).collect();
        assert_eq!(order, vec![0, 2, 5, 1, 3]);
    }

    #[test]
    fn test_update_top_and_clear() {
        let mut policy = TablePolicy::new(&[1, 2, 3]);
        let mut heap = IndexedHeap::new();
        for e in 0..3 {
            heap.push(&mut policy, e);
        }
        policy.keys[0] = 100;
        heap.update_top(&mut policy);
        assert_eq!(heap.top(), Some(1));
        assert_positions(&heap, &policy);

        heap.clear(&mut policy);
        assert!(heap.is_empty());
        assert!(policy.positions.iter().all(Option::is_none));
        assert!(!heap.update(&mut policy, 2));
    }
}
