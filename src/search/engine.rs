//! `LabelSearch`: the label-setting search core.
//!
//! The core owns three pieces of state: a [`LabelStore`] with every live label, an
//! [`IndexedHeap`] of chain heads waiting to be processed, and the per-node map of
//! resident heads. Everything that depends on what a label *means* is delegated to
//! the [`SearchPolicy`].
//!
//! ### Label lifecycle
//! A candidate is created by relaxing an edge, classified against the chain resident
//! at its node, and then either installed, spliced into the chain, merged into an
//! existing label or discarded. Heads wait in the queue; popping a head processes
//! every member of its chain that has not relaxed its edges yet, and every member
//! that was updated in place since it did.

use super::label::{Label, LabelComparison, LabelId, NOT_QUEUED};
use super::path::PathIter;
use super::policy::SearchPolicy;
use super::stats::SearchStats;
use super::store::{LabelStore, Siblings};
use crate::collections::{HeapPolicy, IndexedHeap};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::graph::{Direction, EdgeRef, EdgeWeights, Graph, NodeId};
use core::cmp::Ordering;
use core::fmt;

/// Heap adaptor: positions live in the label headers, keys come from the policy.
///
/// At equal policy keys, labels waiting to push an update leave the queue first.
struct LabelQueue<'s, P: SearchPolicy> {
    labels: &'s mut LabelStore<P::Payload>,
    policy: &'s P,
}

impl<P: SearchPolicy> HeapPolicy for LabelQueue<'_, P> {
    type Element = LabelId;
    type Key = (P::Key, bool);

    #[inline]
    fn position(&self, id: LabelId) -> Option<usize> {
        self.labels[id].heap_position()
    }

    #[inline]
    fn update_position(&mut self, id: LabelId, _old: Option<usize>, new: Option<usize>) {
        self.labels[id].heap_pos = match new {
            Some(pos) => match u32::try_from(pos) {
                Ok(raw) if raw != NOT_QUEUED => raw,
                _ => panic!("queue position {pos} exceeds the label position range"),
            },
            None => NOT_QUEUED,
        };
    }

    #[inline]
    fn key(&self, id: LabelId) -> Self::Key {
        let label = &self.labels[id];
        (self.policy.queue_key(label), !label.updated)
    }

    #[inline]
    fn compare(&self, a: &Self::Key, b: &Self::Key) -> Ordering {
        self.policy.compare_keys(&a.0, &b.0).then(a.1.cmp(&b.1))
    }
}

/// Single-source label search over a borrowed graph and weight source.
///
/// One instance can run any number of searches; each [`solve`](Self::solve) starts
/// from a clean state and the labels of the last search stay inspectable until the
/// next one.
///
/// # Example
///
/// ```rust
/// use pathlabel::{AdjacencyGraph, Direction, LabelSearch, ScalarWeight};
///
/// let graph = AdjacencyGraph::directed(4, &[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)]);
/// let weights = [1u32, 1, 1, 1, 5];
/// let mut search = LabelSearch::new(&graph, &weights[..], ScalarWeight::new());
///
/// let path = search.solve_to(0, 2, Direction::Forward).unwrap();
/// assert_eq!(path.terminal_cost(), Some(2));
/// assert_eq!(path.nodes(), vec![0, 1, 2]);
/// ```
pub struct LabelSearch<'a, G, E: ?Sized, P: SearchPolicy> {
    graph: &'a G,
    weights: &'a E,
    policy: P,
    pub(super) labels: LabelStore<P::Payload>,
    queue: IndexedHeap<LabelId>,
    pub(super) node_labels: Vec<Option<LabelId>>,
    pub(super) direction: Direction,
    stats: SearchStats,
    config: SearchConfig,
    found: Option<LabelId>,
}

impl<'a, G, E, P> LabelSearch<'a, G, E, P>
where
    G: Graph,
    E: EdgeWeights<P::Weight> + ?Sized,
    P: SearchPolicy,
{
    /// Binds a search to `graph`, `weights` and `policy` with the default
    /// configuration.
    pub fn new(graph: &'a G, weights: &'a E, policy: P) -> Self {
        Self::with_config(graph, weights, policy, SearchConfig::default())
    }

    /// Binds a search with an explicit configuration.
    pub fn with_config(graph: &'a G, weights: &'a E, policy: P, config: SearchConfig) -> Self {
        Self {
            graph,
            weights,
            policy,
            labels: LabelStore::new(&config.pool),
            queue: IndexedHeap::with_capacity(config.queue_capacity),
            node_labels: Vec::new(),
            direction: Direction::Forward,
            stats: SearchStats::default(),
            config,
            found: None,
        }
    }

    /// Runs a search from `source` until a settled label satisfies `is_target`.
    ///
    /// Every label is offered to `is_target` once, when it is settled; this includes
    /// siblings processed along with their chain head.
    ///
    /// Returns the path to that label, or an at-end iterator if the queue ran dry.
    ///
    /// # Errors
    /// - [`SearchError::NodeOutOfRange`] if `source` is not a node of the graph.
    /// - [`SearchError::BackwardOnUndirected`] for a backward search on an
    ///   undirected graph.
    /// - [`SearchError::PropagateBothUnsupported`] if the policy asks to keep two
    ///   independent branches at one node.
    pub fn solve<F>(
        &mut self,
        source: NodeId,
        mut is_target: F,
        direction: Direction,
    ) -> Result<PathIter<'_, P>, SearchError>
    where
        F: FnMut(&Label<P::Payload>) -> bool,
    {
        self.check_node(source)?;
        if direction == Direction::Backward && !self.graph.is_directed() {
            return Err(SearchError::BackwardOnUndirected);
        }

        self.reset();
        self.direction = direction;
        trace_event!(debug, source, ?direction, "label search started");

        let start = self
            .labels
            .create(source, None, None, self.policy.start_payload(source));
        self.install(source, start);
        self.enqueue(start);

        let outcome = self.run(&mut is_target);
        self.stats.created = self.labels.created();
        self.stats.reclaimed = self.labels.reclaimed();
        self.stats.live_labels = self.labels.len();
        trace_event!(
            debug,
            settled = self.stats.settled,
            found = self.found.is_some(),
            "label search finished"
        );
        outcome?;

        Ok(PathIter::new(&self.labels, &self.policy, self.found))
    }

    /// Runs a search from `source` to the first label settled at `target`.
    ///
    /// # Errors
    /// As [`solve`](Self::solve); `target` is range-checked as well.
    pub fn solve_to(
        &mut self,
        source: NodeId,
        target: NodeId,
        direction: Direction,
    ) -> Result<PathIter<'_, P>, SearchError> {
        self.check_node(target)?;
        self.solve(source, |label| label.node() == target, direction)
    }

    /// Drops every label and empties the queue.
    pub fn reset(&mut self) {
        let mut queue = LabelQueue {
            labels: &mut self.labels,
            policy: &self.policy,
        };
        self.queue.clear(&mut queue);
        self.labels.clear();
        self.node_labels.clear();
        self.node_labels.resize(self.graph.node_count(), None);
        self.stats = SearchStats::default();
        self.found = None;
    }

    fn check_node(&self, node: NodeId) -> Result<(), SearchError> {
        let node_count = self.graph.node_count();
        if node < node_count {
            Ok(())
        } else {
            Err(SearchError::NodeOutOfRange { node, node_count })
        }
    }

    fn run<F>(&mut self, is_target: &mut F) -> Result<(), SearchError>
    where
        F: FnMut(&Label<P::Payload>) -> bool,
    {
        while let Some(head) = self.pop() {
            let label = &self.labels[head];
            let node = label.node();
            if label.updated {
                self.stats.updates += 1;
            }
            if let Some(found) = self.process_chain(node, is_target)? {
                self.found = Some(found);
                return Ok(());
            }
        }
        Ok(())
    }

    /// Processes chain members at `node` until none has pending work or one
    /// satisfies `is_target`. The chain is re-read after every member since
    /// processing can reshape it.
    fn process_chain<F>(
        &mut self,
        node: NodeId,
        is_target: &mut F,
    ) -> Result<Option<LabelId>, SearchError>
    where
        F: FnMut(&Label<P::Payload>) -> bool,
    {
        while let Some(id) = self.next_pending(node) {
            self.labels.retain(id);
            let result = self.process_label(id, is_target);
            self.labels.release(id);
            if result? {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    fn next_pending(&self, node: NodeId) -> Option<LabelId> {
        let head = self.node_labels[node]?;
        self.labels.chain(head).find(|&id| {
            let label = &self.labels[id];
            label.updated || !label.settled
        })
    }

    /// Pushes a pending update of `id`, or settles it. A label settled here is
    /// offered to `is_target` before its edges are relaxed; returns `true` if it
    /// matched.
    fn process_label<F>(&mut self, id: LabelId, is_target: &mut F) -> Result<bool, SearchError>
    where
        F: FnMut(&Label<P::Payload>) -> bool,
    {
        let label = &mut self.labels[id];
        if label.updated {
            label.updated = false;
            self.propagate_update(id);
            return Ok(false);
        }

        label.settled = true;
        self.stats.settled += 1;
        trace_event!(trace, node = label.node(), "label settled");
        if is_target(&self.labels[id]) {
            return Ok(true);
        }
        self.relax_edges(id)?;
        Ok(false)
    }

    fn relax_edges(&mut self, id: LabelId) -> Result<(), SearchError> {
        let graph = self.graph;
        let node = self.labels[id].node();
        match self.direction {
            Direction::Forward => self.relax_all(id, graph.out_edges(node)),
            Direction::Backward => self.relax_all(id, graph.in_edges(node)),
        }
    }

    fn relax_all(
        &mut self,
        pred: LabelId,
        edges: impl Iterator<Item = EdgeRef>,
    ) -> Result<(), SearchError> {
        for edge in edges {
            // A self-loop may have evicted `pred`; its remaining extensions are moot.
            if !self.labels[pred].resident {
                break;
            }
            let weight = self.weights.cost(edge.edge);
            let Some(payload) = self
                .policy
                .construct_label(&self.labels[pred], edge, weight)
            else {
                continue;
            };
            self.stats.relaxations += 1;
            let candidate = self
                .labels
                .create(edge.target, Some(edge.edge), Some(pred), payload);
            self.settle_candidate(edge.target, candidate)?;
        }
        Ok(())
    }

    /// Classifies `candidate` against the chain at `node` and carries out the outcome.
    fn settle_candidate(&mut self, node: NodeId, candidate: LabelId) -> Result<(), SearchError> {
        let Some(old) = self.node_labels[node] else {
            self.install(node, candidate);
            self.enqueue(candidate);
            return Ok(());
        };

        let outcome = self
            .policy
            .compare_labels(&self.labels[old], &self.labels[candidate]);
        trace_event!(trace, node, ?outcome, "candidate classified");

        match outcome {
            LabelComparison::DiscardNew => self.labels.discard(candidate),
            LabelComparison::DiscardOldAndSiblings => {
                self.erase_label(node);
                self.install(node, candidate);
                self.enqueue(candidate);
            }
            LabelComparison::PropagateBoth => {
                self.labels.discard(candidate);
                return Err(SearchError::PropagateBothUnsupported { node });
            }
            LabelComparison::ReplaceOld => self.replace_head(node, old, candidate, true)?,
            LabelComparison::DiscardOldKeepSiblings => {
                self.replace_head(node, old, candidate, false)?;
            }
            LabelComparison::KeepNewAsSibling => self.add_sibling(old, candidate)?,
            LabelComparison::KeepNewUpdateOld => self.update_resident(old, candidate),
        }
        Ok(())
    }

    /// Merges `candidate` into the resident `old` and drops the candidate.
    pub(super) fn update_resident(&mut self, old: LabelId, candidate: LabelId) {
        let from = self.labels.take(candidate).into_payload();
        if self.merge_payload(old, &from) {
            self.mark_updated(old);
        }
    }

    pub(super) fn merge_payload(&mut self, into: LabelId, from: &P::Payload) -> bool {
        self.policy.update_label(self.labels[into].payload_mut(), from)
    }

    /// Schedules the consequences of an in-place update of `id`.
    ///
    /// A settled label is flagged so that its descendants are refreshed when its
    /// chain is next processed; an unsettled one only needs its queue slot fixed.
    pub(super) fn mark_updated(&mut self, id: LabelId) {
        let node = self.labels[id].node();
        let is_head = self.node_labels[node] == Some(id);
        if self.labels[id].settled {
            self.labels[id].updated = true;
        }
        if is_head {
            if self.labels[id].settled || self.labels[id].is_queued() {
                self.enqueue(id);
            }
            self.update_siblings(node);
        } else if let Some(head) = self.node_labels[node] {
            if self.labels[id].updated && !self.labels[head].is_queued() {
                self.enqueue(head);
            }
        }
    }

    /// Makes `id` the resident head at `node`.
    pub(super) fn install(&mut self, node: NodeId, id: LabelId) {
        self.labels[id].resident = true;
        self.labels.retain(id);
        self.node_labels[node] = Some(id);
    }

    /// Removes a label that is no longer linked into any chain.
    pub(super) fn evict(&mut self, id: LabelId) {
        self.dequeue(id);
        let label = &mut self.labels[id];
        label.resident = false;
        label.sibling = None;
        self.labels.release(id);
    }

    /// Inserts `id` into the queue, or repositions it if it is already queued.
    pub(super) fn enqueue(&mut self, id: LabelId) {
        let mut queue = LabelQueue {
            labels: &mut self.labels,
            policy: &self.policy,
        };
        self.queue.push(&mut queue, id);
        self.stats.observe_queue(self.queue.len());
    }

    pub(super) fn dequeue(&mut self, id: LabelId) {
        if let Some(pos) = self.labels[id].heap_position() {
            let mut queue = LabelQueue {
                labels: &mut self.labels,
                policy: &self.policy,
            };
            self.queue.erase_at(&mut queue, pos);
        }
    }

    fn pop(&mut self) -> Option<LabelId> {
        let mut queue = LabelQueue {
            labels: &mut self.labels,
            policy: &self.policy,
        };
        self.queue.pop(&mut queue)
    }

    pub(super) fn graph(&self) -> &'a G {
        self.graph
    }

    pub(super) fn weights(&self) -> &'a E {
        self.weights
    }

    /// Resident head at `node`, if any.
    pub fn resident(&self, node: NodeId) -> Option<LabelId> {
        self.node_labels.get(node).copied().flatten()
    }

    /// The chain at `node`, head first.
    pub fn labels_at(&self, node: NodeId) -> Siblings<'_, P::Payload> {
        match self.resident(node) {
            Some(head) => self.labels.chain(head),
            None => self.labels.empty_chain(),
        }
    }

    /// The label behind `id`, if it is still alive.
    pub fn label(&self, id: LabelId) -> Option<&Label<P::Payload>> {
        self.labels.get(id)
    }

    /// Path ending at `id`; at-end if the label is no longer alive.
    pub fn path(&self, id: LabelId) -> PathIter<'_, P> {
        let terminal = self.labels.get(id).map(|_| id);
        PathIter::new(&self.labels, &self.policy, terminal)
    }

    /// Label that satisfied the target predicate in the last search.
    pub fn found(&self) -> Option<LabelId> {
        self.found
    }

    /// Counters of the last search.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// The policy this search was built with.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// The configuration this search was built with.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Number of heads still queued.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Number of live labels.
    pub fn live_labels(&self) -> usize {
        self.labels.len()
    }
}

impl<G, E: ?Sized, P: SearchPolicy> fmt::Debug for LabelSearch<'_, G, E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelSearch")
            .field("direction", &self.direction)
            .field("labels", &self.labels)
            .field("queue", &self.queue.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AdjacencyGraph;
    use crate::search::ScalarWeight;

    fn diamond() -> (AdjacencyGraph, Vec<u32>) {
        // 0 -> 1 -> 3 costs 2, 0 -> 2 -> 3 costs 5.
        let g = AdjacencyGraph::directed(4, &[(0, 1), (1, 3), (0, 2), (2, 3)]);
        (g, vec![1, 1, 1, 4])
    }

    #[test]
    fn test_start_label_is_resident_and_referenced() {
        let (g, w) = diamond();
        let mut search = LabelSearch::new(&g, &w, ScalarWeight::new());
        let path = search.solve_to(0, 0, Direction::Forward).unwrap();
        assert_eq!(path.nodes(), vec![0]);

        let start = search.resident(0).unwrap();
        let label = search.label(start).unwrap();
        assert_eq!(label.ref_count(), 1);
        assert!(label.predecessor().is_none());
        assert_eq!(search.stats().settled, 1);
    }

    #[test]
    fn test_reset_between_solves() {
        let (g, w) = diamond();
        let mut search = LabelSearch::new(&g, &w, ScalarWeight::new());
        search.solve(0, |_| false, Direction::Forward).unwrap();
        let first = *search.stats();
        assert_eq!(first.settled, 4);

        search.solve(0, |_| false, Direction::Forward).unwrap();
        assert_eq!(*search.stats(), first);
        assert_eq!(search.queue_len(), 0);
    }

    #[test]
    fn test_superseded_labels_are_reclaimed() {
        let (g, w) = diamond();
        let mut search = LabelSearch::new(&g, &w, ScalarWeight::new());
        search.solve(0, |_| false, Direction::Forward).unwrap();
        // One label per node survives.
        assert_eq!(search.live_labels(), 4);
        let stats = search.stats();
        assert_eq!(stats.created - stats.reclaimed, 4);
        assert_eq!(*search.label(search.resident(3).unwrap()).unwrap().payload(), 2);
    }

    #[test]
    fn test_queue_positions_track_headers() {
        let g = AdjacencyGraph::directed(5, &[(0, 1), (0, 2), (0, 3), (0, 4)]);
        let w = vec![4u32, 3, 2, 1];
        let mut search = LabelSearch::new(&g, &w, ScalarWeight::new());
        let path = search.solve_to(0, 4, Direction::Forward).unwrap();
        assert_eq!(path.terminal_cost(), Some(1));
        assert_eq!(search.queue_len(), 3);
        for (pos, &id) in search.queue.as_slice().iter().enumerate() {
            assert_eq!(search.labels[id].heap_position(), Some(pos));
        }
    }

    #[test]
    fn test_source_out_of_range() {
        let (g, w) = diamond();
        let mut search = LabelSearch::new(&g, &w, ScalarWeight::new());
        let err = search.solve_to(9, 0, Direction::Forward).unwrap_err();
        assert_eq!(err, SearchError::NodeOutOfRange { node: 9, node_count: 4 });
        let err = search.solve_to(0, 4, Direction::Forward).unwrap_err();
        assert_eq!(err, SearchError::NodeOutOfRange { node: 4, node_count: 4 });
    }
}
