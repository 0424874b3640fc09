//! Sibling-chain maintenance for policies that keep several labels per node.
//!
//! A node's chain is its resident head followed by siblings linked through
//! [`Label::sibling`](super::Label::sibling). Only the head is ever queued; popping
//! it processes the whole chain. Chains stay pairwise non-dominated: every candidate
//! that joins one is first screened against the members already there.

use super::engine::LabelSearch;
use super::label::{LabelComparison, LabelId};
use super::policy::SearchPolicy;
use crate::error::SearchError;
use crate::graph::{Direction, EdgeRef, EdgeWeights, Graph, NodeId};

impl<G, E, P> LabelSearch<'_, G, E, P>
where
    G: Graph,
    E: EdgeWeights<P::Weight> + ?Sized,
    P: SearchPolicy,
{
    /// Compares `candidate` with every sibling after `head`, dropping the siblings it
    /// dominates. Returns `false` if the candidate itself was dropped or merged.
    fn screen_siblings(&mut self, head: LabelId, candidate: LabelId) -> Result<bool, SearchError> {
        let mut prev = head;
        while let Some(sibling) = self.labels[prev].sibling {
            let outcome = self
                .policy()
                .compare_labels(&self.labels[sibling], &self.labels[candidate]);
            match outcome {
                LabelComparison::DiscardNew => {
                    self.labels.discard(candidate);
                    return Ok(false);
                }
                LabelComparison::KeepNewUpdateOld => {
                    self.update_resident(sibling, candidate);
                    return Ok(false);
                }
                LabelComparison::PropagateBoth => {
                    let node = self.labels[candidate].node();
                    self.labels.discard(candidate);
                    return Err(SearchError::PropagateBothUnsupported { node });
                }
                LabelComparison::DiscardOldAndSiblings | LabelComparison::DiscardOldKeepSiblings => {
                    self.labels[prev].sibling = self.labels[sibling].sibling.take();
                    self.evict(sibling);
                }
                LabelComparison::ReplaceOld | LabelComparison::KeepNewAsSibling => prev = sibling,
            }
        }
        Ok(true)
    }

    /// Puts `candidate` at the head of the chain at `node` in place of `old`.
    ///
    /// With `keep_old` the former head becomes the first sibling, otherwise it is
    /// dropped and the candidate inherits the rest of its chain.
    pub(super) fn replace_head(
        &mut self,
        node: NodeId,
        old: LabelId,
        candidate: LabelId,
        keep_old: bool,
    ) -> Result<(), SearchError> {
        if !self.screen_siblings(old, candidate)? {
            return Ok(());
        }
        self.dequeue(old);
        if keep_old {
            self.labels[candidate].sibling = Some(old);
        } else {
            self.labels[candidate].sibling = self.labels[old].sibling.take();
            self.evict(old);
        }
        self.install(node, candidate);
        self.enqueue(candidate);
        Ok(())
    }

    /// Appends `candidate` to the chain headed by `head`.
    ///
    /// The candidate is not queued on its own; the head is (re)queued so the chain is
    /// processed again.
    pub(super) fn add_sibling(&mut self, head: LabelId, candidate: LabelId) -> Result<(), SearchError> {
        if !self.screen_siblings(head, candidate)? {
            return Ok(());
        }
        let tail = self.labels.chain(head).last().unwrap_or(head);
        self.labels[tail].sibling = Some(candidate);
        self.labels[candidate].resident = true;
        self.labels.retain(candidate);
        if !self.labels[head].is_queued() {
            self.enqueue(head);
        }
        Ok(())
    }

    /// Drops the whole chain at `node`.
    pub(super) fn erase_label(&mut self, node: NodeId) {
        let mut cursor = self.node_labels[node].take();
        while let Some(id) = cursor {
            cursor = self.labels[id].sibling.take();
            self.evict(id);
        }
    }

    /// Drops the siblings at `node` made redundant by an update of the head.
    pub(super) fn update_siblings(&mut self, node: NodeId) {
        if let Some(head) = self.node_labels[node] {
            self.remove_redundant_siblings(head);
        }
    }

    fn remove_redundant_siblings(&mut self, head: LabelId) {
        let mut prev = head;
        while let Some(sibling) = self.labels[prev].sibling {
            if self
                .policy()
                .is_redundant_after_update(&self.labels[head], &self.labels[sibling])
            {
                self.labels[prev].sibling = self.labels[sibling].sibling.take();
                self.evict(sibling);
            } else {
                prev = sibling;
            }
        }
    }

    /// Re-extends a settled label that was updated in place.
    ///
    /// Only descendants whose predecessor is exactly `id`, reached over the same
    /// edge, are touched: each receives the refreshed information through
    /// [`SearchPolicy::update_label`] and, if it changed, is scheduled in turn.
    pub(super) fn propagate_update(&mut self, id: LabelId) {
        let graph = self.graph();
        let node = self.labels[id].node();
        trace_event!(trace, node, "propagating update");
        match self.direction {
            Direction::Forward => self.propagate_along(id, graph.out_edges(node)),
            Direction::Backward => self.propagate_along(id, graph.in_edges(node)),
        }
    }

    fn propagate_along(&mut self, id: LabelId, edges: impl Iterator<Item = EdgeRef>) {
        let mut dependents = Vec::new();
        for edge in edges {
            dependents.clear();
            dependents.extend(self.labels_at(edge.target).filter(|&d| {
                let label = &self.labels[d];
                label.predecessor == Some(id) && label.via_edge() == Some(edge.edge)
            }));
            if dependents.is_empty() {
                continue;
            }

            let weight = self.weights().cost(edge.edge);
            let Some(fresh) = self
                .policy()
                .construct_label(&self.labels[id], edge, weight)
            else {
                continue;
            };
            for &dependent in &dependents {
                // An earlier dependent's update may have evicted this one.
                if !self.labels.get(dependent).is_some_and(|l| l.resident) {
                    continue;
                }
                if self.merge_payload(dependent, &fresh) {
                    self.mark_updated(dependent);
                }
            }
        }
    }

    /// Cycles the chain at `node`: the first sibling becomes head and the old head
    /// moves to the tail.
    ///
    /// Queue state moves with the head position; residency and reference counts are
    /// unchanged. Returns `false` if the node has fewer than two labels.
    pub fn rotate_siblings(&mut self, node: NodeId) -> bool {
        let Some(head) = self.resident(node) else {
            return false;
        };
        let Some(next) = self.labels[head].sibling else {
            return false;
        };
        let was_queued = self.labels[head].is_queued();
        self.dequeue(head);

        self.labels[head].sibling = None;
        let tail = self.labels.chain(next).last().unwrap_or(next);
        self.labels[tail].sibling = Some(head);
        self.node_labels[node] = Some(next);

        if was_queued {
            self.enqueue(next);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{AdjacencyGraph, Direction};
    use crate::search::{LabelSearch, Pareto};

    #[test]
    fn test_rotate_siblings_keeps_chain_and_counts() {
        // Two incomparable routes into node 2.
        let g = AdjacencyGraph::directed(3, &[(0, 2), (0, 1), (1, 2)]);
        let w = vec![[5u32, 1], [1, 1], [1, 1]];
        let mut search = LabelSearch::new(&g, &w, Pareto::<u32, 2>::new());
        search.solve(0, |_| false, Direction::Forward).unwrap();

        let before: Vec<_> = search.labels_at(2).collect();
        assert_eq!(before.len(), 2);
        let refs: Vec<_> = before
            .iter()
            .map(|&id| search.label(id).unwrap().ref_count())
            .collect();

        assert!(search.rotate_siblings(2));
        let after: Vec<_> = search.labels_at(2).collect();
        assert_eq!(after, vec![before[1], before[0]]);
        assert_eq!(search.resident(2), Some(before[1]));
        for (id, refc) in before.iter().zip(refs) {
            assert_eq!(search.label(*id).unwrap().ref_count(), refc);
            assert!(!search.label(*id).unwrap().is_queued());
        }

        assert!(!search.rotate_siblings(0));
    }

    #[test]
    fn test_dominated_candidate_is_screened_out() {
        // Node 3 holds (2, 10) and (5, 4); the later (6, 6) is dominated by (5, 4).
        let g = AdjacencyGraph::directed(4, &[(0, 3), (0, 1), (1, 3), (0, 2), (2, 3)]);
        let w = vec![[2u32, 10], [3, 3], [3, 3], [1, 0], [4, 4]];
        let mut search = LabelSearch::new(&g, &w, Pareto::<u32, 2>::new());
        search.solve(0, |_| false, Direction::Forward).unwrap();

        let front: Vec<[u32; 2]> = search
            .labels_at(3)
            .map(|id| *search.label(id).unwrap().payload())
            .collect();
        assert_eq!(front, vec![[2, 10], [5, 4]]);
    }

    #[test]
    fn test_dominated_sibling_is_evicted() {
        // (6, 6) joins the chain first and is evicted when (5, 1) arrives.
        let g = AdjacencyGraph::directed(4, &[(0, 3), (0, 1), (1, 3), (0, 2), (2, 3)]);
        let w = vec![[2u32, 10], [3, 3], [3, 3], [4, 0], [1, 1]];
        let mut search = LabelSearch::new(&g, &w, Pareto::<u32, 2>::new());
        search.solve(0, |_| false, Direction::Forward).unwrap();

        let front: Vec<[u32; 2]> = search
            .labels_at(3)
            .map(|id| *search.label(id).unwrap().payload())
            .collect();
        assert_eq!(front, vec![[2, 10], [5, 1]]);
        // One label per node plus the extra sibling at node 3.
        assert_eq!(search.live_labels(), 5);
    }
}
