//! Classic single-criterion shortest paths.

use super::engine::LabelSearch;
use super::label::{Label, LabelComparison};
use super::policy::SearchPolicy;
use crate::graph::{EdgeRef, EdgeWeights, Graph, NodeId};
use core::cmp::Ordering;
use core::fmt;
use core::marker::PhantomData;
use core::ops::Add;
use num_traits::Zero;

/// Policy for additive scalar weights: a label carries its accumulated cost and a
/// strictly cheaper candidate replaces the resident.
///
/// Weights must be non-negative for the first label popped at a node to be optimal.
pub struct ScalarWeight<W> {
    _weight: PhantomData<fn() -> W>,
}

impl<W> ScalarWeight<W> {
    /// Creates the policy.
    pub const fn new() -> Self {
        Self {
            _weight: PhantomData,
        }
    }
}

impl<W> Default for ScalarWeight<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> Clone for ScalarWeight<W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<W> Copy for ScalarWeight<W> {}

impl<W> fmt::Debug for ScalarWeight<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ScalarWeight")
    }
}

impl<W> SearchPolicy for ScalarWeight<W>
where
    W: Clone + Add<Output = W> + PartialOrd + Zero,
{
    type Weight = W;
    type Payload = W;
    type Key = W;
    type Cost = W;

    fn start_payload(&self, _source: NodeId) -> W {
        W::zero()
    }

    fn construct_label(&self, pred: &Label<W>, _edge: EdgeRef, weight: W) -> Option<W> {
        Some(pred.payload().clone() + weight)
    }

    fn compare_labels(&self, old: &Label<W>, new: &Label<W>) -> LabelComparison {
        if new.payload() < old.payload() {
            LabelComparison::DiscardOldAndSiblings
        } else {
            LabelComparison::DiscardNew
        }
    }

    fn queue_key(&self, label: &Label<W>) -> W {
        label.payload().clone()
    }

    fn compare_keys(&self, a: &W, b: &W) -> Ordering {
        a.partial_cmp(b).unwrap_or(Ordering::Equal)
    }

    fn cost(&self, label: &Label<W>) -> W {
        label.payload().clone()
    }
}

/// Dijkstra search with [`ScalarWeight`] costs.
pub type ShortestPath<'a, G, E, W> = LabelSearch<'a, G, E, ScalarWeight<W>>;

/// Builds a classic Dijkstra search over `graph` and `weights`.
pub fn shortest_path<'a, G, E, W>(graph: &'a G, weights: &'a E) -> ShortestPath<'a, G, E, W>
where
    G: Graph,
    E: EdgeWeights<W> + ?Sized,
    W: Clone + Add<Output = W> + PartialOrd + Zero,
{
    LabelSearch::new(graph, weights, ScalarWeight::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{AdjacencyGraph, Direction, FnWeights};

    #[test]
    fn test_four_cycle() {
        let g = AdjacencyGraph::directed(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        let w = [1i32, 1, 1, 1];
        let mut search = shortest_path(&g, &w[..]);
        let path = search.solve_to(0, 2, Direction::Forward).unwrap();
        assert_eq!(path.nodes(), vec![0, 1, 2]);
        assert_eq!(path.terminal_cost(), Some(2));
    }

    #[test]
    fn test_float_weights_through_closure() {
        let g = AdjacencyGraph::undirected(3, &[(0, 1), (1, 2), (0, 2)]);
        let w = FnWeights(|edge: usize| [0.5f64, 0.25, 1.0][edge]);
        let mut search = shortest_path(&g, &w);
        let path = search.solve_to(0, 2, Direction::Forward).unwrap();
        assert_eq!(path.nodes(), vec![0, 1, 2]);
        assert_eq!(path.terminal_cost(), Some(0.75));
    }

    #[test]
    fn test_equal_cost_keeps_first_label() {
        let g = AdjacencyGraph::directed(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        let w = vec![1u8, 1, 1, 1];
        let mut search = shortest_path(&g, &w);
        let path = search.solve_to(0, 3, Direction::Forward).unwrap();
        assert_eq!(path.terminal_cost(), Some(2));
        assert_eq!(search.stats().relaxations, 4);
        // The tie at node 3 was discarded, not stored.
        assert_eq!(search.live_labels(), 4);
    }
}
