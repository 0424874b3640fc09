//! Graph collaborators consumed by the search engine.
//!
//! The engine only needs per-node outgoing and incoming edge iteration, where every
//! edge reports its far endpoint and an edge id, plus a cost lookup keyed by edge id.
//! [`AdjacencyGraph`] is a compact CSR implementation of [`Graph`]; any other
//! storage can be plugged in by implementing the trait.

pub mod adjacency;

pub use adjacency::AdjacencyGraph;

/// Node identifier, dense in `0..node_count`.
pub type NodeId = usize;

/// Edge identifier used to look up weights.
pub type EdgeId = usize;

/// One adjacency entry as seen from the node it is iterated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeRef {
    /// The far endpoint.
    pub target: NodeId,
    /// Id of the traversed edge.
    pub edge: EdgeId,
}

/// Traversal direction of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Follow outgoing edges from the source.
    #[default]
    Forward,
    /// Follow incoming edges, i.e. search the reversed graph.
    Backward,
}

/// A graph the search can walk. Must not change while a search is running.
pub trait Graph {
    /// Number of nodes; valid node ids are `0..node_count()`.
    fn node_count(&self) -> usize;

    /// Returns `false` for graphs whose edges have no orientation. Backward search is
    /// rejected on such graphs.
    fn is_directed(&self) -> bool;

    /// Edges leaving `node`, in a fixed order.
    fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeRef> + '_;

    /// Edges entering `node`, in a fixed order. `EdgeRef::target` is the tail.
    fn in_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeRef> + '_;
}

/// Edge cost lookup.
pub trait EdgeWeights<W> {
    /// Cost of traversing `edge`.
    fn cost(&self, edge: EdgeId) -> W;
}

impl<W: Clone> EdgeWeights<W> for [W] {
    #[inline]
    fn cost(&self, edge: EdgeId) -> W {
        self[edge].clone()
    }
}

impl<W: Clone> EdgeWeights<W> for Vec<W> {
    #[inline]
    fn cost(&self, edge: EdgeId) -> W {
        self[edge].clone()
    }
}

/// Adapts a closure `Fn(EdgeId) -> W` into an [`EdgeWeights`] source.
#[derive(Debug, Clone, Copy)]
pub struct FnWeights<F>(pub F);

impl<W, F> EdgeWeights<W> for FnWeights<F>
where
    F: Fn(EdgeId) -> W,
{
    #[inline]
    fn cost(&self, edge: EdgeId) -> W {
        (self.0)(edge)
    }
}
