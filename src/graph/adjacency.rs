//! A compact CSR (compressed sparse row) graph with both edge directions indexed.
//!
//! Memory layout:
//! - `out_offsets` / `in_offsets`: `Vec<usize>` of length `n + 1` (row offsets)
//! - `out_adj` / `in_adj`: contiguous [`EdgeRef`] rows, one per node
//! - `endpoints`: `(tail, head)` per edge id, in insertion order
//!
//! Edge ids are the positions in the edge list the graph was built from, so a weight
//! slice indexed the same way can be used directly as an [`EdgeWeights`] source.
//!
//! [`EdgeWeights`]: super::EdgeWeights

use super::{EdgeId, EdgeRef, Graph, NodeId};

/// A static graph built from an edge list.
///
/// ### Performance Characteristics
/// | Operation | Complexity | Notes |
/// |-----------|------------|-------|
/// | `directed` / `undirected` | \(O(n + m)\) | Counting sort into CSR rows |
/// | `out_edges` / `in_edges` | \(O(1)\) | Returns iterator over one row |
/// | `out_degree` / `in_degree` | \(O(1)\) | Row length |
#[derive(Debug, Clone)]
pub struct AdjacencyGraph {
    directed: bool,
    out_offsets: Vec<usize>,
    out_adj: Vec<EdgeRef>,
    in_offsets: Vec<usize>,
    in_adj: Vec<EdgeRef>,
    endpoints: Vec<(NodeId, NodeId)>,
}

impl AdjacencyGraph {
    /// Builds a directed graph; edge `i` runs from `edges[i].0` to `edges[i].1`.
    ///
    /// # Panics
    ///
    /// Panics if any edge references a node index out of bounds.
    pub fn directed(node_count: usize, edges: &[(NodeId, NodeId)]) -> Self {
        check_bounds(node_count, edges);
        let out = edges.iter().enumerate().map(|(edge, &(u, v))| (u, EdgeRef { target: v, edge }));
        let inc = edges.iter().enumerate().map(|(edge, &(u, v))| (v, EdgeRef { target: u, edge }));
        let (out_offsets, out_adj) = build_rows(node_count, out);
        let (in_offsets, in_adj) = build_rows(node_count, inc);
        Self {
            directed: true,
            out_offsets,
            out_adj,
            in_offsets,
            in_adj,
            endpoints: edges.to_vec(),
        }
    }

    /// Builds an undirected graph; edge `i` joins `edges[i].0` and `edges[i].1` and is
    /// listed at both endpoints (once for a self-loop).
    ///
    /// # Panics
    ///
    /// Panics if any edge references a node index out of bounds.
    pub fn undirected(node_count: usize, edges: &[(NodeId, NodeId)]) -> Self {
        check_bounds(node_count, edges);
        let both = edges.iter().enumerate().flat_map(|(edge, &(u, v))| {
            let back = (u != v).then_some((v, EdgeRef { target: u, edge }));
            core::iter::once((u, EdgeRef { target: v, edge })).chain(back)
        });
        let (offsets, adj) = build_rows(node_count, both);
        Self {
            directed: false,
            in_offsets: offsets.clone(),
            in_adj: adj.clone(),
            out_offsets: offsets,
            out_adj: adj,
            endpoints: edges.to_vec(),
        }
    }

    /// Builds a directed `rows x cols` grid where every cell has an edge to each of
    /// its four neighbours. Node `r * cols + c` is the cell in row `r`, column `c`.
    pub fn grid(rows: usize, cols: usize) -> Self {
        let mut edges = Vec::with_capacity(4 * rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                let node = r * cols + c;
                if c + 1 < cols {
                    edges.push((node, node + 1));
                    edges.push((node + 1, node));
                }
                if r + 1 < rows {
                    edges.push((node, node + cols));
                    edges.push((node + cols, node));
                }
            }
        }
        Self::directed(rows * cols, &edges)
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.endpoints.len()
    }

    /// `(tail, head)` of `edge` as given at construction.
    pub fn endpoints(&self, edge: EdgeId) -> Option<(NodeId, NodeId)> {
        self.endpoints.get(edge).copied()
    }

    /// Out-degree of `node`.
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.out_offsets[node + 1] - self.out_offsets[node]
    }

    /// In-degree of `node`.
    pub fn in_degree(&self, node: NodeId) -> usize {
        self.in_offsets[node + 1] - self.in_offsets[node]
    }
}

impl Graph for AdjacencyGraph {
    fn node_count(&self) -> usize {
        // `offsets` is length `n + 1` by construction.
        self.out_offsets.len() - 1
    }

    fn is_directed(&self) -> bool {
        self.directed
    }

    fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeRef> + '_ {
        self.out_adj[self.out_offsets[node]..self.out_offsets[node + 1]].iter().copied()
    }

    fn in_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeRef> + '_ {
        self.in_adj[self.in_offsets[node]..self.in_offsets[node + 1]].iter().copied()
    }
}

fn check_bounds(node_count: usize, edges: &[(NodeId, NodeId)]) {
    for &(u, v) in edges {
        assert!(
            u < node_count && v < node_count,
            "edge {u}->{v} is out of bounds for n={node_count}"
        );
    }
}

/// Counting sort of `(row, entry)` pairs into CSR rows, stable within a row.
fn build_rows<I>(node_count: usize, entries: I) -> (Vec<usize>, Vec<EdgeRef>)
where
    I: Iterator<Item = (NodeId, EdgeRef)> + Clone,
{
    let mut offsets = vec![0usize; node_count + 1];
    for (row, _) in entries.clone() {
        offsets[row + 1] += 1;
    }
    for i in 0..node_count {
        offsets[i + 1] += offsets[i];
    }

    let mut cursor = offsets.clone();
    let mut adj = vec![EdgeRef { target: 0, edge: 0 }; offsets[node_count]];
    for (row, entry) in entries {
        adj[cursor[row]] = entry;
        cursor[row] += 1;
    }
    (offsets, adj)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(it: impl Iterator<Item = EdgeRef>) -> Vec<(NodeId, EdgeId)> {
        it.map(|e| (e.target, e.edge)).collect()
    }

    #[test]
    fn test_directed_rows() {
        let g = AdjacencyGraph::directed(4, &[(0, 1), (0, 2), (2, 1), (3, 0)]);
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 4);
        assert!(g.is_directed());

        assert_eq!(targets(g.out_edges(0)), vec![(1, 0), (2, 1)]);
        assert_eq!(targets(g.out_edges(1)), vec![]);
        assert_eq!(targets(g.in_edges(1)), vec![(0, 0), (2, 2)]);
        assert_eq!(targets(g.in_edges(0)), vec![(3, 3)]);
        assert_eq!(g.out_degree(0), 2);
        assert_eq!(g.in_degree(1), 2);
        assert_eq!(g.endpoints(2), Some((2, 1)));
        assert_eq!(g.endpoints(9), None);
    }

    #[test]
    fn test_undirected_lists_both_ends() {
        let g = AdjacencyGraph::undirected(3, &[(0, 1), (1, 2), (2, 2)]);
        assert!(!g.is_directed());
        assert_eq!(targets(g.out_edges(1)), vec![(0, 0), (2, 1)]);
        assert_eq!(targets(g.out_edges(2)), vec![(1, 1), (2, 2)]);
        assert_eq!(targets(g.in_edges(0)), targets(g.out_edges(0)));
    }

    #[test]
    fn test_grid_degrees() {
        let g = AdjacencyGraph::grid(3, 4);
        assert_eq!(g.node_count(), 12);
        // 2 * (3 * 3 + 2 * 4) directed edges.
        assert_eq!(g.edge_count(), 34);
        assert_eq!(g.out_degree(0), 2);
        assert_eq!(g.out_degree(5), 4);
        assert_eq!(g.in_degree(11), 2);
    }

    #[test]
    fn test_isolated_nodes() {
        let g = AdjacencyGraph::directed(3, &[]);
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.out_edges(2).count(), 0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_out_of_bounds_edge_panics() {
        let _ = AdjacencyGraph::directed(2, &[(0, 2)]);
    }
}
