//! Errors reported by a search call.

use crate::graph::NodeId;
use core::fmt;

/// Usage errors that abort a [`solve`](crate::search::LabelSearch::solve) call.
///
/// An unreachable target is not an error; it is reported by an exhausted path iterator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    /// A backward search was requested on a graph that only stores undirected edges.
    BackwardOnUndirected,
    /// The policy asked to keep both labels as independent branches, which the engine
    /// does not support.
    PropagateBothUnsupported {
        /// Node at which the comparison was made.
        node: NodeId,
    },
    /// A source or target node does not exist in the graph.
    NodeOutOfRange {
        /// The offending node.
        node: NodeId,
        /// Number of nodes in the graph.
        node_count: usize,
    },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BackwardOnUndirected => {
                f.write_str("backward search requires a directed graph")
            }
            Self::PropagateBothUnsupported { node } => write!(
                f,
                "label comparison at node {node} asked to propagate both labels, which is not supported"
            ),
            Self::NodeOutOfRange { node, node_count } => {
                write!(f, "node {node} is out of range for a graph with {node_count} nodes")
            }
        }
    }
}

impl std::error::Error for SearchError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_node() {
        let err = SearchError::NodeOutOfRange { node: 7, node_count: 3 };
        assert_eq!(err.to_string(), "node 7 is out of range for a graph with 3 nodes");
        assert!(SearchError::PropagateBothUnsupported { node: 4 }
            .to_string()
            .contains("node 4"));
    }
}
