//! # `pathlabel` - Label-Setting Optimal Path Search
//!
//! A pluggable Dijkstra-style engine: labels (partial paths) are propagated along
//! edges, compared against the labels already resident at a node, and either
//! discarded, merged or kept. What a label carries and how two labels compare is
//! decided by a [`SearchPolicy`]; the engine owns the queue, the label lifecycle and
//! the reference counting that reclaims labels no path depends on any more.
//!
//! ## Architecture
//!
//! The crate is layered leaf-first:
//!
//! 1. **Pool Allocator** ([`ChunkPool<T>`]):
//!    - Fixed-size slots carved from chunks of a configurable byte budget
//!    - Intrusive free list, memory returned only on clear/drop
//!
//! 2. **Indexed Priority Queue** ([`IndexedHeap<E>`]):
//!    - Binary heap whose elements record their own position
//!    - Logarithmic reposition and erase from the middle
//!
//! 3. **Search Core** ([`LabelSearch`]):
//!    - Arena of reference-counted labels addressed by [`LabelId`]
//!    - Seven-outcome comparison taxonomy ([`LabelComparison`])
//!    - Sibling chains for policies that keep several labels per node
//!
//! 4. **Policies**:
//!    - [`ScalarWeight`]: classic shortest paths
//!    - [`Pareto`]: multi-criteria Pareto fronts
//!
//! ## Example
//!
//! ```rust
//! use pathlabel::{shortest_path, AdjacencyGraph, Direction};
//!
//! let graph = AdjacencyGraph::directed(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
//! let weights = vec![1u32; 4];
//!
//! let mut search = shortest_path(&graph, &weights);
//! let path = search.solve_to(0, 2, Direction::Forward).unwrap();
//! assert_eq!(path.nodes(), vec![0, 1, 2]);
//! assert_eq!(path.terminal_cost(), Some(2));
//! ```
//!
//! ## Features
//!
//! - `tracing`: emits `debug` events per search and `trace` events per settled label
//!   and per classified candidate.

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

/// Forwards to the `tracing` crate when the `tracing` feature is enabled.
macro_rules! trace_event {
    ($level:ident, $($arg:tt)+) => {
        #[cfg(feature = "tracing")]
        tracing::$level!($($arg)+);
    };
}

pub mod alloc;
pub mod collections;
pub mod config;
pub mod error;
pub mod graph;
pub mod search;

pub use alloc::ChunkPool;
pub use collections::{HeapPolicy, IndexedHeap};
pub use config::{PoolConfig, SearchConfig};
pub use error::SearchError;
pub use graph::{AdjacencyGraph, Direction, EdgeId, EdgeRef, EdgeWeights, FnWeights, Graph, NodeId};
pub use search::{
    dominates, shortest_path, Label, LabelComparison, LabelId, LabelSearch, LabelStore, Pareto,
    PathIter, PathStep, ScalarWeight, SearchPolicy, SearchStats, ShortestPath,
};

// Compile-time assertions for memory layout
const _: () = {
    use core::mem;

    // Handles stay 32-bit so label headers stay small.
    assert!(mem::size_of::<LabelId>() == 4);
    assert!(mem::size_of::<Option<LabelId>>() <= 8);

    // A scalar label header plus a `u64` payload fits in one cache line.
    assert!(mem::size_of::<Label<u64>>() <= 64);
};
