//! Label-setting optimal-path search.
//!
//! [`LabelSearch`] is the engine; a [`SearchPolicy`] gives labels their meaning.
//! Two policies ship with the crate: [`ScalarWeight`] for classic shortest paths and
//! [`Pareto`] for multi-criteria fronts kept as sibling chains.

pub mod engine;
pub mod label;
pub mod pareto;
pub mod path;
pub mod policy;
pub mod scalar;
mod siblings;
pub mod stats;
pub mod store;

pub use engine::LabelSearch;
pub use label::{Label, LabelComparison, LabelId};
pub use pareto::{dominates, Pareto};
pub use path::{PathIter, PathStep};
pub use policy::SearchPolicy;
pub use scalar::{shortest_path, ScalarWeight, ShortestPath};
pub use stats::SearchStats;
pub use store::{LabelStore, Siblings};
