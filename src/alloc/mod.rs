//! Storage for search labels.

pub mod pool;

pub use pool::ChunkPool;
