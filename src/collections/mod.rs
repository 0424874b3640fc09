//! Collections used by the search core.

pub mod indexed_heap;

pub use indexed_heap::{HeapPolicy, IndexedHeap};
