//! Tunables for a search instance.
//!
//! Both structs deserialize with `#[serde(default)]`, so a partial document such as
//! `{"queue_capacity": 1024}` keeps every other field at its default.

use serde::{Deserialize, Serialize};

/// Default byte budget of one label pool chunk.
pub const DEFAULT_CHUNK_BYTES: usize = 8 * 1024;

/// Default number of queue slots reserved up front.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Sizing of the label pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Bytes requested from the system per chunk. The slot count of a chunk is this
    /// budget divided by the slot size, and never less than one.
    pub chunk_bytes: usize,
}

impl PoolConfig {
    /// Returns a copy with a different chunk byte budget.
    #[must_use]
    pub fn with_chunk_bytes(mut self, chunk_bytes: usize) -> Self {
        self.chunk_bytes = chunk_bytes;
        self
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            chunk_bytes: DEFAULT_CHUNK_BYTES,
        }
    }
}

/// Configuration of a [`LabelSearch`](crate::search::LabelSearch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Label pool sizing.
    pub pool: PoolConfig,
    /// Initial capacity of the priority queue.
    pub queue_capacity: usize,
}

impl SearchConfig {
    /// Returns a copy with a different pool configuration.
    #[must_use]
    pub fn with_pool(mut self, pool: PoolConfig) -> Self {
        self.pool = pool;
        self
    }

    /// Returns a copy with a different initial queue capacity.
    #[must_use]
    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            pool: PoolConfig::default(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config: SearchConfig = serde_json::from_str(r#"{"pool": {"chunk_bytes": 256}}"#).unwrap();
        assert_eq!(config.pool.chunk_bytes, 256);
        assert_eq!(config.queue_capacity, DEFAULT_QUEUE_CAPACITY);

        let pool: PoolConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(pool, PoolConfig::default());
    }

    #[test]
    fn test_builders() {
        let config = SearchConfig::default()
            .with_pool(PoolConfig::default().with_chunk_bytes(512))
            .with_queue_capacity(16);
        assert_eq!(config.pool.chunk_bytes, 512);
        assert_eq!(config.queue_capacity, 16);
    }
}
