//! `ChunkPool`: a fixed-size slot pool carved out of chunks.
//!
//! Values are addressed by a stable slot index. Reclaimed slots go on an intrusive
//! free list and are handed out again before any new slot is carved, so a workload
//! that never holds more than `k` live values never reserves more than
//! `ceil(k / chunk_len)` chunks.
//!
//! # Features
//! - **Stable Storage**: a chunk is reserved once at its full length and never
//!   reallocated, so a slot does not move while it is live.
//! - **Free List Reuse**: reclaimed slots are reused in O(1).
//! - **No Early Release**: chunk memory is only handed back by [`ChunkPool::clear`]
//!   or when the pool is dropped.
//! - **Memory Efficient**: uses a union and bitset to minimize overhead.

use crate::config::PoolConfig;
use core::mem::{self, ManuallyDrop};
use std::alloc::{handle_alloc_error, Layout};

/// A slot in the pool.
///
/// Uses a union to overlap storage for occupied values and free list links,
/// saving memory compared to an enum. Occupancy is tracked separately.
union PoolSlot<T> {
    occupied: ManuallyDrop<T>,
    next_free: usize,
}

/// End-of-list marker for the free list.
const NIL: usize = usize::MAX;

const BIT_SHIFT: usize = 6;
const BIT_MASK: usize = 63;

/// A chunked pool allocator for values of one type.
pub struct ChunkPool<T> {
    chunks: Vec<Vec<PoolSlot<T>>>,
    occupied: Vec<u64>, // BitSet
    free_head: Option<usize>,
    len: usize,
    chunk_len: usize,
}

impl<T> ChunkPool<T> {
    /// Creates an empty pool with the default chunk budget.
    pub fn new() -> Self {
        Self::with_config(&PoolConfig::default())
    }

    /// Creates an empty pool sized by `config`. Nothing is reserved until the first
    /// allocation.
    pub fn with_config(config: &PoolConfig) -> Self {
        let chunk_len = (config.chunk_bytes / mem::size_of::<PoolSlot<T>>()).max(1);
        Self {
            chunks: Vec::new(),
            occupied: Vec::new(),
            free_head: None,
            len: 0,
            chunk_len,
        }
    }

    /// Number of slots per chunk.
    #[inline]
    pub fn chunk_len(&self) -> usize {
        self.chunk_len
    }

    /// Stores `value` and returns its slot index.
    ///
    /// # Panics
    /// Aborts through [`handle_alloc_error`] if a new chunk cannot be obtained.
    pub fn allocate(&mut self, value: T) -> usize {
        self.len += 1;

        if let Some(index) = self.free_head {
            let (chunk, offset) = self.locate(index);
            let slot = &mut self.chunks[chunk][offset];
            // SAFETY: slots on the free list always hold a link.
            let next = unsafe { slot.next_free };
            self.free_head = if next == NIL { None } else { Some(next) };
            slot.occupied = ManuallyDrop::new(value);
            self.occupied[index >> BIT_SHIFT] |= 1 << (index & BIT_MASK);
            return index;
        }

        if self.chunks.last().map_or(true, |c| c.len() == self.chunk_len) {
            self.grow();
        }
        let chunk_idx = self.chunks.len() - 1;
        let chunk = &mut self.chunks[chunk_idx];
        let index = chunk_idx * self.chunk_len + chunk.len();
        chunk.push(PoolSlot {
            occupied: ManuallyDrop::new(value),
        });

        let word_idx = index >> BIT_SHIFT;
        if word_idx >= self.occupied.len() {
            self.occupied.push(0);
        }
        self.occupied[word_idx] |= 1 << (index & BIT_MASK);

        index
    }

    /// Removes the value at `index` and puts the slot on the free list.
    ///
    /// Returns `None` if the slot is vacant or was never carved.
    pub fn reclaim(&mut self, index: usize) -> Option<T> {
        if !self.contains(index) {
            return None;
        }
        let (chunk, offset) = self.locate(index);
        let slot = &mut self.chunks[chunk][offset];
        // SAFETY: the occupancy bit is set, so `occupied` is the live field.
        let value = unsafe { ManuallyDrop::take(&mut slot.occupied) };
        slot.next_free = self.free_head.unwrap_or(NIL);
        self.free_head = Some(index);
        self.occupied[index >> BIT_SHIFT] &= !(1 << (index & BIT_MASK));
        self.len -= 1;
        Some(value)
    }

    /// Returns `true` if `index` holds a live value.
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        index < self.slot_capacity()
            && (self.occupied[index >> BIT_SHIFT] & (1 << (index & BIT_MASK))) != 0
    }

    /// Returns a shared reference to the value at `index`, or `None` if the slot is
    /// vacant.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        if !self.contains(index) {
            return None;
        }
        let (chunk, offset) = self.locate(index);
        let slot = &self.chunks[chunk][offset];
        // SAFETY: checked occupied bit.
        Some(unsafe { &*slot.occupied })
    }

    /// Returns a mutable reference to the value at `index`, or `None` if the slot is
    /// vacant.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if !self.contains(index) {
            return None;
        }
        let (chunk, offset) = self.locate(index);
        let slot = &mut self.chunks[chunk][offset];
        // SAFETY: checked occupied bit.
        Some(unsafe { &mut *slot.occupied })
    }

    /// Number of live values.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no value is live.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots carved so far (live or on the free list).
    #[inline]
    pub fn slot_capacity(&self) -> usize {
        match self.chunks.last() {
            Some(last) => (self.chunks.len() - 1) * self.chunk_len + last.len(),
            None => 0,
        }
    }

    /// Number of chunks obtained from the system.
    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Bytes currently reserved for slots.
    #[inline]
    pub fn reserved_bytes(&self) -> usize {
        self.chunks.len() * self.chunk_len * mem::size_of::<PoolSlot<T>>()
    }

    /// Drops every live value and releases every chunk.
    pub fn clear(&mut self) {
        self.drop_live();
        self.chunks = Vec::new();
        self.occupied.clear();
        self.free_head = None;
        self.len = 0;
    }

    #[inline]
    fn locate(&self, index: usize) -> (usize, usize) {
        (index / self.chunk_len, index % self.chunk_len)
    }

    fn grow(&mut self) {
        let mut chunk = Vec::new();
        if chunk.try_reserve_exact(self.chunk_len).is_err() {
            match Layout::array::<PoolSlot<T>>(self.chunk_len) {
                Ok(layout) => handle_alloc_error(layout),
                Err(_) => panic!("pool chunk of {} slots overflows the address space", self.chunk_len),
            }
        }
        self.chunks.push(chunk);
    }

    fn drop_live(&mut self) {
        if !mem::needs_drop::<T>() {
            return;
        }
        let chunk_len = self.chunk_len;
        for (word_idx, &word) in self.occupied.iter().enumerate() {
            let mut bits = word;
            while bits != 0 {
                let index = (word_idx << BIT_SHIFT) | bits.trailing_zeros() as usize;
                bits &= bits - 1;
                let slot = &mut self.chunks[index / chunk_len][index % chunk_len];
                // SAFETY: every set bit marks a live value, dropped exactly once here.
                unsafe { ManuallyDrop::drop(&mut slot.occupied) };
            }
        }
    }
}

impl<T> Drop for ChunkPool<T> {
    fn drop(&mut self) {
        self.drop_live();
    }
}

impl<T> Default for ChunkPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> core::fmt::Debug for ChunkPool<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChunkPool")
            .field("len", &self.len)
            .field("chunk_len", &self.chunk_len)
            .field("chunks", &self.chunks.len())
            .finish()
    }
}
