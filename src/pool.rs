//! Bounded memory pool for generated-file handles.
//!
//! The pool tracks word-aligned blocks inside a fixed-capacity region by
//! offset. Allocation picks the smallest free gap that fits (lowest offset
//! on ties). Running out of space is a configuration error: the pool was
//! sized too small for the workload.

use std::collections::BTreeMap;

use crate::error::{AsgenError, Result};

/// Alignment unit for allocations.
pub const WORD_SIZE: usize = std::mem::size_of::<usize>();

/// Default pool capacity in bytes.
pub const DEFAULT_POOL_CAPACITY: usize = 1024;

/// A live allocation. Deliberately not `Clone`, so a block can only be
/// released once.
#[derive(Debug, PartialEq, Eq)]
pub struct Block {
    offset: usize,
    size: usize,
}

impl Block {
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

#[derive(Debug)]
pub struct MemoryPool {
    capacity: usize,
    available: usize,
    /// Live blocks, offset -> aligned size.
    used: BTreeMap<usize, usize>,
}

impl MemoryPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            available: capacity,
            used: BTreeMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available(&self) -> usize {
        self.available
    }

    /// Number of live blocks.
    pub fn live(&self) -> usize {
        self.used.len()
    }

    /// Reserve room for an object of `nbytes`.
    pub fn allocate(&mut self, nbytes: usize) -> Result<Block> {
        let size = aligned(nbytes.max(1));
        let offset = self.best_fit(size).ok_or(AsgenError::PoolExhausted {
            requested: size,
            available: self.available,
            capacity: self.capacity,
        })?;

        self.used.insert(offset, size);
        self.available -= size;
        log::debug!("pool: allocated {} bytes at {}", size, offset);
        Ok(Block { offset, size })
    }

    /// Reserve room for one value of type `T`.
    pub fn allocate_for<T>(&mut self) -> Result<Block> {
        self.allocate(std::mem::size_of::<T>())
    }

    /// Return a block to the pool.
    pub fn release(&mut self, block: Block) {
        if self.used.remove(&block.offset).is_some() {
            self.available += block.size;
            log::debug!("pool: released {} bytes at {}", block.size, block.offset);
        } else {
            log::warn!("pool: release of unknown block at {}", block.offset);
        }
    }

    fn best_fit(&self, size: usize) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        let mut cursor = 0;

        let gaps = self
            .used
            .iter()
            .map(|(&offset, &len)| (offset, offset + len))
            .chain(std::iter::once((self.capacity, self.capacity)));

        for (start, end) in gaps {
            let gap = start.saturating_sub(cursor);
            if gap >= size && best.map_or(true, |(_, b)| gap < b) {
                best = Some((cursor, gap));
            }
            cursor = end;
        }

        best.map(|(offset, _)| offset)
    }
}

fn aligned(nbytes: usize) -> usize {
    let excess = nbytes % WORD_SIZE;
    if excess > 0 {
        nbytes + (WORD_SIZE - excess)
    } else {
        nbytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocations_are_word_aligned() {
        let mut pool = MemoryPool::new(WORD_SIZE * 8);
        let block = pool.allocate(1).unwrap();

        assert_eq!(block.size(), WORD_SIZE);
        assert_eq!(pool.available(), WORD_SIZE * 7);
    }

    #[test]
    fn test_release_restores_space() {
        let mut pool = MemoryPool::new(WORD_SIZE * 4);
        let a = pool.allocate(WORD_SIZE * 2).unwrap();
        let b = pool.allocate(WORD_SIZE * 2).unwrap();
        assert_eq!(pool.available(), 0);
        assert_eq!(pool.live(), 2);

        pool.release(a);
        pool.release(b);
        assert_eq!(pool.available(), WORD_SIZE * 4);
        assert_eq!(pool.live(), 0);
    }

    #[test]
    fn test_exhaustion_is_an_error() {
        let mut pool = MemoryPool::new(WORD_SIZE * 2);
        let _held = pool.allocate(WORD_SIZE * 2).unwrap();

        let err = pool.allocate(1).unwrap_err();
        assert!(matches!(err, AsgenError::PoolExhausted { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_oversized_request_fails_on_empty_pool() {
        let mut pool = MemoryPool::new(24);
        assert!(pool.allocate(WORD_SIZE * 16).is_err());
    }

    #[test]
    fn test_best_fit_prefers_smallest_gap() {
        let w = WORD_SIZE;
        let mut pool = MemoryPool::new(w * 10);

        // Layout: [a:3][b:1][c:1][d:2][e:3]
        let a = pool.allocate(w * 3).unwrap();
        let _b = pool.allocate(w).unwrap();
        let c = pool.allocate(w).unwrap();
        let _d = pool.allocate(w * 2).unwrap();
        let _e = pool.allocate(w * 3).unwrap();
        assert_eq!(pool.available(), 0);

        // Free a 3-word gap at 0 and a 1-word gap at 4.
        pool.release(a);
        pool.release(c);

        let small = pool.allocate(w).unwrap();
        assert_eq!(small.offset(), w * 4);

        let large = pool.allocate(w * 2).unwrap();
        assert_eq!(large.offset(), 0);
    }

    #[test]
    fn test_reuses_freed_block() {
        let mut pool = MemoryPool::new(WORD_SIZE * 2);
        for _ in 0..100 {
            let block = pool.allocate(WORD_SIZE * 2).unwrap();
            assert_eq!(block.offset(), 0);
            pool.release(block);
        }
        assert_eq!(pool.available(), WORD_SIZE * 2);
    }
}
