//! Kernel cache implementation
//!
//! Provides an LRU cache of Gram matrix rows so the SMO solver does not
//! recompute K(x_i, ·) every time index i re-enters the working set.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// A single Gram matrix row, shared between the cache and the solver
pub type KernelRow = Arc<[f64]>;

/// LRU cache for kernel matrix rows
pub struct KernelCache {
    cache: LruCache<usize, KernelRow>,
    hits: u64,
    misses: u64,
}

impl KernelCache {
    /// Create a new kernel cache holding at most `capacity` rows
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Create a kernel cache whose rows of `row_len` f64 values fit in
    /// `memory_bytes`. At least two rows are always kept, since an SMO step
    /// works on a pair.
    pub fn with_memory_limit(memory_bytes: usize, row_len: usize) -> Self {
        let row_bytes = row_len.max(1) * std::mem::size_of::<f64>();
        let capacity = (memory_bytes / row_bytes).max(2);
        Self::new(capacity)
    }

    /// Get a row from cache
    pub fn get(&mut self, i: usize) -> Option<KernelRow> {
        if let Some(row) = self.cache.get(&i) {
            self.hits += 1;
            Some(Arc::clone(row))
        } else {
            self.misses += 1;
            None
        }
    }

    /// Put a row into cache
    pub fn put(&mut self, i: usize, row: KernelRow) {
        self.cache.put(i, row);
    }

    /// Get cache hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            capacity: self.cache.cap().get(),
            size: self.cache.len(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub capacity: usize,
    pub size: usize,
}
