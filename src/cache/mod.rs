//! Support-vector kernel cache
//!
//! Memoises K(sv_a, sv_b) between stored support vectors while a model is
//! inspected. Kernels are symmetric, so the pair is stored once under its
//! ordered form (min, max) and entries are evicted least recently used first.

use lru::LruCache;
use std::fmt;
use std::num::NonZeroUsize;

/// Estimated footprint of one entry: two indices, the value and list links
const ENTRY_BYTES: usize = 32;

/// Unordered pair of support-vector indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SvPair(usize, usize);

impl SvPair {
    fn new(a: usize, b: usize) -> Self {
        Self(a.min(b), a.max(b))
    }
}

/// LRU cache of kernel values between support vectors
pub struct KernelCache {
    entries: LruCache<SvPair, f64>,
    hits: u64,
    misses: u64,
}

impl KernelCache {
    /// Cache holding at most `capacity` kernel values (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Cache sized to roughly `memory_bytes`
    pub fn with_memory_limit(memory_bytes: usize) -> Self {
        Self::new(memory_bytes / ENTRY_BYTES)
    }

    /// Cached K(a, b), if present
    pub fn get(&mut self, a: usize, b: usize) -> Option<f64> {
        let value = self.entries.get(&SvPair::new(a, b)).copied();
        match value {
            Some(_) => self.hits += 1,
            None => self.misses += 1,
        }
        value
    }

    pub fn put(&mut self, a: usize, b: usize, value: f64) {
        self.entries.put(SvPair::new(a, b), value);
    }

    /// Cached K(a, b), evaluating `kernel` and storing the result on a miss
    pub fn get_or_compute<F: FnOnce() -> f64>(&mut self, a: usize, b: usize, kernel: F) -> f64 {
        if let Some(value) = self.get(a, b) {
            return value;
        }
        let value = kernel();
        self.put(a, b, value);
        value
    }

    /// Fraction of lookups answered from the cache
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            capacity: self.entries.cap().get(),
            size: self.entries.len(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub capacity: usize,
    pub size: usize,
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} hits, {} misses, {}/{} entries",
            self.hits, self.misses, self.size, self.capacity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_is_unordered() {
        assert_eq!(SvPair::new(1, 5), SvPair::new(5, 1));
        assert_eq!(SvPair::new(3, 3), SvPair(3, 3));
    }

    #[test]
    fn test_symmetric_lookup() {
        let mut cache = KernelCache::new(3);

        assert_eq!(cache.get(0, 1), None);
        cache.put(0, 1, 5.0);
        assert_eq!(cache.get(1, 0), Some(5.0));

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.size), (1, 1, 1));
    }

    #[test]
    fn test_get_or_compute_evaluates_once() {
        let mut cache = KernelCache::new(4);
        let mut evaluations = 0;

        let first = cache.get_or_compute(2, 7, || {
            evaluations += 1;
            0.5
        });
        let second = cache.get_or_compute(7, 2, || {
            evaluations += 1;
            99.0
        });

        assert_eq!((first, second), (0.5, 0.5));
        assert_eq!(evaluations, 1);
        assert_eq!(cache.hit_rate(), 0.5);
    }

    #[test]
    fn test_least_recently_used_is_evicted() {
        let mut cache = KernelCache::new(2);
        cache.put(0, 1, 1.0);
        cache.put(1, 2, 2.0);
        // touch (0, 1) so (1, 2) becomes the oldest
        assert_eq!(cache.get(1, 0), Some(1.0));
        cache.put(2, 3, 3.0);

        assert_eq!(cache.get(1, 2), None);
        assert_eq!(cache.get(0, 1), Some(1.0));
        assert_eq!(cache.get(3, 2), Some(3.0));
    }

    #[test]
    fn test_capacity() {
        assert_eq!(KernelCache::new(0).stats().capacity, 1);
        assert_eq!(KernelCache::with_memory_limit(10).stats().capacity, 1);
        assert_eq!(KernelCache::with_memory_limit(3200).stats().capacity, 100);
        assert_eq!(
            KernelCache::new(2).stats().to_string(),
            "0 hits, 0 misses, 0/2 entries"
        );
    }
}
