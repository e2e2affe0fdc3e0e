//! Statistics for the cache.
//!
//! Atomic counters updated by the store as it serves requests. They are
//! independent of the table lock, so reading them never blocks a writer.

use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics for cache operations.
///
/// All counters are atomic and can be safely accessed from multiple threads.
/// Use `Cache::stats()` to get a snapshot of the current statistics.
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Number of reads that found a live entry.
    hits: AtomicU64,

    /// Number of reads that found nothing, or an expired entry.
    misses: AtomicU64,

    /// Number of successful writes (`set`, `add`, `replace`).
    sets: AtomicU64,

    /// Number of entries removed by `delete`.
    deletes: AtomicU64,

    /// Number of entries removed by expiration sweeps.
    expirations: AtomicU64,

    /// Number of entries merged into the table from snapshots.
    loads: AtomicU64,
}

impl CacheStats {
    /// Create a new stats instance with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cache hit.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a cache miss.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful write.
    pub fn record_set(&self) {
        self.sets.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a deleted entry.
    pub fn record_delete(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }

    /// Record `count` entries removed by a sweep.
    pub fn record_expirations(&self, count: u64) {
        self.expirations.fetch_add(count, Ordering::Relaxed);
    }

    /// Record `count` entries merged from a snapshot.
    pub fn record_loads(&self, count: u64) {
        self.loads.fetch_add(count, Ordering::Relaxed);
    }

    /// Get the number of cache hits.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Get the number of cache misses.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Get the number of successful writes.
    pub fn sets(&self) -> u64 {
        self.sets.load(Ordering::Relaxed)
    }

    /// Get the number of deleted entries.
    pub fn deletes(&self) -> u64 {
        self.deletes.load(Ordering::Relaxed)
    }

    /// Get the number of entries removed by sweeps.
    pub fn expirations(&self) -> u64 {
        self.expirations.load(Ordering::Relaxed)
    }

    /// Get the number of entries merged from snapshots.
    pub fn loads(&self) -> u64 {
        self.loads.load(Ordering::Relaxed)
    }

    /// Calculate the hit rate as a percentage (0.0 to 100.0).
    /// Returns 0.0 if no reads have been performed.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64) * 100.0
        }
    }

    /// Create a snapshot of the current statistics.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits(),
            misses: self.misses(),
            sets: self.sets(),
            deletes: self.deletes(),
            expirations: self.expirations(),
            loads: self.loads(),
            hit_rate: self.hit_rate(),
        }
    }
}

/// A point-in-time snapshot of cache statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub deletes: u64,
    pub expirations: u64,
    pub loads: u64,
    pub hit_rate: f64,
}
