//! Internal storage implementation for the cache.
//!
//! A single reader/writer lock guards the whole table together with the
//! eviction callback. Readers (`get`, `items`, `item_count`) share the lock;
//! every mutation takes it exclusively. Eviction callbacks are always run
//! after the lock has been released so they may call back into the cache.

use indexmap::IndexMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::config::CacheConfig;
use crate::entry::{Entry, Expiration};
use crate::error::{CacheError, CacheResult};
use crate::stats::CacheStats;

/// Callback run with the key and value of every entry removed by `delete`
/// or by an expiration sweep.
pub(crate) type EvictionCallback<V> = Arc<dyn Fn(&str, V) + Send + Sync>;

/// Everything guarded by the table lock.
pub(crate) struct Table<V> {
    pub(crate) entries: IndexMap<String, Entry<V>>,
    pub(crate) on_evicted: Option<EvictionCallback<V>>,
}

/// Thread-safe expiring key-value table.
///
/// This is the internal implementation; users should use `Cache` instead.
pub(crate) struct Store<V> {
    /// The table and eviction callback, protected by a read-write lock.
    pub(crate) table: RwLock<Table<V>>,

    /// Expiration applied to writes that ask for [`Expiration::Default`].
    default_expiration: Option<Duration>,

    /// Statistics for cache operations.
    pub(crate) stats: Arc<CacheStats>,
}

impl<V> Store<V> {
    /// Create an empty store with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            table: RwLock::new(Table {
                entries: IndexMap::new(),
                on_evicted: None,
            }),
            default_expiration: config.default_expiration,
            stats: Arc::new(CacheStats::new()),
        }
    }

    /// Resolve a per-call expiration into an entry.
    fn entry(&self, value: V, ttl: Expiration) -> Entry<V> {
        Entry {
            value,
            expiration: ttl.deadline(self.default_expiration, SystemTime::now()),
        }
    }

    /// Insert or overwrite a key unconditionally.
    pub fn set(&self, key: String, value: V, ttl: Expiration) {
        let entry = self.entry(value, ttl);
        self.table.write().entries.insert(key, entry);
        self.stats.record_set();
    }

    /// Insert only if no live entry exists for the key.
    pub fn add(&self, key: String, value: V, ttl: Expiration) -> CacheResult<()> {
        let mut table = self.table.write();
        if Self::live(&table.entries, &key).is_some() {
            return Err(CacheError::AlreadyExists(key));
        }
        let entry = self.entry(value, ttl);
        table.entries.insert(key, entry);
        drop(table);

        self.stats.record_set();
        Ok(())
    }

    /// Overwrite only if a live entry exists for the key.
    pub fn replace(&self, key: String, value: V, ttl: Expiration) -> CacheResult<()> {
        let mut table = self.table.write();
        if Self::live(&table.entries, &key).is_none() {
            return Err(CacheError::KeyNotFound(key));
        }
        let entry = self.entry(value, ttl);
        table.entries.insert(key, entry);
        drop(table);

        self.stats.record_set();
        Ok(())
    }

    /// Check if a key holds a live entry.
    pub fn contains(&self, key: &str) -> bool {
        Self::live(&self.table.read().entries, key).is_some()
    }

    /// Remove a key regardless of liveness.
    ///
    /// Returns `true` if an entry was present. The eviction callback, if
    /// any, sees the removed value once the lock is released.
    pub fn delete(&self, key: &str) -> bool {
        let mut table = self.table.write();
        let removed = table.entries.swap_remove(key);
        let callback = table.on_evicted.clone();
        drop(table);

        let Some(entry) = removed else {
            return false;
        };
        self.stats.record_delete();

        if let Some(callback) = callback {
            callback(key, entry.value);
        }
        true
    }

    /// Remove every entry whose expiration has passed.
    ///
    /// The whole table is scanned under one exclusive lock. Removed pairs
    /// are handed to the eviction callback only after the lock is released.
    /// Returns the number of entries removed.
    pub fn delete_expired(&self) -> usize {
        let now = SystemTime::now();
        let mut evicted = Vec::new();

        let mut table = self.table.write();
        let callback = table.on_evicted.clone();
        let removed = if callback.is_some() {
            let expired: Vec<String> = table
                .entries
                .iter()
                .filter(|(_, entry)| entry.is_expired_at(now))
                .map(|(key, _)| key.clone())
                .collect();

            for key in expired {
                if let Some(entry) = table.entries.swap_remove(&key) {
                    evicted.push((key, entry.value));
                }
            }
            evicted.len()
        } else {
            let initial_len = table.entries.len();
            table.entries.retain(|_, entry| !entry.is_expired_at(now));
            initial_len - table.entries.len()
        };
        drop(table);

        if removed > 0 {
            self.stats.record_expirations(removed as u64);
        }
        log::trace!("swept {} expired entries", removed);

        if let Some(callback) = callback {
            for (key, value) in evicted {
                callback(&key, value);
            }
        }
        removed
    }

    /// Number of entries physically present, expired ones included.
    pub fn item_count(&self) -> usize {
        self.table.read().entries.len()
    }

    /// Drop every entry without notifying the eviction callback.
    pub fn flush(&self) {
        self.table.write().entries = IndexMap::new();
    }

    /// Install or replace the eviction callback.
    pub fn on_evicted(&self, callback: EvictionCallback<V>) {
        self.table.write().on_evicted = Some(callback);
    }

    /// Get a reference to the statistics.
    pub fn stats(&self) -> Arc<CacheStats> {
        Arc::clone(&self.stats)
    }

    fn live<'a>(entries: &'a IndexMap<String, Entry<V>>, key: &str) -> Option<&'a Entry<V>> {
        entries.get(key).filter(|entry| !entry.is_expired())
    }
}

impl<V: Clone> Store<V> {
    /// Get a copy of a live value.
    ///
    /// Expired entries read as missing but are left in place.
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_with_expiration(key).map(|(value, _)| value)
    }

    /// Get a copy of a live value together with its expiration.
    pub fn get_with_expiration(&self, key: &str) -> Option<(V, Option<SystemTime>)> {
        let found = Self::live(&self.table.read().entries, key)
            .map(|entry| (entry.value.clone(), entry.expiration));

        match found {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        found
    }

    /// Copy every live entry out of the table.
    pub fn items(&self) -> HashMap<String, Entry<V>> {
        let now = SystemTime::now();
        let table = self.table.read();

        table
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired_at(now))
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect()
    }
}

impl<V> fmt::Debug for Store<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("item_count", &self.item_count())
            .field("default_expiration", &self.default_expiration)
            .finish()
    }
}
