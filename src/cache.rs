//! The main cache interface.
//!
//! This module provides the primary `Cache` type that users interact with.
//! It owns the internal store and the background janitor that sweeps it.

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::config::CacheConfig;
use crate::entry::{Entry, Expiration};
use crate::error::CacheResult;
use crate::janitor::Janitor;
use crate::stats::{CacheStats, StatsSnapshot};
use crate::storage::Store;

/// A thread-safe, in-memory cache whose entries expire.
///
/// Cloning a `Cache` creates a new handle to the same entries. The janitor,
/// if one was configured, runs until [`Cache::close`] is called or the last
/// handle is dropped.
///
/// # Example
/// ```
/// use expiring_cache::{Cache, CacheConfig, Expiration};
/// use std::time::Duration;
///
/// let config = CacheConfig::new()
///     .default_expiration(Duration::from_secs(300))
///     .cleanup_interval(Duration::from_secs(60))
///     .build();
///
/// let cache: Cache<String> = Cache::new(config);
///
/// cache.set_default("user:123", "Alice".to_string());
/// cache.set("session:abc", "data".to_string(), Duration::from_secs(60));
/// cache.set("config", "static".to_string(), Expiration::Never);
///
/// assert_eq!(cache.get("user:123").as_deref(), Some("Alice"));
/// cache.close();
/// ```
pub struct Cache<V> {
    inner: Arc<Inner<V>>,
}

/// State shared by every clone of a handle.
///
/// Dropping it drops the janitor, which stops the sweeping thread.
struct Inner<V> {
    store: Arc<Store<V>>,
    janitor: Mutex<Option<Janitor>>,
}

impl<V> Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a new cache with the given configuration.
    ///
    /// A janitor thread is started when a cleanup interval is configured.
    pub fn new(config: CacheConfig) -> Self {
        let store = Arc::new(Store::new(&config));
        let janitor = config
            .cleanup_interval
            .map(|interval| Janitor::start(Arc::downgrade(&store), interval));

        Self {
            inner: Arc::new(Inner {
                store,
                janitor: Mutex::new(janitor),
            }),
        }
    }

    /// Create a cache from the two durations alone.
    ///
    /// A zero `default_expiration` means entries never expire by default;
    /// a zero `cleanup_interval` runs without a janitor.
    ///
    /// # Example
    /// ```
    /// use expiring_cache::Cache;
    /// use std::time::Duration;
    ///
    /// let cache: Cache<u64> = Cache::with_expiration(Duration::from_secs(300), Duration::ZERO);
    /// assert!(!cache.is_janitor_running());
    /// ```
    pub fn with_expiration(default_expiration: Duration, cleanup_interval: Duration) -> Self {
        Self::new(
            CacheConfig::new()
                .default_expiration(default_expiration)
                .cleanup_interval(cleanup_interval)
                .build(),
        )
    }

    /// Store a value, replacing any existing entry for the key.
    ///
    /// `ttl` accepts an [`Expiration`] or a plain `Duration`.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: impl Into<Expiration>) {
        self.inner.store.set(key.into(), value, ttl.into());
    }

    /// Store a value with the default expiration.
    pub fn set_default(&self, key: impl Into<String>, value: V) {
        self.set(key, value, Expiration::Default);
    }

    /// Store a value only if the key holds no live entry.
    ///
    /// An expired entry that has not been swept yet does not block `add`.
    ///
    /// # Example
    /// ```
    /// use expiring_cache::{Cache, CacheError, Expiration};
    ///
    /// let cache = Cache::default();
    /// assert!(cache.add("key", 1, Expiration::Never).is_ok());
    /// assert!(matches!(
    ///     cache.add("key", 2, Expiration::Never),
    ///     Err(CacheError::AlreadyExists(_))
    /// ));
    /// assert_eq!(cache.get("key"), Some(1));
    /// ```
    pub fn add(
        &self,
        key: impl Into<String>,
        value: V,
        ttl: impl Into<Expiration>,
    ) -> CacheResult<()> {
        self.inner.store.add(key.into(), value, ttl.into())
    }

    /// Store a value only if the key already holds a live entry.
    pub fn replace(
        &self,
        key: impl Into<String>,
        value: V,
        ttl: impl Into<Expiration>,
    ) -> CacheResult<()> {
        self.inner.store.replace(key.into(), value, ttl.into())
    }

    /// Get a copy of a value.
    ///
    /// Returns `None` if the key doesn't exist or has expired. Expired
    /// entries are left in place for the janitor.
    pub fn get(&self, key: &str) -> Option<V> {
        self.inner.store.get(key)
    }

    /// Get a copy of a value along with when it expires.
    ///
    /// The expiration is `None` for entries that never expire.
    pub fn get_with_expiration(&self, key: &str) -> Option<(V, Option<SystemTime>)> {
        self.inner.store.get_with_expiration(key)
    }

    /// Check if a key holds a live entry.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.store.contains(key)
    }

    /// Delete a key, expired or not.
    ///
    /// Returns `true` if the key existed and was removed. The eviction
    /// callback runs after the cache is unlocked.
    pub fn delete(&self, key: &str) -> bool {
        self.inner.store.delete(key)
    }

    /// Remove all expired entries now, returning how many were removed.
    ///
    /// The janitor calls this on every tick; calling it by hand is useful
    /// when the cache runs without one.
    ///
    /// # Example
    /// ```
    /// use expiring_cache::Cache;
    /// use std::time::Duration;
    ///
    /// let cache = Cache::default();
    /// cache.set("a", 1, Duration::from_millis(10));
    /// std::thread::sleep(Duration::from_millis(20));
    ///
    /// assert_eq!(cache.get("a"), None);
    /// assert_eq!(cache.item_count(), 1);
    /// assert_eq!(cache.delete_expired(), 1);
    /// assert_eq!(cache.item_count(), 0);
    /// ```
    pub fn delete_expired(&self) -> usize {
        self.inner.store.delete_expired()
    }

    /// Copy out every live entry.
    ///
    /// The returned map is independent of the cache.
    pub fn items(&self) -> HashMap<String, Entry<V>> {
        self.inner.store.items()
    }

    /// Number of entries held, including expired entries not yet swept.
    ///
    /// Use `items().len()` for the number of live entries.
    pub fn item_count(&self) -> usize {
        self.inner.store.item_count()
    }

    /// Remove every entry. The eviction callback is not called.
    pub fn flush(&self) {
        self.inner.store.flush();
    }

    /// Set the callback run for every entry removed by `delete` or by an
    /// expiration sweep. Replaces any previous callback.
    ///
    /// The callback runs outside the cache lock and may use the cache.
    pub fn on_evicted<F>(&self, callback: F)
    where
        F: Fn(&str, V) + Send + Sync + 'static,
    {
        self.inner.store.on_evicted(Arc::new(callback));
    }

    /// Stop the janitor and wait for it to exit.
    ///
    /// The cache stays usable; expired entries are simply no longer swept
    /// in the background. Calling `close` again has no effect.
    pub fn close(&self) {
        let janitor = self.inner.janitor.lock().take();
        if let Some(mut janitor) = janitor {
            janitor.stop();
        }
    }

    /// Check if the janitor is sweeping this cache.
    pub fn is_janitor_running(&self) -> bool {
        self.inner
            .janitor
            .lock()
            .as_ref()
            .map_or(false, Janitor::is_running)
    }

    /// Get a snapshot of the cache statistics.
    pub fn stats(&self) -> StatsSnapshot {
        self.inner.store.stats().snapshot()
    }

    /// Get a reference to the internal statistics counter.
    ///
    /// This is useful for integrating with external metrics systems.
    pub fn stats_ref(&self) -> Arc<CacheStats> {
        self.inner.store.stats()
    }
}

impl<V> Cache<V>
where
    V: Clone + Send + Sync + Serialize + 'static,
{
    /// Write a snapshot of every entry, expired ones included.
    ///
    /// Writers are blocked until the snapshot has been written. A value
    /// that cannot be encoded fails the save with
    /// [`CacheError::Encoding`](crate::CacheError::Encoding) before anything
    /// reaches `writer`.
    ///
    /// A `Serialize` impl that panics is reported the same way, but the
    /// process panic hook still runs first, so the default hook prints the
    /// panic message to stderr.
    pub fn save<W: Write>(&self, writer: W) -> CacheResult<()> {
        self.inner.store.save(writer)
    }

    /// Write a snapshot to a file, creating or truncating it.
    pub fn save_file<P: AsRef<Path>>(&self, path: P) -> CacheResult<()> {
        self.inner.store.save_file(path)
    }
}

impl<V> Cache<V>
where
    V: Clone + Send + Sync + DeserializeOwned + 'static,
{
    /// Merge a snapshot into the cache.
    ///
    /// Incoming entries fill keys that are absent or expired; live entries
    /// are never overwritten. Returns the number of entries merged.
    ///
    /// # Example
    /// ```
    /// use expiring_cache::{Cache, Expiration};
    ///
    /// let source = Cache::default();
    /// source.set("a", 1, Expiration::Never);
    /// source.set("b", 2, Expiration::Never);
    ///
    /// let mut snapshot = Vec::new();
    /// source.save(&mut snapshot).unwrap();
    ///
    /// let target = Cache::default();
    /// target.set("a", 10, Expiration::Never);
    /// assert_eq!(target.load(snapshot.as_slice()).unwrap(), 1);
    /// assert_eq!(target.get("a"), Some(10));
    /// assert_eq!(target.get("b"), Some(2));
    /// ```
    pub fn load<R: Read>(&self, reader: R) -> CacheResult<usize> {
        self.inner.store.load(reader)
    }

    /// Merge a snapshot file into the cache.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> CacheResult<usize> {
        self.inner.store.load_file(path)
    }
}

impl<V> Clone for Cache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Default for Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl<V> fmt::Debug for Cache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("store", &self.inner.store)
            .field("janitor", &*self.inner.janitor.lock())
            .finish()
    }
}
