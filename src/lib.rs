//! # Expiring Cache
//!
//! A thread-safe, in-process key-value cache where every entry carries an
//! optional expiration time.
//!
//! ## Features
//!
//! - **Thread-safe**: Share across threads with `Clone` (uses `Arc` internally)
//! - **Per-entry expiration**: Use the cache default, never expire, or pick a duration per write
//! - **Background janitor**: Expired entries are swept on a fixed interval
//! - **Eviction callback**: Observe every deleted or swept entry
//! - **Snapshots**: Save the whole table to any writer and merge it back later
//!
//! ## Quick Start
//!
//! ```rust
//! use expiring_cache::{Cache, CacheConfig, Expiration};
//! use std::time::Duration;
//!
//! let config = CacheConfig::new()
//!     .default_expiration(Duration::from_secs(300))
//!     .cleanup_interval(Duration::from_secs(30))
//!     .build();
//!
//! let cache: Cache<String> = Cache::new(config);
//!
//! cache.set_default("user:123", "Alice".to_string());
//! cache.set("session:abc", "session_data".to_string(), Duration::from_secs(60));
//! cache.set("motd", "hello".to_string(), Expiration::Never);
//!
//! if let Some(value) = cache.get("user:123") {
//!     println!("Found: {}", value);
//! }
//!
//! cache.close();
//! ```
//!
//! ## Thread Safety
//!
//! Cloning a `Cache` creates a new handle to the same data. The janitor
//! stops when the last handle is dropped or when any handle calls
//! [`Cache::close`]:
//!
//! ```rust
//! use expiring_cache::{Cache, Expiration};
//! use std::thread;
//!
//! let cache = Cache::default();
//!
//! let handles: Vec<_> = (0..4).map(|i| {
//!     let cache = cache.clone();
//!     thread::spawn(move || {
//!         cache.set(format!("key_{}", i), i, Expiration::Never);
//!     })
//! }).collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert_eq!(cache.item_count(), 4);
//! ```

pub mod cache;
pub mod config;
pub mod entry;
pub mod error;
pub mod stats;

pub use cache::Cache;
pub use config::CacheConfig;
pub use entry::{Entry, Expiration};
pub use error::{CacheError, CacheResult};
pub use stats::{CacheStats, StatsSnapshot};

// Internal modules - not part of public API
pub(crate) mod janitor;
pub(crate) mod snapshot;
pub(crate) mod storage;
