//! Cache entries and per-call expiration settings.

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

/// How long a value written to the cache should live.
///
/// Every write operation (`set`, `add`, `replace`) takes anything that
/// converts into an `Expiration`. A plain [`Duration`] converts into
/// [`Expiration::After`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expiration {
    /// Use the cache's configured default expiration.
    #[default]
    Default,

    /// The entry never expires.
    Never,

    /// The entry expires once this much time has passed.
    /// A zero duration is treated like [`Expiration::Never`].
    After(Duration),
}

impl Expiration {
    /// Resolve this setting against the cache default into an absolute
    /// expiration instant, relative to `now`.
    pub(crate) fn deadline(self, default: Option<Duration>, now: SystemTime) -> Option<SystemTime> {
        let ttl = match self {
            Expiration::Default => default?,
            Expiration::Never => return None,
            Expiration::After(ttl) => ttl,
        };

        if ttl.is_zero() {
            return None;
        }

        // Durations too large to represent are as good as never expiring.
        now.checked_add(ttl)
    }
}

impl From<Duration> for Expiration {
    fn from(ttl: Duration) -> Self {
        Expiration::After(ttl)
    }
}

/// A single cache entry: the stored value and when it expires.
///
/// Liveness is computed on every read. An entry that has passed its
/// expiration stays physically present in the cache until it is deleted
/// or swept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry<V> {
    /// The stored value.
    pub(crate) value: V,

    /// When this entry expires. `None` means no expiration.
    pub(crate) expiration: Option<SystemTime>,
}

impl<V> Entry<V> {
    /// Create a new entry with no expiration.
    pub fn new(value: V) -> Self {
        Self {
            value,
            expiration: None,
        }
    }

    /// Create a new entry with an expiration time.
    pub fn with_expiration(value: V, expiration: SystemTime) -> Self {
        Self {
            value,
            expiration: Some(expiration),
        }
    }

    /// Check if this entry has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(SystemTime::now())
    }

    /// Check if this entry has expired at a given time.
    /// An entry is live only while `now` is strictly before its expiration.
    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        match self.expiration {
            Some(expiration) => now >= expiration,
            None => false,
        }
    }

    /// Get a reference to the value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Consume the entry, returning the value.
    pub fn into_value(self) -> V {
        self.value
    }

    /// Get the expiration time, if set.
    pub fn expiration(&self) -> Option<SystemTime> {
        self.expiration
    }
}
