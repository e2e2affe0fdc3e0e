//! Configuration for the expiring cache.
//!
//! The cache has exactly two knobs: the expiration applied when a write asks
//! for [`Expiration::Default`](crate::Expiration::Default), and how often the
//! background janitor sweeps out expired entries.

use std::time::Duration;

/// Configuration for creating a new cache instance.
///
/// Use the builder pattern to construct configuration:
///
/// ```
/// use expiring_cache::CacheConfig;
/// use std::time::Duration;
///
/// let config = CacheConfig::new()
///     .default_expiration(Duration::from_secs(300))
///     .cleanup_interval(Duration::from_secs(60))
///     .build();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheConfig {
    /// Expiration used for writes that request the default.
    /// `None` means such entries never expire.
    pub(crate) default_expiration: Option<Duration>,

    /// Interval between janitor sweeps.
    /// `None` disables the janitor; expired entries then linger until
    /// deleted, swept by hand, or flushed.
    pub(crate) cleanup_interval: Option<Duration>,
}

impl CacheConfig {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default expiration for entries.
    ///
    /// Set to `Duration::ZERO` for entries that never expire by default.
    pub fn default_expiration(mut self, ttl: Duration) -> Self {
        self.default_expiration = if ttl.is_zero() { None } else { Some(ttl) };
        self
    }

    /// Set the interval for background cleanup of expired entries.
    ///
    /// Set to `Duration::ZERO` to run without a janitor.
    pub fn cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = if interval.is_zero() {
            None
        } else {
            Some(interval)
        };
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> Self {
        self
    }

    /// Get the default expiration, if set.
    pub fn get_default_expiration(&self) -> Option<Duration> {
        self.default_expiration
    }

    /// Get the cleanup interval, if set.
    pub fn get_cleanup_interval(&self) -> Option<Duration> {
        self.cleanup_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CacheConfig::default();
        assert!(config.default_expiration.is_none());
        assert!(config.cleanup_interval.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = CacheConfig::new()
            .default_expiration(Duration::from_secs(60))
            .cleanup_interval(Duration::from_secs(5))
            .build();

        assert_eq!(config.get_default_expiration(), Some(Duration::from_secs(60)));
        assert_eq!(config.get_cleanup_interval(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_zero_expiration_means_never() {
        let config = CacheConfig::new().default_expiration(Duration::ZERO).build();
        assert!(config.default_expiration.is_none());
    }

    #[test]
    fn test_zero_interval_disables_janitor() {
        let config = CacheConfig::new()
            .cleanup_interval(Duration::from_secs(1))
            .cleanup_interval(Duration::ZERO)
            .build();
        assert!(config.cleanup_interval.is_none());
    }
}
