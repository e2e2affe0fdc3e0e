//! Error types for the expiring cache.
//!
//! Precondition failures (`add`, `replace`) and snapshot failures are
//! reported through [`CacheError`]; nothing in the cache panics on bad input.

use std::io;

use thiserror::Error;

/// The main error type for cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// `add` found a live entry under the key. Nothing was written.
    #[error("key already exists: '{0}'")]
    AlreadyExists(String),

    /// `replace` found no live entry under the key. Nothing was written.
    #[error("key not found: '{0}'")]
    KeyNotFound(String),

    /// An I/O error occurred while reading or writing a snapshot.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A stored value could not be encoded into a snapshot.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// A snapshot stream could not be decoded. Nothing was merged.
    #[error("decoding error: {0}")]
    Decoding(String),
}

/// A specialized Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
