//! Error types for burrow
//!
//! Two layers, both built with `thiserror`:
//!
//! - [`StoreError`]: failures reported by the bucket store (I/O, corruption,
//!   locking, structural conflicts inside a transaction)
//! - [`Error`]: the kinds an operator sees at the navigator boundary
//!
//! Store errors that carry a navigation meaning are folded into the matching
//! navigator kind by `From<StoreError>`; everything else surfaces as
//! [`Error::StoreUnavailable`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::codec::CodecError;

/// Result type alias for navigator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors reported by the bucket store
///
/// Names are carried already rendered with the display rule.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error on the store file or lock file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Encoding or decoding the bucket tree failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Store file failed validation
    #[error("Data corruption: {0}")]
    Corruption(String),

    /// Another process holds the store lock
    #[error("store at '{}' is already in use by another process", .0.display())]
    Locked(PathBuf),

    /// Write attempted on a read-only store
    #[error("store is open read-only")]
    ReadOnly,

    /// Bucket with this name already exists
    #[error("bucket already exists: {0}")]
    BucketExists(String),

    /// No bucket with this name
    #[error("bucket not found: {0}")]
    BucketNotFound(String),

    /// No value under this key
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// Key names a bucket where a value is required, or the reverse
    #[error("incompatible value: {0}")]
    IncompatibleValue(String),

    /// Bucket or key name is empty
    #[error("name must not be empty")]
    EmptyName,
}

impl StoreError {
    /// Create a corruption error
    pub fn corruption(msg: impl Into<String>) -> Self {
        StoreError::Corruption(msg.into())
    }

    /// Create a serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        StoreError::Serialization(msg.into())
    }
}

/// Errors surfaced by navigator operations
///
/// Every variant is recoverable within an interactive session; the front end
/// prints it and keeps going.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrong argument count or shape for a command
    #[error("usage: {0}")]
    Usage(String),

    /// Operation needs a current bucket but the location is the root
    #[error("not positioned in a bucket; cd into one first")]
    NotPositioned,

    /// Target bucket, or the current path itself, does not exist
    #[error("bucket not found: {0}")]
    ContainerNotFound(String),

    /// Key has no value in the current bucket
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// Create collided with an existing name
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Key names a bucket, not a value
    #[error("{0} is a bucket, not a key")]
    Incompatible(String),

    /// Stored bytes do not parse under the requested codec
    #[error("decode error: {0}")]
    Decode(#[from] CodecError),

    /// Store could not be opened or a transaction failed
    #[error("store unavailable: {0}")]
    StoreUnavailable(StoreError),
}

impl Error {
    /// Whether this error came from the store rather than from navigation
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Error::StoreUnavailable(_))
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::BucketExists(name) => Error::AlreadyExists(name),
            StoreError::BucketNotFound(name) => Error::ContainerNotFound(name),
            StoreError::KeyNotFound(name) => Error::KeyNotFound(name),
            StoreError::IncompatibleValue(name) => Error::Incompatible(name),
            StoreError::EmptyName => Error::Usage("name must not be empty".to_string()),
            other => Error::StoreUnavailable(other),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::StoreUnavailable(StoreError::Io(e))
    }
}
