//! Storage layer for burrow
//!
//! This crate implements the embedded bucket store:
//! - Bucket: nested key/value tree with copy-on-write sharing
//! - Database: committed root behind a RwLock, serialized writer
//! - ReadTransaction / WriteTransaction: snapshot reads, atomic commits
//! - Durability: in-memory or single-file persistence
//! - Store image format with checksum validation
//!
//! # Concurrency
//!
//! Any number of read transactions run alongside at most one write
//! transaction. Across processes, the store file is guarded by an advisory
//! lock on `<path>.lock`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bucket;
pub mod database;
pub mod durability;
pub mod format;
pub mod transaction;

pub use bucket::{Bucket, Iter};
pub use database::{lock_path, Database, OpenOptions};
pub use durability::{Durability, FileDurability, InMemoryDurability};
pub use transaction::{ReadTransaction, WriteTransaction};
