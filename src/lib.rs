//! burrow - filesystem-style navigation over an embedded bucket store
//!
//! A bucket store nests named buckets, each holding more buckets or
//! key/value entries. burrow keeps a current location in that tree and
//! resolves it against the store on every operation.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use burrow::{Codec, Database, DecodedValue, Navigator};
//!
//! let mut nav = Navigator::new(Arc::new(Database::ephemeral()));
//! nav.create_container("metrics")?;
//! nav.change_directory("metrics")?;
//! nav.put_encoded("hits", "42", Codec::Uvarint)?;
//!
//! assert_eq!(nav.pwd(), "/ -> metrics");
//! assert_eq!(nav.get_decoded("hits", Codec::Uvarint)?, DecodedValue::Int(42));
//! # Ok::<(), burrow::Error>(())
//! ```
//!
//! # Architecture
//!
//! - [`burrow_core`]: errors, path segments, codecs, display rule
//! - [`burrow_storage`]: buckets, transactions, durability, file format
//! - [`burrow_engine`]: the path stack and the navigator

pub use burrow_core::{
    display_bytes, render_path, Codec, CodecError, DecodedValue, EntryKind, Error, PathSegment,
    Result, StoreError, StoreResult,
};
pub use burrow_core::codec;
pub use burrow_engine::{Listing, Navigator, PathStack};
pub use burrow_storage::{
    lock_path, Bucket, Database, Durability, FileDurability, InMemoryDurability, OpenOptions,
    ReadTransaction, WriteTransaction,
};
