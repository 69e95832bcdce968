//! Core types for burrow
//!
//! This crate defines the foundational pieces shared by the store and the
//! navigator:
//! - Error: store-level and navigator-level error hierarchies
//! - PathSegment: a non-empty bucket name
//! - EntryKind: bucket vs key/value classification
//! - Codec: raw / uvarint / timestamp entry codecs
//! - display_bytes: the byte-string display rule

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod display;
pub mod error;
pub mod types;

pub use codec::{Codec, CodecError, DecodedValue};
pub use display::{display_bytes, is_printable};
pub use error::{Error, Result, StoreError, StoreResult};
pub use types::{render_path, EntryKind, PathSegment};
