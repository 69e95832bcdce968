//! Store image file format
//!
//! The whole bucket tree is written as one image on every commit.
//!
//! # Format
//!
//! ```text
//! +------------------+
//! | Magic: "BRRW"    | 4 bytes
//! | Format Version   | 4 bytes (u32 LE)
//! | Commit Version   | 8 bytes (u64 LE)
//! | Payload Length   | 8 bytes (u64 LE)
//! | Payload          | variable (MessagePack bucket tree)
//! | CRC32            | 4 bytes (LE, over all preceding bytes)
//! +------------------+
//! ```

use std::ffi::OsString;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use burrow_core::{StoreError, StoreResult};

use crate::bucket::Bucket;

/// Image magic bytes: "BRRW"
pub const IMAGE_MAGIC: [u8; 4] = *b"BRRW";

/// Current image format version
pub const IMAGE_FORMAT_VERSION: u32 = 1;

/// magic(4) + format(4) + version(8) + payload_len(8)
const HEADER_LEN: usize = 24;
const CRC_LEN: usize = 4;

/// A decoded store image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreImage {
    /// Commit version the image was written at
    pub version: u64,
    /// Root bucket (holds only nested buckets)
    pub root: Bucket,
}

/// Encode a root bucket and commit version
pub fn encode_image(root: &Bucket, version: u64) -> StoreResult<Vec<u8>> {
    let payload = rmp_serde::to_vec(root).map_err(|e| StoreError::serialization(e.to_string()))?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len() + CRC_LEN);
    bytes.extend_from_slice(&IMAGE_MAGIC);
    bytes.extend_from_slice(&IMAGE_FORMAT_VERSION.to_le_bytes());
    bytes.extend_from_slice(&version.to_le_bytes());
    bytes.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    bytes.extend_from_slice(&payload);

    let crc = crc32fast::hash(&bytes);
    bytes.extend_from_slice(&crc.to_le_bytes());
    Ok(bytes)
}

/// Decode and validate an image
pub fn decode_image(bytes: &[u8]) -> Result<StoreImage, ImageError> {
    if bytes.len() < HEADER_LEN + CRC_LEN {
        return Err(ImageError::TooShort(bytes.len()));
    }
    if bytes[0..4] != IMAGE_MAGIC {
        return Err(ImageError::InvalidMagic);
    }

    let body = &bytes[..bytes.len() - CRC_LEN];
    let stored_crc = read_u32(&bytes[bytes.len() - CRC_LEN..]);
    let computed_crc = crc32fast::hash(body);
    if stored_crc != computed_crc {
        return Err(ImageError::ChecksumMismatch {
            expected: stored_crc,
            computed: computed_crc,
        });
    }

    let format_version = read_u32(&bytes[4..8]);
    if format_version != IMAGE_FORMAT_VERSION {
        return Err(ImageError::UnsupportedFormat(format_version));
    }
    let version = read_u64(&bytes[8..16]);
    let payload_len = read_u64(&bytes[16..24]);

    let payload = &body[HEADER_LEN..];
    if payload.len() as u64 != payload_len {
        return Err(ImageError::LengthMismatch {
            declared: payload_len,
            actual: payload.len() as u64,
        });
    }

    let root: Bucket =
        rmp_serde::from_slice(payload).map_err(|e| ImageError::Payload(e.to_string()))?;
    root.validate(true).map_err(ImageError::Payload)?;

    Ok(StoreImage { version, root })
}

/// Read an image from disk
pub fn read_image(path: &Path) -> StoreResult<StoreImage> {
    let bytes = std::fs::read(path)?;
    decode_image(&bytes).map_err(StoreError::from)
}

/// Persist an image atomically (write-fsync-rename)
///
/// The image is staged in a uniquely named hidden file next to `path`, so no
/// other file in the directory is ever overwritten.
pub fn write_image(path: &Path, root: &Bucket, version: u64) -> StoreResult<()> {
    let bytes = encode_image(root, version)?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut prefix = OsString::from(".");
    prefix.push(path.file_name().unwrap_or_default());
    prefix.push(".");

    let mut staged = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(parent)?;
    staged.write_all(&bytes)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| StoreError::Io(e.error))?;

    File::open(parent)?.sync_all()?;
    Ok(())
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(buf)
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(buf)
}

/// Errors found while decoding an image
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// File shorter than header plus checksum
    #[error("image too short ({0} bytes)")]
    TooShort(usize),

    /// Invalid magic bytes
    #[error("invalid magic bytes")]
    InvalidMagic,

    /// Format written by an incompatible release
    #[error("unsupported image format version {0}")]
    UnsupportedFormat(u32),

    /// Checksum mismatch
    #[error("checksum mismatch: expected {expected:08x}, computed {computed:08x}")]
    ChecksumMismatch {
        /// CRC32 stored in the file
        expected: u32,
        /// CRC32 computed over the file
        computed: u32,
    },

    /// Declared payload length disagrees with the file
    #[error("payload length mismatch: declared {declared}, actual {actual}")]
    LengthMismatch {
        /// Length in the header
        declared: u64,
        /// Length present
        actual: u64,
    },

    /// Payload did not decode into a valid bucket tree
    #[error("invalid payload: {0}")]
    Payload(String),
}

impl From<ImageError> for StoreError {
    fn from(e: ImageError) -> Self {
        StoreError::corruption(e.to_string())
    }
}
