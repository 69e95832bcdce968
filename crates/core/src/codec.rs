//! Entry codecs
//!
//! Values are stored as opaque bytes. A codec is a lens the operator picks
//! when reading or writing an entry; nothing about the type is persisted.
//!
//! | Codec | Wire form | Rendered as |
//! |-------|-----------|-------------|
//! | `raw` | bytes as-is | display rule |
//! | `uvarint` | LEB128 unsigned, at most 10 bytes | decimal `u64` |
//! | `timestamp` | binary time layout (version 1 or 2) | RFC 3339 |
//!
//! # Timestamp layout
//!
//! ```text
//! +------------------+
//! | Version (1 or 2) | 1 byte
//! | Seconds          | 8 bytes (i64 BE, since 0001-01-01T00:00:00Z)
//! | Nanoseconds      | 4 bytes (i32 BE)
//! | Offset minutes   | 2 bytes (i16 BE, -1 = UTC)
//! | Offset seconds   | 1 byte (version 2 only)
//! +------------------+
//! ```
//!
//! All decoders are strict: malformed bytes produce a [`CodecError`], never a
//! substitute value.

use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use thiserror::Error;

use crate::display::display_bytes;

/// Maximum encoded length of a 64-bit unsigned varint
pub const MAX_VARINT_LEN: usize = 10;

/// Seconds between 0001-01-01T00:00:00Z and the Unix epoch
const SECONDS_TO_UNIX_EPOCH: i64 = 62_135_596_800;

/// Timestamp layout version without sub-minute zone offsets
const TIME_VERSION_V1: u8 = 1;
/// Timestamp layout version with a trailing offset-seconds byte
const TIME_VERSION_V2: u8 = 2;
/// Encoded length of a version 1 timestamp
const TIME_LEN_V1: usize = 15;

/// Zone offset (in minutes) that marks a UTC timestamp
const UTC_OFFSET_MARKER: i16 = -1;

/// Errors produced by encoding or decoding an entry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Input ended in the middle of a varint
    #[error("truncated varint ({0} bytes, continuation bit still set)")]
    Truncated(usize),

    /// Varint does not fit in 64 bits
    #[error("varint overflows 64 bits")]
    Overflow,

    /// Bytes left over after a complete varint
    #[error("{trailing} trailing bytes after varint of length {consumed}")]
    TrailingBytes {
        /// Bytes consumed by the varint
        consumed: usize,
        /// Bytes left unread
        trailing: usize,
    },

    /// Timestamp has the wrong length for its version
    #[error("invalid timestamp length {actual}, expected {expected}")]
    InvalidLength {
        /// Length required by the layout version
        expected: usize,
        /// Length found
        actual: usize,
    },

    /// Unknown timestamp layout version
    #[error("unsupported timestamp version {0}")]
    UnsupportedVersion(u8),

    /// Timestamp fields decode but do not form a valid instant
    #[error("timestamp out of range: {0}")]
    OutOfRange(String),

    /// Operator input could not be parsed for encoding
    #[error("invalid input for {codec}: {reason}")]
    InvalidInput {
        /// Codec that rejected the input
        codec: &'static str,
        /// What was wrong with it
        reason: String,
    },
}

/// The lens used to interpret a stored value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    /// Bytes as stored
    Raw,
    /// Unsigned LEB128 varint
    Uvarint,
    /// Binary timestamp
    Timestamp,
}

impl Codec {
    /// All codecs, in display order
    pub const ALL: [Codec; 3] = [Codec::Raw, Codec::Uvarint, Codec::Timestamp];

    /// Canonical codec name
    pub fn name(&self) -> &'static str {
        match self {
            Codec::Raw => "raw",
            Codec::Uvarint => "uvarint",
            Codec::Timestamp => "timestamp",
        }
    }

    /// Interpret stored bytes
    pub fn decode(&self, bytes: &[u8]) -> Result<DecodedValue, CodecError> {
        match self {
            Codec::Raw => Ok(DecodedValue::Raw(bytes.to_vec())),
            Codec::Uvarint => decode_uvarint(bytes).map(DecodedValue::Int),
            Codec::Timestamp => decode_timestamp(bytes).map(DecodedValue::Time),
        }
    }

    /// Turn operator input into stored bytes
    ///
    /// `raw` stores the text verbatim, `uvarint` parses a decimal `u64`, and
    /// `timestamp` parses RFC 3339 (or the literal `now`).
    pub fn encode(&self, input: &str) -> Result<Vec<u8>, CodecError> {
        match self {
            Codec::Raw => Ok(input.as_bytes().to_vec()),
            Codec::Uvarint => {
                let n = input
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| CodecError::InvalidInput {
                        codec: self.name(),
                        reason: e.to_string(),
                    })?;
                Ok(encode_uvarint(n))
            }
            Codec::Timestamp => {
                let input = input.trim();
                let time = if input.eq_ignore_ascii_case("now") {
                    Utc::now().fixed_offset()
                } else {
                    DateTime::parse_from_rfc3339(input).map_err(|e| CodecError::InvalidInput {
                        codec: self.name(),
                        reason: e.to_string(),
                    })?
                };
                encode_timestamp(&time)
            }
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Codec {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(Codec::Raw),
            "int" | "uvarint" => Ok(Codec::Uvarint),
            "time" | "timestamp" => Ok(Codec::Timestamp),
            other => Err(CodecError::InvalidInput {
                codec: "codec",
                reason: format!("unknown codec '{}'", other),
            }),
        }
    }
}

/// A value viewed through a codec
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedValue {
    /// Stored bytes, rendered with the display rule
    Raw(Vec<u8>),
    /// Decoded varint
    Int(u64),
    /// Decoded timestamp with its stored zone offset
    Time(DateTime<FixedOffset>),
}

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedValue::Raw(bytes) => f.write_str(&display_bytes(bytes)),
            DecodedValue::Int(n) => write!(f, "{}", n),
            DecodedValue::Time(t) => f.write_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, false)),
        }
    }
}

// =========================================================================
// Unsigned varint
// =========================================================================

/// Encode a `u64` as an unsigned LEB128 varint
pub fn encode_uvarint(mut value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_VARINT_LEN);
    while value >= 0x80 {
        out.push((value as u8) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
    out
}

/// Decode an unsigned LEB128 varint that spans the whole input
pub fn decode_uvarint(bytes: &[u8]) -> Result<u64, CodecError> {
    let mut value: u64 = 0;
    let mut shift = 0u32;

    for (i, &b) in bytes.iter().enumerate() {
        if i == MAX_VARINT_LEN {
            return Err(CodecError::Overflow);
        }
        if b < 0x80 {
            // The tenth byte may only contribute the top bit
            if i == MAX_VARINT_LEN - 1 && b > 1 {
                return Err(CodecError::Overflow);
            }
            let consumed = i + 1;
            if consumed != bytes.len() {
                return Err(CodecError::TrailingBytes {
                    consumed,
                    trailing: bytes.len() - consumed,
                });
            }
            return Ok(value | (u64::from(b) << shift));
        }
        value |= u64::from(b & 0x7f) << shift;
        shift += 7;
    }

    Err(CodecError::Truncated(bytes.len()))
}

// =========================================================================
// Timestamp
// =========================================================================

/// Decode a binary timestamp
pub fn decode_timestamp(bytes: &[u8]) -> Result<DateTime<FixedOffset>, CodecError> {
    let version = *bytes.first().ok_or(CodecError::InvalidLength {
        expected: TIME_LEN_V1,
        actual: 0,
    })?;

    let expected = match version {
        TIME_VERSION_V1 => TIME_LEN_V1,
        TIME_VERSION_V2 => TIME_LEN_V1 + 1,
        other => return Err(CodecError::UnsupportedVersion(other)),
    };
    if bytes.len() != expected {
        return Err(CodecError::InvalidLength {
            expected,
            actual: bytes.len(),
        });
    }

    let mut cursor = Cursor::new(&bytes[1..]);
    let (secs, nanos, offset_min) =
        read_time_fields(&mut cursor).map_err(|_| CodecError::InvalidLength {
            expected,
            actual: bytes.len(),
        })?;

    let mut offset_secs = i32::from(offset_min) * 60;
    if version == TIME_VERSION_V2 {
        offset_secs += i32::from(bytes[TIME_LEN_V1]);
    }

    let unix_secs = secs
        .checked_sub(SECONDS_TO_UNIX_EPOCH)
        .ok_or_else(|| CodecError::OutOfRange(format!("seconds {}", secs)))?;
    let nanos = u32::try_from(nanos)
        .ok()
        .filter(|n| *n < 1_000_000_000)
        .ok_or_else(|| CodecError::OutOfRange(format!("nanoseconds {}", nanos)))?;
    let utc = DateTime::<Utc>::from_timestamp(unix_secs, nanos)
        .ok_or_else(|| CodecError::OutOfRange(format!("seconds {}", secs)))?;

    if offset_secs == i32::from(UTC_OFFSET_MARKER) * 60 {
        offset_secs = 0;
    }
    let zone = FixedOffset::east_opt(offset_secs)
        .ok_or_else(|| CodecError::OutOfRange(format!("zone offset {}s", offset_secs)))?;

    Ok(utc.with_timezone(&zone))
}

fn read_time_fields(cursor: &mut Cursor<&[u8]>) -> std::io::Result<(i64, i32, i16)> {
    let secs = cursor.read_i64::<BigEndian>()?;
    let nanos = cursor.read_i32::<BigEndian>()?;
    let offset_min = cursor.read_i16::<BigEndian>()?;
    Ok((secs, nanos, offset_min))
}

/// Encode a timestamp in the binary layout
///
/// A zero offset is written as UTC. Offsets with a seconds component use
/// layout version 2.
pub fn encode_timestamp(time: &DateTime<FixedOffset>) -> Result<Vec<u8>, CodecError> {
    let offset = time.offset().local_minus_utc();
    let (version, offset_min, offset_sec) = if offset == 0 {
        (TIME_VERSION_V1, UTC_OFFSET_MARKER, 0)
    } else {
        let minutes = i16::try_from(offset / 60)
            .map_err(|_| CodecError::OutOfRange(format!("zone offset {}s", offset)))?;
        let seconds = (offset % 60) as i8 as u8;
        if seconds == 0 {
            (TIME_VERSION_V1, minutes, 0)
        } else {
            (TIME_VERSION_V2, minutes, seconds)
        }
    };

    let secs = time
        .timestamp()
        .checked_add(SECONDS_TO_UNIX_EPOCH)
        .ok_or_else(|| CodecError::OutOfRange(time.to_rfc3339()))?;
    // Leap seconds are folded into the last second
    let nanos = time.timestamp_subsec_nanos().min(999_999_999) as i32;

    let mut out = Vec::with_capacity(TIME_LEN_V1 + 1);
    out.push(version);
    // Writes into a Vec cannot fail
    let _ = out.write_i64::<BigEndian>(secs);
    let _ = out.write_i32::<BigEndian>(nanos);
    let _ = out.write_i16::<BigEndian>(offset_min);
    if version == TIME_VERSION_V2 {
        out.push(offset_sec);
    }
    Ok(out)
}
