//! Naming types shared by the store and the navigator

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::display::display_bytes;
use crate::error::{Error, Result};

/// One bucket name in a navigation path
///
/// Store keys are arbitrary bytes, so a segment is too. The only invariant
/// is that a segment is never empty.
///
/// # Examples
///
/// ```
/// use burrow_core::PathSegment;
///
/// let seg = PathSegment::new("users").unwrap();
/// assert_eq!(seg.as_bytes(), b"users");
/// assert!(PathSegment::new("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PathSegment(Vec<u8>);

impl PathSegment {
    /// Create a segment, rejecting empty names
    pub fn new(name: impl Into<Vec<u8>>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::Usage("bucket name must not be empty".to_string()));
        }
        Ok(PathSegment(name))
    }

    /// Raw name bytes
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the segment, returning its bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for PathSegment {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&display_bytes(&self.0))
    }
}

impl fmt::Debug for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PathSegment({})", display_bytes(&self.0))
    }
}

impl TryFrom<&str> for PathSegment {
    type Error = Error;

    fn try_from(name: &str) -> Result<Self> {
        PathSegment::new(name)
    }
}

/// Whether a listed name is a bucket or a key/value entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// Nested bucket
    Container,
    /// Scalar key/value pair
    Entry,
}

impl EntryKind {
    /// Short label used in listings
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Container => "Bucket",
            EntryKind::Entry => "Key",
        }
    }
}

/// Render a sequence of segments as an operator-facing path
///
/// The root is `/`; nested locations read `/ -> a -> b`.
pub fn render_path(segments: &[PathSegment]) -> String {
    if segments.is_empty() {
        return "/".to_string();
    }
    let names: Vec<String> = segments.iter().map(|s| s.to_string()).collect();
    format!("/ -> {}", names.join(" -> "))
}
