//! The navigator's current location
//!
//! A `PathStack` is the chain of bucket names from the root to the current
//! bucket. It is never validated on its own: the navigator resolves it
//! against a live transaction on every operation and reports a stale path
//! when a segment no longer names a bucket.

use burrow_core::{render_path, PathSegment};

/// Ordered bucket names, root first
///
/// An empty stack means the current location is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathStack {
    segments: Vec<PathSegment>,
}

impl PathStack {
    /// Empty stack, positioned at the root
    pub fn new() -> Self {
        Self::default()
    }

    /// Descend into `segment`
    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    /// Move up one level; at the root this is a no-op and returns `None`
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// Return to the root
    pub fn clear(&mut self) {
        self.segments.clear();
    }

    /// Read-only view of the segments, root first
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Whether the current location is the root
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Depth below the root
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the stack is empty (same as [`is_root`](Self::is_root))
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Render as `/` or `/ -> a -> b`
    pub fn render(&self) -> String {
        render_path(&self.segments)
    }
}
