//! Bucket: a node of the nested key/value tree
//!
//! A bucket maps byte-string keys to either a nested bucket or a value. A key
//! names exactly one of the two; the same name cannot be both.
//!
//! # Copy-on-write
//!
//! Nested buckets are held behind `Arc`. A read snapshot is just a clone of
//! the root `Arc`, and a write transaction mutates through `Arc::make_mut`,
//! which copies only the buckets on the path it touches. Snapshots taken
//! before a commit keep seeing the old nodes.
//!
//! # Example
//!
//! ```
//! use burrow_storage::Bucket;
//!
//! let mut root = Bucket::new();
//! let users = root.create_bucket(b"users").unwrap();
//! users.put(b"alice", b"admin".to_vec()).unwrap();
//!
//! let users = root.bucket(b"users").unwrap();
//! assert_eq!(users.get(b"alice"), Some(&b"admin"[..]));
//! assert!(root.bucket(b"missing").is_none());
//! ```

use std::collections::btree_map::{self, BTreeMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use burrow_core::{display_bytes, StoreError, StoreResult};

/// What a key in a bucket refers to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum Node {
    /// Nested bucket
    Bucket(Arc<Bucket>),
    /// Scalar value
    Value(Vec<u8>),
}

/// A container of nested buckets and key/value entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    entries: BTreeMap<Vec<u8>, Node>,
}

impl Bucket {
    /// Create an empty bucket
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Number of keys (buckets and values) directly in this bucket
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the bucket has no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a nested bucket
    ///
    /// Returns `None` if the key is absent or names a value. This is a pure
    /// probe; it never creates anything.
    pub fn bucket(&self, name: &[u8]) -> Option<&Bucket> {
        match self.entries.get(name) {
            Some(Node::Bucket(b)) => Some(b),
            _ => None,
        }
    }

    /// Look up a value
    ///
    /// Returns `None` if the key is absent or names a bucket.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        match self.entries.get(key) {
            Some(Node::Value(v)) => Some(v),
            _ => None,
        }
    }

    /// Check if any key (bucket or value) has this name
    pub fn contains(&self, key: &[u8]) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate keys in byte order
    ///
    /// Yields `(name, Some(value))` for entries and `(name, None)` for nested
    /// buckets.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Iterate only the nested buckets, in byte order
    pub fn buckets(&self) -> impl Iterator<Item = (&[u8], &Bucket)> {
        self.entries.iter().filter_map(|(k, node)| match node {
            Node::Bucket(b) => Some((k.as_slice(), b.as_ref())),
            Node::Value(_) => None,
        })
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Mutable access to a nested bucket
    ///
    /// Copies the nested bucket first if a snapshot still shares it.
    pub fn bucket_mut(&mut self, name: &[u8]) -> Option<&mut Bucket> {
        match self.entries.get_mut(name) {
            Some(Node::Bucket(b)) => Some(Arc::make_mut(b)),
            _ => None,
        }
    }

    /// Create a nested bucket
    ///
    /// # Errors
    ///
    /// - `EmptyName` if `name` is empty
    /// - `BucketExists` if the name is taken by a bucket or a value
    pub fn create_bucket(&mut self, name: &[u8]) -> StoreResult<&mut Bucket> {
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        if self.entries.contains_key(name) {
            return Err(StoreError::BucketExists(display_bytes(name)));
        }
        self.entries.insert(name.to_vec(), Node::Bucket(Arc::default()));
        self.bucket_mut(name)
            .ok_or_else(|| StoreError::BucketNotFound(display_bytes(name)))
    }

    /// Delete a nested bucket and everything under it
    ///
    /// # Errors
    ///
    /// `BucketNotFound` if no bucket has this name (including when the name
    /// is a value).
    pub fn delete_bucket(&mut self, name: &[u8]) -> StoreResult<()> {
        if self.bucket(name).is_none() {
            return Err(StoreError::BucketNotFound(display_bytes(name)));
        }
        self.entries.remove(name);
        Ok(())
    }

    /// Insert or replace a value, returning the previous value
    ///
    /// # Errors
    ///
    /// - `EmptyName` if `key` is empty
    /// - `IncompatibleValue` if `key` names a bucket
    pub fn put(&mut self, key: &[u8], value: Vec<u8>) -> StoreResult<Option<Vec<u8>>> {
        if key.is_empty() {
            return Err(StoreError::EmptyName);
        }
        if self.bucket(key).is_some() {
            return Err(StoreError::IncompatibleValue(display_bytes(key)));
        }
        match self.entries.insert(key.to_vec(), Node::Value(value)) {
            Some(Node::Value(old)) => Ok(Some(old)),
            _ => Ok(None),
        }
    }

    /// Remove a value, returning it if present
    ///
    /// # Errors
    ///
    /// `IncompatibleValue` if `key` names a bucket.
    pub fn delete(&mut self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        if self.bucket(key).is_some() {
            return Err(StoreError::IncompatibleValue(display_bytes(key)));
        }
        match self.entries.remove(key) {
            Some(Node::Value(old)) => Ok(Some(old)),
            _ => Ok(None),
        }
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Check structural invariants of a decoded tree
    ///
    /// Names are non-empty everywhere; when `is_root` is set the bucket may
    /// only hold nested buckets.
    pub(crate) fn validate(&self, is_root: bool) -> Result<(), String> {
        for (name, node) in &self.entries {
            if name.is_empty() {
                return Err("empty key in bucket".to_string());
            }
            match node {
                Node::Bucket(b) => b.validate(false)?,
                Node::Value(_) if is_root => {
                    return Err(format!("value {} stored at root", display_bytes(name)));
                }
                Node::Value(_) => {}
            }
        }
        Ok(())
    }
}

/// Ordered iterator over a bucket's keys
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, Vec<u8>, Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a [u8], Option<&'a [u8]>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, node)| match node {
            Node::Bucket(_) => (k.as_slice(), None),
            Node::Value(v) => (k.as_slice(), Some(v.as_slice())),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a Bucket {
    type Item = (&'a [u8], Option<&'a [u8]>);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
