//! Navigator: filesystem-style movement through the bucket tree
//!
//! The store has no notion of a current directory. The navigator keeps one
//! client side in a [`PathStack`] and resolves it against the store inside
//! every operation:
//!
//! ```text
//! operation
//!   1. open exactly one transaction (snapshot read or serialized write)
//!   2. walk the path stack from the root inside that transaction
//!   3. do the work against the resolved bucket
//!   4. close the transaction
//!   5. only then, and only on success, touch the path stack (cd)
//! ```
//!
//! A resolved bucket borrows from its transaction, so it can never be
//! carried into the next operation.

use std::sync::Arc;

use tracing::{debug, warn};

use burrow_core::{display_bytes, Codec, DecodedValue, EntryKind, Error, PathSegment, Result};
use burrow_storage::{Bucket, Database, WriteTransaction};

use crate::path_stack::PathStack;

/// One row of a bucket listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Key or bucket name
    pub name: Vec<u8>,
    /// Bucket or key/value entry
    pub kind: EntryKind,
    /// Stored value, `None` for buckets
    pub value: Option<Vec<u8>>,
}

impl Listing {
    /// Name rendered with the display rule
    pub fn display_name(&self) -> String {
        display_bytes(&self.name)
    }

    /// Value rendered with the display rule, `None` for buckets
    pub fn display_value(&self) -> Option<String> {
        self.value.as_deref().map(display_bytes)
    }
}

/// Navigation state over one store
///
/// Each navigator owns its own path stack; several navigators over the same
/// `Database` are independent.
#[derive(Debug)]
pub struct Navigator {
    db: Arc<Database>,
    stack: PathStack,
}

impl Navigator {
    /// Start at the root of `db`
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            stack: PathStack::new(),
        }
    }

    /// The underlying store
    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    /// Current location as a path stack
    pub fn path(&self) -> &[PathSegment] {
        self.stack.segments()
    }

    /// Whether the current location is the root
    pub fn at_root(&self) -> bool {
        self.stack.is_root()
    }

    /// Render the current location; no store access
    pub fn pwd(&self) -> String {
        self.stack.render()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// List the current bucket in key order
    ///
    /// At the root only buckets are reported. Elsewhere each name is
    /// classified by probing it as a nested bucket.
    ///
    /// # Errors
    ///
    /// `ContainerNotFound` if the current path no longer resolves.
    pub fn list(&self) -> Result<Vec<Listing>> {
        let tx = self.db.begin_read();
        let current = self.resolve(tx.root()).ok_or_else(|| self.stale_path())?;

        if self.stack.is_root() {
            return Ok(current
                .buckets()
                .map(|(name, _)| Listing {
                    name: name.to_vec(),
                    kind: EntryKind::Container,
                    value: None,
                })
                .collect());
        }

        let rows = current
            .iter()
            .map(|(name, value)| {
                if current.bucket(name).is_some() {
                    Listing {
                        name: name.to_vec(),
                        kind: EntryKind::Container,
                        value: None,
                    }
                } else {
                    Listing {
                        name: name.to_vec(),
                        kind: EntryKind::Entry,
                        value: Some(value.unwrap_or_default().to_vec()),
                    }
                }
            })
            .collect::<Vec<_>>();
        debug!(target: "burrow::nav", path = %self.pwd(), rows = rows.len(), "Listed bucket");
        Ok(rows)
    }

    /// Move to `..`, `/`, or a child bucket of the current location
    ///
    /// Returns the rendered path after the move. The stack changes only
    /// after the target has been confirmed inside a snapshot.
    ///
    /// # Errors
    ///
    /// - `Usage` for an empty name
    /// - `ContainerNotFound` if the current path is stale or `name` is not
    ///   a bucket; the path is left unchanged
    pub fn change_directory(&mut self, name: impl AsRef<[u8]>) -> Result<String> {
        let name = name.as_ref();
        match name {
            b".." => {
                self.stack.pop();
            }
            b"/" => self.stack.clear(),
            _ => {
                let segment = PathSegment::new(name)?;
                self.probe_child(&segment)?;
                self.stack.push(segment);
            }
        }
        debug!(target: "burrow::nav", path = %self.pwd(), "Changed directory");
        Ok(self.pwd())
    }

    /// Raw value of `key` in the current bucket
    pub fn get(&self, key: impl AsRef<[u8]>) -> Result<Vec<u8>> {
        self.require_positioned()?;
        let key = key.as_ref();
        let tx = self.db.begin_read();
        let current = self.resolve(tx.root()).ok_or_else(|| self.stale_path())?;
        current
            .get(key)
            .map(<[u8]>::to_vec)
            .ok_or_else(|| Error::KeyNotFound(display_bytes(key)))
    }

    /// Value of `key` viewed through `codec`
    ///
    /// # Errors
    ///
    /// - `NotPositioned` at the root
    /// - `ContainerNotFound` if the current path is stale
    /// - `KeyNotFound` if `key` holds no value
    /// - `Decode` if the bytes are malformed for `codec`
    pub fn get_decoded(&self, key: impl AsRef<[u8]>, codec: Codec) -> Result<DecodedValue> {
        let bytes = self.get(key)?;
        Ok(codec.decode(&bytes)?)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Upsert `key`; an empty value deletes it
    ///
    /// # Errors
    ///
    /// - `NotPositioned` at the root
    /// - `ContainerNotFound` if the current path is stale
    /// - `KeyNotFound` when deleting a key that is absent
    /// - `Incompatible` if `key` names a bucket
    pub fn put(&self, key: impl AsRef<[u8]>, value: impl Into<Vec<u8>>) -> Result<()> {
        let value = value.into();
        if value.is_empty() {
            return self.delete_entry(key);
        }
        self.require_positioned()?;
        let key = key.as_ref();
        self.db.update(|tx| {
            let current = self.resolve_mut(tx).ok_or_else(|| self.stale_path())?;
            current.put(key, value)?;
            Ok::<_, Error>(())
        })?;
        debug!(target: "burrow::nav", path = %self.pwd(), key = %display_bytes(key), "Put value");
        Ok(())
    }

    /// Encode `input` through `codec`, then [`put`](Self::put) it
    ///
    /// # Errors
    ///
    /// `Usage` if `input` is not valid for `codec`; nothing is written.
    pub fn put_encoded(&self, key: impl AsRef<[u8]>, input: &str, codec: Codec) -> Result<()> {
        self.require_positioned()?;
        let bytes = codec.encode(input).map_err(|e| Error::Usage(e.to_string()))?;
        self.put(key, bytes)
    }

    /// Delete the value at `key`
    ///
    /// # Errors
    ///
    /// - `NotPositioned` at the root
    /// - `KeyNotFound` if `key` holds no value
    /// - `Incompatible` if `key` names a bucket
    pub fn delete_entry(&self, key: impl AsRef<[u8]>) -> Result<()> {
        self.require_positioned()?;
        let key = key.as_ref();
        self.db.update(|tx| -> Result<()> {
            let current = self.resolve_mut(tx).ok_or_else(|| self.stale_path())?;
            match current.delete(key)? {
                Some(_) => Ok(()),
                None => Err(Error::KeyNotFound(display_bytes(key))),
            }
        })?;
        debug!(target: "burrow::nav", path = %self.pwd(), key = %display_bytes(key), "Deleted value");
        Ok(())
    }

    /// Create bucket `name` in the current location
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if `name` is taken by a bucket or a value
    /// - `ContainerNotFound` if the current path is stale
    pub fn create_container(&self, name: impl AsRef<[u8]>) -> Result<()> {
        let segment = PathSegment::new(name.as_ref())?;
        self.db.update(|tx| {
            if self.stack.is_root() {
                tx.create_bucket(segment.as_bytes())?;
            } else {
                let current = self.resolve_mut(tx).ok_or_else(|| self.stale_path())?;
                current.create_bucket(segment.as_bytes())?;
            }
            Ok::<_, Error>(())
        })?;
        debug!(target: "burrow::nav", path = %self.pwd(), bucket = %segment, "Created bucket");
        Ok(())
    }

    /// Delete bucket `name` and everything under it
    ///
    /// # Errors
    ///
    /// - `ContainerNotFound` if no bucket has this name (a value does not
    ///   count) or the current path is stale
    pub fn delete_container(&self, name: impl AsRef<[u8]>) -> Result<()> {
        let segment = PathSegment::new(name.as_ref())?;
        self.db.update(|tx| {
            if self.stack.is_root() {
                tx.delete_bucket(segment.as_bytes())?;
            } else {
                let current = self.resolve_mut(tx).ok_or_else(|| self.stale_path())?;
                current.delete_bucket(segment.as_bytes())?;
            }
            Ok::<_, Error>(())
        })?;
        debug!(target: "burrow::nav", path = %self.pwd(), bucket = %segment, "Deleted bucket");
        Ok(())
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Walk the path stack down from `root`
    ///
    /// An empty stack resolves to `root` itself. `None` means some segment
    /// no longer names a bucket.
    fn resolve<'tx>(&self, root: &'tx Bucket) -> Option<&'tx Bucket> {
        let mut current = root;
        for segment in self.stack.segments() {
            current = current.bucket(segment.as_bytes())?;
        }
        Some(current)
    }

    /// Walk the path stack inside a write transaction
    ///
    /// Only called when positioned below the root.
    fn resolve_mut<'tx>(&self, tx: &'tx mut WriteTransaction<'_>) -> Option<&'tx mut Bucket> {
        // Check read-only first so a stale path copies nothing
        self.resolve(tx.root())?;
        let (first, rest) = self.stack.segments().split_first()?;
        let mut current = tx.bucket_mut(first.as_bytes())?;
        for segment in rest {
            current = current.bucket_mut(segment.as_bytes())?;
        }
        Some(current)
    }

    /// Confirm `segment` is a bucket under the current location
    fn probe_child(&self, segment: &PathSegment) -> Result<()> {
        let tx = self.db.begin_read();
        let current = self.resolve(tx.root()).ok_or_else(|| self.stale_path())?;
        match current.bucket(segment.as_bytes()) {
            Some(_) => Ok(()),
            None => Err(Error::ContainerNotFound(segment.to_string())),
        }
    }

    fn require_positioned(&self) -> Result<()> {
        if self.stack.is_root() {
            return Err(Error::NotPositioned);
        }
        Ok(())
    }

    fn stale_path(&self) -> Error {
        let path = self.pwd();
        warn!(target: "burrow::nav", path = %path, "Current path no longer resolves");
        Error::ContainerNotFound(path)
    }
}
