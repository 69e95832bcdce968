//! Read and write transactions
//!
//! # Snapshot Isolation Guarantees
//!
//! A [`ReadTransaction`] holds the root that was committed when it began:
//! - Consistent point-in-time view
//! - Repeatable reads
//! - Never shows writes committed after it began, or uncommitted writes
//!
//! A [`WriteTransaction`] holds the database writer lock for its whole
//! lifetime, so at most one is in flight. It mutates a private
//! copy-on-write root; nothing is visible to readers until `commit`.
//!
//! Bucket references obtained from a transaction borrow from it, so they
//! cannot outlive the transaction that produced them.
//!
//! The root of both transaction kinds holds only buckets: there is no root
//! `put`.

use std::sync::Arc;

use parking_lot::MutexGuard;
use tracing::debug;

use burrow_core::StoreResult;

use crate::bucket::Bucket;
use crate::database::Database;

/// Read-only snapshot of the store
#[derive(Debug, Clone)]
pub struct ReadTransaction {
    root: Arc<Bucket>,
    version: u64,
}

impl ReadTransaction {
    pub(crate) fn new(root: Arc<Bucket>, version: u64) -> Self {
        Self { root, version }
    }

    /// Commit version this snapshot observes
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The root bucket (holds only nested buckets)
    pub fn root(&self) -> &Bucket {
        &self.root
    }

    /// Look up a top-level bucket
    pub fn bucket(&self, name: &[u8]) -> Option<&Bucket> {
        self.root.bucket(name)
    }

    /// Iterate top-level buckets in byte order
    pub fn buckets(&self) -> impl Iterator<Item = (&[u8], &Bucket)> {
        self.root.buckets()
    }
}

/// Serialized read-write transaction
///
/// Dropping without `commit` rolls back.
pub struct WriteTransaction<'db> {
    db: &'db Database,
    writer: MutexGuard<'db, ()>,
    root: Arc<Bucket>,
    base_version: u64,
    dirty: bool,
}

impl<'db> WriteTransaction<'db> {
    pub(crate) fn new(
        db: &'db Database,
        writer: MutexGuard<'db, ()>,
        root: Arc<Bucket>,
        base_version: u64,
    ) -> Self {
        Self {
            db,
            writer,
            root,
            base_version,
            dirty: false,
        }
    }

    /// Commit version this transaction started from
    pub fn base_version(&self) -> u64 {
        self.base_version
    }

    /// The working root, including this transaction's own writes
    pub fn root(&self) -> &Bucket {
        &self.root
    }

    /// Look up a top-level bucket (sees this transaction's writes)
    pub fn bucket(&self, name: &[u8]) -> Option<&Bucket> {
        self.root.bucket(name)
    }

    /// Iterate top-level buckets in byte order
    pub fn buckets(&self) -> impl Iterator<Item = (&[u8], &Bucket)> {
        self.root.buckets()
    }

    /// Mutable access to a top-level bucket
    pub fn bucket_mut(&mut self, name: &[u8]) -> Option<&mut Bucket> {
        self.root.bucket(name)?;
        self.working_root().bucket_mut(name)
    }

    /// Create a top-level bucket
    ///
    /// # Errors
    ///
    /// `BucketExists` if the name is taken, `EmptyName` if empty.
    pub fn create_bucket(&mut self, name: &[u8]) -> StoreResult<&mut Bucket> {
        self.working_root().create_bucket(name)
    }

    /// Delete a top-level bucket and everything under it
    ///
    /// # Errors
    ///
    /// `BucketNotFound` if absent.
    pub fn delete_bucket(&mut self, name: &[u8]) -> StoreResult<()> {
        self.working_root().delete_bucket(name)
    }

    /// Make writes durable and visible to new readers
    ///
    /// Returns the new commit version, or the base version if nothing was
    /// touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the durability layer fails; the published state
    /// is then unchanged.
    pub fn commit(self) -> StoreResult<u64> {
        let WriteTransaction {
            db,
            writer,
            root,
            base_version,
            dirty,
        } = self;

        if !dirty {
            return Ok(base_version);
        }
        let version = db.publish(root, base_version)?;
        drop(writer);
        Ok(version)
    }

    /// Discard all writes
    pub fn rollback(self) {
        debug!(target: "burrow::db", base_version = self.base_version, dirty = self.dirty, "Write transaction rolled back");
    }

    fn working_root(&mut self) -> &mut Bucket {
        self.dirty = true;
        Arc::make_mut(&mut self.root)
    }
}

impl std::fmt::Debug for WriteTransaction<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteTransaction")
            .field("base_version", &self.base_version)
            .field("dirty", &self.dirty)
            .finish()
    }
}
