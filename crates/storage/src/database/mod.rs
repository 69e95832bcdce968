//! Database: the store handle
//!
//! Owns the committed root and hands out transactions:
//!
//! - `begin_read` / `view`: snapshot reads, any number concurrently
//! - `begin_write` / `update`: serialized writes, one at a time
//!
//! # Example
//!
//! ```
//! use burrow_core::StoreError;
//! use burrow_storage::Database;
//!
//! let db = Database::ephemeral();
//! db.update(|tx| {
//!     let users = tx.create_bucket(b"users")?;
//!     users.put(b"alice", b"admin".to_vec())?;
//!     Ok::<_, StoreError>(())
//! })?;
//!
//! let role = db.view(|tx| {
//!     Ok::<_, StoreError>(tx.bucket(b"users").and_then(|b| b.get(b"alice")).map(<[u8]>::to_vec))
//! })?;
//! assert_eq!(role, Some(b"admin".to_vec()));
//! # Ok::<(), StoreError>(())
//! ```

mod options;

pub use options::{lock_path, OpenOptions};

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, warn};

use burrow_core::{StoreError, StoreResult};

use crate::bucket::Bucket;
use crate::durability::{Durability, FileDurability, InMemoryDurability};
use crate::format::StoreImage;
use crate::transaction::{ReadTransaction, WriteTransaction};

/// Root and version as last published by a commit
#[derive(Debug)]
struct Committed {
    root: Arc<Bucket>,
    version: u64,
}

/// Embedded bucket store
///
/// # Thread Safety
///
/// `Database` is `Send + Sync`. Readers never block each other or the writer
/// except for the instant a commit publishes its root. Writers queue on the
/// writer lock.
#[derive(Debug)]
pub struct Database {
    committed: RwLock<Committed>,
    writer: Mutex<()>,
    durability: Box<dyn Durability>,
    read_only: bool,
    path: Option<PathBuf>,
    /// Held for the lifetime of the handle; dropping it releases the lock
    _lock: Option<File>,
}

impl Database {
    /// Open (or create) a store file read-write
    ///
    /// # Errors
    ///
    /// See [`OpenOptions::open`].
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        OpenOptions::new().open(path)
    }

    /// Open an existing store file read-only
    pub fn open_read_only(path: impl AsRef<Path>) -> StoreResult<Self> {
        OpenOptions::new().read_only(true).open(path)
    }

    /// Create a store that lives only in memory
    pub fn ephemeral() -> Self {
        Self {
            committed: RwLock::new(Committed {
                root: Arc::new(Bucket::new()),
                version: 0,
            }),
            writer: Mutex::new(()),
            durability: Box::new(InMemoryDurability::new()),
            read_only: false,
            path: None,
            _lock: None,
        }
    }

    pub(crate) fn from_file(path: PathBuf, image: StoreImage, lock: File, read_only: bool) -> Self {
        Self {
            committed: RwLock::new(Committed {
                root: Arc::new(image.root),
                version: image.version,
            }),
            writer: Mutex::new(()),
            durability: Box::new(FileDurability::new(path.clone())),
            read_only,
            path: Some(path),
            _lock: Some(lock),
        }
    }

    /// Store file path, `None` for ephemeral stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether write transactions are refused
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Whether commits survive a restart
    pub fn is_persistent(&self) -> bool {
        self.durability.is_persistent()
    }

    /// Latest committed version
    pub fn version(&self) -> u64 {
        self.committed.read().version
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Start a snapshot read at the latest committed version
    pub fn begin_read(&self) -> ReadTransaction {
        let committed = self.committed.read();
        ReadTransaction::new(Arc::clone(&committed.root), committed.version)
    }

    /// Start a write transaction, waiting for any writer in flight
    ///
    /// # Errors
    ///
    /// `ReadOnly` if the store was opened read-only.
    pub fn begin_write(&self) -> StoreResult<WriteTransaction<'_>> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        let writer = self.writer.lock();
        let (root, version) = {
            let committed = self.committed.read();
            (Arc::clone(&committed.root), committed.version)
        };
        Ok(WriteTransaction::new(self, writer, root, version))
    }

    /// Run `f` inside one snapshot read
    pub fn view<T, E>(&self, f: impl FnOnce(&ReadTransaction) -> Result<T, E>) -> Result<T, E> {
        let tx = self.begin_read();
        f(&tx)
    }

    /// Run `f` inside one write transaction
    ///
    /// Commits if `f` returns `Ok`, rolls back if it returns `Err`.
    pub fn update<T, E>(
        &self,
        f: impl FnOnce(&mut WriteTransaction<'_>) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut tx = self.begin_write()?;
        match f(&mut tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(e) => {
                tx.rollback();
                Err(e)
            }
        }
    }

    /// Persist and publish a write transaction's root
    ///
    /// Called with the writer lock held.
    pub(crate) fn publish(&self, root: Arc<Bucket>, base_version: u64) -> StoreResult<u64> {
        let version = base_version + 1;
        if let Err(e) = self.durability.persist(&root, version) {
            warn!(
                target: "burrow::db",
                mode = self.durability.mode_name(),
                version,
                error = %e,
                "Commit failed to persist; published state unchanged"
            );
            return Err(e);
        }

        let mut committed = self.committed.write();
        committed.root = root;
        committed.version = version;
        debug!(target: "burrow::db", version, "Commit published");
        Ok(version)
    }
}
