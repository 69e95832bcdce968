//! Open options and process-level locking
//!
//! A store file `data.db` is guarded by an advisory lock on `data.db.lock`:
//! - read-write opens take an exclusive lock
//! - read-only opens take a shared lock
//!
//! Lock acquisition never blocks. If another process holds a conflicting
//! lock the open fails immediately with `StoreError::Locked`.

use std::ffi::OsString;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, info};

use burrow_core::{StoreError, StoreResult};

use super::Database;
use crate::bucket::Bucket;
use crate::format::{read_image, write_image, StoreImage};

/// Options for opening a store file
///
/// # Example
///
/// ```no_run
/// use burrow_storage::OpenOptions;
///
/// let db = OpenOptions::new().read_only(true).open("data.db")?;
/// assert!(db.is_read_only());
/// # Ok::<(), burrow_core::StoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct OpenOptions {
    read_only: bool,
    create_if_missing: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            read_only: false,
            create_if_missing: true,
        }
    }
}

impl OpenOptions {
    /// Read-write, creating the file if it does not exist
    pub fn new() -> Self {
        Self::default()
    }

    /// Open with a shared lock and refuse write transactions
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Create an empty store when the file is missing (ignored when read-only)
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Open the store at `path`
    ///
    /// # Errors
    ///
    /// - `Locked` if another handle holds a conflicting lock
    /// - `Io` if the file is missing and may not be created
    /// - `Corruption` if the file fails validation
    pub fn open(&self, path: impl AsRef<Path>) -> StoreResult<Database> {
        let path = path.as_ref().to_path_buf();
        let lock = acquire_lock(&path, self.read_only)?;

        let image = if path.exists() {
            read_image(&path)?
        } else if self.create_if_missing && !self.read_only {
            let root = Bucket::new();
            write_image(&path, &root, 0)?;
            info!(target: "burrow::db", path = ?path, "Created empty store");
            StoreImage { version: 0, root }
        } else {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("store file '{}' does not exist", path.display()),
            )));
        };

        info!(
            target: "burrow::db",
            path = ?path,
            version = image.version,
            buckets = image.root.len(),
            read_only = self.read_only,
            "Opened store"
        );

        Ok(Database::from_file(path, image, lock, self.read_only))
    }
}

/// Lock file path for a store file (`<path>.lock`)
pub fn lock_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

fn acquire_lock(path: &Path, shared: bool) -> StoreResult<File> {
    let lock_path = lock_path(path);
    let lock_file = std::fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(&lock_path)?;

    let acquired = if shared {
        FileExt::try_lock_shared(&lock_file)
    } else {
        FileExt::try_lock_exclusive(&lock_file)
    };
    acquired.map_err(|e| lock_error(path, e))?;

    debug!(target: "burrow::db", lock = ?lock_path, shared, "Acquired store lock");
    Ok(lock_file)
}

/// Only contention means another handle holds the lock
fn lock_error(path: &Path, err: io::Error) -> StoreError {
    if err.kind() == fs2::lock_contended_error().kind() {
        StoreError::Locked(path.to_path_buf())
    } else {
        StoreError::Io(err)
    }
}
