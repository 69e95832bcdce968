//! Durability modes
//!
//! The durability layer sits between write-transaction commit and publishing
//! the new root to readers:
//!
//! ```text
//! Commit Flow:
//!   1. Writer lock held since begin_write (serialized writers)
//!   2. Allocate commit version
//!   3. Durability::persist()  <- MODE-SPECIFIC
//!   4. Publish new root to readers
//! ```
//!
//! | Mode | Persistence | Use Case |
//! |------|-------------|----------|
//! | InMemory | none | tests, scratch stores |
//! | File | full image, write-fsync-rename | store files |

mod file;
mod inmemory;

pub use file::FileDurability;
pub use inmemory::InMemoryDurability;

use std::fmt::Debug;

use burrow_core::StoreResult;

use crate::bucket::Bucket;

/// Durability behavior abstraction
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the database is shared across
/// threads even though only one writer persists at a time.
pub trait Durability: Send + Sync + Debug {
    /// Persist the committed root at `commit_version`
    ///
    /// Called with the writer lock held, before readers can observe the new
    /// root. An error aborts the commit and leaves the published state as it
    /// was.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    fn persist(&self, root: &Bucket, commit_version: u64) -> StoreResult<()>;

    /// Check if this mode keeps data across restarts
    fn is_persistent(&self) -> bool;

    /// Human-readable mode name for logging
    fn mode_name(&self) -> &'static str;
}
