//! File durability mode
//!
//! Every commit rewrites the store file with a full image using
//! write-fsync-rename, so a crash leaves either the old or the new image,
//! never a torn one.

use std::path::{Path, PathBuf};

use tracing::debug;

use burrow_core::StoreResult;

use super::Durability;
use crate::bucket::Bucket;
use crate::format::write_image;

/// File durability - full image per commit
#[derive(Debug, Clone)]
pub struct FileDurability {
    path: PathBuf,
}

impl FileDurability {
    /// Persist images to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Durability for FileDurability {
    fn persist(&self, root: &Bucket, commit_version: u64) -> StoreResult<()> {
        write_image(&self.path, root, commit_version)?;
        debug!(target: "burrow::db", path = ?self.path, version = commit_version, "Image written");
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        true
    }

    fn mode_name(&self) -> &'static str {
        "File"
    }
}
