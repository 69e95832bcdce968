//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's
//! main.rs.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

pub use burrow::{Codec, Database, DecodedValue, EntryKind, Error, Navigator, StoreError};

/// A store file in its own temporary directory
pub struct TestStore {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl TestStore {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("test.db");
        Self { dir, path }
    }

    /// Open read-write
    pub fn open(&self) -> Arc<Database> {
        Arc::new(Database::open(&self.path).expect("open store"))
    }

    /// Open read-only
    pub fn open_read_only(&self) -> Arc<Database> {
        Arc::new(Database::open_read_only(&self.path).expect("open store read-only"))
    }
}

/// Navigator over a fresh in-memory store
pub fn ephemeral_navigator() -> Navigator {
    Navigator::new(Arc::new(Database::ephemeral()))
}

/// Create the bucket chain `names` from the root and move into it
pub fn make_path(nav: &mut Navigator, names: &[&str]) {
    for name in names {
        nav.create_container(*name).expect("create bucket");
        nav.change_directory(*name).expect("cd into bucket");
    }
}

/// Listing rendered as `(name, kind, value)` strings
pub fn listing(nav: &Navigator) -> Vec<(String, EntryKind, Option<String>)> {
    nav.list()
        .expect("list")
        .into_iter()
        .map(|row| (row.display_name(), row.kind, row.display_value()))
        .collect()
}
