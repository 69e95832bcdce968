//! Store adapter behavior: persistence, locking, snapshot isolation.

#[path = "../common/mod.rs"]
mod common;

mod locking;
mod snapshot_isolation;
