//! InMemory durability mode
//!
//! Nothing is written anywhere; all data is lost when the process exits.
//! This is the in-process store used by unit and integration tests.

use burrow_core::StoreResult;

use super::Durability;
use crate::bucket::Bucket;

/// InMemory durability - no persistence
#[derive(Debug, Clone, Copy, Default)]
pub struct InMemoryDurability;

impl InMemoryDurability {
    /// Create new InMemory durability mode
    pub fn new() -> Self {
        Self
    }
}

impl Durability for InMemoryDurability {
    fn persist(&self, _root: &Bucket, _commit_version: u64) -> StoreResult<()> {
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        false
    }

    fn mode_name(&self) -> &'static str {
        "InMemory"
    }
}
