//! Stored record shape and the store contract.

use crate::error::StorageResult;
use serde::{Deserialize, Serialize};

/// One stored identifier.
///
/// `storage_blob` is randomized per write; `blind_index` is a deterministic
/// function of the plaintext. Two records for the same identifier therefore
/// share an index but never a blob.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageRecord {
    pub id: u64,
    pub storage_blob: String,
    pub blind_index: String,
}

/// Append-only keyed storage.
///
/// Implementations must assign ids atomically with the write: every id is
/// unique, later appends get larger ids, and a concurrent scan sees each
/// record either whole or not at all.
pub trait RecordStore: Send + Sync {
    /// Stores a record and returns the id assigned to it.
    fn append(&self, storage_blob: &str, blind_index: &str) -> StorageResult<u64>;

    /// All records whose blind index equals `blind_index`. Order is not
    /// part of the contract.
    fn scan_equal(&self, blind_index: &str) -> StorageResult<Vec<StorageRecord>>;

    /// Number of stored records.
    fn len(&self) -> StorageResult<usize>;

    fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }
}
