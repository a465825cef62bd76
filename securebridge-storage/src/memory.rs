//! In-memory record store.

use crate::error::StorageResult;
use crate::record::{RecordStore, StorageRecord};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory store. Contents are lost when the process exits.
///
/// Clones share the same underlying records.
#[derive(Clone, Default)]
pub struct MemoryRecordStore {
    records: Arc<RwLock<Vec<StorageRecord>>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record in insertion order.
    pub fn records(&self) -> Vec<StorageRecord> {
        self.read().clone()
    }

    // A panic while holding the lock cannot leave a half-pushed record, so a
    // poisoned lock is safe to keep using.
    fn read(&self) -> RwLockReadGuard<'_, Vec<StorageRecord>> {
        self.records.read().unwrap_or_else(|poisoned| {
            tracing::warn!("MemoryRecordStore recovering from poisoned lock");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<StorageRecord>> {
        self.records.write().unwrap_or_else(|poisoned| {
            tracing::warn!("MemoryRecordStore recovering from poisoned lock");
            poisoned.into_inner()
        })
    }
}

impl RecordStore for MemoryRecordStore {
    fn append(&self, storage_blob: &str, blind_index: &str) -> StorageResult<u64> {
        let mut records = self.write();
        let id = records.last().map_or(1, |last| last.id + 1);
        records.push(StorageRecord {
            id,
            storage_blob: storage_blob.to_string(),
            blind_index: blind_index.to_string(),
        });
        Ok(id)
    }

    fn scan_equal(&self, blind_index: &str) -> StorageResult<Vec<StorageRecord>> {
        Ok(self
            .read()
            .iter()
            .filter(|r| r.blind_index == blind_index)
            .cloned()
            .collect())
    }

    fn len(&self) -> StorageResult<usize> {
        Ok(self.read().len())
    }
}
