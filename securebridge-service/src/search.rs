//! Search flow: index the query, scan for equal indexes.

use crate::error::ServiceResult;
use securebridge_crypto::{BlindIndexer, KeyManager};
use securebridge_storage::RecordStore;
use std::sync::Arc;
use tracing::debug;

/// Exact-match lookup through the blind index. Never decrypts stored blobs.
#[derive(Clone)]
pub struct SearchProtocol {
    indexer: BlindIndexer,
    store: Arc<dyn RecordStore>,
}

impl SearchProtocol {
    pub fn new(keys: Arc<KeyManager>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            indexer: BlindIndexer::new(keys),
            store,
        }
    }

    /// Ids of records holding `identifier`. An empty result is not an error.
    pub fn search(&self, identifier: &str) -> ServiceResult<Vec<u64>> {
        let blind_index = self.indexer.compute(identifier);
        let ids: Vec<u64> = self
            .store
            .scan_equal(&blind_index)?
            .into_iter()
            .map(|record| record.id)
            .collect();

        debug!(matches = ids.len(), "search completed");
        Ok(ids)
    }
}
