//! Submit flow: decrypt, re-encrypt, index, append.

use crate::error::ServiceResult;
use securebridge_crypto::{
    BlindIndexer, IngressDecryptor, KeyManager, StorageEncryptor, SubmissionPayload,
};
use securebridge_storage::RecordStore;
use std::sync::Arc;
use tracing::{info, warn};

/// Stores hybrid-encrypted submissions.
#[derive(Clone)]
pub struct SubmissionProtocol {
    ingress: IngressDecryptor,
    storage: StorageEncryptor,
    indexer: BlindIndexer,
    store: Arc<dyn RecordStore>,
}

impl SubmissionProtocol {
    pub fn new(keys: Arc<KeyManager>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            ingress: IngressDecryptor::new(Arc::clone(&keys)),
            storage: StorageEncryptor::new(Arc::clone(&keys)),
            indexer: BlindIndexer::new(keys),
            store,
        }
    }

    /// Decrypts `payload` and appends one `{blob, index}` record, returning
    /// its id. A payload that fails to decrypt never reaches the store.
    pub fn submit(&self, payload: &SubmissionPayload) -> ServiceResult<u64> {
        let identifier = self.ingress.decrypt(payload).inspect_err(|err| {
            warn!(reason = %err, "rejected submission");
        })?;

        let storage_blob = self.storage.encrypt(&identifier)?;
        let blind_index = self.indexer.compute(identifier.expose());

        let record_id = self.store.append(&storage_blob, &blind_index)?;
        info!(record_id, "stored submission");
        Ok(record_id)
    }
}
