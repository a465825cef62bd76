//! Shared facade over both request flows.

use crate::error::ServiceResult;
use crate::search::SearchProtocol;
use crate::submission::SubmissionProtocol;
use crate::types::{SearchMatches, SubmitReceipt};
use securebridge_crypto::{KeyManager, SubmissionPayload};
use securebridge_storage::RecordStore;
use std::sync::Arc;

/// Everything a request handler needs: the public key, submit and search.
///
/// Cheap to clone; all clones share the same key manager and store.
#[derive(Clone)]
pub struct SecureBridge {
    keys: Arc<KeyManager>,
    store: Arc<dyn RecordStore>,
    submission: SubmissionProtocol,
    search: SearchProtocol,
}

impl SecureBridge {
    pub fn new(keys: Arc<KeyManager>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            submission: SubmissionProtocol::new(Arc::clone(&keys), Arc::clone(&store)),
            search: SearchProtocol::new(Arc::clone(&keys), Arc::clone(&store)),
            keys,
            store,
        }
    }

    pub fn public_key_pem(&self) -> &str {
        self.keys.public_key_pem()
    }

    pub fn submit(&self, payload: &SubmissionPayload) -> ServiceResult<SubmitReceipt> {
        self.submission.submit(payload).map(SubmitReceipt::success)
    }

    pub fn search(&self, identifier: &str) -> ServiceResult<SearchMatches> {
        self.search.search(identifier).map(SearchMatches::new)
    }

    pub fn record_count(&self) -> ServiceResult<usize> {
        Ok(self.store.len()?)
    }
}
