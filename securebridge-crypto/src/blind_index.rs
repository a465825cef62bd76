//! Deterministic blind index for equality search.

use crate::keys::KeyManager;
use std::sync::Arc;

/// Computes lowercase hex HMAC-SHA256 digests under the index secret.
///
/// Identical inputs always map to the same index, which is what lets a
/// search find stored records without decrypting them. The flip side is
/// that anyone who can read the index column can see which records share
/// an identifier; that exposure is accepted.
#[derive(Clone, Debug)]
pub struct BlindIndexer {
    keys: Arc<KeyManager>,
}

impl BlindIndexer {
    pub fn new(keys: Arc<KeyManager>) -> Self {
        Self { keys }
    }

    /// Index of the UTF-8 bytes of `value`. Always 64 hex characters.
    pub fn compute(&self, value: &str) -> String {
        hex::encode(self.keys.blind_digest(value.as_bytes()))
    }
}
