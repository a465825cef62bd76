//! At-rest encryption under the server storage key.

use crate::error::{CryptoError, CryptoResult};
use crate::identifier::Identifier;
use crate::keys::KeyManager;
use crate::{MIN_SEALED_LEN, NONCE_SIZE};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;
use rand::rngs::OsRng;
use std::sync::Arc;

/// Seals identifiers into randomized storage blobs.
///
/// Every call draws a fresh 12-byte nonce from the OS CSPRNG, so encrypting
/// the same identifier twice yields two different blobs. A nonce must never
/// repeat under the storage key.
#[derive(Clone, Debug)]
pub struct StorageEncryptor {
    keys: Arc<KeyManager>,
}

impl StorageEncryptor {
    pub fn new(keys: Arc<KeyManager>) -> Self {
        Self { keys }
    }

    /// Returns `base64(nonce ‖ ciphertext ‖ tag)`.
    pub fn encrypt(&self, identifier: &Identifier) -> CryptoResult<String> {
        let mut nonce = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce);

        let sealed = self.keys.storage_encrypt(&nonce, identifier.as_bytes())?;

        let mut blob = Vec::with_capacity(NONCE_SIZE + sealed.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&sealed);
        Ok(STANDARD.encode(blob))
    }

    /// Opens a blob produced by [`Self::encrypt`].
    pub fn decrypt(&self, blob: &str) -> CryptoResult<Identifier> {
        let raw = STANDARD.decode(blob).map_err(|_| CryptoError::Format)?;
        if raw.len() < MIN_SEALED_LEN {
            return Err(CryptoError::Format);
        }

        let (nonce_bytes, sealed) = raw.split_at(NONCE_SIZE);
        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(nonce_bytes);

        let plaintext = self.keys.storage_decrypt(&nonce, sealed)?;
        String::from_utf8(plaintext)
            .map(Identifier::from)
            .map_err(|_| CryptoError::Format)
    }
}
