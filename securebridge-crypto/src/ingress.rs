//! Ingress decryption of hybrid-encrypted submissions.
//!
//! A submission carries a one-time AES-256 key wrapped with the server's RSA
//! public key, plus the identifier sealed under that AES key:
//!
//! ```text
//! encrypted_key  = base64(RSA-OAEP-SHA256(pub, K))
//! encrypted_data = base64(nonce[12] ‖ AES-256-GCM(K, nonce, identifier) ‖ tag[16])
//! ```

use crate::error::{CryptoError, CryptoResult};
use crate::identifier::Identifier;
use crate::keys::KeyManager;
use crate::{MIN_SEALED_LEN, NONCE_SIZE};
use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Wire form of a client submission. Both fields are standard base64.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    /// `nonce ‖ ciphertext ‖ tag`.
    pub encrypted_data: String,
    /// RSA-OAEP wrapped AES key, exactly one modulus long.
    pub encrypted_key: String,
}

/// Recovers plaintext identifiers from [`SubmissionPayload`]s.
#[derive(Clone, Debug)]
pub struct IngressDecryptor {
    keys: Arc<KeyManager>,
}

impl IngressDecryptor {
    pub fn new(keys: Arc<KeyManager>) -> Self {
        Self { keys }
    }

    /// Decrypts a submission.
    ///
    /// Bad base64, an undersized `encrypted_data` and non-UTF-8 plaintext are
    /// [`CryptoError::Format`]. A key that fails to unwrap and a ciphertext
    /// that fails authentication are both [`CryptoError::Decryption`], with
    /// nothing to tell them apart. The size check runs before any
    /// cryptographic operation.
    pub fn decrypt(&self, payload: &SubmissionPayload) -> CryptoResult<Identifier> {
        let wrapped_key = decode_field(&payload.encrypted_key)?;
        let sealed = decode_field(&payload.encrypted_data)?;

        if sealed.len() < MIN_SEALED_LEN {
            return Err(CryptoError::Format);
        }

        let key = self.keys.unwrap_key(&wrapped_key)?;
        let cipher = Aes256Gcm::new_from_slice(&key[..]).map_err(|_| CryptoError::Decryption)?;

        let (nonce, ciphertext) = sealed.split_at(NONCE_SIZE);
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CryptoError::Decryption)?;

        String::from_utf8(plaintext)
            .map(Identifier::from)
            .map_err(|_| CryptoError::Format)
    }
}

fn decode_field(field: &str) -> CryptoResult<Vec<u8>> {
    STANDARD.decode(field).map_err(|_| CryptoError::Format)
}
