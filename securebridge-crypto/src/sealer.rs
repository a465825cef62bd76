//! Client-side construction of submissions.
//!
//! Produces exactly what the browser bridge library sends: a fresh AES-256
//! key per submission, a random 12-byte nonce prepended to the AES-GCM
//! output, and the AES key wrapped with RSA-OAEP (SHA-256).

use crate::error::{CryptoError, CryptoResult};
use crate::ingress::SubmissionPayload;
use crate::{INGRESS_KEY_SIZE, NONCE_SIZE};
use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;
use rand::rngs::OsRng;
use rsa::pkcs8::DecodePublicKey;
use rsa::{Oaep, RsaPublicKey};
use sha2::Sha256;
use zeroize::Zeroizing;

/// Seals identifiers for a server public key.
#[derive(Clone, Debug)]
pub struct SubmissionSealer {
    public_key: RsaPublicKey,
}

impl SubmissionSealer {
    pub fn new(public_key: RsaPublicKey) -> Self {
        Self { public_key }
    }

    /// Parses the SubjectPublicKeyInfo PEM served by the public-key endpoint.
    pub fn from_public_key_pem(pem: &str) -> CryptoResult<Self> {
        let public_key = RsaPublicKey::from_public_key_pem(pem.trim())
            .map_err(|_| CryptoError::KeyMaterial("public key is not an SPKI PEM".into()))?;
        Ok(Self::new(public_key))
    }

    pub fn seal(&self, identifier: &str) -> CryptoResult<SubmissionPayload> {
        let mut key = Zeroizing::new([0u8; INGRESS_KEY_SIZE]);
        OsRng.fill_bytes(&mut key[..]);

        let mut nonce = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce);

        let cipher = Aes256Gcm::new_from_slice(&key[..]).map_err(|_| CryptoError::Encryption)?;
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), identifier.as_bytes())
            .map_err(|_| CryptoError::Encryption)?;

        let mut data = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        data.extend_from_slice(&nonce);
        data.extend_from_slice(&ciphertext);

        let wrapped = self
            .public_key
            .encrypt(&mut OsRng, Oaep::new::<Sha256>(), &key[..])
            .map_err(|_| CryptoError::Encryption)?;

        Ok(SubmissionPayload {
            encrypted_data: STANDARD.encode(data),
            encrypted_key: STANDARD.encode(wrapped),
        })
    }
}
