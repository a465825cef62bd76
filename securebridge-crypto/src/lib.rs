//! Cryptographic core of SecureBridge.
//!
//! Provides the server side of a hybrid-encryption intake pipeline:
//! - RSA-OAEP (SHA-256) unwrapping of client-generated AES keys
//! - AES-256-GCM decryption of the submitted identifier
//! - AES-256-GCM re-encryption under a server-only storage key
//! - HMAC-SHA256 blind indexing for exact-match search
//!
//! # Architecture
//!
//! All key material lives in a single [`KeyManager`], built once at startup
//! from a [`KeyMaterial`] value and shared by `Arc` afterwards. The manager
//! never hands out raw keys; the three pipeline components
//! ([`IngressDecryptor`], [`StorageEncryptor`], [`BlindIndexer`]) only call
//! operations on it.
//!
//! The storage branch is randomized (fresh nonce per write) while the index
//! branch is deterministic. Two submissions of the same identifier therefore
//! produce unrelated storage blobs but identical blind indexes. This
//! linkability through the index column is an accepted trade-off: it is what
//! makes equality search possible without decrypting stored data.

mod blind_index;
mod error;
mod identifier;
mod ingress;
mod keys;
mod sealer;
mod storage;

pub use blind_index::BlindIndexer;
pub use error::{CryptoError, CryptoResult};
pub use identifier::Identifier;
pub use ingress::{IngressDecryptor, SubmissionPayload};
pub use keys::{
    EncodedKeyMaterial, INDEX_SECRET_SIZE, KeyManager, KeyMaterial, MIN_RSA_BITS, RSA_KEY_BITS,
    STORAGE_KEY_SIZE,
};
pub use sealer::SubmissionSealer;
pub use storage::StorageEncryptor;

/// AES-GCM nonce length in bytes.
pub const NONCE_SIZE: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const TAG_SIZE: usize = 16;

/// Smallest well-formed `nonce ‖ ciphertext ‖ tag` buffer.
pub const MIN_SEALED_LEN: usize = NONCE_SIZE + TAG_SIZE;

/// Length of the symmetric key carried inside `encrypted_key`.
pub const INGRESS_KEY_SIZE: usize = 32;
