//! Crypto error types.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors produced by the crypto pipeline.
///
/// `Format` and `Decryption` are the two client-attributable kinds. Their
/// messages are fixed strings: RSA unwrap failures and AEAD tag failures both
/// collapse into `Decryption` so a caller cannot tell them apart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("malformed payload")]
    Format,

    #[error("decryption failed")]
    Decryption,

    #[error("encryption failed")]
    Encryption,

    #[error("invalid key material: {0}")]
    KeyMaterial(String),
}
