//! Service error types.

use securebridge_crypto::CryptoError;
use securebridge_storage::StorageError;
use thiserror::Error;

/// Result type for protocol operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by the submit and search flows.
///
/// Only the first two variants are attributable to the caller. Their
/// messages are fixed so nothing about the failing step leaks out.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("malformed submission")]
    MalformedSubmission,

    #[error("submission could not be decrypted")]
    UndecryptableSubmission,

    #[error("crypto failure: {0}")]
    Crypto(CryptoError),

    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
}

impl From<CryptoError> for ServiceError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::Format => ServiceError::MalformedSubmission,
            CryptoError::Decryption => ServiceError::UndecryptableSubmission,
            other => ServiceError::Crypto(other),
        }
    }
}
