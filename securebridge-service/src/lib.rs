//! Request flows for SecureBridge.
//!
//! [`SubmissionProtocol`] turns a hybrid-encrypted submission into one stored
//! record; [`SearchProtocol`] finds records by exact identifier through the
//! blind index. [`SecureBridge`] bundles both behind a single shared handle
//! for the HTTP boundary.

mod bridge;
pub mod error;
mod search;
mod submission;
pub mod types;

pub use bridge::SecureBridge;
pub use error::{ServiceError, ServiceResult};
pub use search::SearchProtocol;
pub use submission::SubmissionProtocol;
pub use types::{PublicKeyResponse, SearchMatches, SearchQuery, SubmitReceipt};
