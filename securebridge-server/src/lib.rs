//! HTTP boundary for SecureBridge.
//!
//! Exposes the public key, submission and search over JSON. All request
//! bodies are handled on blocking worker threads since RSA decryption and
//! the DuckDB backend are CPU-bound or blocking.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
