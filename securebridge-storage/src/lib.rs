//! Record store layer for SecureBridge.
//!
//! Stores `{id, storage_blob, blind_index}` triples. The crypto pipeline only
//! talks to the [`RecordStore`] trait, so the backend can be swapped without
//! touching key handling.
//!
//! # Backends
//!
//! - [`MemoryRecordStore`]: a locked `Vec`, for tests and throwaway servers
//! - [`DuckDbRecordStore`]: a single DuckDB table with an index on
//!   `blind_index`
//!
//! Both assign ids inside the same critical section that writes the record,
//! so ids are unique and strictly increasing and no reader ever sees a record
//! with only one of its two fields.

mod duckdb_store;
mod error;
mod memory;
mod record;

pub use duckdb_store::DuckDbRecordStore;
pub use error::{StorageError, StorageResult};
pub use memory::MemoryRecordStore;
pub use record::{RecordStore, StorageRecord};
