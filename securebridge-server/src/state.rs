//! Shared application state.

use crate::config::{ServerConfig, StorageBackend};
use anyhow::Context;
use securebridge_crypto::KeyManager;
use securebridge_service::SecureBridge;
use securebridge_storage::{DuckDbRecordStore, MemoryRecordStore, RecordStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub bridge: SecureBridge,
}

impl AppState {
    /// Loads key material and opens the configured store. Runs once at
    /// startup; keys are immutable afterwards.
    pub fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        let material = config.keys.load_key_material()?;
        let keys = Arc::new(KeyManager::new(material)?);

        let store: Arc<dyn RecordStore> = match config.storage.backend {
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory record store - records are lost on restart");
                Arc::new(MemoryRecordStore::new())
            }
            StorageBackend::Duckdb => {
                let path = config
                    .storage
                    .path
                    .as_ref()
                    .context("duckdb storage requires storage.path")?;
                tracing::info!("Opening DuckDB record store at {}", path.display());
                Arc::new(DuckDbRecordStore::open(path)?)
            }
        };

        Ok(Self::from_parts(keys, store))
    }

    pub fn from_parts(keys: Arc<KeyManager>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            bridge: SecureBridge::new(keys, store),
        }
    }
}
