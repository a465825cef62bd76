//! Server configuration.
//!
//! Loaded from an optional `securebridge.toml` in the working directory,
//! overridden by `SECUREBRIDGE_`-prefixed environment variables. Nested keys
//! use a double underscore, e.g. `SECUREBRIDGE_KEYS__STORAGE_KEY`.

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use securebridge_crypto::{CryptoError, KeyMaterial};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

pub const CONFIG_FILE: &str = "securebridge.toml";
pub const ENV_PREFIX: &str = "SECUREBRIDGE_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Figment(#[from] figment::Error),

    #[error("invalid listen address {0}")]
    InvalidAddress(String),

    #[error(
        "no key material configured; set keys.private_key_pem, keys.storage_key and \
         keys.index_secret, or keys.allow_ephemeral = true for local development"
    )]
    MissingKeys,

    #[error(
        "incomplete key material: keys.private_key_pem, keys.storage_key and keys.index_secret \
         must be set together"
    )]
    IncompleteKeys,

    #[error(transparent)]
    Keys(#[from] CryptoError),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub keys: KeyConfig,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Duckdb,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Database file, required for the `duckdb` backend.
    pub path: Option<PathBuf>,
}

/// Encoded key material. All three secrets come from this one place.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct KeyConfig {
    /// RSA private key, PKCS#8 or PKCS#1 PEM.
    pub private_key_pem: Option<String>,

    /// Base64 AES-256 storage key.
    pub storage_key: Option<String>,

    /// Base64 HMAC secret for the blind index.
    pub index_secret: Option<String>,

    /// Generate throwaway keys when none are configured.
    #[serde(default)]
    pub allow_ephemeral: bool,
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            storage: StorageConfig::default(),
            keys: KeyConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Loads from `securebridge.toml` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    pub fn figment() -> Figment {
        Figment::new()
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        Ok(figment.extract()?)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::InvalidAddress(raw))
    }
}

impl KeyConfig {
    /// Decodes the configured key material.
    ///
    /// With nothing configured, fresh keys are generated only when
    /// `allow_ephemeral` is set; records written under them cannot be read
    /// or searched after a restart.
    pub fn load_key_material(&self) -> Result<KeyMaterial, ConfigError> {
        match (&self.private_key_pem, &self.storage_key, &self.index_secret) {
            (Some(pem), Some(storage_key), Some(index_secret)) => {
                Ok(KeyMaterial::from_encoded(pem, storage_key, index_secret)?)
            }
            (None, None, None) if self.allow_ephemeral => {
                warn!("no key material configured, generating ephemeral keys");
                Ok(KeyMaterial::generate()?)
            }
            (None, None, None) => Err(ConfigError::MissingKeys),
            _ => Err(ConfigError::IncompleteKeys),
        }
    }
}

impl fmt::Debug for KeyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyConfig")
            .field("private_key_pem", &self.private_key_pem.as_ref().map(|_| "<set>"))
            .field("storage_key", &self.storage_key.as_ref().map(|_| "<set>"))
            .field("index_secret", &self.index_secret.as_ref().map(|_| "<set>"))
            .field("allow_ephemeral", &self.allow_ephemeral)
            .finish()
    }
}
