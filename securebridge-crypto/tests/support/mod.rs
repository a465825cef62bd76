//! Shared fixtures for crypto integration tests.

#![allow(dead_code)]

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use securebridge_crypto::{KeyManager, SubmissionPayload, SubmissionSealer};
use std::sync::{Arc, LazyLock};

/// One RSA keypair per test binary; generation dominates test time otherwise.
static KEYS: LazyLock<Arc<KeyManager>> =
    LazyLock::new(|| Arc::new(KeyManager::generate().expect("key generation must succeed")));

/// A second, unrelated key set for wrong-key tests.
static OTHER_KEYS: LazyLock<Arc<KeyManager>> =
    LazyLock::new(|| Arc::new(KeyManager::generate().expect("key generation must succeed")));

pub fn keys() -> Arc<KeyManager> {
    Arc::clone(&KEYS)
}

pub fn other_keys() -> Arc<KeyManager> {
    Arc::clone(&OTHER_KEYS)
}

pub fn seal_for(keys: &KeyManager, identifier: &str) -> SubmissionPayload {
    SubmissionSealer::new(keys.public_key())
        .seal(identifier)
        .expect("sealing must succeed")
}

pub fn decode(field: &str) -> Vec<u8> {
    STANDARD.decode(field).expect("test payload must be valid base64")
}

pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
