//! Process-wide key material and the manager that owns it.

use crate::error::{CryptoError, CryptoResult};
use crate::{INGRESS_KEY_SIZE, NONCE_SIZE};
use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use rand::RngCore;
use rand::rngs::OsRng;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::{DecodePrivateKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use std::fmt;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// Modulus size used when generating a fresh keypair.
pub const RSA_KEY_BITS: usize = 2048;

/// Smallest RSA modulus accepted when loading key material.
pub const MIN_RSA_BITS: usize = 2048;

/// AES-256 storage key length in bytes.
pub const STORAGE_KEY_SIZE: usize = 32;

/// Length of a freshly generated HMAC index secret; also the minimum accepted.
pub const INDEX_SECRET_SIZE: usize = 32;

/// Raw key material: RSA keypair, storage key and blind-index secret.
///
/// Built once at startup and handed to [`KeyManager::new`], which takes
/// exclusive ownership. Secret bytes are zeroized on drop (the RSA key
/// zeroizes itself).
pub struct KeyMaterial {
    private_key: RsaPrivateKey,
    storage_key: Zeroizing<[u8; STORAGE_KEY_SIZE]>,
    index_secret: Zeroizing<Vec<u8>>,
}

/// Text encoding of [`KeyMaterial`] suitable for environment variables.
///
/// The private key is PKCS#8 PEM; the two symmetric secrets are standard
/// base64.
pub struct EncodedKeyMaterial {
    pub private_key_pem: Zeroizing<String>,
    pub storage_key: Zeroizing<String>,
    pub index_secret: Zeroizing<String>,
}

impl KeyMaterial {
    /// Validates and bundles already-decoded key material.
    pub fn new(
        private_key: RsaPrivateKey,
        storage_key: &[u8],
        index_secret: &[u8],
    ) -> CryptoResult<Self> {
        let bits = private_key.size() * 8;
        if bits < MIN_RSA_BITS {
            return Err(CryptoError::KeyMaterial(format!(
                "RSA modulus is {bits} bits, at least {MIN_RSA_BITS} required"
            )));
        }

        if storage_key.len() != STORAGE_KEY_SIZE {
            return Err(CryptoError::KeyMaterial(format!(
                "storage key must be {STORAGE_KEY_SIZE} bytes, got {}",
                storage_key.len()
            )));
        }

        if index_secret.len() < INDEX_SECRET_SIZE {
            return Err(CryptoError::KeyMaterial(format!(
                "index secret must be at least {INDEX_SECRET_SIZE} bytes, got {}",
                index_secret.len()
            )));
        }

        let mut key = Zeroizing::new([0u8; STORAGE_KEY_SIZE]);
        key.copy_from_slice(storage_key);

        Ok(Self {
            private_key,
            storage_key: key,
            index_secret: Zeroizing::new(index_secret.to_vec()),
        })
    }

    /// Generates a fresh RSA-2048 keypair plus random storage and index
    /// secrets from the OS CSPRNG.
    pub fn generate() -> CryptoResult<Self> {
        let private_key = RsaPrivateKey::new(&mut OsRng, RSA_KEY_BITS)
            .map_err(|e| CryptoError::KeyMaterial(format!("RSA key generation failed: {e}")))?;

        let mut storage_key = Zeroizing::new([0u8; STORAGE_KEY_SIZE]);
        OsRng.fill_bytes(&mut storage_key[..]);

        let mut index_secret = Zeroizing::new(vec![0u8; INDEX_SECRET_SIZE]);
        OsRng.fill_bytes(index_secret.as_mut_slice());

        Ok(Self {
            private_key,
            storage_key,
            index_secret,
        })
    }

    /// Decodes key material from its text form.
    ///
    /// The private key may be PKCS#8 (`BEGIN PRIVATE KEY`) or PKCS#1
    /// (`BEGIN RSA PRIVATE KEY`). Error messages name the offending field
    /// but never echo its contents.
    pub fn from_encoded(
        private_key_pem: &str,
        storage_key_b64: &str,
        index_secret_b64: &str,
    ) -> CryptoResult<Self> {
        let pem = private_key_pem.trim();
        let private_key = RsaPrivateKey::from_pkcs8_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
            .map_err(|_| {
                CryptoError::KeyMaterial("private key is not a PKCS#8 or PKCS#1 PEM".into())
            })?;

        let storage_key = decode_secret("storage key", storage_key_b64)?;
        let index_secret = decode_secret("index secret", index_secret_b64)?;

        Self::new(private_key, &storage_key, &index_secret)
    }

    /// Encodes the material for export (key generation tooling only).
    pub fn to_encoded(&self) -> CryptoResult<EncodedKeyMaterial> {
        let private_key_pem = self
            .private_key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| CryptoError::KeyMaterial(format!("PEM encoding failed: {e}")))?;

        Ok(EncodedKeyMaterial {
            private_key_pem,
            storage_key: Zeroizing::new(STANDARD.encode(&self.storage_key[..])),
            index_secret: Zeroizing::new(STANDARD.encode(self.index_secret.as_slice())),
        })
    }

    /// Public half of the RSA keypair.
    pub fn public_key(&self) -> RsaPublicKey {
        self.private_key.to_public_key()
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("rsa_bits", &(self.private_key.size() * 8))
            .finish_non_exhaustive()
    }
}

fn decode_secret(field: &str, encoded: &str) -> CryptoResult<Zeroizing<Vec<u8>>> {
    STANDARD
        .decode(encoded.trim())
        .map(Zeroizing::new)
        .map_err(|_| CryptoError::KeyMaterial(format!("{field} is not valid base64")))
}

/// Owner of the process-wide key material.
///
/// Exposes the public key and operations over the secret keys, never the
/// secret keys themselves. Immutable after construction, so it is shared
/// across request workers with a plain `Arc` and no locking.
pub struct KeyManager {
    private_key: RsaPrivateKey,
    public_key_pem: String,
    storage_cipher: Aes256Gcm,
    index_mac: HmacSha256,
}

impl KeyManager {
    pub fn new(material: KeyMaterial) -> CryptoResult<Self> {
        let KeyMaterial {
            private_key,
            storage_key,
            index_secret,
        } = material;

        let public_key_pem = private_key
            .to_public_key()
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| CryptoError::KeyMaterial(format!("public key encoding failed: {e}")))?;

        let storage_cipher = Aes256Gcm::new_from_slice(&storage_key[..])
            .map_err(|_| CryptoError::KeyMaterial("storage key has invalid length".into()))?;

        let index_mac = <HmacSha256 as Mac>::new_from_slice(index_secret.as_slice())
            .map_err(|_| CryptoError::KeyMaterial("index secret has invalid length".into()))?;

        Ok(Self {
            private_key,
            public_key_pem,
            storage_cipher,
            index_mac,
        })
    }

    /// Builds a manager around freshly generated key material.
    pub fn generate() -> CryptoResult<Self> {
        Self::new(KeyMaterial::generate()?)
    }

    /// SubjectPublicKeyInfo PEM for distribution to clients.
    pub fn public_key_pem(&self) -> &str {
        &self.public_key_pem
    }

    pub fn public_key(&self) -> RsaPublicKey {
        self.private_key.to_public_key()
    }

    /// RSA modulus size in bytes; also the exact length of a valid
    /// `encrypted_key`.
    pub fn modulus_size(&self) -> usize {
        self.private_key.size()
    }

    /// Unwraps a client-generated AES key (RSA-OAEP, SHA-256 hash and MGF1,
    /// empty label).
    ///
    /// Every failure, including a successfully unwrapped key of the wrong
    /// length, maps to the same [`CryptoError::Decryption`].
    ///
    /// `rsa` 0.9 is not constant-time (RUSTSEC-2023-0071, Marvin). Blinding
    /// narrows the timing signal but does not remove it; a remote attacker
    /// able to time many submissions precisely may still learn about the
    /// private key. Accepted until a constant-time `rsa` release exists.
    pub(crate) fn unwrap_key(&self, wrapped: &[u8]) -> CryptoResult<Zeroizing<Vec<u8>>> {
        let key = self
            .private_key
            .decrypt_blinded(&mut OsRng, Oaep::new::<Sha256>(), wrapped)
            .map(Zeroizing::new)
            .map_err(|_| CryptoError::Decryption)?;

        if key.len() != INGRESS_KEY_SIZE {
            return Err(CryptoError::Decryption);
        }
        Ok(key)
    }

    /// AES-256-GCM encryption under the storage key, no associated data.
    /// Returns `ciphertext ‖ tag`.
    pub(crate) fn storage_encrypt(
        &self,
        nonce: &[u8; NONCE_SIZE],
        plaintext: &[u8],
    ) -> CryptoResult<Vec<u8>> {
        self.storage_cipher
            .encrypt(Nonce::from_slice(nonce), plaintext)
            .map_err(|_| CryptoError::Encryption)
    }

    /// Inverse of [`Self::storage_encrypt`].
    pub(crate) fn storage_decrypt(
        &self,
        nonce: &[u8; NONCE_SIZE],
        sealed: &[u8],
    ) -> CryptoResult<Vec<u8>> {
        self.storage_cipher
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| CryptoError::Decryption)
    }

    /// HMAC-SHA256 of `data` under the index secret.
    pub(crate) fn blind_digest(&self, data: &[u8]) -> [u8; 32] {
        let mut mac = self.index_mac.clone();
        mac.update(data);
        let tag = mac.finalize().into_bytes();

        let mut digest = [0u8; 32];
        digest.copy_from_slice(&tag);
        digest
    }
}

impl fmt::Debug for KeyManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyManager")
            .field("modulus_size", &self.modulus_size())
            .finish_non_exhaustive()
    }
}
