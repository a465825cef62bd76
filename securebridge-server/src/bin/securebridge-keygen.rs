//! Prints a fresh key set as environment variable assignments.
//!
//! Usage: `securebridge-keygen > .env`

use securebridge_crypto::KeyMaterial;

fn main() -> anyhow::Result<()> {
    eprintln!("Generating RSA-2048 keypair, storage key and index secret...");
    let encoded = KeyMaterial::generate()?.to_encoded()?;

    println!(
        "SECUREBRIDGE_KEYS__PRIVATE_KEY_PEM=\"{}\"",
        encoded.private_key_pem.trim_end()
    );
    println!("SECUREBRIDGE_KEYS__STORAGE_KEY={}", encoded.storage_key.as_str());
    println!("SECUREBRIDGE_KEYS__INDEX_SECRET={}", encoded.index_secret.as_str());

    eprintln!("Keep these values secret. Losing them makes stored records unreadable.");
    Ok(())
}
