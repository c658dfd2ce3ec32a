//! CSPRNG salt/IV generation, PBKDF2-HMAC-SHA-256 key derivation, and AES-256-GCM
//! authenticated sealing/opening.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use thiserror::Error;

pub const SALT_LEN: usize = 16;
pub const IV_LEN: usize = 12;
pub const TAG_LEN: usize = 16;
pub const KEY_LEN: usize = 32;

/// Default PBKDF2 iteration count, per the container format's `iterations` field.
pub const DEFAULT_ITERATIONS: u32 = 200_000;

/// The only key-derivation function this version's `kdf_id` byte may name.
pub const KDF_PBKDF2_HMAC_SHA256: u8 = 0x01;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CryptoError {
    #[error("encryption failed")]
    EncryptionFailed,
    #[error("decryption failed — wrong password or corrupted data")]
    AuthFailed,
}

/// Draws a fresh 16-byte salt from the system CSPRNG.
pub fn salt() -> [u8; SALT_LEN] {
    let mut buf = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut buf);
    buf
}

/// Draws `n` fresh random bytes from the system CSPRNG (the codec always requests 12).
pub fn iv(n: usize) -> Vec<u8> {
    let mut buf = vec![0u8; n];
    OsRng.fill_bytes(&mut buf);
    buf
}

/// Derives a 32-byte AES-256 key from a UTF-8 password via PBKDF2-HMAC-SHA-256.
pub fn derive_key(password: &str, salt: &[u8], iterations: u32) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key);
    key
}

/// Seals `plaintext` under AES-256-GCM. Returns `ciphertext || tag` (16 bytes longer
/// than `plaintext`); the IV travels alongside in the container header, not in this output.
pub fn seal(key: &[u8; KEY_LEN], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::EncryptionFailed)?;
    let nonce = Nonce::from_slice(iv);
    cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| CryptoError::EncryptionFailed)
}

/// Opens a blob produced by [`seal`]. Any tampering with ciphertext, tag, key, or IV
/// surfaces uniformly as [`CryptoError::AuthFailed`].
pub fn open(key: &[u8; KEY_LEN], iv: &[u8], sealed: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::AuthFailed)?;
    let nonce = Nonce::from_slice(iv);
    cipher
        .decrypt(nonce, sealed)
        .map_err(|_| CryptoError::AuthFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_open_roundtrip() {
        let key = derive_key("correct horse", &salt(), 1000);
        let nonce = iv(IV_LEN);
        let sealed = seal(&key, &nonce, b"hidden payload").unwrap();
        assert_eq!(sealed.len(), "hidden payload".len() + TAG_LEN);
        let opened = open(&key, &nonce, &sealed).unwrap();
        assert_eq!(opened, b"hidden payload");
    }

    #[test]
    fn wrong_key_fails_auth() {
        let salt1 = salt();
        let key = derive_key("pw", &salt1, 1000);
        let other_key = derive_key("not-pw", &salt1, 1000);
        let nonce = iv(IV_LEN);
        let sealed = seal(&key, &nonce, b"secret").unwrap();
        assert_eq!(open(&other_key, &nonce, &sealed), Err(CryptoError::AuthFailed));
    }

    #[test]
    fn tampered_ciphertext_fails_auth() {
        let key = derive_key("pw", &salt(), 1000);
        let nonce = iv(IV_LEN);
        let mut sealed = seal(&key, &nonce, b"secret").unwrap();
        sealed[0] ^= 0xFF;
        assert_eq!(open(&key, &nonce, &sealed), Err(CryptoError::AuthFailed));
    }
}
