//! Passphrase-derived authenticated encryption for file content.
//!
//! Sensitive files are sealed with AES-256-GCM before they leave the host.
//! The key is derived deterministically from a caller-supplied passphrase via
//! SHA-256, so the same passphrase always re-derives the same key; the
//! security boundary is the secrecy of the passphrase, not the derivation.
//! Each call generates a fresh random nonce, which is prepended to the
//! ciphertext rather than transmitted separately.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// AES-256 key size in bytes.
pub const KEY_LEN: usize = 32;
/// AES-GCM default nonce size in bytes.
pub const NONCE_LEN: usize = 12;
/// AES-GCM authentication tag size in bytes.
pub const TAG_LEN: usize = 16;

/// Cipher operation errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The derived key could not initialize a cipher instance.
    #[error("cipher initialization failed: {0}")]
    CipherInit(String),

    /// Secure randomness was unavailable for nonce generation.
    #[error("secure random source unavailable: {0}")]
    RandomSource(String),

    /// Sealing the plaintext failed.
    #[error("sealing plaintext failed: {0}")]
    Seal(String),

    /// Opening the ciphertext failed (wrong key or tampered data).
    #[error("opening ciphertext failed: {0}")]
    Open(String),

    /// Payload is too short to contain a nonce and authentication tag.
    #[error("payload of {len} bytes is too short to be a sealed payload")]
    TruncatedPayload {
        /// Actual payload length.
        len: usize,
    },
}

/// Derive a 32-byte AES-256 key from a passphrase.
///
/// Deterministic and unsalted: the same passphrase always yields the same
/// key, which is what makes later decryption by re-derivation possible.
#[must_use]
pub fn derive_key(passphrase: &str) -> [u8; KEY_LEN] {
    Sha256::digest(passphrase.as_bytes()).into()
}

/// Encrypt plaintext with a key derived from `passphrase`.
///
/// Returns `nonce || ciphertext+tag`. The nonce is generated fresh from the
/// OS secure random source on every call, never from a counter.
pub fn encrypt(plaintext: &[u8], passphrase: &str) -> Result<Vec<u8>, CryptoError> {
    let key = derive_key(passphrase);
    let cipher =
        Aes256Gcm::new_from_slice(&key).map_err(|e| CryptoError::CipherInit(e.to_string()))?;

    let mut nonce = [0u8; NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| CryptoError::RandomSource(e.to_string()))?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::Seal(e.to_string()))?;

    let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    payload.extend_from_slice(&nonce);
    payload.extend_from_slice(&ciphertext);
    Ok(payload)
}

/// Decrypt a payload produced by [`encrypt`] with the same passphrase.
///
/// Splits the payload at the fixed nonce size and authenticates the
/// remainder; tampered or wrong-passphrase payloads are rejected.
pub fn decrypt(payload: &[u8], passphrase: &str) -> Result<Vec<u8>, CryptoError> {
    if payload.len() < NONCE_LEN + TAG_LEN {
        return Err(CryptoError::TruncatedPayload { len: payload.len() });
    }

    let key = derive_key(passphrase);
    let cipher =
        Aes256Gcm::new_from_slice(&key).map_err(|e| CryptoError::CipherInit(e.to_string()))?;

    let (nonce, ciphertext) = payload.split_at(NONCE_LEN);
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|e| CryptoError::Open(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_key_deterministic() {
        let a = derive_key("correct horse battery staple");
        let b = derive_key("correct horse battery staple");
        assert_eq!(a, b);
        assert_eq!(a.len(), KEY_LEN);
    }

    #[test]
    fn test_derive_key_is_sha256_of_passphrase() {
        let key = derive_key("secret");
        let expected =
            hex::decode("2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b")
                .expect("valid hex");
        assert_eq!(key.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_encrypt_output_length() {
        let plaintext = b"sixteen byte msg";
        let payload = encrypt(plaintext, "secret").unwrap();
        assert_eq!(payload.len(), NONCE_LEN + plaintext.len() + TAG_LEN);
    }

    #[test]
    fn test_encrypt_nonce_freshness() {
        let plaintext = b"same input twice";
        let first = encrypt(plaintext, "secret").unwrap();
        let second = encrypt(plaintext, "secret").unwrap();
        assert_ne!(first, second);

        // Both still open to the same plaintext.
        assert_eq!(decrypt(&first, "secret").unwrap(), plaintext);
        assert_eq!(decrypt(&second, "secret").unwrap(), plaintext);
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let plaintext = b"identity evidence scan, very sensitive";
        let payload = encrypt(plaintext, "kyc-passphrase").unwrap();
        let decrypted = decrypt(&payload, "kyc-passphrase").unwrap();
        assert_eq!(&decrypted, plaintext);
    }

    #[test]
    fn test_wrong_passphrase_fails() {
        let payload = encrypt(b"secret data", "right").unwrap();
        let result = decrypt(&payload, "wrong");
        assert!(matches!(result, Err(CryptoError::Open(_))));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let mut payload = encrypt(b"secret data", "secret").unwrap();
        let last = payload.len() - 1;
        payload[last] ^= 0xFF;
        let result = decrypt(&payload, "secret");
        assert!(matches!(result, Err(CryptoError::Open(_))));
    }

    #[test]
    fn test_truncated_payload_rejected() {
        let result = decrypt(&[0u8; NONCE_LEN + TAG_LEN - 1], "secret");
        assert!(matches!(
            result,
            Err(CryptoError::TruncatedPayload { len }) if len == NONCE_LEN + TAG_LEN - 1
        ));
    }

    #[test]
    fn test_empty_plaintext() {
        let payload = encrypt(b"", "secret").unwrap();
        assert_eq!(payload.len(), NONCE_LEN + TAG_LEN);
        assert!(decrypt(&payload, "secret").unwrap().is_empty());
    }

    #[test]
    fn test_large_plaintext() {
        let plaintext = vec![0xAB; 1_000_000]; // 1 MB
        let payload = encrypt(&plaintext, "secret").unwrap();
        assert_eq!(decrypt(&payload, "secret").unwrap(), plaintext);
    }
}
