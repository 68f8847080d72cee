//! Symmetric session keys and their data packets
//!
//! Every encrypted payload (passphrases, names, hash keys, file
//! blocks) is sealed under a per-item session key. The packet format
//! is: `nonce (12 bytes) || encrypted(hash(32 bytes) || plaintext) || tag (16 bytes)`.
//! The BLAKE3 hash of the plaintext is prepended before encryption, so
//! a successful open also proves the plaintext arrived intact.
//!
//! Two AEAD algorithms are supported; the choice travels with the key
//! (key packets record it) rather than with each data packet.

use std::fmt;

use aes_gcm::Aes256Gcm;
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use zeroize::Zeroize;

use crate::error::CryptoError;

/// Size of an AEAD nonce in bytes
pub const NONCE_SIZE: usize = 12;
/// Size of a session key in bytes (256 bits)
pub const SESSION_KEY_SIZE: usize = 32;
/// Size of a BLAKE3 hash in bytes (256 bits)
pub const BLAKE3_HASH_SIZE: usize = 32;

/// AEAD algorithm a session key is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKeyAlgorithm {
    Aes256Gcm,
    ChaCha20Poly1305,
}

impl SessionKeyAlgorithm {
    /// One-byte code used in key packets.
    pub(crate) fn code(&self) -> u8 {
        match self {
            SessionKeyAlgorithm::Aes256Gcm => 1,
            SessionKeyAlgorithm::ChaCha20Poly1305 => 2,
        }
    }

    pub(crate) fn from_code(code: u8) -> Result<Self, CryptoError> {
        match code {
            1 => Ok(SessionKeyAlgorithm::Aes256Gcm),
            2 => Ok(SessionKeyAlgorithm::ChaCha20Poly1305),
            other => Err(CryptoError::Malformed(format!(
                "unknown session key algorithm code {other}"
            ))),
        }
    }
}

impl fmt::Display for SessionKeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKeyAlgorithm::Aes256Gcm => write!(f, "aes256-gcm"),
            SessionKeyAlgorithm::ChaCha20Poly1305 => write!(f, "chacha20-poly1305"),
        }
    }
}

/// A 256-bit symmetric key bound to an AEAD algorithm
///
/// Zeroized on drop; `Debug` never renders the key bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionKey {
    bytes: [u8; SESSION_KEY_SIZE],
    algorithm: SessionKeyAlgorithm,
}

impl Drop for SessionKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKey")
            .field("bytes", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl SessionKey {
    /// Generate a new random session key using a cryptographically secure RNG
    pub fn generate(algorithm: SessionKeyAlgorithm) -> Self {
        let mut bytes = [0; SESSION_KEY_SIZE];
        getrandom::getrandom(&mut bytes).expect("failed to generate random bytes");
        Self { bytes, algorithm }
    }

    /// Create a session key from a byte slice
    ///
    /// # Errors
    ///
    /// Returns an error if the slice length is not exactly
    /// [`SESSION_KEY_SIZE`] bytes.
    pub fn from_slice(data: &[u8], algorithm: SessionKeyAlgorithm) -> Result<Self, CryptoError> {
        if data.len() != SESSION_KEY_SIZE {
            return Err(CryptoError::Malformed(format!(
                "invalid session key size, expected {}, got {}",
                SESSION_KEY_SIZE,
                data.len()
            )));
        }
        let mut bytes = [0; SESSION_KEY_SIZE];
        bytes.copy_from_slice(data);
        Ok(Self { bytes, algorithm })
    }

    /// Get a reference to the raw key bytes
    pub fn bytes(&self) -> &[u8] {
        self.bytes.as_ref()
    }

    /// The AEAD algorithm this key is bound to
    pub fn algorithm(&self) -> SessionKeyAlgorithm {
        self.algorithm
    }

    /// Encrypt data into a packet
    ///
    /// The output format is: `nonce (12) || encrypted(hash(32) || plaintext) || tag (16)`.
    /// A random nonce is generated for each call.
    pub fn encrypt(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        // Prepend the plaintext hash
        let plaintext_hash = blake3::hash(data);
        let mut data_with_hash = Vec::with_capacity(BLAKE3_HASH_SIZE + data.len());
        data_with_hash.extend_from_slice(plaintext_hash.as_bytes());
        data_with_hash.extend_from_slice(data);

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        getrandom::getrandom(&mut nonce_bytes)
            .map_err(|e| CryptoError::Malformed(format!("failed to generate nonce: {e}")))?;
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .seal(nonce, &data_with_hash)
            .map_err(|_| CryptoError::Decryption("encrypt error".into()))?;

        let mut out = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        out.extend_from_slice(nonce.as_ref());
        out.extend_from_slice(&ciphertext);

        Ok(out)
    }

    /// Decrypt a packet
    ///
    /// Expects `nonce (12) || encrypted(hash(32) || plaintext) || tag (16)`.
    /// Returns only the plaintext; the hash header is verified and
    /// stripped. A success here proves both that this key produced the
    /// packet and that the plaintext is intact.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The packet is too short to contain a nonce
    /// - Authentication fails (wrong key or tampered data)
    /// - The decrypted data is too short for the hash header
    /// - The plaintext hash does not match
    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if data.len() < NONCE_SIZE {
            return Err(CryptoError::Malformed("packet too short for nonce".into()));
        }

        let nonce = Nonce::from_slice(&data[..NONCE_SIZE]);
        let decrypted = self
            .open(nonce, &data[NONCE_SIZE..])
            .map_err(|_| CryptoError::Decryption("decrypt error".into()))?;

        if decrypted.len() < BLAKE3_HASH_SIZE {
            return Err(CryptoError::Decryption(
                "decrypted data too short for hash header".into(),
            ));
        }

        let stored_hash = &decrypted[..BLAKE3_HASH_SIZE];
        let plaintext = &decrypted[BLAKE3_HASH_SIZE..];

        let computed_hash = blake3::hash(plaintext);
        if stored_hash != computed_hash.as_bytes() {
            return Err(CryptoError::Decryption("plaintext hash mismatch".into()));
        }

        Ok(plaintext.to_vec())
    }

    fn seal(&self, nonce: &Nonce, payload: &[u8]) -> Result<Vec<u8>, chacha20poly1305::aead::Error> {
        let key = Key::from_slice(&self.bytes);
        match self.algorithm {
            SessionKeyAlgorithm::Aes256Gcm => Aes256Gcm::new(key).encrypt(nonce, payload),
            SessionKeyAlgorithm::ChaCha20Poly1305 => {
                ChaCha20Poly1305::new(key).encrypt(nonce, payload)
            }
        }
    }

    fn open(
        &self,
        nonce: &Nonce,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, chacha20poly1305::aead::Error> {
        let key = Key::from_slice(&self.bytes);
        match self.algorithm {
            SessionKeyAlgorithm::Aes256Gcm => Aes256Gcm::new(key).decrypt(nonce, ciphertext),
            SessionKeyAlgorithm::ChaCha20Poly1305 => {
                ChaCha20Poly1305::new(key).decrypt(nonce, ciphertext)
            }
        }
    }
}
