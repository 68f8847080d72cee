//! Detached signatures with a creation time
//!
//! A [`Signature`] binds a raw Ed25519 signature to the unix time it
//! was produced. Verification happens against a keyring at a caller
//! supplied time, so future-dated signatures can be rejected.

use crate::armor;
use crate::error::CryptoError;

/// Size of a raw Ed25519 signature in bytes
pub const RAW_SIGNATURE_SIZE: usize = 64;
/// Size of an encoded signature: raw signature plus big-endian
/// creation time
pub const SIGNATURE_SIZE: usize = RAW_SIGNATURE_SIZE + 8;

/// A detached signature over arbitrary bytes
///
/// # Wire Format
///
/// ```text
/// [ ed25519 signature: 64 bytes ][ creation time (unix s, i64 BE): 8 bytes ]
/// ```
///
/// Armored with the `COFFER SIGNATURE` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    signature: ed25519_dalek::Signature,
    created: i64,
}

impl Signature {
    pub(crate) fn new(signature: ed25519_dalek::Signature, created: i64) -> Self {
        Self { signature, created }
    }

    /// Unix time at which the signature was produced.
    pub fn created(&self) -> i64 {
        self.created
    }

    pub(crate) fn raw(&self) -> &ed25519_dalek::Signature {
        &self.signature
    }

    /// Encode as raw bytes.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_SIZE] {
        let mut out = [0u8; SIGNATURE_SIZE];
        out[..RAW_SIGNATURE_SIZE].copy_from_slice(&self.signature.to_bytes());
        out[RAW_SIGNATURE_SIZE..].copy_from_slice(&self.created.to_be_bytes());
        out
    }

    /// Decode from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly
    /// [`SIGNATURE_SIZE`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != SIGNATURE_SIZE {
            return Err(CryptoError::Malformed(format!(
                "invalid signature size, expected {}, got {}",
                SIGNATURE_SIZE,
                bytes.len()
            )));
        }

        let mut sig_bytes = [0u8; RAW_SIGNATURE_SIZE];
        sig_bytes.copy_from_slice(&bytes[..RAW_SIGNATURE_SIZE]);
        let signature = ed25519_dalek::Signature::from_bytes(&sig_bytes);

        let mut time_bytes = [0u8; 8];
        time_bytes.copy_from_slice(&bytes[RAW_SIGNATURE_SIZE..]);
        let created = i64::from_be_bytes(time_bytes);

        Ok(Self { signature, created })
    }

    /// Encode as an armored text block.
    pub fn to_armored(&self) -> String {
        armor::enarmor(armor::SIGNATURE_TAG, &self.to_bytes())
    }

    /// Parse from an armored text block.
    pub fn from_armored(armored: &str) -> Result<Self, CryptoError> {
        let bytes = armor::dearmor(armor::SIGNATURE_TAG, armored)?;
        Self::from_bytes(&bytes)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::keys::SecretKey;

    #[test]
    fn test_signature_bytes_roundtrip() {
        let key = SecretKey::generate();
        let sig = Signature::new(key.sign(b"payload"), 1_700_000_000);

        let bytes = sig.to_bytes();
        let recovered = Signature::from_bytes(&bytes).unwrap();

        assert_eq!(sig, recovered);
        assert_eq!(recovered.created(), 1_700_000_000);
    }

    #[test]
    fn test_signature_armor_roundtrip() {
        let key = SecretKey::generate();
        let sig = Signature::new(key.sign(b"payload"), 1_700_000_000);

        let armored = sig.to_armored();
        assert!(armored.contains("COFFER SIGNATURE"));

        let recovered = Signature::from_armored(&armored).unwrap();
        assert_eq!(sig, recovered);
    }

    #[test]
    fn test_signature_truncated() {
        let key = SecretKey::generate();
        let sig = Signature::new(key.sign(b"payload"), 0);
        let bytes = sig.to_bytes();

        assert!(matches!(
            Signature::from_bytes(&bytes[..SIGNATURE_SIZE - 1]),
            Err(CryptoError::Malformed(_))
        ));
    }
}
