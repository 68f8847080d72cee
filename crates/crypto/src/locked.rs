//! Passphrase-locked private keys
//!
//! Private keys never travel or rest unprotected: they are sealed
//! under a key derived from a passphrase (HKDF-SHA256 with a random
//! salt; passphrases here are high-entropy generated strings, not
//! human-chosen passwords) and carried as an armored block.
//!
//! # Wire Format
//!
//! ```text
//! [ public key: 32 ][ salt: 16 ][ nonce: 12 ][ sealed seed + tag: 48 ]
//! ```
//!
//! Armored with the `COFFER ENCRYPTED PRIVATE KEY` tag.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::armor;
use crate::error::CryptoError;
use crate::keys::{PublicKey, SecretKey, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE};
use crate::session::NONCE_SIZE;

/// Size of the KDF salt in bytes
pub const SALT_SIZE: usize = 16;
/// Size of the AEAD authentication tag in bytes
const TAG_SIZE: usize = 16;
/// Total size of an encoded locked key in bytes
pub const LOCKED_KEY_SIZE: usize =
    PUBLIC_KEY_SIZE + SALT_SIZE + NONCE_SIZE + PRIVATE_KEY_SIZE + TAG_SIZE;

/// Domain separation string for the key-encryption-key derivation.
const KEK_INFO: &[u8] = b"coffer locked key v1";

/// A private key sealed under a passphrase
///
/// The public half stays readable so the key's identity is known
/// without unlocking. Unlocking re-derives the private half and checks
/// it against that identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedKey {
    public: PublicKey,
    salt: [u8; SALT_SIZE],
    // nonce || AEAD(seed)
    sealed: Vec<u8>,
}

impl LockedKey {
    /// Seal a secret key under a passphrase.
    pub fn lock(secret: &SecretKey, passphrase: &[u8]) -> Result<Self, CryptoError> {
        let mut salt = [0u8; SALT_SIZE];
        getrandom::getrandom(&mut salt).expect("failed to generate random bytes");
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        getrandom::getrandom(&mut nonce_bytes).expect("failed to generate random bytes");

        let mut kek = derive_kek(passphrase, &salt)?;
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&kek));

        let mut seed = secret.to_bytes();
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), seed.as_ref())
            .map_err(|_| CryptoError::Decryption("failed to seal private key".into()));
        seed.zeroize();
        kek.zeroize();
        let ciphertext = ciphertext?;

        let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);

        Ok(Self {
            public: secret.public(),
            salt,
            sealed,
        })
    }

    /// Recover the secret key with the passphrase it was locked under.
    ///
    /// # Errors
    ///
    /// Returns an `Unlock` error if the passphrase is wrong or the
    /// sealed material was tampered with.
    pub fn unlock(&self, passphrase: &[u8]) -> Result<SecretKey, CryptoError> {
        let mut kek = derive_kek(passphrase, &self.salt)?;
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&kek));
        kek.zeroize();

        let nonce = Nonce::from_slice(&self.sealed[..NONCE_SIZE]);
        let mut seed = cipher
            .decrypt(nonce, &self.sealed[NONCE_SIZE..])
            .map_err(|_| CryptoError::Unlock("invalid passphrase or corrupted key".into()))?;

        if seed.len() != PRIVATE_KEY_SIZE {
            seed.zeroize();
            return Err(CryptoError::Malformed(format!(
                "sealed seed has wrong size, expected {}, got {}",
                PRIVATE_KEY_SIZE,
                seed.len()
            )));
        }

        let mut seed_bytes = [0u8; PRIVATE_KEY_SIZE];
        seed_bytes.copy_from_slice(&seed);
        seed.zeroize();
        let secret = SecretKey::from(seed_bytes);
        seed_bytes.zeroize();

        // The armored block names an identity; the seed must produce it.
        if secret.public() != self.public {
            return Err(CryptoError::Unlock(
                "unlocked key does not match its public half".into(),
            ));
        }

        Ok(secret)
    }

    /// Public half of the locked key.
    pub fn public(&self) -> PublicKey {
        self.public
    }

    /// Encode as raw bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(LOCKED_KEY_SIZE);
        out.extend_from_slice(&self.public.to_bytes());
        out.extend_from_slice(&self.salt);
        out.extend_from_slice(&self.sealed);
        out
    }

    /// Decode from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != LOCKED_KEY_SIZE {
            return Err(CryptoError::Malformed(format!(
                "invalid locked key size, expected {}, got {}",
                LOCKED_KEY_SIZE,
                bytes.len()
            )));
        }

        let public = PublicKey::try_from(&bytes[..PUBLIC_KEY_SIZE])?;
        let mut salt = [0u8; SALT_SIZE];
        salt.copy_from_slice(&bytes[PUBLIC_KEY_SIZE..PUBLIC_KEY_SIZE + SALT_SIZE]);
        let sealed = bytes[PUBLIC_KEY_SIZE + SALT_SIZE..].to_vec();

        Ok(Self {
            public,
            salt,
            sealed,
        })
    }

    /// Encode as an armored text block.
    pub fn to_armored(&self) -> String {
        armor::enarmor(armor::LOCKED_KEY_TAG, &self.to_bytes())
    }

    /// Parse from an armored text block.
    pub fn from_armored(armored: &str) -> Result<Self, CryptoError> {
        let bytes = armor::dearmor(armor::LOCKED_KEY_TAG, armored)?;
        Self::from_bytes(&bytes)
    }
}

/// Derive the key-encryption-key from a passphrase and salt.
fn derive_kek(passphrase: &[u8], salt: &[u8; SALT_SIZE]) -> Result<[u8; 32], CryptoError> {
    let hkdf = Hkdf::<Sha256>::new(Some(salt), passphrase);
    let mut kek = [0u8; 32];
    hkdf.expand(KEK_INFO, &mut kek)
        .map_err(|_| CryptoError::Malformed("KEK derivation failed".into()))?;
    Ok(kek)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lock_unlock_roundtrip() {
        let secret = SecretKey::generate();
        let locked = LockedKey::lock(&secret, b"some passphrase bytes").unwrap();

        assert_eq!(locked.public(), secret.public());

        let unlocked = locked.unlock(b"some passphrase bytes").unwrap();
        assert_eq!(unlocked.to_bytes(), secret.to_bytes());
    }

    #[test]
    fn test_wrong_passphrase() {
        let secret = SecretKey::generate();
        let locked = LockedKey::lock(&secret, b"right passphrase").unwrap();

        let result = locked.unlock(b"wrong passphrase");
        assert!(matches!(result, Err(CryptoError::Unlock(_))));
    }

    #[test]
    fn test_armor_roundtrip() {
        let secret = SecretKey::generate();
        let locked = LockedKey::lock(&secret, b"passphrase").unwrap();

        let armored = locked.to_armored();
        assert!(armored.contains("COFFER ENCRYPTED PRIVATE KEY"));

        let recovered = LockedKey::from_armored(&armored).unwrap();
        assert_eq!(locked, recovered);

        let unlocked = recovered.unlock(b"passphrase").unwrap();
        assert_eq!(unlocked.to_bytes(), secret.to_bytes());
    }

    #[test]
    fn test_tampered_seal_fails() {
        let secret = SecretKey::generate();
        let mut locked = LockedKey::lock(&secret, b"passphrase").unwrap();

        let last = locked.sealed.len() - 1;
        locked.sealed[last] ^= 0xFF;

        assert!(matches!(
            locked.unlock(b"passphrase"),
            Err(CryptoError::Unlock(_))
        ));
    }

    #[test]
    fn test_truncated_bytes() {
        let secret = SecretKey::generate();
        let locked = LockedKey::lock(&secret, b"passphrase").unwrap();
        let bytes = locked.to_bytes();

        assert!(matches!(
            LockedKey::from_bytes(&bytes[..bytes.len() - 1]),
            Err(CryptoError::Malformed(_))
        ));
    }
}
