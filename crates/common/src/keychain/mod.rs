//! The client-side trust layer
//!
//! Every node in a volume owns a key whose private half is locked by a
//! passphrase, and that passphrase is encrypted with the parent node's
//! key. Possessing the share's unlock material is therefore the only way
//! to derive keys for anything beneath it. This module walks that chain:
//!
//! 1. The member's address keyring decrypts the share passphrase, its
//!    detached signature is checked, and the share key unlocks
//!    ([`resolve_share_keyring`]).
//! 2. The share keyring plays parent for the root link; every other link
//!    repeats the same hop with its parent's node keyring
//!    ([`resolve_link_keyring`]).
//! 3. A folder's node keyring opens its hash key
//!    ([`resolve_hash_key`]); a file's node keyring unwraps and verifies
//!    the content session key ([`resolve_session_key`]).
//! 4. During upload, the content session key pairs with a server-issued
//!    verification code to produce per-block possession tokens
//!    ([`BlockVerifier`]).
//!
//! The writing direction mirrors the reading one: [`generate_node_keys`],
//! [`generate_hash_key`], and [`generate_content_key`] produce the
//! armored material the creation requests carry.
//!
//! # Failure Policy
//!
//! One missed signature check breaks the trust model, so every error
//! keeps its kind: a decryption failure ("cannot decrypt") is never
//! interchangeable with a signature failure ("decrypted but not
//! trustworthy"). The single sanctioned recovery is the legacy signer
//! fallback in [`resolve_hash_key`], and it triggers only on a signature
//! verification failure.

use crypto::CryptoError;

mod create;
mod resolve;
mod verifier;

pub use create::{
    encrypt_link_name, generate_content_key, generate_hash_key, generate_node_keys,
    ContentKeyMaterial, NodeKeyMaterial,
};
pub use resolve::{
    decrypt_link_name, resolve_hash_key, resolve_link_keyring, resolve_node_keyring,
    resolve_session_key, resolve_share_keyring,
};
pub use verifier::BlockVerifier;

/// Errors produced while walking the key hierarchy.
///
/// The kinds are load-bearing: callers branch on them (legacy fallback,
/// conflict handling), so an operation never reports a trust failure as
/// a mechanical one or vice versa.
#[derive(Debug, thiserror::Error)]
pub enum KeychainError {
    /// Malformed input: bad armor, bad base64, bad UTF-8, or a structure
    /// that does not parse.
    #[error("decoding error: {0}")]
    Decode(String),
    /// Ciphertext did not decrypt or a key packet did not unwrap under
    /// the expected keyring.
    #[error("decryption error: {0}")]
    Decryption(String),
    /// Plaintext was recovered but a signature over it did not verify.
    #[error("signature verification error: {0}")]
    SignatureVerification(String),
    /// A locked key refused the passphrase.
    #[error("unlock error: {0}")]
    Unlock(String),
    /// The operation does not apply to this link type.
    #[error("not applicable: {0}")]
    NotApplicable(String),
}

impl From<CryptoError> for KeychainError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::Armor(msg) => KeychainError::Decode(msg),
            CryptoError::Malformed(msg) => KeychainError::Decode(msg),
            CryptoError::Decryption(msg) => KeychainError::Decryption(msg),
            CryptoError::SignatureVerification(msg) => KeychainError::SignatureVerification(msg),
            CryptoError::Unlock(msg) => KeychainError::Unlock(msg),
        }
    }
}
