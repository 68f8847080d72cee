//! Cryptographic primitives for Coffer
//!
//! This crate is the primitive provider for the client trust layer. It
//! owns every raw cryptographic operation so the layers above deal
//! only in armored carriers and keyrings:
//!
//! - **Identity & signing**: Ed25519 keypairs ([`PublicKey`] / [`SecretKey`])
//! - **Detached signatures**: [`Signature`], dated and armored
//! - **Content encryption**: [`SessionKey`], AEAD packets with a
//!   plaintext-integrity header
//! - **Key wrapping**: ECDH over a Montgomery conversion + AES-KW,
//!   packaged into [`Message`] key packets by [`KeyRing`]
//! - **Key custody**: [`LockedKey`], private keys sealed under a
//!   passphrase-derived key
//!
//! # Trust Model
//!
//! Decryption and verification are separate questions with separate
//! failures. Opening a message proves the right key material was used;
//! only a signature check proves who wrote it. [`CryptoError`] keeps
//! the two apart, and everything above this crate relies on that
//! distinction.

mod armor;
mod error;
mod keyring;
mod keys;
mod locked;
mod message;
mod session;
mod signature;

pub use error::CryptoError;
pub use keyring::{KeyRing, KEY_PACKET_SIZE};
pub use keys::{PublicKey, SecretKey, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE};
pub use locked::LockedKey;
pub use message::Message;
pub use session::{SessionKey, SessionKeyAlgorithm, SESSION_KEY_SIZE};
pub use signature::{Signature, SIGNATURE_SIZE};

/// Current unix time in seconds.
///
/// The time verification operations compare signature dates against.
pub fn unix_time_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_secs() as i64
}
