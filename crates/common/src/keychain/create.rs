//! Writing direction of the key hierarchy
//!
//! Creation requests carry the same armored material the resolvers
//! consume, so each generator here is the exact inverse of one resolver.

use base64::Engine;
use zeroize::Zeroizing;

use crypto::{KeyRing, LockedKey, SecretKey, SessionKey, SessionKeyAlgorithm};

use super::KeychainError;

/// Armored key material for a new node, named after the request fields
/// it fills on folder, file, and share creation.
#[derive(Debug, Clone)]
pub struct NodeKeyMaterial {
    /// The locked node key, armored.
    pub node_key: String,
    /// The node passphrase, encrypted with the parent keyring.
    pub node_passphrase: String,
    /// Detached passphrase signature, made with the signer keyring.
    pub node_passphrase_signature: String,
}

/// Content key material for a new file.
#[derive(Debug, Clone)]
pub struct ContentKeyMaterial {
    /// The session key wrapped to the node key, in base64 encoding.
    pub content_key_packet: String,
    /// Detached signature over the raw session key bytes, made with the
    /// node key.
    pub content_key_packet_signature: String,
}

/// Generate a fresh node key locked by a random passphrase.
///
/// The passphrase is encrypted with `parent` (no embedded signature) and
/// signed detached with `signer`, mirroring what
/// [`resolve_node_keyring`](super::resolve_node_keyring) expects on the
/// way back. The unlocked keyring is returned alongside the material so
/// the caller can keep creating children beneath the new node.
pub fn generate_node_keys(
    parent: &KeyRing,
    signer: &KeyRing,
) -> Result<(NodeKeyMaterial, KeyRing), KeychainError> {
    let mut passphrase = [0u8; 32];
    getrandom::getrandom(&mut passphrase).expect("failed to generate random bytes");
    let passphrase = Zeroizing::new(passphrase);

    let secret = SecretKey::generate();
    let locked = LockedKey::lock(&secret, &passphrase[..])?;

    let message = parent.encrypt(&passphrase[..], None)?;
    let signature = signer.sign_detached(&passphrase[..])?;

    let material = NodeKeyMaterial {
        node_key: locked.to_armored(),
        node_passphrase: message.to_armored(),
        node_passphrase_signature: signature.to_armored(),
    };

    Ok((material, KeyRing::from_secret(secret)))
}

/// Generate a folder's hash key, encrypted and self-signed with the
/// node keyring.
pub fn generate_hash_key(node: &KeyRing) -> Result<String, KeychainError> {
    let mut key = [0u8; 32];
    getrandom::getrandom(&mut key).expect("failed to generate random bytes");
    let key = Zeroizing::new(key);

    let message = node.encrypt(&key[..], Some(node))?;

    Ok(message.to_armored())
}

/// Generate a file's content session key, wrapped to the node keyring
/// and signed detached over the raw key bytes.
pub fn generate_content_key(
    node: &KeyRing,
) -> Result<(ContentKeyMaterial, SessionKey), KeychainError> {
    let session = SessionKey::generate(SessionKeyAlgorithm::ChaCha20Poly1305);

    let packet = node.encrypt_session_key(&session)?;
    let signature = node.sign_detached(session.bytes())?;

    let material = ContentKeyMaterial {
        content_key_packet: base64::engine::general_purpose::STANDARD.encode(packet),
        content_key_packet_signature: signature.to_armored(),
    };

    Ok((material, session))
}

/// Encrypt a link name with the parent node keyring, embedding a
/// signature by `signer`.
pub fn encrypt_link_name(
    name: &str,
    parent: &KeyRing,
    signer: &KeyRing,
) -> Result<String, KeychainError> {
    let message = parent.encrypt(name.as_bytes(), Some(signer))?;

    Ok(message.to_armored())
}
