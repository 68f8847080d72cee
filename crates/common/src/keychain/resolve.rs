//! Reading direction of the key hierarchy
//!
//! Each resolver is a pure function of its inputs: DTOs flow in
//! parent-to-child order and every call yields the keyring or key
//! material the next hop consumes. Nothing here retains unlocked
//! material beyond the call that produced it.

use base64::Engine;
use zeroize::Zeroizing;

use crypto::{CryptoError, KeyRing, LockedKey, Message, SessionKey, Signature};

use crate::drive::{Link, LinkType, Share};

use super::KeychainError;

/// Resolve one hop of the node key chain.
///
/// The same procedure covers the share-to-root-link hop and every
/// link-to-child hop; only the keyring playing parent differs.
///
/// 1. `passphrase` decrypts under `parent`, with no embedded-signature
///    check at this step.
/// 2. `passphrase_signature` must verify as a detached signature over
///    the plaintext passphrase under `signer`. Failure is fatal: the
///    passphrase could have been substituted by a non-owner.
/// 3. `locked_key` parses and unlocks with the passphrase bytes.
///
/// A failure in step 1 reports [`KeychainError::Decryption`] and a
/// failure in step 2 reports [`KeychainError::SignatureVerification`],
/// so callers can tell "cannot decrypt" from "decrypted but not
/// trustworthy".
pub fn resolve_node_keyring(
    parent: &KeyRing,
    passphrase: &str,
    passphrase_signature: &str,
    locked_key: &str,
    signer: &KeyRing,
) -> Result<KeyRing, KeychainError> {
    let message = Message::from_armored(passphrase)?;
    let plain = Zeroizing::new(parent.decrypt(&message, None, crypto::unix_time_now())?);

    let signature = Signature::from_armored(passphrase_signature)?;
    signer.verify_detached(&plain, &signature, crypto::unix_time_now())?;

    let locked = LockedKey::from_armored(locked_key)?;
    let secret = locked.unlock(&plain)?;

    Ok(KeyRing::from_secret(secret))
}

/// Unlock a share's keyring with the member's address keyring.
///
/// The address keyring both decrypts the share passphrase and checks its
/// detached signature. The result roots the node key chain for the whole
/// tree beneath the share.
pub fn resolve_share_keyring(share: &Share, address: &KeyRing) -> Result<KeyRing, KeychainError> {
    tracing::debug!("resolving keyring for share {}", share.metadata.share_id);

    resolve_node_keyring(
        address,
        &share.passphrase,
        &share.passphrase_signature,
        &share.key,
        address,
    )
}

/// Unlock a link's node keyring with its parent's keyring.
///
/// `parent` is the share keyring for the root link and the parent
/// folder's node keyring everywhere else. `signer` is the address
/// keyring of whoever created the link.
pub fn resolve_link_keyring(
    link: &Link,
    parent: &KeyRing,
    signer: &KeyRing,
) -> Result<KeyRing, KeychainError> {
    tracing::debug!("resolving node keyring for link {}", link.link_id);

    resolve_node_keyring(
        parent,
        &link.node_passphrase,
        &link.node_passphrase_signature,
        &link.node_key,
        signer,
    )
}

/// Decrypt a link's name with the parent node keyring, verifying the
/// embedded signature under `signer`.
pub fn decrypt_link_name(
    link: &Link,
    parent: &KeyRing,
    signer: &KeyRing,
) -> Result<String, KeychainError> {
    let message = Message::from_armored(&link.name)?;
    let plain = parent.decrypt(&message, Some(signer), crypto::unix_time_now())?;

    String::from_utf8(plain)
        .map_err(|err| KeychainError::Decode(format!("link name is not valid utf-8: {err}")))
}

/// Recover a folder's raw hash key bytes with its node keyring.
///
/// The hash key is self-signed with the node key, but some legacy
/// clients signed it with the share address key instead. When the
/// embedded check fails with a signature verification error and a
/// `fallback_signer` was supplied, verification retries under that
/// keyring. Decryption failures and a missing fallback are fatal.
///
/// The returned bytes feed name hashing, which happens elsewhere.
pub fn resolve_hash_key(
    link: &Link,
    node: &KeyRing,
    fallback_signer: Option<&KeyRing>,
) -> Result<Vec<u8>, KeychainError> {
    if link.link_type != LinkType::Folder {
        return Err(KeychainError::NotApplicable("link is not a folder".into()));
    }

    let properties = link
        .folder_properties
        .as_ref()
        .ok_or_else(|| KeychainError::Decode("folder link carries no folder properties".into()))?;

    let message = Message::from_armored(&properties.node_hash_key)?;

    match node.decrypt(&message, Some(node), crypto::unix_time_now()) {
        Ok(key) => Ok(key),
        Err(CryptoError::SignatureVerification(reason)) => {
            let Some(address) = fallback_signer else {
                return Err(KeychainError::SignatureVerification(reason));
            };

            tracing::warn!(
                "hash key for link {} is not signed with its node key, retrying with the address key",
                link.link_id
            );

            Ok(node.decrypt(&message, Some(address), crypto::unix_time_now())?)
        }
        Err(err) => Err(err.into()),
    }
}

/// Unwrap and verify a file's content session key with its node keyring.
///
/// The detached signature covers the raw session key bytes, not the key
/// packet, so it is checked after unwrapping. A packet that unwraps
/// cleanly but carries a mismatched signature reports
/// [`KeychainError::SignatureVerification`].
pub fn resolve_session_key(link: &Link, node: &KeyRing) -> Result<SessionKey, KeychainError> {
    if link.link_type != LinkType::File {
        return Err(KeychainError::NotApplicable("link is not a file".into()));
    }

    let properties = link
        .file_properties
        .as_ref()
        .ok_or_else(|| KeychainError::Decode("file link carries no file properties".into()))?;

    let packet = base64::engine::general_purpose::STANDARD
        .decode(&properties.content_key_packet)
        .map_err(|err| KeychainError::Decode(format!("content key packet: {err}")))?;

    let session = node.decrypt_session_key(&packet)?;

    let signature = Signature::from_armored(&properties.content_key_packet_signature)?;
    node.verify_detached(session.bytes(), &signature, crypto::unix_time_now())?;

    Ok(session)
}
