//! Blocks
//!
//! A block is one indexed ciphertext chunk of a revision. Blocks share
//! the file's content session key; there is no per-block key material.

use serde::{Deserialize, Serialize};

/// One ciphertext chunk of a revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
    /// Position of the block within the revision, starting at 1.
    pub index: i64,
    /// Download URL for the ciphertext.
    #[serde(rename = "URL")]
    pub url: String,
    /// Base64 encoded hash of the ciphertext.
    pub hash: String,
    /// Encrypted signature of the block content, armored.
    pub enc_signature: String,
    /// Email of the address that signed the block.
    pub signature_email: String,
}

/// Material the server issues for one upload session, consumed by
/// [`BlockVerifier`](crate::keychain::BlockVerifier).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VerificationData {
    /// Server-held secret for this upload session, in base64 encoding.
    pub verification_code: String,
    /// The file's content key packet, in base64 encoding.
    pub content_key_packet: String,
}
