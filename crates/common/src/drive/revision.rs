//! Revisions
//!
//! Revisions are versions of a file's content. Each file has exactly one
//! active revision; older ones become obsolete and are eventually
//! deleted. A revision's content is the ordered sequence of its blocks,
//! and committing a draft revision submits a manifest signature plus the
//! per-block verification tokens collected during upload.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, BoolFromInt};

use super::block::Block;

/// Revision fields carried inline on a file link's active revision and by
/// revision listing endpoints.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RevisionMetadata {
    /// Encrypted revision ID.
    #[serde(rename = "ID")]
    pub id: String,
    /// Creation time of the revision in Unix time.
    pub create_time: i64,
    /// Size of the revision in bytes.
    pub size: i64,
    /// Armored signature of the revision manifest, made with an address
    /// key of the share.
    pub manifest_signature: String,
    /// Email of the address that signed the manifest.
    pub signature_email: String,
    pub state: RevisionState,
    /// Whether the revision has a thumbnail. An integer on the wire.
    #[serde_as(as = "BoolFromInt")]
    pub thumbnail: bool,
    /// Hash of the thumbnail block.
    pub thumbnail_hash: String,
}

/// A full revision body, including its blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Revision {
    #[serde(flatten)]
    pub metadata: RevisionMetadata,

    /// The ordered ciphertext chunks making up the content.
    pub blocks: Vec<Block>,
}

/// The lifecycle state of a revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum RevisionState {
    Draft,
    Active,
    Obsolete,
    Deleted,
    /// A state code this client does not know about.
    Unknown(i64),
}

impl From<i64> for RevisionState {
    fn from(value: i64) -> Self {
        match value {
            0 => RevisionState::Draft,
            1 => RevisionState::Active,
            2 => RevisionState::Obsolete,
            3 => RevisionState::Deleted,
            other => RevisionState::Unknown(other),
        }
    }
}

impl From<RevisionState> for i64 {
    fn from(value: RevisionState) -> i64 {
        match value {
            RevisionState::Draft => 0,
            RevisionState::Active => 1,
            RevisionState::Obsolete => 2,
            RevisionState::Deleted => 3,
            RevisionState::Unknown(other) => other,
        }
    }
}

impl std::fmt::Display for RevisionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RevisionState::Draft => write!(f, "draft"),
            RevisionState::Active => write!(f, "active"),
            RevisionState::Obsolete => write!(f, "obsolete"),
            RevisionState::Deleted => write!(f, "deleted"),
            RevisionState::Unknown(_) => write!(f, "unknown"),
        }
    }
}

/// Request body for committing a draft revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommitRevisionReq {
    /// Armored signature of the manifest.
    pub manifest_signature: String,
    /// Address used to sign the manifest.
    pub signature_address: String,
    /// Index of the last block to keep when the revision preserves
    /// partial content from a previous one.
    pub block_number: Option<i64>,
    /// Extended attributes, encrypted with the link key.
    pub x_attr: Option<String>,
}

/// One verification token, paired with its block index in the ordered
/// list submitted when finalizing a revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BlockToken {
    pub index: i64,
    pub token: String,
}

/// Error details returned when a draft creation conflicts with an
/// existing link or draft revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConflictErrorResponse {
    #[serde(rename = "ConflictLinkID")]
    pub conflict_link_id: String,
    #[serde(rename = "ConflictRevisionID")]
    pub conflict_revision_id: String,
    #[serde(rename = "ConflictDraftRevisionID")]
    pub conflict_draft_revision_id: String,
    #[serde(rename = "ConflictDraftClientUID")]
    pub conflict_draft_client_uid: String,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_revision_wire_format() {
        let json = serde_json::json!({
            "ID": "rev-1",
            "CreateTime": 1700000000,
            "Size": 2048,
            "ManifestSignature": "-----BEGIN ...",
            "SignatureEmail": "alice@example.com",
            "State": 1,
            "Thumbnail": 1,
            "ThumbnailHash": "ef56",
            "Blocks": [
                {
                    "Index": 1,
                    "URL": "https://blocks.example.com/b1",
                    "Hash": "aGFzaA==",
                    "EncSignature": "-----BEGIN ...",
                    "SignatureEmail": "alice@example.com",
                },
            ],
        });

        let revision: Revision = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(revision.metadata.id, "rev-1");
        assert_eq!(revision.metadata.state, RevisionState::Active);
        assert!(revision.metadata.thumbnail);
        assert_eq!(revision.blocks.len(), 1);
        assert_eq!(revision.blocks[0].index, 1);

        assert_eq!(serde_json::to_value(&revision).unwrap(), json);
    }

    #[test]
    fn test_commit_revision_req_wire_format() {
        let req = CommitRevisionReq {
            manifest_signature: "-----BEGIN ...".into(),
            signature_address: "alice@example.com".into(),
            block_number: None,
            x_attr: None,
        };

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["ManifestSignature"], "-----BEGIN ...");
        assert_eq!(json["BlockNumber"], serde_json::Value::Null);
        assert_eq!(json["XAttr"], serde_json::Value::Null);
    }

    #[test]
    fn test_conflict_error_wire_format() {
        let json = serde_json::json!({
            "ConflictLinkID": "link-9",
            "ConflictRevisionID": "",
            "ConflictDraftRevisionID": "rev-9",
            "ConflictDraftClientUID": "client-1",
        });

        let conflict: ConflictErrorResponse = serde_json::from_value(json).unwrap();
        assert_eq!(conflict.conflict_link_id, "link-9");
        assert_eq!(conflict.conflict_draft_client_uid, "client-1");
    }

    #[test]
    fn test_revision_state_codes() {
        assert_eq!(RevisionState::from(0), RevisionState::Draft);
        assert_eq!(RevisionState::from(2), RevisionState::Obsolete);
        assert_eq!(RevisionState::from(9), RevisionState::Unknown(9));
        assert_eq!(RevisionState::Obsolete.to_string(), "obsolete");
    }
}
