//! Shares
//!
//! A share is an entry point into a volume's tree. It points at a link
//! (the root of the share) and carries the locked share key. Membership
//! in a share is tied to an address key; that key decrypts the share
//! passphrase, which unlocks the share key, which in turn roots the
//! whole node-key chain beneath it.

use serde::{Deserialize, Serialize};

/// Share fields returned by listing endpoints, without key material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ShareMetadata {
    /// Encrypted share ID.
    #[serde(rename = "ShareID")]
    pub share_id: String,
    /// Encrypted link ID the share points at (the root of the share).
    #[serde(rename = "LinkID")]
    pub link_id: String,
    /// Encrypted volume ID the share is mounted on.
    #[serde(rename = "VolumeID")]
    pub volume_id: String,

    #[serde(rename = "Type")]
    pub share_type: ShareType,
    /// The state of the share (active, deleted).
    pub state: ShareState,

    /// Creation time of the share in Unix time.
    pub creation_time: i64,
    /// Last modification time of the share in Unix time.
    pub modify_time: i64,

    /// Creator email address.
    pub creator: String,
    /// The flag bitmap.
    pub flags: ShareFlags,
    /// Whether the share is locked pending a key reset.
    pub locked: bool,
    /// Whether the owning volume was soft deleted.
    pub volume_soft_deleted: bool,
}

/// A share with its key material, as returned by the share GET endpoint.
///
/// `passphrase` decrypts under the member's address keyring and, once its
/// detached signature checks out, unlocks `key`. The unlocked share key is
/// the parent keyring for the root link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Share {
    #[serde(flatten)]
    pub metadata: ShareMetadata,

    /// Encrypted address ID of the membership.
    #[serde(rename = "AddressID")]
    pub address_id: String,
    /// Encrypted address key ID used for the passphrase.
    #[serde(rename = "AddressKeyID")]
    pub address_key_id: String,

    /// The locked share key, armored.
    pub key: String,
    /// The share key passphrase, an armored message encrypted with the
    /// member's address key.
    pub passphrase: String,
    /// Armored detached signature of the passphrase.
    pub passphrase_signature: String,
}

/// Request body for creating a share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateShareReq {
    /// The encrypted address ID.
    #[serde(rename = "AddressID")]
    pub address_id: String,
    /// The link ID for the share root node.
    #[serde(rename = "RootLinkID")]
    pub root_link_id: String,

    /// The locked share key, armored.
    pub share_key: String,
    /// The armored message holding the share key passphrase, encrypted
    /// with the address key.
    pub share_passphrase: String,
    /// The armored detached signature of the share passphrase.
    pub share_passphrase_signature: String,

    /// The key packet for the root link passphrase, in base64 encoding.
    pub passphrase_key_packet: String,
    /// The key packet for the root link name, in base64 encoding.
    pub name_key_packet: String,
}

/// Response body for a share creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateShareRes {
    /// The share ID.
    #[serde(rename = "ID")]
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum ShareType {
    Main,
    Standard,
    Device,
    /// A type code this client does not know about.
    Unknown(i64),
}

impl From<i64> for ShareType {
    fn from(value: i64) -> Self {
        match value {
            1 => ShareType::Main,
            2 => ShareType::Standard,
            3 => ShareType::Device,
            other => ShareType::Unknown(other),
        }
    }
}

impl From<ShareType> for i64 {
    fn from(value: ShareType) -> i64 {
        match value {
            ShareType::Main => 1,
            ShareType::Standard => 2,
            ShareType::Device => 3,
            ShareType::Unknown(other) => other,
        }
    }
}

impl std::fmt::Display for ShareType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShareType::Main => write!(f, "main"),
            ShareType::Standard => write!(f, "standard"),
            ShareType::Device => write!(f, "device"),
            ShareType::Unknown(v) => write!(f, "unknown ({v})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum ShareState {
    Active,
    Deleted,
    /// A state code this client does not know about.
    Unknown(i64),
}

impl From<i64> for ShareState {
    fn from(value: i64) -> Self {
        match value {
            1 => ShareState::Active,
            2 => ShareState::Deleted,
            other => ShareState::Unknown(other),
        }
    }
}

impl From<ShareState> for i64 {
    fn from(value: ShareState) -> i64 {
        match value {
            ShareState::Active => 1,
            ShareState::Deleted => 2,
            ShareState::Unknown(other) => other,
        }
    }
}

impl std::fmt::Display for ShareState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShareState::Active => write!(f, "active"),
            ShareState::Deleted => write!(f, "deleted"),
            ShareState::Unknown(v) => write!(f, "unknown ({v})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum ShareFlags {
    None,
    Primary,
    /// A flag combination this client does not know about.
    Unknown(i64),
}

impl From<i64> for ShareFlags {
    fn from(value: i64) -> Self {
        match value {
            0 => ShareFlags::None,
            1 => ShareFlags::Primary,
            other => ShareFlags::Unknown(other),
        }
    }
}

impl From<ShareFlags> for i64 {
    fn from(value: ShareFlags) -> i64 {
        match value {
            ShareFlags::None => 0,
            ShareFlags::Primary => 1,
            ShareFlags::Unknown(other) => other,
        }
    }
}

impl std::fmt::Display for ShareFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShareFlags::None => write!(f, "none"),
            ShareFlags::Primary => write!(f, "primary"),
            ShareFlags::Unknown(v) => write!(f, "unknown ({v})"),
        }
    }
}
