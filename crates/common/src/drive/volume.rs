//! Volumes
//!
//! A volume is the container for one file hierarchy. Clients never create
//! or mutate volumes through this layer; they only read volume state to
//! find the share that roots the tree.

use serde::{Deserialize, Serialize};

/// A container for one file hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Volume {
    /// Encrypted volume ID.
    #[serde(rename = "VolumeID")]
    pub volume_id: String,
    /// Volume creation time in Unix time.
    pub creation_time: i64,
    /// Last modification time in Unix time.
    pub modify_time: i64,
    /// Total size of the volume's content in bytes.
    pub used_space: i64,
    /// Whether the volume is active or soft-deleted.
    pub state: VolumeState,
    /// The share rooting the volume's tree.
    pub share: VolumeShare,
}

/// The share a volume points at, as embedded in the volume body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VolumeShare {
    /// Encrypted share ID.
    #[serde(rename = "ShareID")]
    pub share_id: String,
    /// Encrypted link ID of the share's root link.
    #[serde(rename = "LinkID")]
    pub link_id: String,
}

/// The lifecycle state of a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum VolumeState {
    Active,
    Deleted,
    /// A state code this client does not know about.
    Unknown(i64),
}

impl From<i64> for VolumeState {
    fn from(value: i64) -> Self {
        match value {
            1 => VolumeState::Active,
            2 => VolumeState::Deleted,
            other => VolumeState::Unknown(other),
        }
    }
}

impl From<VolumeState> for i64 {
    fn from(value: VolumeState) -> i64 {
        match value {
            VolumeState::Active => 1,
            VolumeState::Deleted => 2,
            VolumeState::Unknown(other) => other,
        }
    }
}

impl std::fmt::Display for VolumeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VolumeState::Active => write!(f, "active"),
            VolumeState::Deleted => write!(f, "deleted"),
            VolumeState::Unknown(v) => write!(f, "unknown ({v})"),
        }
    }
}
