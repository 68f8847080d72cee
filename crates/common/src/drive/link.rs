//! Links
//!
//! Links are the nodes of the tree: every file and folder in a volume is
//! one link, pointing at its parent through `parent_link_id`. A link
//! carries its name (encrypted with the parent node key), a name hash for
//! collision detection, and its own locked node key whose passphrase is
//! encrypted with the parent node key. The file/folder split lives in
//! [`FileProperties`] and [`FolderProperties`].

use serde::{Deserialize, Serialize};

use super::revision::RevisionMetadata;

/// A file or folder node in a volume's tree.
///
/// The root link of a share has an empty parent and its passphrase is
/// encrypted with the share key instead of a parent node key. Everything
/// else about the two hops is identical, which is what makes the key
/// chain resolvable with one procedure per link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Link {
    /// Encrypted file/folder ID.
    #[serde(rename = "LinkID")]
    pub link_id: String,
    /// Encrypted parent folder ID. Empty for the root link of a share.
    #[serde(rename = "ParentLinkID")]
    pub parent_link_id: String,

    #[serde(rename = "Type")]
    pub link_type: LinkType,
    /// The name, encrypted with the parent node key.
    pub name: String,
    /// Email of the address that signed the name.
    pub name_signature_email: String,
    /// Hex HMAC of the name under the parent's hash key.
    pub hash: String,
    pub state: LinkState,
    /// Size in bytes across all revisions for files.
    pub total_size: i64,

    #[serde(rename = "MIMEType")]
    pub mime_type: String,

    /// Link creation time in Unix time.
    pub create_time: i64,
    /// Link modification time in Unix time.
    pub modify_time: i64,
    /// Time at which the link was trashed, absent if it is not trashed.
    pub trashed: Option<i64>,

    /// The locked node key, armored. Decrypts all content beneath this link.
    pub node_key: String,
    /// The node key passphrase, an armored message encrypted with the
    /// parent node key (or the share key for the root link).
    pub node_passphrase: String,
    /// Armored detached signature of the node passphrase.
    pub node_passphrase_signature: String,

    pub attributes: i64,
    /// Extended attributes, an armored message encrypted with the node key.
    pub x_attr: Option<String>,
    pub permissions: i64,

    pub file_properties: Option<FileProperties>,
    pub folder_properties: Option<FolderProperties>,

    /// Email of the address that signed the node passphrase.
    pub signature_email: String,
}

/// The file half of a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileProperties {
    /// The content session key wrapped to the node key, in base64 encoding.
    pub content_key_packet: String,
    /// Armored detached signature over the raw session key bytes, made
    /// with the node key.
    pub content_key_packet_signature: String,
    /// The active revision of the file.
    pub active_revision: RevisionMetadata,
}

/// The folder half of a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FolderProperties {
    /// The HMAC key hashing this folder's children names, an armored
    /// message encrypted with the node key.
    pub node_hash_key: String,
}

/// Whether a link is a folder or a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum LinkType {
    Folder,
    File,
    /// A type code this client does not know about.
    Unknown(i64),
}

impl From<i64> for LinkType {
    fn from(value: i64) -> Self {
        match value {
            1 => LinkType::Folder,
            2 => LinkType::File,
            other => LinkType::Unknown(other),
        }
    }
}

impl From<LinkType> for i64 {
    fn from(value: LinkType) -> i64 {
        match value {
            LinkType::Folder => 1,
            LinkType::File => 2,
            LinkType::Unknown(other) => other,
        }
    }
}

impl std::fmt::Display for LinkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkType::Folder => write!(f, "folder"),
            LinkType::File => write!(f, "file"),
            LinkType::Unknown(_) => write!(f, "unknown"),
        }
    }
}

/// The lifecycle state of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum LinkState {
    Draft,
    Active,
    Trashed,
    Deleted,
    Restoring,
    /// A state code this client does not know about.
    Unknown(i64),
}

impl From<i64> for LinkState {
    fn from(value: i64) -> Self {
        match value {
            0 => LinkState::Draft,
            1 => LinkState::Active,
            2 => LinkState::Trashed,
            3 => LinkState::Deleted,
            4 => LinkState::Restoring,
            other => LinkState::Unknown(other),
        }
    }
}

impl From<LinkState> for i64 {
    fn from(value: LinkState) -> i64 {
        match value {
            LinkState::Draft => 0,
            LinkState::Active => 1,
            LinkState::Trashed => 2,
            LinkState::Deleted => 3,
            LinkState::Restoring => 4,
            LinkState::Unknown(other) => other,
        }
    }
}

impl std::fmt::Display for LinkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkState::Draft => write!(f, "draft"),
            LinkState::Active => write!(f, "active"),
            LinkState::Trashed => write!(f, "trashed"),
            LinkState::Deleted => write!(f, "deleted"),
            LinkState::Restoring => write!(f, "restoring"),
            LinkState::Unknown(_) => write!(f, "unknown"),
        }
    }
}

/// Request body for creating a folder.
///
/// All keys and signatures are armored; the name hash is hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateFolderReq {
    /// The link ID of the parent folder.
    #[serde(rename = "ParentLinkID")]
    pub parent_link_id: String,

    /// The folder name, encrypted with the parent node key and signed
    /// with the address key.
    pub name: String,
    /// Hex HMAC of the name under the parent's hash key.
    pub hash: String,

    /// The new locked node key, armored.
    pub node_key: String,
    /// The node passphrase, encrypted with the parent node key.
    pub node_passphrase: String,
    /// Detached passphrase signature, made with the address key.
    pub node_passphrase_signature: String,
    /// The new hash key, encrypted and signed with the node key.
    pub node_hash_key: String,

    /// The address that signed the passphrase and name.
    pub signature_address: String,

    /// Optional extended attributes, encrypted with the parent node key.
    pub x_attr: Option<String>,
}

/// Response body for a folder creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateFolderRes {
    /// The encrypted link ID.
    #[serde(rename = "ID")]
    pub id: String,
}

/// Request body for creating a file and its draft revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateFileReq {
    #[serde(rename = "ParentLinkID")]
    pub parent_link_id: String,

    /// The file name, encrypted with the parent node key and signed with
    /// the address key.
    pub name: String,
    /// Hex HMAC of the name under the parent's hash key.
    pub hash: String,
    #[serde(rename = "MIMEType")]
    pub mime_type: String,

    /// The content session key wrapped to the node key, in base64 encoding.
    pub content_key_packet: String,
    /// Detached signature of the session key, made with the node key.
    pub content_key_packet_signature: String,

    /// The new locked node key, armored.
    pub node_key: String,
    /// The node passphrase, encrypted with the parent node key.
    pub node_passphrase: String,
    /// Detached passphrase signature, made with the address key.
    pub node_passphrase_signature: String,

    /// The address that signed the passphrase and name.
    pub signature_address: String,

    /// The client unique ID, echoed back on draft conflicts.
    #[serde(rename = "ClientUID")]
    pub client_uid: String,
}

/// Response body for a file creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateFileRes {
    /// The encrypted link ID.
    #[serde(rename = "ID")]
    pub id: String,
    /// The encrypted ID of the draft revision.
    #[serde(rename = "RevisionID")]
    pub revision_id: String,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_folder_link_wire_format() {
        let json = serde_json::json!({
            "LinkID": "link-1",
            "ParentLinkID": "link-root",
            "Type": 1,
            "Name": "-----BEGIN ...",
            "NameSignatureEmail": "alice@example.com",
            "Hash": "ab12",
            "State": 1,
            "TotalSize": 0,
            "MIMEType": "",
            "CreateTime": 1700000000,
            "ModifyTime": 1700000000,
            "Trashed": null,
            "NodeKey": "-----BEGIN ...",
            "NodePassphrase": "-----BEGIN ...",
            "NodePassphraseSignature": "-----BEGIN ...",
            "Attributes": 0,
            "XAttr": null,
            "Permissions": 0,
            "FileProperties": null,
            "FolderProperties": {
                "NodeHashKey": "-----BEGIN ...",
            },
            "SignatureEmail": "alice@example.com",
        });

        let link: Link = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(link.link_type, LinkType::Folder);
        assert_eq!(link.state, LinkState::Active);
        assert!(link.trashed.is_none());
        assert!(link.file_properties.is_none());
        assert!(link.folder_properties.is_some());

        assert_eq!(serde_json::to_value(&link).unwrap(), json);
    }

    #[test]
    fn test_file_link_wire_format() {
        let json = serde_json::json!({
            "LinkID": "link-2",
            "ParentLinkID": "link-1",
            "Type": 2,
            "Name": "-----BEGIN ...",
            "NameSignatureEmail": "alice@example.com",
            "Hash": "cd34",
            "State": 1,
            "TotalSize": 1024,
            "MIMEType": "text/plain",
            "CreateTime": 1700000000,
            "ModifyTime": 1700000050,
            "Trashed": 1700000200,
            "NodeKey": "-----BEGIN ...",
            "NodePassphrase": "-----BEGIN ...",
            "NodePassphraseSignature": "-----BEGIN ...",
            "Attributes": 0,
            "XAttr": "-----BEGIN ...",
            "Permissions": 0,
            "FileProperties": {
                "ContentKeyPacket": "AAECAw==",
                "ContentKeyPacketSignature": "-----BEGIN ...",
                "ActiveRevision": {
                    "ID": "rev-1",
                    "CreateTime": 1700000000,
                    "Size": 1024,
                    "ManifestSignature": "-----BEGIN ...",
                    "SignatureEmail": "alice@example.com",
                    "State": 1,
                    "Thumbnail": 0,
                    "ThumbnailHash": "",
                },
            },
            "FolderProperties": null,
            "SignatureEmail": "alice@example.com",
        });

        let link: Link = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(link.link_type, LinkType::File);
        assert_eq!(link.trashed, Some(1700000200));

        let props = link.file_properties.as_ref().unwrap();
        assert_eq!(props.content_key_packet, "AAECAw==");
        assert!(!props.active_revision.thumbnail);

        assert_eq!(serde_json::to_value(&link).unwrap(), json);
    }

    #[test]
    fn test_link_enum_codes() {
        assert_eq!(LinkType::from(1), LinkType::Folder);
        assert_eq!(LinkType::from(2), LinkType::File);
        assert_eq!(LinkType::from(3), LinkType::Unknown(3));
        assert_eq!(LinkType::Unknown(3).to_string(), "unknown");

        assert_eq!(LinkState::from(0), LinkState::Draft);
        assert_eq!(LinkState::from(4), LinkState::Restoring);
        assert_eq!(i64::from(LinkState::Unknown(9)), 9);
        assert_eq!(LinkState::Trashed.to_string(), "trashed");
    }
}
