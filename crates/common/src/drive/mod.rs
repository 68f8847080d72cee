//! Drive API data transfer types
//!
//! These mirror the JSON bodies exchanged with the drive service:
//!
//! - **[`Volume`]**: container for one file hierarchy
//! - **[`Share`]**: entry point into a hierarchy, carries the locked share key
//! - **[`Link`]**: a folder or file node, keyed by its parent
//! - **[`Revision`]**: one version of a file's content
//! - **[`Block`]**: an indexed ciphertext chunk of a revision
//!
//! # Hierarchy
//!
//! ```text
//! Volume
//!   └── Share (locked share key + passphrase)
//!         └── Link (root folder)
//!               ├── Link (folder, node key chained to parent)
//!               │     └── Link (file)
//!               │           └── Revision
//!               │                 ├── Block 0
//!               │                 └── Block 1
//!               └── Link (file)
//! ```
//!
//! # Encoding
//!
//! Field names follow the service's wire casing (`LinkID`, `MIMEType`, ...).
//! State and type discriminants are integers on the wire and decode into
//! enums with an `Unknown` catch-all so new server-side codes never fail
//! deserialization. Key packets and verification codes are standard padded
//! base64; keys, passphrases, and signatures are armored text; name hashes
//! are hex HMAC output.
//!
//! Decrypting and verifying the key material carried here is the job of
//! [`keychain`](crate::keychain).

mod block;
mod link;
mod revision;
mod share;
mod volume;

pub use block::{Block, VerificationData};
pub use link::{
    CreateFileReq, CreateFileRes, CreateFolderReq, CreateFolderRes, FileProperties,
    FolderProperties, Link, LinkState, LinkType,
};
pub use revision::{
    BlockToken, CommitRevisionReq, ConflictErrorResponse, Revision, RevisionMetadata,
    RevisionState,
};
pub use share::{
    CreateShareReq, CreateShareRes, Share, ShareFlags, ShareMetadata, ShareState, ShareType,
};
pub use volume::{Volume, VolumeShare, VolumeState};
