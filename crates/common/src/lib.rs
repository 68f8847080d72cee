/**
 * Data transfer types for the drive API.
 *  - Volumes, shares, links, revisions, blocks
 *  - Integer-backed state/type enums and their
 *    wire (JSON) encodings
 */
pub mod drive;
/**
 * Client-side trust layer.
 *  Walks the key hierarchy (share -> link -> file content)
 *  and produces the per-block upload verification tokens.
 */
pub mod keychain;
pub mod testkit;

pub mod prelude {
    pub use crate::drive::{Link, Revision, Share, Volume};
    pub use crate::keychain::{BlockVerifier, KeychainError};
    pub use crypto::{KeyRing, PublicKey, SecretKey};
}
