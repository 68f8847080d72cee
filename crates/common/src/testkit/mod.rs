//! Fixture builders for key hierarchy tests
//!
//! Builds shares, folders, and files with real armored key material, so
//! tests exercise the same resolution paths production metadata takes
//! without talking to a server.
//!
//! # Example
//!
//! ```rust,ignore
//! use common::keychain::{resolve_link_keyring, resolve_share_keyring};
//! use common::testkit::TestShare;
//!
//! let fx = TestShare::new();
//! let share_keyring = resolve_share_keyring(&fx.share, &fx.address)?;
//!
//! let (root, _) = fx.folder(fx.keyring(), "", "root");
//! let root_keyring = resolve_link_keyring(&root, &share_keyring, &fx.address)?;
//! ```

mod share;

pub use share::{TestFile, TestShare};
