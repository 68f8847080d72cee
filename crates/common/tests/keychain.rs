//! Integration tests walking a full share hierarchy
//!
//! Covers the whole chain of custody: address keyring to share keyring,
//! share to root link, link to link, down to a file's session key and
//! the verification tokens for its uploaded blocks.

mod common;

use base64::Engine;

use ::common::drive::{BlockToken, Link};
use ::common::keychain::{
    decrypt_link_name, resolve_hash_key, resolve_link_keyring, resolve_session_key,
    resolve_share_keyring, BlockVerifier,
};
use ::common::testkit::TestShare;

#[test]
fn test_resolve_full_hierarchy() {
    common::init_tracing();

    let fx = TestShare::new();

    // Share hop: the address keyring unlocks the share keyring.
    let share_keyring = resolve_share_keyring(&fx.share, &fx.address).unwrap();

    // Root link hop: the share keyring plays parent.
    let (root, _) = fx.folder(fx.keyring(), "", "root");
    let root_keyring = resolve_link_keyring(&root, &share_keyring, &fx.address).unwrap();

    // Folder hop: the parent's node keyring takes over.
    let (docs, _) = fx.folder(&root_keyring, &root.link_id, "docs");
    let docs_keyring = resolve_link_keyring(&docs, &root_keyring, &fx.address).unwrap();

    let name = decrypt_link_name(&docs, &root_keyring, &fx.address).unwrap();
    assert_eq!(name, "docs");

    let hash_key = resolve_hash_key(&docs, &docs_keyring, Some(&fx.address)).unwrap();
    assert_eq!(hash_key.len(), 32);

    // File hop: the session key unwraps and its signature verifies.
    let content = vec![7u8; 10_000];
    let file = fx.file(&docs_keyring, &docs.link_id, "report.pdf", &content);
    let file_keyring = resolve_link_keyring(&file.link, &docs_keyring, &fx.address).unwrap();
    let session = resolve_session_key(&file.link, &file_keyring).unwrap();

    // Every stored block decrypts back to the original content.
    let mut plaintext = Vec::new();
    for ciphertext in &file.ciphertexts {
        plaintext.extend(session.decrypt(ciphertext).unwrap());
    }
    assert_eq!(plaintext, content);
}

#[test]
fn test_verification_tokens_for_an_upload() {
    common::init_tracing();

    let fx = TestShare::new();
    let content = vec![42u8; 9_500];
    let file = fx.file(fx.keyring(), &fx.share.metadata.link_id, "big.bin", &content);

    let verifier = BlockVerifier::new(&file.verification, &file.keyring).unwrap();

    // One token per block, submitted as ordered index/token pairs.
    let tokens: Vec<BlockToken> = file
        .revision
        .blocks
        .iter()
        .zip(&file.ciphertexts)
        .map(|(block, ciphertext)| BlockToken {
            index: block.index,
            token: verifier.verification_token(ciphertext).unwrap(),
        })
        .collect();
    assert_eq!(tokens.len(), 3);

    for (i, pair) in tokens.iter().enumerate() {
        assert_eq!(pair.index, i as i64 + 1);

        let raw = base64::engine::general_purpose::STANDARD
            .decode(&pair.token)
            .unwrap();
        assert_eq!(raw.len(), 32);

        for (j, byte) in raw.iter().enumerate() {
            assert_eq!(*byte, file.verification_code[j] ^ file.ciphertexts[i][j]);
        }
    }
}

#[test]
fn test_hierarchy_survives_wire_roundtrip() {
    common::init_tracing();

    let fx = TestShare::new();
    let (root, _) = fx.folder(fx.keyring(), "", "root");

    // Armored key material must survive JSON intact for resolution to
    // work on what the API actually returns.
    let json = serde_json::to_string(&root).unwrap();
    let decoded: Link = serde_json::from_str(&json).unwrap();

    let keyring = resolve_link_keyring(&decoded, fx.keyring(), &fx.address).unwrap();
    let hash_key = resolve_hash_key(&decoded, &keyring, None).unwrap();
    assert_eq!(hash_key.len(), 32);
}
