use base64::Engine;
use uuid::Uuid;

use crypto::{KeyRing, SecretKey, SessionKey};

use crate::drive::{
    Block, FileProperties, FolderProperties, Link, LinkState, LinkType, Revision,
    RevisionMetadata, RevisionState, Share, ShareFlags, ShareMetadata, ShareState, ShareType,
    VerificationData,
};
use crate::keychain::{
    encrypt_link_name, generate_content_key, generate_hash_key, generate_node_keys,
    NodeKeyMaterial,
};

/// Fixture block size in bytes, small so multi-block files stay cheap.
const BLOCK_SIZE: usize = 4096;

/// A share fixture with a member address keyring and the unlocked share
/// keyring, plus builders for the tree beneath it.
pub struct TestShare {
    /// Address keyring of the share member, the signer for everything
    /// the fixture creates.
    pub address: KeyRing,
    /// The share DTO, carrying real armored key material.
    pub share: Share,
    keyring: KeyRing,
}

impl TestShare {
    pub fn new() -> Self {
        let address = KeyRing::from_secret(SecretKey::generate());
        let (material, keyring) = generate_node_keys(&address, &address).unwrap();

        let now = crypto::unix_time_now();
        let share = Share {
            metadata: ShareMetadata {
                share_id: Uuid::new_v4().to_string(),
                link_id: Uuid::new_v4().to_string(),
                volume_id: Uuid::new_v4().to_string(),
                share_type: ShareType::Main,
                state: ShareState::Active,
                creation_time: now,
                modify_time: now,
                creator: "alice@example.com".to_string(),
                flags: ShareFlags::Primary,
                locked: false,
                volume_soft_deleted: false,
            },
            address_id: Uuid::new_v4().to_string(),
            address_key_id: Uuid::new_v4().to_string(),
            key: material.node_key,
            passphrase: material.node_passphrase,
            passphrase_signature: material.node_passphrase_signature,
        };

        Self {
            address,
            share,
            keyring,
        }
    }

    /// The unlocked share keyring, the ground truth resolution should
    /// reproduce.
    pub fn keyring(&self) -> &KeyRing {
        &self.keyring
    }

    /// Build a folder link keyed under `parent`, returning it with its
    /// unlocked node keyring.
    pub fn folder(&self, parent: &KeyRing, parent_id: &str, name: &str) -> (Link, KeyRing) {
        let (material, keyring) = generate_node_keys(parent, &self.address).unwrap();
        let node_hash_key = generate_hash_key(&keyring).unwrap();

        let link = Link {
            link_type: LinkType::Folder,
            folder_properties: Some(FolderProperties { node_hash_key }),
            ..self.link_base(parent, parent_id, name, material)
        };

        (link, keyring)
    }

    /// Build a folder whose hash key carries the address key signature
    /// older clients produced instead of the node key's.
    pub fn legacy_folder(&self, parent: &KeyRing, parent_id: &str, name: &str) -> (Link, KeyRing) {
        let (material, keyring) = generate_node_keys(parent, &self.address).unwrap();

        let mut key = [0u8; 32];
        getrandom::getrandom(&mut key).expect("failed to generate random bytes");
        let node_hash_key = keyring
            .encrypt(&key, Some(&self.address))
            .unwrap()
            .to_armored();

        let link = Link {
            link_type: LinkType::Folder,
            folder_properties: Some(FolderProperties { node_hash_key }),
            ..self.link_base(parent, parent_id, name, material)
        };

        (link, keyring)
    }

    /// Build a file link with `content` split into encrypted blocks,
    /// plus the verification data an upload of it would be issued.
    pub fn file(&self, parent: &KeyRing, parent_id: &str, name: &str, content: &[u8]) -> TestFile {
        let (material, keyring) = generate_node_keys(parent, &self.address).unwrap();
        let (content_material, session_key) = generate_content_key(&keyring).unwrap();

        let mut blocks = Vec::new();
        let mut ciphertexts = Vec::new();
        for (i, chunk) in content.chunks(BLOCK_SIZE).enumerate() {
            let ciphertext = session_key.encrypt(chunk).unwrap();

            blocks.push(Block {
                index: i as i64 + 1,
                url: format!("https://blocks.example.com/{}", Uuid::new_v4()),
                hash: random_base64(32),
                enc_signature: self.address.sign_detached(&ciphertext).unwrap().to_armored(),
                signature_email: self.share.metadata.creator.clone(),
            });
            ciphertexts.push(ciphertext);
        }

        let manifest: Vec<u8> = blocks.iter().flat_map(|b| b.hash.bytes()).collect();
        let metadata = RevisionMetadata {
            id: Uuid::new_v4().to_string(),
            create_time: crypto::unix_time_now(),
            size: content.len() as i64,
            manifest_signature: self.address.sign_detached(&manifest).unwrap().to_armored(),
            signature_email: self.share.metadata.creator.clone(),
            state: RevisionState::Active,
            thumbnail: false,
            thumbnail_hash: String::new(),
        };

        let mut code = [0u8; 32];
        getrandom::getrandom(&mut code).expect("failed to generate random bytes");
        let verification = VerificationData {
            verification_code: base64::engine::general_purpose::STANDARD.encode(code),
            content_key_packet: content_material.content_key_packet.clone(),
        };

        let link = Link {
            link_type: LinkType::File,
            total_size: content.len() as i64,
            mime_type: "application/octet-stream".to_string(),
            file_properties: Some(FileProperties {
                content_key_packet: content_material.content_key_packet,
                content_key_packet_signature: content_material.content_key_packet_signature,
                active_revision: metadata.clone(),
            }),
            ..self.link_base(parent, parent_id, name, material)
        };

        TestFile {
            link,
            keyring,
            session_key,
            revision: Revision { metadata, blocks },
            ciphertexts,
            verification,
            verification_code: code.to_vec(),
        }
    }

    fn link_base(
        &self,
        parent: &KeyRing,
        parent_id: &str,
        name: &str,
        material: NodeKeyMaterial,
    ) -> Link {
        let now = crypto::unix_time_now();

        Link {
            link_id: Uuid::new_v4().to_string(),
            parent_link_id: parent_id.to_string(),
            link_type: LinkType::Folder,
            name: encrypt_link_name(name, parent, &self.address).unwrap(),
            name_signature_email: self.share.metadata.creator.clone(),
            hash: random_hex(32),
            state: LinkState::Active,
            total_size: 0,
            mime_type: String::new(),
            create_time: now,
            modify_time: now,
            trashed: None,
            node_key: material.node_key,
            node_passphrase: material.node_passphrase,
            node_passphrase_signature: material.node_passphrase_signature,
            attributes: 0,
            x_attr: None,
            permissions: 0,
            file_properties: None,
            folder_properties: None,
            signature_email: self.share.metadata.creator.clone(),
        }
    }
}

/// A file fixture: the link DTO, its unlocked key material, and one
/// encrypted revision ready for verification tests.
pub struct TestFile {
    pub link: Link,
    /// The file's unlocked node keyring.
    pub keyring: KeyRing,
    /// The content session key, as resolution should recover it.
    pub session_key: SessionKey,
    pub revision: Revision,
    /// Raw block ciphertexts aligned with `revision.blocks`.
    pub ciphertexts: Vec<Vec<u8>>,
    pub verification: VerificationData,
    /// Decoded bytes behind `verification.verification_code`.
    pub verification_code: Vec<u8>,
}

fn random_hex(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    getrandom::getrandom(&mut buf).expect("failed to generate random bytes");
    hex::encode(buf)
}

fn random_base64(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    getrandom::getrandom(&mut buf).expect("failed to generate random bytes");
    base64::engine::general_purpose::STANDARD.encode(buf)
}
