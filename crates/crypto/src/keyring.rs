//! Keyrings: ordered key entries and the operations over them
//!
//! A [`KeyRing`] holds one or more keys, each a public half with an
//! optional secret half. Operations that consume ciphertext (message
//! decryption, session-key unwrap) try each secret entry in order;
//! verification accepts a signature from any entry. Encryption and
//! signing use the primary (first) entry.
//!
//! Session keys are wrapped for a recipient with ECDH + AES Key Wrap
//! (RFC 3394): an ephemeral Ed25519 keypair is generated, both sides
//! convert to X25519, and the Diffie-Hellman shared secret becomes the
//! wrapping KEK.
//!
//! # Key Packet Format
//!
//! ```text
//! [ algorithm: 1 ][ ephemeral pubkey: 32 ][ wrapped session key: 40 ]
//! ```
//!
//! AES-KW adds 8 bytes to the 32-byte session key, so a packet is
//! always 73 bytes.

use aes_kw::KekAes256 as Kek;
use zeroize::Zeroize;

use crate::error::CryptoError;
use crate::keys::{PublicKey, SecretKey, PUBLIC_KEY_SIZE};
use crate::message::{frame_payload, parse_payload, Message};
use crate::session::{SessionKey, SessionKeyAlgorithm, SESSION_KEY_SIZE};
use crate::signature::Signature;

/// Size of the AES Key Wrap integrity block in bytes
pub const KW_NONCE_SIZE: usize = 8;
/// Total size of a session key packet in bytes
pub const KEY_PACKET_SIZE: usize = 1 + PUBLIC_KEY_SIZE + SESSION_KEY_SIZE + KW_NONCE_SIZE;

#[derive(Debug, Clone)]
struct Entry {
    public: PublicKey,
    secret: Option<SecretKey>,
}

/// An ordered collection of keys acting as one identity
#[derive(Debug, Clone, Default)]
pub struct KeyRing {
    entries: Vec<Entry>,
}

impl KeyRing {
    /// Create an empty keyring.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a keyring holding a single full keypair.
    pub fn from_secret(secret: SecretKey) -> Self {
        let mut ring = Self::new();
        ring.add_secret(secret);
        ring
    }

    /// Create a keyring holding a single public key.
    pub fn from_public(public: PublicKey) -> Self {
        let mut ring = Self::new();
        ring.add_public(public);
        ring
    }

    /// Append a full keypair.
    pub fn add_secret(&mut self, secret: SecretKey) {
        self.entries.push(Entry {
            public: secret.public(),
            secret: Some(secret),
        });
    }

    /// Append a verification-only key.
    pub fn add_public(&mut self, public: PublicKey) {
        self.entries.push(Entry {
            public,
            secret: None,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Public key of the primary (first) entry.
    pub fn primary_public(&self) -> Result<PublicKey, CryptoError> {
        self.entries
            .first()
            .map(|e| e.public)
            .ok_or_else(|| CryptoError::Malformed("keyring is empty".into()))
    }

    /// Sign data with the primary secret key, dating the signature now.
    pub fn sign_detached(&self, data: &[u8]) -> Result<Signature, CryptoError> {
        let secret = self
            .entries
            .iter()
            .find_map(|e| e.secret.as_ref())
            .ok_or_else(|| CryptoError::Malformed("no signing key in keyring".into()))?;
        Ok(Signature::new(secret.sign(data), crate::unix_time_now()))
    }

    /// Verify a detached signature over `data` at time `at`.
    ///
    /// Any entry may verify the signature. Signatures dated after `at`
    /// are rejected.
    ///
    /// # Errors
    ///
    /// Returns a `SignatureVerification` error if no entry verifies
    /// the signature or it is future-dated.
    pub fn verify_detached(
        &self,
        data: &[u8],
        signature: &Signature,
        at: i64,
    ) -> Result<(), CryptoError> {
        if signature.created() > at {
            return Err(CryptoError::SignatureVerification(
                "signature created after verification time".into(),
            ));
        }

        for entry in &self.entries {
            if entry.public.verify(data, signature.raw()).is_ok() {
                return Ok(());
            }
        }

        Err(CryptoError::SignatureVerification(
            "no key in the ring verifies the signature".into(),
        ))
    }

    /// Wrap a session key for the primary entry.
    ///
    /// Returns a key packet: `algorithm || ephemeral pubkey || wrapped key`.
    pub fn encrypt_session_key(&self, session: &SessionKey) -> Result<Vec<u8>, CryptoError> {
        let target = self.primary_public()?;

        let ephemeral_private = SecretKey::generate();
        let ephemeral_public = ephemeral_private.public();

        let shared = ephemeral_private
            .to_x25519()
            .diffie_hellman(&target.to_x25519()?);
        let kek = Kek::from(*shared.as_bytes());
        let wrapped = kek
            .wrap_vec(session.bytes())
            .map_err(|_| CryptoError::Decryption("AES-KW wrap error".into()))?;

        let mut packet = Vec::with_capacity(KEY_PACKET_SIZE);
        packet.push(session.algorithm().code());
        packet.extend_from_slice(&ephemeral_public.to_bytes());
        packet.extend_from_slice(&wrapped);

        // sanity check the packet came out at the fixed size
        if packet.len() != KEY_PACKET_SIZE {
            return Err(CryptoError::Malformed(
                "key packet size mismatch".into(),
            ));
        }

        Ok(packet)
    }

    /// Unwrap a session key packet with this keyring's secret entries.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` for a packet of the wrong shape and
    /// `Decryption` when no secret entry can unwrap it.
    pub fn decrypt_session_key(&self, packet: &[u8]) -> Result<SessionKey, CryptoError> {
        if packet.len() != KEY_PACKET_SIZE {
            return Err(CryptoError::Malformed(format!(
                "invalid key packet size, expected {}, got {}",
                KEY_PACKET_SIZE,
                packet.len()
            )));
        }

        let algorithm = SessionKeyAlgorithm::from_code(packet[0])?;
        let ephemeral_public = PublicKey::try_from(&packet[1..1 + PUBLIC_KEY_SIZE])?;
        let ephemeral_x25519 = ephemeral_public.to_x25519()?;
        let wrapped = &packet[1 + PUBLIC_KEY_SIZE..];

        for entry in &self.entries {
            let Some(secret) = entry.secret.as_ref() else {
                continue;
            };

            let shared = secret.to_x25519().diffie_hellman(&ephemeral_x25519);
            let kek = Kek::from(*shared.as_bytes());
            if let Ok(mut unwrapped) = kek.unwrap_vec(wrapped) {
                if unwrapped.len() != SESSION_KEY_SIZE {
                    unwrapped.zeroize();
                    return Err(CryptoError::Malformed(
                        "unwrapped session key has wrong size".into(),
                    ));
                }
                let session = SessionKey::from_slice(&unwrapped, algorithm);
                unwrapped.zeroize();
                return session;
            }
        }

        Err(CryptoError::Decryption(
            "session key packet not addressed to this keyring".into(),
        ))
    }

    /// Encrypt data to the primary entry, optionally embedding a
    /// signature by `signer` over the plaintext.
    pub fn encrypt(&self, data: &[u8], signer: Option<&KeyRing>) -> Result<Message, CryptoError> {
        let session = SessionKey::generate(SessionKeyAlgorithm::ChaCha20Poly1305);

        let signature = match signer {
            Some(ring) => Some(ring.sign_detached(data)?),
            None => None,
        };

        let framed = frame_payload(data, signature.as_ref());
        let data_packet = session.encrypt(&framed)?;
        let key_packet = self.encrypt_session_key(&session)?;

        Ok(Message::new(key_packet, data_packet))
    }

    /// Decrypt a message, verifying its embedded signature when a
    /// verification keyring is supplied.
    ///
    /// # Errors
    ///
    /// - `Decryption` when no secret entry opens the message
    /// - `SignatureVerification` when verification was requested and
    ///   the embedded signature is missing, future-dated relative to
    ///   `at`, or signed by a key outside `verify`
    pub fn decrypt(
        &self,
        message: &Message,
        verify: Option<&KeyRing>,
        at: i64,
    ) -> Result<Vec<u8>, CryptoError> {
        let session = self.decrypt_session_key(message.key_packet())?;
        let framed = session.decrypt(message.data_packet())?;
        let (signature, payload) = parse_payload(&framed)?;

        if let Some(ring) = verify {
            let signature = signature.ok_or_else(|| {
                CryptoError::SignatureVerification(
                    "message carries no embedded signature".into(),
                )
            })?;
            ring.verify_detached(payload, &signature, at)?;
        }

        Ok(payload.to_vec())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sign_and_verify_detached() {
        let ring = KeyRing::from_secret(SecretKey::generate());
        let signature = ring.sign_detached(b"data to sign").unwrap();

        assert!(ring
            .verify_detached(b"data to sign", &signature, crate::unix_time_now())
            .is_ok());

        let result = ring.verify_detached(b"other data", &signature, crate::unix_time_now());
        assert!(matches!(
            result,
            Err(CryptoError::SignatureVerification(_))
        ));
    }

    #[test]
    fn test_future_dated_signature_rejected() {
        let now = crate::unix_time_now();
        let secret = SecretKey::generate();
        let verifier = KeyRing::from_public(secret.public());

        let forged = Signature::new(secret.sign(b"data"), now + 3600);
        let result = verifier.verify_detached(b"data", &forged, now);
        assert!(matches!(
            result,
            Err(CryptoError::SignatureVerification(_))
        ));

        // At a later time the same signature becomes valid
        assert!(verifier
            .verify_detached(b"data", &forged, now + 3600)
            .is_ok());
    }

    #[test]
    fn test_session_key_packet_roundtrip() {
        for algorithm in [
            SessionKeyAlgorithm::Aes256Gcm,
            SessionKeyAlgorithm::ChaCha20Poly1305,
        ] {
            let ring = KeyRing::from_secret(SecretKey::generate());
            let session = SessionKey::generate(algorithm);

            let packet = ring.encrypt_session_key(&session).unwrap();
            assert_eq!(packet.len(), KEY_PACKET_SIZE);

            let recovered = ring.decrypt_session_key(&packet).unwrap();
            assert_eq!(recovered, session);
            assert_eq!(recovered.algorithm(), algorithm);
        }
    }

    #[test]
    fn test_session_key_packet_wrong_ring() {
        let ring = KeyRing::from_secret(SecretKey::generate());
        let other = KeyRing::from_secret(SecretKey::generate());

        let session = SessionKey::generate(SessionKeyAlgorithm::ChaCha20Poly1305);
        let packet = ring.encrypt_session_key(&session).unwrap();

        let result = other.decrypt_session_key(&packet);
        assert!(matches!(result, Err(CryptoError::Decryption(_))));
    }

    #[test]
    fn test_session_key_packet_later_entry() {
        // The unwrap loop must reach past public-only entries.
        let holder = SecretKey::generate();

        let mut ring = KeyRing::from_public(SecretKey::generate().public());
        ring.add_secret(holder.clone());

        let session = SessionKey::generate(SessionKeyAlgorithm::ChaCha20Poly1305);
        let packet = KeyRing::from_public(holder.public())
            .encrypt_session_key(&session)
            .unwrap();

        let recovered = ring.decrypt_session_key(&packet).unwrap();
        assert_eq!(recovered, session);
    }

    #[test]
    fn test_session_key_packet_truncated() {
        let ring = KeyRing::from_secret(SecretKey::generate());
        let session = SessionKey::generate(SessionKeyAlgorithm::ChaCha20Poly1305);
        let packet = ring.encrypt_session_key(&session).unwrap();

        let result = ring.decrypt_session_key(&packet[..KEY_PACKET_SIZE - 1]);
        assert!(matches!(result, Err(CryptoError::Malformed(_))));
    }

    #[test]
    fn test_encrypt_decrypt_unsigned() {
        let ring = KeyRing::from_secret(SecretKey::generate());
        let message = ring.encrypt(b"the payload", None).unwrap();

        let plaintext = ring.decrypt(&message, None, crate::unix_time_now()).unwrap();
        assert_eq!(plaintext, b"the payload");
    }

    #[test]
    fn test_encrypt_decrypt_signed() {
        let ring = KeyRing::from_secret(SecretKey::generate());
        let signer = KeyRing::from_secret(SecretKey::generate());

        let message = ring.encrypt(b"the payload", Some(&signer)).unwrap();
        let plaintext = ring
            .decrypt(&message, Some(&signer), crate::unix_time_now())
            .unwrap();
        assert_eq!(plaintext, b"the payload");
    }

    #[test]
    fn test_decrypt_wrong_signer_is_signature_error() {
        let ring = KeyRing::from_secret(SecretKey::generate());
        let signer = KeyRing::from_secret(SecretKey::generate());
        let stranger = KeyRing::from_secret(SecretKey::generate());

        let message = ring.encrypt(b"the payload", Some(&signer)).unwrap();
        let result = ring.decrypt(&message, Some(&stranger), crate::unix_time_now());

        // The payload opened fine; only trust failed
        assert!(matches!(
            result,
            Err(CryptoError::SignatureVerification(_))
        ));
    }

    #[test]
    fn test_decrypt_missing_signature_is_signature_error() {
        let ring = KeyRing::from_secret(SecretKey::generate());
        let verifier = KeyRing::from_secret(SecretKey::generate());

        let message = ring.encrypt(b"the payload", None).unwrap();
        let result = ring.decrypt(&message, Some(&verifier), crate::unix_time_now());
        assert!(matches!(
            result,
            Err(CryptoError::SignatureVerification(_))
        ));
    }

    #[test]
    fn test_decrypt_wrong_ring_is_decryption_error() {
        let ring = KeyRing::from_secret(SecretKey::generate());
        let other = KeyRing::from_secret(SecretKey::generate());

        let message = ring.encrypt(b"the payload", None).unwrap();
        let result = other.decrypt(&message, None, crate::unix_time_now());
        assert!(matches!(result, Err(CryptoError::Decryption(_))));
    }

    #[test]
    fn test_primary_public_is_first_entry() {
        let first = SecretKey::generate();
        let mut ring = KeyRing::from_secret(first.clone());
        ring.add_public(SecretKey::generate().public());

        assert_eq!(ring.len(), 2);
        assert_eq!(ring.primary_public().unwrap(), first.public());
        assert!(KeyRing::new().primary_public().is_err());
    }
}
