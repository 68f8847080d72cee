//! Encrypted messages
//!
//! A [`Message`] is the asymmetric carrier used for passphrases, node
//! names and hash keys: a key packet that wraps a fresh session key
//! for the recipient, followed by a data packet sealed under that
//! session key. The data packet's plaintext may embed a signature over
//! the payload, checked during decryption when the caller supplies a
//! verification keyring.
//!
//! # Wire Format
//!
//! ```text
//! [ key packet: 73 ][ data packet: nonce || AEAD(hash || flag || [signature] || payload) ]
//! ```
//!
//! Armored with the `COFFER MESSAGE` tag.

use crate::armor;
use crate::error::CryptoError;
use crate::keyring::KEY_PACKET_SIZE;
use crate::signature::{Signature, SIGNATURE_SIZE};

/// Inner flag marking an unsigned payload.
const FLAG_PLAIN: u8 = 0;
/// Inner flag marking a payload preceded by an embedded signature.
const FLAG_SIGNED: u8 = 1;

/// An encrypted message addressed to a keyring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    key_packet: Vec<u8>,
    data_packet: Vec<u8>,
}

impl Message {
    pub(crate) fn new(key_packet: Vec<u8>, data_packet: Vec<u8>) -> Self {
        Self {
            key_packet,
            data_packet,
        }
    }

    /// The wrapped-session-key packet.
    pub fn key_packet(&self) -> &[u8] {
        &self.key_packet
    }

    /// The AEAD data packet.
    pub fn data_packet(&self) -> &[u8] {
        &self.data_packet
    }

    /// Encode as raw bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.key_packet.len() + self.data_packet.len());
        out.extend_from_slice(&self.key_packet);
        out.extend_from_slice(&self.data_packet);
        out
    }

    /// Decode from raw bytes.
    ///
    /// Only the packet split is checked here; the data packet's
    /// integrity surfaces at decryption.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() <= KEY_PACKET_SIZE {
            return Err(CryptoError::Malformed(format!(
                "message too short, expected more than {} bytes, got {}",
                KEY_PACKET_SIZE,
                bytes.len()
            )));
        }
        Ok(Self {
            key_packet: bytes[..KEY_PACKET_SIZE].to_vec(),
            data_packet: bytes[KEY_PACKET_SIZE..].to_vec(),
        })
    }

    /// Encode as an armored text block.
    pub fn to_armored(&self) -> String {
        armor::enarmor(armor::MESSAGE_TAG, &self.to_bytes())
    }

    /// Parse from an armored text block.
    pub fn from_armored(armored: &str) -> Result<Self, CryptoError> {
        let bytes = armor::dearmor(armor::MESSAGE_TAG, armored)?;
        Self::from_bytes(&bytes)
    }
}

/// Frame a payload with its optional embedded signature.
pub(crate) fn frame_payload(payload: &[u8], signature: Option<&Signature>) -> Vec<u8> {
    match signature {
        Some(sig) => {
            let mut framed = Vec::with_capacity(1 + SIGNATURE_SIZE + payload.len());
            framed.push(FLAG_SIGNED);
            framed.extend_from_slice(&sig.to_bytes());
            framed.extend_from_slice(payload);
            framed
        }
        None => {
            let mut framed = Vec::with_capacity(1 + payload.len());
            framed.push(FLAG_PLAIN);
            framed.extend_from_slice(payload);
            framed
        }
    }
}

/// Split a decrypted frame back into its embedded signature and payload.
pub(crate) fn parse_payload(framed: &[u8]) -> Result<(Option<Signature>, &[u8]), CryptoError> {
    let (&flag, rest) = framed
        .split_first()
        .ok_or_else(|| CryptoError::Malformed("empty message frame".into()))?;

    match flag {
        FLAG_PLAIN => Ok((None, rest)),
        FLAG_SIGNED => {
            if rest.len() < SIGNATURE_SIZE {
                return Err(CryptoError::Malformed(
                    "message frame too short for embedded signature".into(),
                ));
            }
            let signature = Signature::from_bytes(&rest[..SIGNATURE_SIZE])?;
            Ok((Some(signature), &rest[SIGNATURE_SIZE..]))
        }
        other => Err(CryptoError::Malformed(format!(
            "unknown message frame flag {other}"
        ))),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::keys::SecretKey;

    #[test]
    fn test_frame_roundtrip_plain() {
        let framed = frame_payload(b"payload bytes", None);
        let (sig, payload) = parse_payload(&framed).unwrap();
        assert!(sig.is_none());
        assert_eq!(payload, b"payload bytes");
    }

    #[test]
    fn test_frame_roundtrip_signed() {
        let key = SecretKey::generate();
        let sig = Signature::new(key.sign(b"payload bytes"), 1_700_000_000);

        let framed = frame_payload(b"payload bytes", Some(&sig));
        let (parsed_sig, payload) = parse_payload(&framed).unwrap();

        assert_eq!(parsed_sig.as_ref(), Some(&sig));
        assert_eq!(payload, b"payload bytes");
    }

    #[test]
    fn test_frame_empty() {
        assert!(matches!(
            parse_payload(b""),
            Err(CryptoError::Malformed(_))
        ));
    }

    #[test]
    fn test_frame_bad_flag() {
        assert!(matches!(
            parse_payload(&[7, 1, 2, 3]),
            Err(CryptoError::Malformed(_))
        ));
    }

    #[test]
    fn test_message_bytes_roundtrip() {
        let msg = Message::new(vec![1u8; KEY_PACKET_SIZE], vec![2u8; 40]);
        let bytes = msg.to_bytes();
        let recovered = Message::from_bytes(&bytes).unwrap();
        assert_eq!(msg, recovered);
    }

    #[test]
    fn test_message_too_short() {
        assert!(matches!(
            Message::from_bytes(&[0u8; KEY_PACKET_SIZE]),
            Err(CryptoError::Malformed(_))
        ));
    }

    #[test]
    fn test_message_armor_roundtrip() {
        let msg = Message::new(vec![3u8; KEY_PACKET_SIZE], vec![4u8; 64]);
        let armored = msg.to_armored();
        assert!(armored.contains("COFFER MESSAGE"));

        let recovered = Message::from_armored(&armored).unwrap();
        assert_eq!(msg, recovered);
    }
}
