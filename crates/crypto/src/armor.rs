//! PEM armor for the crate's wire carriers

use crate::error::CryptoError;

/// Tag for armored detached signatures.
pub(crate) const SIGNATURE_TAG: &str = "COFFER SIGNATURE";
/// Tag for armored encrypted messages.
pub(crate) const MESSAGE_TAG: &str = "COFFER MESSAGE";
/// Tag for armored passphrase-locked private keys.
pub(crate) const LOCKED_KEY_TAG: &str = "COFFER ENCRYPTED PRIVATE KEY";

/// Wrap binary contents in a PEM block with the given tag.
pub(crate) fn enarmor(tag: &str, contents: &[u8]) -> String {
    let pem = pem::Pem::new(tag, contents);
    pem::encode(&pem)
}

/// Parse a PEM block, checking that it carries the expected tag.
pub(crate) fn dearmor(tag: &str, armored: &str) -> Result<Vec<u8>, CryptoError> {
    let pem =
        pem::parse(armored).map_err(|e| CryptoError::Armor(format!("failed to parse PEM: {e}")))?;

    if pem.tag() != tag {
        return Err(CryptoError::Armor(format!(
            "invalid PEM tag, expected {}, got {}",
            tag,
            pem.tag()
        )));
    }

    Ok(pem.contents().to_vec())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_armor_roundtrip() {
        let contents = b"some binary contents";
        let armored = enarmor(MESSAGE_TAG, contents);
        assert!(armored.starts_with("-----BEGIN COFFER MESSAGE-----"));

        let recovered = dearmor(MESSAGE_TAG, &armored).unwrap();
        assert_eq!(recovered, contents);
    }

    #[test]
    fn test_armor_wrong_tag() {
        let armored = enarmor(SIGNATURE_TAG, b"contents");
        let result = dearmor(MESSAGE_TAG, &armored);
        assert!(matches!(result, Err(CryptoError::Armor(_))));
    }

    #[test]
    fn test_armor_garbage() {
        let result = dearmor(MESSAGE_TAG, "not an armored block at all");
        assert!(matches!(result, Err(CryptoError::Armor(_))));
    }
}
