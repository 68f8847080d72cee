use thiserror::Error;

/// Errors that can occur in the primitive provider
///
/// `Decryption` and `SignatureVerification` are distinct on purpose:
/// the first means the ciphertext never opened, the second means the
/// bytes opened (or were plainly readable) but cannot be trusted.
/// Callers key recovery decisions off the variant, so operations must
/// never collapse one into the other.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Armored text that does not parse or carries the wrong tag.
    #[error("armor error: {0}")]
    Armor(String),

    /// Binary material with an invalid layout: truncated packets, bad
    /// lengths, invalid curve points, non-UTF-8 where text is required.
    #[error("malformed input: {0}")]
    Malformed(String),

    /// An authenticated decryption or key unwrap failed.
    #[error("decryption error: {0}")]
    Decryption(String),

    /// The payload was recovered but its signature did not check out
    /// against the expected signer.
    #[error("signature verification error: {0}")]
    SignatureVerification(String),

    /// A locked private key refused the supplied passphrase.
    #[error("unlock error: {0}")]
    Unlock(String),
}
