//! Block upload verification tokens
//!
//! When a client uploads a revision, the server wants proof that each
//! ciphertext block decrypts under the session key the client claims to
//! hold, without paying for a full checksum pass per block. The proof is
//! a token XORing a server-issued secret code with the ciphertext
//! prefix, gated behind a decrypt of the block.

use base64::Engine;

use crypto::{KeyRing, SessionKey};

use crate::drive::VerificationData;

use super::KeychainError;

/// Size of a decoded verification code and of every token, in raw bytes.
const TOKEN_SIZE: usize = 32;

/// Pairs an upload session's verification code with the file's session
/// key to produce per-block possession tokens.
///
/// One verifier is constructed per file upload and shared read-only by
/// the workers encrypting blocks: both fields are set at construction
/// and never mutated, so concurrent
/// [`verification_token`](Self::verification_token) calls need no
/// synchronization.
#[derive(Clone)]
pub struct BlockVerifier {
    verification_code: [u8; TOKEN_SIZE],
    session_key: SessionKey,
}

impl BlockVerifier {
    /// Decode the verification data and unwrap the file's session key.
    ///
    /// The content key packet signature is not rechecked here; it was
    /// verified once per file when the session key was first resolved.
    pub fn new(data: &VerificationData, keyring: &KeyRing) -> Result<Self, KeychainError> {
        let code = base64::engine::general_purpose::STANDARD
            .decode(&data.verification_code)
            .map_err(|err| KeychainError::Decode(format!("verification code: {err}")))?;

        let verification_code: [u8; TOKEN_SIZE] = code.try_into().map_err(|code: Vec<u8>| {
            KeychainError::Decode(format!(
                "verification code must be {TOKEN_SIZE} bytes, got {}",
                code.len()
            ))
        })?;

        let packet = base64::engine::general_purpose::STANDARD
            .decode(&data.content_key_packet)
            .map_err(|err| KeychainError::Decode(format!("content key packet: {err}")))?;

        let session_key = keyring.decrypt_session_key(&packet)?;

        Ok(Self {
            verification_code,
            session_key,
        })
    }

    /// Produce the possession token for one encrypted block.
    ///
    /// The ciphertext must decrypt under the session key; a block that
    /// fails to decrypt gets no token. The token is the verification
    /// code XORed with the first 32 bytes of the ciphertext, zero-padded
    /// when the ciphertext is shorter, then base64 encoded. It is always
    /// exactly 32 raw bytes.
    pub fn verification_token(&self, ciphertext: &[u8]) -> Result<String, KeychainError> {
        self.session_key
            .decrypt(ciphertext)
            .map_err(|err| KeychainError::Decryption(format!("failed to decrypt block: {err}")))?;

        let token = xor_token(&self.verification_code, ciphertext);

        Ok(base64::engine::general_purpose::STANDARD.encode(token))
    }
}

impl std::fmt::Debug for BlockVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockVerifier")
            .field("verification_code", &"[REDACTED]")
            .field("session_key", &self.session_key)
            .finish()
    }
}

/// XOR the code with the first 32 bytes of the data, reading zeros past
/// the end of data shorter than 32 bytes.
fn xor_token(code: &[u8; TOKEN_SIZE], data: &[u8]) -> [u8; TOKEN_SIZE] {
    let mut token = [0u8; TOKEN_SIZE];
    for (i, byte) in token.iter_mut().enumerate() {
        *byte = code[i] ^ data.get(i).copied().unwrap_or(0);
    }

    token
}
