use std::fmt;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{TryRngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

/// Challenge method sent alongside the code challenge.
pub const CHALLENGE_METHOD: &str = "S256";

// 96 random bytes encode to exactly 128 base64url characters, the longest
// verifier RFC 7636 allows.
const VERIFIER_BYTES: usize = 96;
const STATE_BYTES: usize = 24;

#[derive(Debug)]
pub enum PkceError {
    Entropy(String),
}

impl fmt::Display for PkceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PkceError::Entropy(e) => write!(f, "secure random source unavailable: {}", e),
        }
    }
}

impl std::error::Error for PkceError {}

/// One-time verifier/challenge pair for a PKCE authorization.
///
/// Only the challenge leaves the process with the authorization request. The
/// verifier is presented once, when the authorization code is exchanged.
#[derive(Clone, PartialEq, Eq)]
pub struct PkceCodes {
    verifier: String,
    challenge: String,
}

impl PkceCodes {
    /// Draws a fresh verifier from the operating system's secure random source.
    ///
    /// # Errors
    ///
    /// Fails only when the entropy source cannot be read. Callers treat that as
    /// fatal; there is no retry.
    pub fn generate() -> Result<Self, PkceError> {
        let verifier = random_urlsafe(VERIFIER_BYTES)?;
        Ok(Self::from_verifier(verifier))
    }

    /// Derives the pair from a known verifier.
    pub fn from_verifier(verifier: impl Into<String>) -> Self {
        let verifier = verifier.into();
        let challenge = generate_code_challenge(&verifier);
        Self {
            verifier,
            challenge,
        }
    }

    pub fn verifier(&self) -> &str {
        &self.verifier
    }

    pub fn challenge(&self) -> &str {
        &self.challenge
    }
}

impl fmt::Debug for PkceCodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PkceCodes")
            .field("verifier", &"<redacted>")
            .field("challenge", &self.challenge)
            .finish()
    }
}

/// Base64url (no padding) encoding of the SHA-256 digest of `verifier`.
pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Generates the unguessable `state` value bound to one authorization attempt.
pub fn generate_state() -> Result<String, PkceError> {
    random_urlsafe(STATE_BYTES)
}

fn random_urlsafe(len: usize) -> Result<String, PkceError> {
    let mut buf = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| PkceError::Entropy(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(buf))
}
