//! PKCE (Proof Key for Code Exchange) helpers, RFC 7636.
//!
//! Used for browser sign-in so no client secret has to live on the user's
//! machine.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// A PKCE verifier/challenge pair plus the CSRF state token for one
/// authorization round trip.
#[derive(Debug, Clone)]
pub struct PkceChallenge {
    pub code_verifier: String,
    pub code_challenge: String,
    pub state: String,
}

impl PkceChallenge {
    /// Generate a fresh verifier, its S256 challenge, and a state token.
    #[must_use]
    pub fn generate() -> Self {
        let code_verifier = random_url_safe_token();
        let code_challenge = code_challenge_for(&code_verifier);
        Self { code_verifier, code_challenge, state: random_url_safe_token() }
    }

    /// Challenge method sent alongside the challenge.
    #[must_use]
    pub fn challenge_method(&self) -> &'static str {
        "S256"
    }
}

/// URL-safe base64 of 32 random bytes (43 characters, within the RFC 7636
/// 43-128 character window).
fn random_url_safe_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// BASE64URL(SHA256(ASCII(code_verifier))) per RFC 7636.
fn code_challenge_for(verifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// Constant-shape state comparison for CSRF protection.
#[must_use]
pub fn validate_state(expected: &str, actual: &str) -> bool {
    !expected.is_empty() && expected == actual
}
