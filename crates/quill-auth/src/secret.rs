//! Opaque secret generation, hashing, and redaction.
//!
//! API keys and single-use tokens are never stored in plaintext: the
//! store holds `hash_secret(plaintext)` and lookups hash the presented
//! value first.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use rand::Rng;
use rand::distr::Alphanumeric;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Prefix that marks a string as a Quill API key.
pub const API_KEY_PREFIX: &str = "qk_";

/// Length of verification and reset tokens.
pub const TOKEN_LENGTH: usize = 48;

/// `qk_` followed by 32 random bytes, base64url without padding.
pub fn generate_api_key() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    format!("{API_KEY_PREFIX}{}", URL_SAFE_NO_PAD.encode(bytes))
}

/// Random alphanumeric token for email verification and password reset.
pub fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// SHA-256 of the secret, standard base64.
pub fn hash_secret(secret: &str) -> String {
    STANDARD.encode(Sha256::digest(secret.as_bytes()))
}

/// Compares a presented secret against a stored hash in constant time.
pub fn secret_matches(presented: &str, stored_hash: &str) -> bool {
    hash_secret(presented)
        .as_bytes()
        .ct_eq(stored_hash.as_bytes())
        .into()
}

/// Last four characters of a stored hash, or `****` if it is shorter.
pub fn redact(stored_hash: &str) -> String {
    let chars: Vec<char> = stored_hash.chars().collect();
    if chars.len() < 4 {
        return "****".into();
    }
    chars[chars.len() - 4..].iter().collect()
}
