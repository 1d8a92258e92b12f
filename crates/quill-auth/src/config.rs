//! Authentication configuration.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// `from` plus `secs` seconds, if both the lifetime and the resulting
/// instant are representable.
pub(crate) fn expires_at(secs: u64, from: DateTime<Utc>) -> Result<DateTime<Utc>, AuthError> {
    i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|lifetime| from.checked_add_signed(lifetime))
        .ok_or_else(|| AuthError::Config(format!("lifetime of {secs}s is out of range")))
}

/// Configuration for credentials, passwords, and single-use tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared HS256 signing secret for access tokens.
    pub jwt_secret: String,
    /// JWT issuer (`iss` claim).
    pub jwt_issuer: String,
    /// Access token lifetime in seconds (default: 86_400 = 24 hours).
    pub access_token_lifetime_secs: u64,
    /// Optional pepper prepended to passwords before Argon2id hashing.
    pub pepper: Option<String>,
    /// Minimum password length for policy enforcement.
    pub min_password_length: usize,
    /// Email verification token lifetime in seconds (default: 24 hours).
    pub verification_token_lifetime_secs: u64,
    /// Password reset token lifetime in seconds (default: 1 hour).
    pub reset_token_lifetime_secs: u64,
    /// Base URL of the dashboard, used to build links in emails.
    pub public_base_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_issuer: "quill".into(),
            access_token_lifetime_secs: 86_400,
            pepper: None,
            min_password_length: 8,
            verification_token_lifetime_secs: 86_400,
            reset_token_lifetime_secs: 3_600,
            public_base_url: "http://localhost:3000".into(),
        }
    }
}

impl AuthConfig {
    /// Rejects token lifetimes that cannot be added to the current time.
    pub fn validate(&self) -> Result<(), AuthError> {
        let now = Utc::now();
        for secs in [
            self.access_token_lifetime_secs,
            self.verification_token_lifetime_secs,
            self.reset_token_lifetime_secs,
        ] {
            expires_at(secs, now)?;
        }
        Ok(())
    }

    pub(crate) fn pepper(&self) -> Option<&str> {
        self.pepper.as_deref()
    }

    /// Link with the email and token as query-encoded parameters.
    pub(crate) fn link(&self, path: &str, email: &str, token: &str) -> String {
        format!(
            "{}/{path}?email={}&token={}",
            self.public_base_url.trim_end_matches('/'),
            urlencoding::encode(email),
            urlencoding::encode(token),
        )
    }
}
