//! User domain model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum UserRole {
    Admin,
    User,
    Viewer,
    SuperAdmin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::User => "User",
            Self::Viewer => "Viewer",
            Self::SuperAdmin => "SuperAdmin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Self::Admin),
            "User" => Ok(Self::User),
            "Viewer" => Ok(Self::Viewer),
            "SuperAdmin" => Ok(Self::SuperAdmin),
            other => Err(format!("unknown user role: {other}")),
        }
    }
}

/// The two kinds of single-use token a user can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    EmailVerification,
    PasswordReset,
}

/// Stored state of an issued single-use token. Only the hash is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleUseToken {
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

impl SingleUseToken {
    /// A token is valid at any instant strictly before `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Owning tenant; immutable after creation.
    pub tenant_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub email_verified: bool,
    pub verification: Option<SingleUseToken>,
    pub password_reset: Option<SingleUseToken>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn token(&self, kind: TokenKind) -> Option<&SingleUseToken> {
        match kind {
            TokenKind::EmailVerification => self.verification.as_ref(),
            TokenKind::PasswordReset => self.password_reset.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub tenant_id: Uuid,
    pub full_name: String,
    pub email: String,
    /// Argon2id PHC string; plaintext passwords never reach the store.
    pub password_hash: String,
    pub role: UserRole,
    pub verification: Option<SingleUseToken>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn token_valid_strictly_before_expiry() {
        let expires_at = Utc::now();
        let token = SingleUseToken {
            token_hash: "h".into(),
            expires_at,
        };
        assert!(!token.is_expired_at(expires_at - Duration::milliseconds(1)));
        assert!(token.is_expired_at(expires_at));
        assert!(token.is_expired_at(expires_at + Duration::seconds(1)));
    }

    #[test]
    fn role_round_trips_through_str() {
        for role in [
            UserRole::Admin,
            UserRole::User,
            UserRole::Viewer,
            UserRole::SuperAdmin,
        ] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
        assert!("Owner".parse::<UserRole>().is_err());
    }
}
