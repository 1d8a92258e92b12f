//! HS256 JWT access token issuance and verification.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use quill_core::models::principal::Principal;
use quill_core::models::user::{User, UserRole};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{AuthConfig, expires_at};
use crate::error::AuthError;

/// JWT claims embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject — user ID (UUID string).
    pub sub: String,
    /// Tenant ID (UUID string).
    pub tenant_id: String,
    pub role: String,
    pub email: String,
    /// Issuer.
    pub iss: String,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
    /// Unique token ID (UUID string).
    pub jti: String,
}

impl AccessTokenClaims {
    /// The caller identity these claims assert.
    pub fn principal(&self) -> Result<Principal, AuthError> {
        let user_id = Uuid::parse_str(&self.sub)
            .map_err(|e| AuthError::TokenInvalid(format!("sub: {e}")))?;
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| AuthError::TokenInvalid(format!("tenant_id: {e}")))?;
        let role: UserRole = self
            .role
            .parse()
            .map_err(|e| AuthError::TokenInvalid(format!("role: {e}")))?;
        Ok(Principal::user(tenant_id, user_id, role))
    }
}

fn secret(config: &AuthConfig) -> Result<&[u8], AuthError> {
    if config.jwt_secret.is_empty() {
        return Err(AuthError::Crypto("JWT signing secret is not configured".into()));
    }
    Ok(config.jwt_secret.as_bytes())
}

/// Issue a signed HS256 access token for a user.
pub fn issue_access_token(user: &User, config: &AuthConfig) -> Result<String, AuthError> {
    let issued_at = Utc::now();
    let expires = expires_at(config.access_token_lifetime_secs, issued_at)?;
    let claims = AccessTokenClaims {
        sub: user.id.to_string(),
        tenant_id: user.tenant_id.to_string(),
        role: user.role.as_str().to_string(),
        email: user.email.clone(),
        iss: config.jwt_issuer.clone(),
        iat: issued_at.timestamp(),
        exp: expires.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    let key = EncodingKey::from_secret(secret(config)?);
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)
        .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
}

/// Decode and verify an HS256 access token: signature, issuer, and
/// expiry with zero leeway.
pub fn decode_access_token(
    token: &str,
    config: &AuthConfig,
) -> Result<AccessTokenClaims, AuthError> {
    let key = DecodingKey::from_secret(secret(config)?);

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_issuer(&[&config.jwt_issuer]);
    validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);

    jsonwebtoken::decode::<AccessTokenClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid(e.to_string()),
        })
}
