//! Credential resolution: turns request headers into a [`Principal`].
//!
//! An `X-Api-Key` header always wins. Once it is present the bearer path
//! is never consulted, even if the key does not match. Either way the
//! principal's tenant must still exist.

use quill_core::error::{QuillError, QuillResult};
use quill_core::models::principal::Principal;
use quill_core::repository::{ApiKeyRepository, TenantRepository};
use tracing::{debug, warn};

use crate::config::AuthConfig;
use crate::secret::hash_secret;
use crate::token::decode_access_token;

pub const API_KEY_HEADER: &str = "X-Api-Key";
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Raw credential headers offered with a request.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub api_key: Option<String>,
    pub authorization: Option<String>,
}

impl Credentials {
    /// Picks the credential headers out of a header list. Names match
    /// case-insensitively; the first occurrence wins.
    pub fn from_headers<'a>(headers: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut credentials = Self::default();
        for (name, value) in headers {
            if name.eq_ignore_ascii_case(API_KEY_HEADER) && credentials.api_key.is_none() {
                credentials.api_key = Some(value.to_string());
            } else if name.eq_ignore_ascii_case(AUTHORIZATION_HEADER)
                && credentials.authorization.is_none()
            {
                credentials.authorization = Some(value.to_string());
            }
        }
        credentials
    }

    pub fn with_api_key(key: impl Into<String>) -> Self {
        Self {
            api_key: Some(key.into()),
            authorization: None,
        }
    }

    pub fn with_bearer(token: &str) -> Self {
        Self {
            api_key: None,
            authorization: Some(format!("Bearer {token}")),
        }
    }
}

fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("Bearer") && !token.is_empty()).then_some(token)
}

/// Resolves credentials against stored API keys and the JWT signing key.
pub struct CredentialResolver<T: TenantRepository, K: ApiKeyRepository> {
    tenants: T,
    api_keys: K,
    config: AuthConfig,
}

impl<T: TenantRepository, K: ApiKeyRepository> CredentialResolver<T, K> {
    pub fn new(tenants: T, api_keys: K, config: AuthConfig) -> Self {
        Self {
            tenants,
            api_keys,
            config,
        }
    }

    pub async fn resolve(&self, credentials: &Credentials) -> QuillResult<Principal> {
        let principal = if let Some(key) = &credentials.api_key {
            self.resolve_api_key(key).await?
        } else if let Some(header) = &credentials.authorization {
            self.resolve_bearer(header)?
        } else {
            return Err(QuillError::Unauthenticated);
        };

        match self.tenants.get_by_id(principal.tenant_id).await {
            Ok(_) => Ok(principal),
            Err(QuillError::NotFound { .. }) => {
                warn!(
                    tenant_id = %principal.tenant_id,
                    "Rejected credential of a deleted tenant"
                );
                Err(QuillError::invalid_credential("tenant no longer exists"))
            }
            Err(e) => Err(e),
        }
    }

    async fn resolve_api_key(&self, key: &str) -> QuillResult<Principal> {
        match self.api_keys.get_by_hash(&hash_secret(key.trim())).await {
            Ok(stored) => {
                debug!(tenant_id = %stored.tenant_id, api_key_id = %stored.id, "API key accepted");
                Ok(Principal::api_key(stored.tenant_id, stored.id))
            }
            Err(QuillError::NotFound { .. }) => {
                warn!("Rejected unknown API key");
                Err(QuillError::invalid_credential("invalid API key"))
            }
            Err(e) => Err(e),
        }
    }

    fn resolve_bearer(&self, header: &str) -> QuillResult<Principal> {
        let token = bearer_token(header).ok_or_else(|| {
            warn!("Rejected malformed Authorization header");
            QuillError::invalid_credential("expected a Bearer token")
        })?;

        let principal = decode_access_token(token, &self.config)
            .and_then(|claims| claims.principal())
            .map_err(|e| {
                warn!(error = %e, "Rejected bearer token");
                QuillError::from(e)
            })?;
        Ok(principal)
    }
}
