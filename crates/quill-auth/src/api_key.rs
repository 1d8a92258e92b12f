//! API key lifecycle: create, list, read, delete.
//!
//! The plaintext key is returned exactly once, by [`ApiKeyService::create_key`].
//! Reads expose only the last characters of the stored hash.

use quill_core::error::{QuillError, QuillResult};
use quill_core::models::api_key::{ApiKey, ApiKeySummary, CreateApiKey, CreatedApiKey};
use quill_core::models::principal::{Capability, Principal};
use quill_core::repository::{ApiKeyRepository, TenantRepository};
use tracing::info;
use uuid::Uuid;

use crate::secret::{generate_api_key, hash_secret, redact};

/// Longest accepted key name, in characters.
pub const MAX_NAME_LENGTH: usize = 100;

fn summary(key: ApiKey) -> ApiKeySummary {
    ApiKeySummary {
        id: key.id,
        name: key.name,
        key: redact(&key.key_hash),
        created_at: key.created_at,
    }
}

pub struct ApiKeyService<T: TenantRepository, K: ApiKeyRepository> {
    tenants: T,
    api_keys: K,
}

impl<T: TenantRepository, K: ApiKeyRepository> ApiKeyService<T, K> {
    pub fn new(tenants: T, api_keys: K) -> Self {
        Self { tenants, api_keys }
    }

    /// Fails with `NotFound` once the caller's tenant has been deleted.
    pub async fn create_key(
        &self,
        principal: &Principal,
        name: &str,
    ) -> QuillResult<CreatedApiKey> {
        principal.require(Capability::ManageApiKeys)?;

        let name = name.trim();
        if name.is_empty() {
            return Err(QuillError::validation("API key name is required"));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(QuillError::validation(format!(
                "API key name cannot exceed {MAX_NAME_LENGTH} characters"
            )));
        }
        self.tenants.get_by_id(principal.tenant_id).await?;
        if self.api_keys.name_exists(principal.tenant_id, name).await? {
            return Err(QuillError::conflict(format!(
                "an API key named '{name}' already exists"
            )));
        }

        let plaintext = generate_api_key();
        let stored = self
            .api_keys
            .create(CreateApiKey {
                tenant_id: principal.tenant_id,
                name: name.to_string(),
                key_hash: hash_secret(&plaintext),
            })
            .await?;

        info!(tenant_id = %stored.tenant_id, api_key_id = %stored.id, "API key created");

        Ok(CreatedApiKey {
            id: stored.id,
            name: stored.name,
            key: plaintext,
            created_at: stored.created_at,
        })
    }

    pub async fn list_keys(&self, principal: &Principal) -> QuillResult<Vec<ApiKeySummary>> {
        principal.require(Capability::ManageApiKeys)?;
        let keys = self.api_keys.list(principal.tenant_id).await?;
        Ok(keys.into_iter().map(summary).collect())
    }

    pub async fn get_key(&self, principal: &Principal, id: Uuid) -> QuillResult<ApiKeySummary> {
        principal.require(Capability::ManageApiKeys)?;
        let key = self.api_keys.get_by_id(principal.tenant_id, id).await?;
        Ok(summary(key))
    }

    pub async fn delete_key(&self, principal: &Principal, id: Uuid) -> QuillResult<()> {
        principal.require(Capability::ManageApiKeys)?;
        self.api_keys.delete(principal.tenant_id, id).await?;
        info!(tenant_id = %principal.tenant_id, api_key_id = %id, "API key deleted");
        Ok(())
    }
}
