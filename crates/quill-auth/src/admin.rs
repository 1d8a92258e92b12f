//! Platform-level tenant administration.

use quill_core::error::{QuillError, QuillResult};
use quill_core::models::principal::{Capability, Principal};
use quill_core::models::tenant::{CreateTenant, Tenant};
use quill_core::repository::TenantRepository;
use tracing::info;
use uuid::Uuid;

/// Tenant management for `SuperAdmin` principals.
pub struct TenantAdminService<T: TenantRepository> {
    tenants: T,
}

impl<T: TenantRepository> TenantAdminService<T> {
    pub fn new(tenants: T) -> Self {
        Self { tenants }
    }

    pub async fn create_tenant(
        &self,
        principal: &Principal,
        input: CreateTenant,
    ) -> QuillResult<Tenant> {
        principal.require(Capability::ManageTenants)?;

        let name = input.name.trim();
        if name.is_empty() {
            return Err(QuillError::validation("tenant name is required"));
        }
        match self.tenants.get_by_name(name).await {
            Ok(_) => {
                return Err(QuillError::conflict(format!("tenant '{name}' already exists")));
            }
            Err(QuillError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let tenant = self
            .tenants
            .create(CreateTenant {
                name: name.to_string(),
                plan: input.plan,
            })
            .await?;
        info!(tenant_id = %tenant.id, plan = %tenant.plan, "Tenant created");
        Ok(tenant)
    }

    pub async fn list_tenants(&self, principal: &Principal) -> QuillResult<Vec<Tenant>> {
        principal.require(Capability::ManageTenants)?;
        self.tenants.list().await
    }

    pub async fn get_tenant(&self, principal: &Principal, id: Uuid) -> QuillResult<Tenant> {
        principal.require(Capability::ManageTenants)?;
        self.tenants.get_by_id(id).await
    }

    /// Removes the tenant with all of its users, keys, types, and entries.
    pub async fn delete_tenant(&self, principal: &Principal, id: Uuid) -> QuillResult<()> {
        principal.require(Capability::ManageTenants)?;
        self.tenants.delete(id).await
    }
}
