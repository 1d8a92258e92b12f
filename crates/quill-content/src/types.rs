//! Content type management.

use quill_core::error::{QuillError, QuillResult};
use quill_core::models::content_type::{ContentType, CreateContentType, UpdateContentType};
use quill_core::models::document::Document;
use quill_core::models::principal::{Capability, Principal};
use quill_core::repository::{ContentTypeRepository, TenantRepository};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Name and schema as submitted for create and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentTypeInput {
    pub name: String,
    pub schema: Option<serde_json::Value>,
}

impl ContentTypeInput {
    pub fn new(name: impl Into<String>, schema: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            schema: Some(schema),
        }
    }

    fn validate(self) -> QuillResult<(String, Document)> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(QuillError::validation("content type name is required"));
        }
        let schema = self
            .schema
            .ok_or_else(|| QuillError::validation("schema is required"))?;
        Ok((name.to_string(), Document::new(schema)?))
    }
}

pub struct ContentTypeService<N: TenantRepository, T: ContentTypeRepository> {
    tenants: N,
    types: T,
}

impl<N: TenantRepository, T: ContentTypeRepository> ContentTypeService<N, T> {
    pub fn new(tenants: N, types: T) -> Self {
        Self { tenants, types }
    }

    /// The caller's tenant must still exist.
    pub async fn create_type(
        &self,
        principal: &Principal,
        input: ContentTypeInput,
    ) -> QuillResult<ContentType> {
        principal.require(Capability::ManageContentTypes)?;
        let (name, schema) = input.validate()?;

        self.tenants.get_by_id(principal.tenant_id).await?;
        if self.types.name_taken(principal.tenant_id, &name, None).await? {
            return Err(QuillError::conflict(format!(
                "content type '{name}' already exists"
            )));
        }

        let created = self
            .types
            .create(CreateContentType {
                tenant_id: principal.tenant_id,
                name,
                schema,
            })
            .await?;
        info!(
            tenant_id = %created.tenant_id,
            content_type_id = %created.id,
            "Content type created"
        );
        Ok(created)
    }

    pub async fn get_all_types(&self, principal: &Principal) -> QuillResult<Vec<ContentType>> {
        principal.require(Capability::ReadContent)?;
        self.types.list(principal.tenant_id).await
    }

    pub async fn get_type(&self, principal: &Principal, id: Uuid) -> QuillResult<ContentType> {
        principal.require(Capability::ReadContent)?;
        self.types.get_by_id(principal.tenant_id, id).await
    }

    pub async fn update_type(
        &self,
        principal: &Principal,
        id: Uuid,
        input: ContentTypeInput,
    ) -> QuillResult<ContentType> {
        principal.require(Capability::ManageContentTypes)?;
        let (name, schema) = input.validate()?;

        self.types.get_by_id(principal.tenant_id, id).await?;
        if self.types.name_taken(principal.tenant_id, &name, Some(id)).await? {
            return Err(QuillError::conflict(format!(
                "content type '{name}' already exists"
            )));
        }

        self.types
            .update(principal.tenant_id, id, UpdateContentType { name, schema })
            .await
    }

    /// Deletes the type together with its entries.
    pub async fn delete_type(&self, principal: &Principal, id: Uuid) -> QuillResult<()> {
        principal.require(Capability::ManageContentTypes)?;
        self.types.delete(principal.tenant_id, id).await?;
        info!(tenant_id = %principal.tenant_id, content_type_id = %id, "Content type deleted");
        Ok(())
    }
}
