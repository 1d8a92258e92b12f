//! Content entry management.

use quill_core::error::{QuillError, QuillResult};
use quill_core::models::content_entry::{ContentEntry, CreateContentEntry};
use quill_core::models::document::Document;
use quill_core::models::principal::{Capability, Principal};
use quill_core::repository::{
    ContentEntryRepository, ContentTypeRepository, Page, TenantRepository,
};
use tracing::info;
use uuid::Uuid;

use crate::query::ListQuery;

fn document(data: Option<serde_json::Value>) -> QuillResult<Document> {
    Document::new(data.ok_or_else(|| QuillError::validation("data is required"))?)
}

pub struct ContentEntryService<N, T, E>
where
    N: TenantRepository,
    T: ContentTypeRepository,
    E: ContentEntryRepository,
{
    tenants: N,
    types: T,
    entries: E,
}

impl<N, T, E> ContentEntryService<N, T, E>
where
    N: TenantRepository,
    T: ContentTypeRepository,
    E: ContentEntryRepository,
{
    pub fn new(tenants: N, types: T, entries: E) -> Self {
        Self {
            tenants,
            types,
            entries,
        }
    }

    /// The tenant must still exist and own the type. New entries are visible.
    pub async fn create_entry(
        &self,
        principal: &Principal,
        content_type_id: Uuid,
        data: Option<serde_json::Value>,
    ) -> QuillResult<ContentEntry> {
        principal.require(Capability::WriteEntries)?;
        let data = document(data)?;
        self.tenants.get_by_id(principal.tenant_id).await?;
        self.types.get_by_id(principal.tenant_id, content_type_id).await?;

        let entry = self
            .entries
            .create(CreateContentEntry {
                tenant_id: principal.tenant_id,
                content_type_id,
                data,
            })
            .await?;
        info!(tenant_id = %entry.tenant_id, entry_id = %entry.id, "Content entry created");
        Ok(entry)
    }

    pub async fn get_entry(&self, principal: &Principal, id: Uuid) -> QuillResult<ContentEntry> {
        principal.require(Capability::ReadContent)?;
        self.entries.get_by_id(principal.tenant_id, id).await
    }

    /// Replaces the data document; type and visibility are untouched.
    pub async fn update_entry(
        &self,
        principal: &Principal,
        id: Uuid,
        data: Option<serde_json::Value>,
    ) -> QuillResult<ContentEntry> {
        principal.require(Capability::WriteEntries)?;
        let data = document(data)?;
        self.entries.update_data(principal.tenant_id, id, data).await
    }

    pub async fn delete_entry(&self, principal: &Principal, id: Uuid) -> QuillResult<()> {
        principal.require(Capability::WriteEntries)?;
        self.entries.delete(principal.tenant_id, id).await?;
        info!(tenant_id = %principal.tenant_id, entry_id = %id, "Content entry deleted");
        Ok(())
    }

    pub async fn toggle_visibility(
        &self,
        principal: &Principal,
        id: Uuid,
    ) -> QuillResult<ContentEntry> {
        principal.require(Capability::WriteEntries)?;
        self.entries.toggle_visibility(principal.tenant_id, id).await
    }

    /// Entries of one type, newest first. An unknown or foreign type
    /// simply yields an empty page.
    pub async fn list_entries(
        &self,
        principal: &Principal,
        content_type_id: Uuid,
        query: &ListQuery,
    ) -> QuillResult<Page<ContentEntry>> {
        principal.require(Capability::ReadContent)?;
        let page = query.page_request()?;
        self.entries
            .list_by_type(principal.tenant_id, content_type_id, &query.filter(), page)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn data_must_be_present_and_an_object() {
        assert!(matches!(document(None), Err(QuillError::Validation { .. })));
        assert!(document(Some(json!("text"))).is_err());
        assert!(document(Some(json!({"name": "Book"}))).is_ok());
    }
}
