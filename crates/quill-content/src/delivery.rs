//! Public, read-only delivery of visible entries by content type name.

use quill_core::error::QuillResult;
use quill_core::models::content_entry::ContentEntry;
use quill_core::models::principal::{Capability, Principal};
use quill_core::repository::{ContentEntryRepository, ContentTypeRepository, Page};
use tracing::debug;

use crate::query::ListQuery;

pub struct DeliveryService<T: ContentTypeRepository, E: ContentEntryRepository> {
    types: T,
    entries: E,
}

impl<T: ContentTypeRepository, E: ContentEntryRepository> DeliveryService<T, E> {
    pub fn new(types: T, entries: E) -> Self {
        Self { types, entries }
    }

    /// Visible entries of the caller's type named `type_name` (case-insensitive).
    pub async fn fetch(
        &self,
        principal: &Principal,
        type_name: &str,
        query: &ListQuery,
    ) -> QuillResult<Page<ContentEntry>> {
        principal.require(Capability::ReadDelivery)?;
        let page = query.page_request()?;
        let content_type = self.types.get_by_name(principal.tenant_id, type_name.trim()).await?;

        debug!(
            tenant_id = %principal.tenant_id,
            content_type_id = %content_type.id,
            auth_method = %principal.auth_method,
            "Delivering content"
        );

        self.entries
            .list_by_type(
                principal.tenant_id,
                content_type.id,
                &query.filter().visible(),
                page,
            )
            .await
    }
}
