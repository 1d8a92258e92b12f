//! Per-tenant dashboard statistics.

use std::collections::HashMap;

use quill_core::error::QuillResult;
use quill_core::models::content_entry::RecentEntry;
use quill_core::models::principal::{Capability, Principal};
use quill_core::repository::{ApiKeyRepository, ContentEntryRepository, ContentTypeRepository};
use serde::{Deserialize, Serialize};

/// Number of entries shown in the "recent" list.
pub const RECENT_ENTRIES: u64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_content_types: u64,
    pub total_entries: u64,
    pub total_api_keys: u64,
    pub recent_entries: Vec<RecentEntry>,
}

pub struct DashboardService<T, E, K>
where
    T: ContentTypeRepository,
    E: ContentEntryRepository,
    K: ApiKeyRepository,
{
    types: T,
    entries: E,
    api_keys: K,
}

impl<T, E, K> DashboardService<T, E, K>
where
    T: ContentTypeRepository,
    E: ContentEntryRepository,
    K: ApiKeyRepository,
{
    pub fn new(types: T, entries: E, api_keys: K) -> Self {
        Self {
            types,
            entries,
            api_keys,
        }
    }

    pub async fn stats(&self, principal: &Principal) -> QuillResult<DashboardStats> {
        principal.require(Capability::ViewDashboard)?;
        let tenant_id = principal.tenant_id;

        let types = self.types.list(tenant_id).await?;
        let total_entries = self.entries.count(tenant_id).await?;
        let total_api_keys = self.api_keys.count(tenant_id).await?;
        let recent = self.entries.recent(tenant_id, RECENT_ENTRIES).await?;

        let names: HashMap<_, _> = types.iter().map(|t| (t.id, t.name.as_str())).collect();
        let recent_entries = recent
            .into_iter()
            .map(|entry| RecentEntry {
                id: entry.id,
                type_name: names
                    .get(&entry.content_type_id)
                    .copied()
                    .unwrap_or_default()
                    .to_string(),
                created_at: entry.created_at,
            })
            .collect();

        Ok(DashboardStats {
            total_content_types: types.len() as u64,
            total_entries,
            total_api_keys,
            recent_entries,
        })
    }
}
