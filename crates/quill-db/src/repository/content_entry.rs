//! SurrealDB implementation of [`ContentEntryRepository`].
//!
//! Entry ids are UUIDv7, so ordering by the record id string is ordering
//! by creation time.

use chrono::{DateTime, Utc};
use quill_core::error::QuillResult;
use quill_core::models::content_entry::{ContentEntry, CreateContentEntry, EntryFilter};
use quill_core::models::document::Document;
use quill_core::repository::{ContentEntryRepository, Page, PageRequest};
use surrealdb::{Connection, Surreal};
use surrealdb_types::{SurrealValue, Value};
use uuid::Uuid;

use super::{CountRow, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ContentEntryRow {
    record_id: String,
    tenant_id: String,
    content_type_id: String,
    data: serde_json::Value,
    is_visible: bool,
    created_at: DateTime<Utc>,
}

impl ContentEntryRow {
    fn try_into_entry(self) -> Result<ContentEntry, DbError> {
        Ok(ContentEntry {
            id: parse_uuid(&self.record_id, "content entry")?,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            content_type_id: parse_uuid(&self.content_type_id, "content type")?,
            data: Document::new(self.data).map_err(|e| DbError::Decode(e.to_string()))?,
            is_visible: self.is_visible,
            created_at: self.created_at,
        })
    }
}

const SELECT_SCOPED: &str = "SELECT meta::id(id) AS record_id, * \
     FROM type::record('content_entry', $id) \
     WHERE tenant_id = $tenant_id";

fn first_entry(rows: Vec<ContentEntryRow>, id: String) -> Result<ContentEntry, DbError> {
    rows.into_iter()
        .next()
        .ok_or(DbError::NotFound {
            entity: "content_entry".into(),
            id,
        })?
        .try_into_entry()
}

fn into_entries(rows: Vec<ContentEntryRow>) -> Result<Vec<ContentEntry>, DbError> {
    rows.into_iter().map(ContentEntryRow::try_into_entry).collect()
}

/// SurrealDB implementation of the ContentEntry repository.
#[derive(Clone)]
pub struct SurrealContentEntryRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealContentEntryRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// Runs `UPDATE … SET <assignments>` on one owned entry and re-reads it.
    async fn update_scoped(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        assignments: &str,
        data: Option<serde_json::Value>,
    ) -> Result<ContentEntry, DbError> {
        let id_str = id.to_string();

        let mut query = self
            .db
            .query(format!(
                "UPDATE type::record('content_entry', $id) SET {assignments} \
                 WHERE tenant_id = $tenant_id; \
                 {SELECT_SCOPED};"
            ))
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()));
        if let Some(data) = data {
            query = query.bind(("data", data));
        }

        let mut result = query.await?.check().map_err(DbError::from_statement)?;
        let rows: Vec<ContentEntryRow> = result.take(1)?;
        first_entry(rows, id_str)
    }
}

impl<C: Connection> ContentEntryRepository for SurrealContentEntryRepository<C> {
    async fn create(&self, input: CreateContentEntry) -> QuillResult<ContentEntry> {
        let id_str = Uuid::now_v7().to_string();

        let result = self
            .db
            .query(format!(
                "CREATE type::record('content_entry', $id) SET \
                 tenant_id = $tenant_id, content_type_id = $content_type_id, \
                 data = $data, is_visible = true; \
                 {SELECT_SCOPED};"
            ))
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("content_type_id", input.content_type_id.to_string()))
            .bind(("data", input.data.into_value()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from_statement)?;
        let rows: Vec<ContentEntryRow> = result.take(1).map_err(DbError::from)?;
        Ok(first_entry(rows, id_str)?)
    }

    async fn get_by_id(&self, tenant_id: Uuid, id: Uuid) -> QuillResult<ContentEntry> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(SELECT_SCOPED)
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ContentEntryRow> = result.take(0).map_err(DbError::from)?;
        Ok(first_entry(rows, id_str)?)
    }

    async fn update_data(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        data: Document,
    ) -> QuillResult<ContentEntry> {
        Ok(self
            .update_scoped(tenant_id, id, "data = $data", Some(data.into_value()))
            .await?)
    }

    async fn toggle_visibility(&self, tenant_id: Uuid, id: Uuid) -> QuillResult<ContentEntry> {
        Ok(self
            .update_scoped(tenant_id, id, "is_visible = !is_visible", None)
            .await?)
    }

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> QuillResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "DELETE type::record('content_entry', $id) \
                 WHERE tenant_id = $tenant_id RETURN BEFORE",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let deleted: Vec<Value> = result.take(0).map_err(DbError::from)?;
        if deleted.is_empty() {
            return Err(DbError::NotFound {
                entity: "content_entry".into(),
                id: id_str,
            }
            .into());
        }
        Ok(())
    }

    async fn list_by_type(
        &self,
        tenant_id: Uuid,
        content_type_id: Uuid,
        filter: &EntryFilter,
        page: PageRequest,
    ) -> QuillResult<Page<ContentEntry>> {
        let visibility = if filter.visible_only {
            " AND is_visible = true"
        } else {
            ""
        };
        let scope = format!(
            "WHERE tenant_id = $tenant_id \
             AND content_type_id = $content_type_id{visibility}"
        );
        let tenant_id_str = tenant_id.to_string();
        let type_id_str = content_type_id.to_string();

        // Text search runs over the rendered document, so the whole type is
        // filtered here and paginated afterwards.
        if filter.search.is_some() {
            let mut result = self
                .db
                .query(format!(
                    "SELECT meta::id(id) AS record_id, * FROM content_entry \
                     {scope} ORDER BY record_id DESC"
                ))
                .bind(("tenant_id", tenant_id_str))
                .bind(("content_type_id", type_id_str))
                .await
                .map_err(DbError::from)?;

            let rows: Vec<ContentEntryRow> = result.take(0).map_err(DbError::from)?;
            let matching = into_entries(rows)?
                .into_iter()
                .filter(|entry| filter.matches(entry))
                .collect();
            return Ok(Page::from_filtered(matching, page));
        }

        let mut result = self
            .db
            .query(format!(
                "SELECT count() AS total FROM content_entry {scope} GROUP ALL; \
                 SELECT meta::id(id) AS record_id, * FROM content_entry \
                 {scope} ORDER BY record_id DESC \
                 LIMIT $limit START $offset;"
            ))
            .bind(("tenant_id", tenant_id_str))
            .bind(("content_type_id", type_id_str))
            .bind(("limit", page.limit()))
            .bind(("offset", page.offset()))
            .await
            .map_err(DbError::from)?;

        let count_rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);
        let rows: Vec<ContentEntryRow> = result.take(1).map_err(DbError::from)?;

        Ok(Page::new(into_entries(rows)?, total, page))
    }

    async fn count(&self, tenant_id: Uuid) -> QuillResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM content_entry \
                 WHERE tenant_id = $tenant_id GROUP ALL",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    async fn recent(&self, tenant_id: Uuid, limit: u64) -> QuillResult<Vec<ContentEntry>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM content_entry \
                 WHERE tenant_id = $tenant_id \
                 ORDER BY record_id DESC LIMIT $limit",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("limit", limit))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ContentEntryRow> = result.take(0).map_err(DbError::from)?;
        Ok(into_entries(rows)?)
    }
}
