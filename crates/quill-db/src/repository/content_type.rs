//! SurrealDB implementation of [`ContentTypeRepository`].

use chrono::{DateTime, Utc};
use quill_core::error::QuillResult;
use quill_core::models::content_type::{ContentType, CreateContentType, UpdateContentType};
use quill_core::models::document::Document;
use quill_core::repository::ContentTypeRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{CountRow, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
pub(crate) struct ContentTypeRow {
    record_id: String,
    tenant_id: String,
    name: String,
    schema: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl ContentTypeRow {
    pub(crate) fn try_into_content_type(self) -> Result<ContentType, DbError> {
        Ok(ContentType {
            id: parse_uuid(&self.record_id, "content type")?,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            name: self.name,
            schema: Document::new(self.schema).map_err(|e| DbError::Decode(e.to_string()))?,
            created_at: self.created_at,
        })
    }
}

const SELECT_SCOPED: &str = "SELECT meta::id(id) AS record_id, * \
     FROM type::record('content_type', $id) \
     WHERE tenant_id = $tenant_id";

/// Removes the type's entries together with the type.
const DELETE_TYPE_CASCADE: &str = "\
BEGIN TRANSACTION;
DELETE content_entry WHERE tenant_id = $tenant_id AND content_type_id = $id;
DELETE type::record('content_type', $id) WHERE tenant_id = $tenant_id;
COMMIT TRANSACTION;";

fn first_type(rows: Vec<ContentTypeRow>, id: String) -> Result<ContentType, DbError> {
    rows.into_iter()
        .next()
        .ok_or(DbError::NotFound {
            entity: "content_type".into(),
            id,
        })?
        .try_into_content_type()
}

/// SurrealDB implementation of the ContentType repository.
#[derive(Clone)]
pub struct SurrealContentTypeRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealContentTypeRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ContentTypeRepository for SurrealContentTypeRepository<C> {
    async fn create(&self, input: CreateContentType) -> QuillResult<ContentType> {
        let id_str = Uuid::now_v7().to_string();

        let result = self
            .db
            .query(format!(
                "CREATE type::record('content_type', $id) SET \
                 tenant_id = $tenant_id, name = $name, schema = $schema; \
                 {SELECT_SCOPED};"
            ))
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("name", input.name))
            .bind(("schema", input.schema.into_value()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from_statement)?;
        let rows: Vec<ContentTypeRow> = result.take(1).map_err(DbError::from)?;
        Ok(first_type(rows, id_str)?)
    }

    async fn get_by_id(&self, tenant_id: Uuid, id: Uuid) -> QuillResult<ContentType> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(SELECT_SCOPED)
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ContentTypeRow> = result.take(0).map_err(DbError::from)?;
        Ok(first_type(rows, id_str)?)
    }

    async fn get_by_name(&self, tenant_id: Uuid, name: &str) -> QuillResult<ContentType> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM content_type \
                 WHERE tenant_id = $tenant_id \
                 AND string::lowercase(name) = string::lowercase($name) \
                 ORDER BY record_id ASC LIMIT 1",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("name", name.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ContentTypeRow> = result.take(0).map_err(DbError::from)?;
        Ok(first_type(rows, format!("name={name}"))?)
    }

    async fn name_taken(
        &self,
        tenant_id: Uuid,
        name: &str,
        exclude: Option<Uuid>,
    ) -> QuillResult<bool> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM content_type \
                 WHERE tenant_id = $tenant_id AND name = $name \
                 AND meta::id(id) != $exclude GROUP ALL",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("name", name.to_string()))
            .bind(("exclude", exclude.map(|id| id.to_string()).unwrap_or_default()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }

    async fn list(&self, tenant_id: Uuid) -> QuillResult<Vec<ContentType>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM content_type \
                 WHERE tenant_id = $tenant_id ORDER BY record_id ASC",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ContentTypeRow> = result.take(0).map_err(DbError::from)?;
        let types = rows
            .into_iter()
            .map(ContentTypeRow::try_into_content_type)
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(types)
    }

    async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateContentType,
    ) -> QuillResult<ContentType> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(format!(
                "UPDATE type::record('content_type', $id) SET \
                 name = $name, schema = $schema \
                 WHERE tenant_id = $tenant_id; \
                 {SELECT_SCOPED};"
            ))
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("name", input.name))
            .bind(("schema", input.schema.into_value()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from_statement)?;
        let rows: Vec<ContentTypeRow> = result.take(1).map_err(DbError::from)?;
        Ok(first_type(rows, id_str)?)
    }

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> QuillResult<()> {
        self.get_by_id(tenant_id, id).await?;

        self.db
            .query(DELETE_TYPE_CASCADE)
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from_statement)?;

        Ok(())
    }

    async fn count(&self, tenant_id: Uuid) -> QuillResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM content_type \
                 WHERE tenant_id = $tenant_id GROUP ALL",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
