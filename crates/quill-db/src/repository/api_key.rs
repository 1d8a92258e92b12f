//! SurrealDB implementation of [`ApiKeyRepository`].

use chrono::{DateTime, Utc};
use quill_core::error::QuillResult;
use quill_core::models::api_key::{ApiKey, CreateApiKey};
use quill_core::repository::ApiKeyRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::{SurrealValue, Value};
use uuid::Uuid;

use super::{CountRow, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ApiKeyRow {
    record_id: String,
    tenant_id: String,
    name: String,
    key_hash: String,
    created_at: DateTime<Utc>,
}

impl ApiKeyRow {
    fn try_into_api_key(self) -> Result<ApiKey, DbError> {
        Ok(ApiKey {
            id: parse_uuid(&self.record_id, "api key")?,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            name: self.name,
            key_hash: self.key_hash,
            created_at: self.created_at,
        })
    }
}

fn first_key(rows: Vec<ApiKeyRow>, id: String) -> Result<ApiKey, DbError> {
    rows.into_iter()
        .next()
        .ok_or(DbError::NotFound {
            entity: "api_key".into(),
            id,
        })?
        .try_into_api_key()
}

/// SurrealDB implementation of the ApiKey repository.
#[derive(Clone)]
pub struct SurrealApiKeyRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealApiKeyRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ApiKeyRepository for SurrealApiKeyRepository<C> {
    async fn create(&self, input: CreateApiKey) -> QuillResult<ApiKey> {
        let id_str = Uuid::now_v7().to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('api_key', $id) SET \
                 tenant_id = $tenant_id, name = $name, key_hash = $key_hash; \
                 SELECT meta::id(id) AS record_id, * \
                 FROM type::record('api_key', $id);",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("name", input.name))
            .bind(("key_hash", input.key_hash))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from_statement)?;
        let rows: Vec<ApiKeyRow> = result.take(1).map_err(DbError::from)?;
        Ok(first_key(rows, id_str)?)
    }

    async fn get_by_id(&self, tenant_id: Uuid, id: Uuid) -> QuillResult<ApiKey> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM type::record('api_key', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ApiKeyRow> = result.take(0).map_err(DbError::from)?;
        Ok(first_key(rows, id_str)?)
    }

    async fn get_by_hash(&self, key_hash: &str) -> QuillResult<ApiKey> {
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM api_key WHERE key_hash = $key_hash")
            .bind(("key_hash", key_hash.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ApiKeyRow> = result.take(0).map_err(DbError::from)?;
        // Never echo the hash into error messages.
        Ok(first_key(rows, "<by hash>".into())?)
    }

    async fn name_exists(&self, tenant_id: Uuid, name: &str) -> QuillResult<bool> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM api_key \
                 WHERE tenant_id = $tenant_id AND name = $name GROUP ALL",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("name", name.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }

    async fn list(&self, tenant_id: Uuid) -> QuillResult<Vec<ApiKey>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM api_key \
                 WHERE tenant_id = $tenant_id ORDER BY record_id ASC",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ApiKeyRow> = result.take(0).map_err(DbError::from)?;
        let keys = rows
            .into_iter()
            .map(ApiKeyRow::try_into_api_key)
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(keys)
    }

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> QuillResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "DELETE type::record('api_key', $id) \
                 WHERE tenant_id = $tenant_id RETURN BEFORE",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let deleted: Vec<Value> = result.take(0).map_err(DbError::from)?;
        if deleted.is_empty() {
            return Err(DbError::NotFound {
                entity: "api_key".into(),
                id: id_str,
            }
            .into());
        }
        Ok(())
    }

    async fn count(&self, tenant_id: Uuid) -> QuillResult<u64> {
        let mut result = self
            .db
            .query("SELECT count() AS total FROM api_key WHERE tenant_id = $tenant_id GROUP ALL")
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
