//! SurrealDB implementation of [`TenantRepository`].

use chrono::{DateTime, Utc};
use quill_core::error::QuillResult;
use quill_core::models::tenant::{CreateTenant, Tenant};
use quill_core::repository::TenantRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;
use uuid::Uuid;

use super::parse_uuid;
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
pub(crate) struct TenantRow {
    record_id: String,
    name: String,
    plan: String,
    created_at: DateTime<Utc>,
}

impl TenantRow {
    pub(crate) fn try_into_tenant(self) -> Result<Tenant, DbError> {
        Ok(Tenant {
            id: parse_uuid(&self.record_id, "tenant")?,
            name: self.name,
            plan: self.plan.parse().map_err(DbError::Decode)?,
            created_at: self.created_at,
        })
    }
}

/// Deletes a tenant and every row it owns. Runs as one transaction.
const DELETE_TENANT_CASCADE: &str = "\
BEGIN TRANSACTION;
DELETE content_entry WHERE tenant_id = $id;
DELETE content_type WHERE tenant_id = $id;
DELETE api_key WHERE tenant_id = $id;
DELETE user WHERE tenant_id = $id;
DELETE type::record('tenant', $id);
COMMIT TRANSACTION;";

/// SurrealDB implementation of the Tenant repository.
#[derive(Clone)]
pub struct SurrealTenantRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTenantRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> TenantRepository for SurrealTenantRepository<C> {
    async fn create(&self, input: CreateTenant) -> QuillResult<Tenant> {
        let id_str = Uuid::now_v7().to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('tenant', $id) SET \
                 name = $name, plan = $plan; \
                 SELECT meta::id(id) AS record_id, * \
                 FROM type::record('tenant', $id);",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("plan", input.plan.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from_statement)?;

        let rows: Vec<TenantRow> = result.take(1).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id_str,
        })?;

        Ok(row.try_into_tenant()?)
    }

    async fn get_by_id(&self, id: Uuid) -> QuillResult<Tenant> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM type::record('tenant', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id_str,
        })?;

        Ok(row.try_into_tenant()?)
    }

    async fn get_by_name(&self, name: &str) -> QuillResult<Tenant> {
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM tenant WHERE name = $name")
            .bind(("name", name.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: format!("name={name}"),
        })?;

        Ok(row.try_into_tenant()?)
    }

    async fn list(&self) -> QuillResult<Vec<Tenant>> {
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM tenant ORDER BY record_id ASC")
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let tenants = rows
            .into_iter()
            .map(TenantRow::try_into_tenant)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(tenants)
    }

    async fn delete(&self, id: Uuid) -> QuillResult<()> {
        // Existence check keeps "unknown tenant" a NotFound rather than a no-op.
        self.get_by_id(id).await?;

        self.db
            .query(DELETE_TENANT_CASCADE)
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from_statement)?;

        info!(tenant_id = %id, "Tenant deleted with all owned rows");
        Ok(())
    }
}
