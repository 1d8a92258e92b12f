//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode. UUIDs are stored as
//! strings, enums as strings with ASSERT constraints. Every tenant-owned
//! table carries a `tenant_id` column that every query filters on.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Tenants (global scope)
-- =======================================================================
DEFINE TABLE tenant SCHEMAFULL;
DEFINE FIELD name ON TABLE tenant TYPE string;
DEFINE FIELD plan ON TABLE tenant TYPE string \
    ASSERT $value IN ['Free', 'Pro', 'Enterprise'];
DEFINE FIELD created_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_tenant_name ON TABLE tenant COLUMNS name UNIQUE;

-- =======================================================================
-- Users (tenant scope, email globally unique)
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE user TYPE string;
DEFINE FIELD full_name ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['Admin', 'User', 'Viewer', 'SuperAdmin'];
DEFINE FIELD email_verified ON TABLE user TYPE bool DEFAULT false;
DEFINE FIELD verification_token_hash ON TABLE user TYPE option<string>;
DEFINE FIELD verification_expires_at ON TABLE user \
    TYPE option<datetime>;
DEFINE FIELD reset_token_hash ON TABLE user TYPE option<string>;
DEFINE FIELD reset_expires_at ON TABLE user TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;
DEFINE INDEX idx_user_tenant ON TABLE user COLUMNS tenant_id;

-- =======================================================================
-- API keys (tenant scope)
-- =======================================================================
DEFINE TABLE api_key SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE api_key TYPE string;
DEFINE FIELD name ON TABLE api_key TYPE string \
    ASSERT string::len($value) <= 100;
DEFINE FIELD key_hash ON TABLE api_key TYPE string;
DEFINE FIELD created_at ON TABLE api_key TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_api_key_tenant_name ON TABLE api_key \
    COLUMNS tenant_id, name UNIQUE;
DEFINE INDEX idx_api_key_hash ON TABLE api_key COLUMNS key_hash UNIQUE;

-- =======================================================================
-- Content types (tenant scope)
-- =======================================================================
DEFINE TABLE content_type SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE content_type TYPE string;
DEFINE FIELD name ON TABLE content_type TYPE string;
DEFINE FIELD schema ON TABLE content_type TYPE object FLEXIBLE;
DEFINE FIELD created_at ON TABLE content_type TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_content_type_tenant_name ON TABLE content_type \
    COLUMNS tenant_id, name UNIQUE;

-- =======================================================================
-- Content entries (tenant scope)
-- =======================================================================
DEFINE TABLE content_entry SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE content_entry TYPE string;
DEFINE FIELD content_type_id ON TABLE content_entry TYPE string;
DEFINE FIELD data ON TABLE content_entry TYPE object FLEXIBLE;
DEFINE FIELD is_visible ON TABLE content_entry TYPE bool DEFAULT true;
DEFINE FIELD created_at ON TABLE content_entry TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_content_entry_tenant_type ON TABLE content_entry \
    COLUMNS tenant_id, content_type_id;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT version FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS
        .iter()
        .filter(|m| m.version > current_version)
    {
        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );
        db.query(migration.sql).await?.check().map_err(|e| {
            DbError::Migration(format!(
                "v{} '{}': {}",
                migration.version, migration.name, e
            ))
        })?;

        db.query("CREATE _migration SET version = $version, name = $name")
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "recording v{}: {}",
                    migration.version, e
                ))
            })?;
    }

    info!(version = current_version.max(latest_version()), "Schema up to date");
    Ok(())
}

/// Highest schema version known to this build.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}
