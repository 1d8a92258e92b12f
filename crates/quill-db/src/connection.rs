//! SurrealDB connection management.
//!
//! The endpoint scheme picks the engine: `mem://` for an embedded
//! in-memory store, `ws://host:port` for a remote server.

use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::any::{self, Any};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::error::DbError;
use crate::repository::Repositories;
use crate::schema::run_migrations;

/// Configuration for connecting to SurrealDB.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Endpoint, e.g. `mem://` or `ws://127.0.0.1:8000`.
    pub url: String,
    pub namespace: String,
    pub database: String,
    /// Root credentials. Left unset for embedded stores.
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "mem://".into(),
            namespace: "quill".into(),
            database: "main".into(),
            username: None,
            password: None,
        }
    }
}

/// Owns the SurrealDB client for the lifetime of the process.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Any>,
}

impl DbManager {
    /// Connect, sign in when credentials are configured, and select the
    /// namespace and database.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "Connecting to SurrealDB"
        );

        let db = any::connect(config.url.as_str()).await?;

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            db.signin(Root {
                username: username.clone(),
                password: password.clone(),
            })
            .await?;
        }

        db.use_ns(&config.namespace).use_db(&config.database).await?;

        info!("Connected to SurrealDB");
        Ok(Self { db })
    }

    /// [`connect`](Self::connect) followed by pending schema migrations.
    pub async fn connect_and_migrate(config: &DbConfig) -> Result<Self, DbError> {
        let manager = Self::connect(config).await?;
        run_migrations(&manager.db).await?;
        Ok(manager)
    }

    pub fn client(&self) -> &Surreal<Any> {
        &self.db
    }

    /// Repository handles sharing this connection.
    pub fn repositories(&self) -> Repositories<Any> {
        Repositories::new(self.db.clone())
    }
}
