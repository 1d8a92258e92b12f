//! Layered server configuration.
//!
//! Precedence, lowest first: serde defaults, the TOML file (optional),
//! then `QUILL__*` environment variables, e.g.
//! `QUILL__AUTH__JWT_SECRET=…` or `QUILL__DATABASE__URL=ws://db:8000`.

use std::path::Path;

use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use quill_auth::AuthConfig;
use quill_db::DbConfig;
use serde::{Deserialize, Serialize};

/// Default config file, overridable with `QUILL_CONFIG`.
pub const DEFAULT_CONFIG_PATH: &str = "quill.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub auth: AuthConfig,
    pub database: DbConfig,
}

/// Loads and validates the layered configuration.
pub fn load(path: impl AsRef<Path>) -> Result<ServerConfig, ConfigError> {
    let config: ServerConfig = ConfigBuilder::builder()
        .add_source(File::from(path.as_ref()).required(false))
        .add_source(
            Environment::with_prefix("QUILL")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;

    config
        .auth
        .validate()
        .map_err(|e| ConfigError::Message(e.to_string()))?;
    Ok(config)
}
