//! Quill Database — SurrealDB persistence.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Repository implementations of the `quill-core` traits ([`repository`])
//! - Error types ([`DbError`])

mod connection;
mod error;
mod schema;

pub mod repository;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use repository::Repositories;
pub use schema::{latest_version, run_migrations};
