//! Database-specific error types and conversions.

use quill_core::error::QuillError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    #[error("Corrupt row: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl DbError {
    /// Classify a statement failure reported by `Response::check`.
    ///
    /// SurrealDB reports unique index violations as "Database index `…`
    /// already contains …"; those become [`DbError::Conflict`].
    pub fn from_statement(err: surrealdb::Error) -> Self {
        let message = err.to_string();
        if message.contains("already contains") {
            DbError::Conflict(message)
        } else {
            DbError::Query(message)
        }
    }
}

impl From<DbError> for QuillError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => QuillError::NotFound { entity, id },
            DbError::Conflict(message) => QuillError::Conflict { message },
            other => QuillError::Database(other.to_string()),
        }
    }
}
