//! Error types for the Quill system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuillError {
    /// No credential was presented at all.
    #[error("Authentication required")]
    Unauthenticated,

    /// A credential was presented but it is invalid, expired, or unknown.
    #[error("Invalid credential: {reason}")]
    InvalidCredential { reason: String },

    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Also returned for rows owned by another tenant.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    /// A single-use token was presented at or after its expiry.
    #[error("Token has expired")]
    Expired,

    /// A single-use token did not match, or was already consumed.
    #[error("Invalid or already used token")]
    InvalidToken,

    #[error("Already done: {message}")]
    AlreadyDone { message: String },

    /// A multi-step workflow was aborted and rolled back.
    #[error("Transaction failed: {reason}")]
    TransactionFailure { reason: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl QuillError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn invalid_credential(reason: impl Into<String>) -> Self {
        Self::InvalidCredential {
            reason: reason.into(),
        }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    /// HTTP status code the caller-facing layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unauthenticated | Self::InvalidCredential { .. } => 401,
            Self::Forbidden { .. } => 403,
            Self::Validation { .. } | Self::InvalidToken => 400,
            Self::NotFound { .. } => 404,
            Self::Conflict { .. } | Self::AlreadyDone { .. } => 409,
            Self::Expired => 410,
            Self::TransactionFailure { .. }
            | Self::Database(_)
            | Self::Crypto(_)
            | Self::Internal(_) => 500,
        }
    }
}

pub type QuillResult<T> = Result<T, QuillError>;
