//! Authentication error types.

use quill_core::error::QuillError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("wrong email or password")]
    InvalidCredentials,

    #[error("email address is not verified")]
    AccountUnverified,

    #[error("access token has expired")]
    TokenExpired,

    #[error("invalid access token: {0}")]
    TokenInvalid(String),

    #[error("{0}")]
    WeakPassword(String),

    #[error("cryptography error: {0}")]
    Crypto(String),

    #[error("invalid auth configuration: {0}")]
    Config(String),
}

impl From<AuthError> for QuillError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_) => QuillError::InvalidCredential {
                reason: err.to_string(),
            },
            AuthError::AccountUnverified => QuillError::Forbidden {
                reason: err.to_string(),
            },
            AuthError::WeakPassword(message) => QuillError::Validation { message },
            AuthError::Crypto(msg) => QuillError::Crypto(msg),
            AuthError::Config(msg) => QuillError::Internal(msg),
        }
    }
}
