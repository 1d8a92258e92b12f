//! SurrealDB implementation of [`UserRepository`].
//!
//! Single-use tokens are stored as hashes next to their expiry. Consuming
//! a token is a conditional `UPDATE … WHERE <token>_hash = $hash`, so two
//! concurrent consumers of the same token cannot both succeed.

use chrono::{DateTime, Utc};
use quill_core::error::QuillResult;
use quill_core::models::user::{CreateUser, SingleUseToken, TokenKind, User};
use quill_core::repository::UserRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::{SurrealValue, Value};
use uuid::Uuid;

use super::parse_uuid;
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
pub(crate) struct UserRow {
    record_id: String,
    tenant_id: String,
    full_name: String,
    email: String,
    password_hash: String,
    role: String,
    email_verified: bool,
    verification_token_hash: Option<String>,
    verification_expires_at: Option<DateTime<Utc>>,
    reset_token_hash: Option<String>,
    reset_expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

fn token_state(hash: Option<String>, expires_at: Option<DateTime<Utc>>) -> Option<SingleUseToken> {
    match (hash, expires_at) {
        (Some(token_hash), Some(expires_at)) => Some(SingleUseToken {
            token_hash,
            expires_at,
        }),
        _ => None,
    }
}

impl UserRow {
    pub(crate) fn try_into_user(self) -> Result<User, DbError> {
        Ok(User {
            id: parse_uuid(&self.record_id, "user")?,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            full_name: self.full_name,
            email: self.email,
            password_hash: self.password_hash,
            role: self.role.parse().map_err(DbError::Decode)?,
            email_verified: self.email_verified,
            verification: token_state(self.verification_token_hash, self.verification_expires_at),
            password_reset: token_state(self.reset_token_hash, self.reset_expires_at),
            created_at: self.created_at,
        })
    }
}

pub(crate) const SELECT_USER: &str =
    "SELECT meta::id(id) AS record_id, * FROM type::record('user', $id)";

/// SurrealDB implementation of the User repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, input: CreateUser) -> QuillResult<User> {
        let id_str = Uuid::now_v7().to_string();
        let (token_hash, expires_at) = match input.verification {
            Some(t) => (Some(t.token_hash), Some(t.expires_at)),
            None => (None, None),
        };

        let query = format!(
            "CREATE type::record('user', $id) SET \
             tenant_id = $tenant_id, \
             full_name = $full_name, email = $email, \
             password_hash = $password_hash, role = $role, \
             email_verified = false, \
             verification_token_hash = $token_hash, \
             verification_expires_at = $expires_at; \
             {SELECT_USER};"
        );

        let result = self
            .db
            .query(query)
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("full_name", input.full_name))
            .bind(("email", input.email))
            .bind(("password_hash", input.password_hash))
            .bind(("role", input.role.as_str().to_string()))
            .bind(("token_hash", token_hash))
            .bind(("expires_at", expires_at))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from_statement)?;

        let rows: Vec<UserRow> = result.take(1).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.try_into_user()?)
    }

    async fn get_by_id(&self, tenant_id: Uuid, id: Uuid) -> QuillResult<User> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(format!("{SELECT_USER} WHERE tenant_id = $tenant_id"))
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.try_into_user()?)
    }

    async fn get_by_email(&self, email: &str) -> QuillResult<User> {
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM user WHERE email = $email")
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: format!("email={email}"),
        })?;

        Ok(row.try_into_user()?)
    }

    async fn set_token(
        &self,
        user_id: Uuid,
        kind: TokenKind,
        token: SingleUseToken,
    ) -> QuillResult<()> {
        let query = match kind {
            TokenKind::EmailVerification => {
                "UPDATE type::record('user', $id) SET \
                 verification_token_hash = $token_hash, \
                 verification_expires_at = $expires_at"
            }
            TokenKind::PasswordReset => {
                "UPDATE type::record('user', $id) SET \
                 reset_token_hash = $token_hash, \
                 reset_expires_at = $expires_at"
            }
        };

        let mut result = self
            .db
            .query(query)
            .bind(("id", user_id.to_string()))
            .bind(("token_hash", token.token_hash))
            .bind(("expires_at", token.expires_at))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from_statement)?;

        let updated: Vec<Value> = result.take(0).map_err(DbError::from)?;
        if updated.is_empty() {
            return Err(DbError::NotFound {
                entity: "user".into(),
                id: user_id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    async fn consume_verification(&self, user_id: Uuid, token_hash: &str) -> QuillResult<bool> {
        let mut result = self
            .db
            .query(
                "UPDATE type::record('user', $id) SET \
                 email_verified = true, \
                 verification_token_hash = NONE, \
                 verification_expires_at = NONE \
                 WHERE verification_token_hash = $token_hash",
            )
            .bind(("id", user_id.to_string()))
            .bind(("token_hash", token_hash.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from_statement)?;

        let updated: Vec<Value> = result.take(0).map_err(DbError::from)?;
        Ok(!updated.is_empty())
    }

    async fn consume_password_reset(
        &self,
        user_id: Uuid,
        token_hash: &str,
        new_password_hash: String,
    ) -> QuillResult<bool> {
        let mut result = self
            .db
            .query(
                "UPDATE type::record('user', $id) SET \
                 password_hash = $password_hash, \
                 reset_token_hash = NONE, \
                 reset_expires_at = NONE \
                 WHERE reset_token_hash = $token_hash",
            )
            .bind(("id", user_id.to_string()))
            .bind(("token_hash", token_hash.to_string()))
            .bind(("password_hash", new_password_hash))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from_statement)?;

        let updated: Vec<Value> = result.take(0).map_err(DbError::from)?;
        Ok(!updated.is_empty())
    }
}
