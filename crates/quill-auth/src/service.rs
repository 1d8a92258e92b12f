//! Authentication service — password login.

use quill_core::error::{QuillError, QuillResult};
use quill_core::models::user::UserRole;
use quill_core::repository::UserRepository;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Signed JWT access token.
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
    pub tenant_id: Uuid,
    pub role: UserRole,
}

/// Authentication service.
///
/// Generic over the user repository so that the auth layer has no
/// dependency on the database crate.
pub struct AuthService<U: UserRepository> {
    user_repo: U,
    config: AuthConfig,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(user_repo: U, config: AuthConfig) -> Self {
        Self { user_repo, config }
    }

    /// Authenticate with email + password and issue an access token.
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, input: LoginInput) -> QuillResult<LoginOutput> {
        if input.email.trim().is_empty() {
            return Err(QuillError::validation("email is required"));
        }
        if input.password.is_empty() {
            return Err(QuillError::validation("password is required"));
        }

        let user = match self.user_repo.get_by_email(input.email.trim()).await {
            Ok(u) => u,
            Err(QuillError::NotFound { .. }) => return Err(AuthError::InvalidCredentials.into()),
            Err(e) => return Err(e),
        };

        let valid = password::verify_password(
            &input.password,
            &user.password_hash,
            self.config.pepper(),
        )?;
        if !valid {
            warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        if !user.email_verified {
            return Err(AuthError::AccountUnverified.into());
        }

        let access_token = token::issue_access_token(&user, &self.config)?;
        info!(user_id = %user.id, tenant_id = %user.tenant_id, "User logged in");

        Ok(LoginOutput {
            access_token,
            expires_in: self.config.access_token_lifetime_secs,
            tenant_id: user.tenant_id,
            role: user.role,
        })
    }
}
