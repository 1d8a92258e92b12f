//! Single-use token lifecycle for email verification and password reset.
//!
//! Per user and kind a token moves `none → issued → consumed`, or stays
//! issued but expired until it is overwritten by a reissue. Only the hash
//! is stored; consumption is a compare-and-set on that hash.

use chrono::{DateTime, Utc};
use quill_core::error::{QuillError, QuillResult};
use quill_core::models::user::{SingleUseToken, TokenKind, User};
use quill_core::repository::UserRepository;
use tracing::{info, warn};

use crate::config::{AuthConfig, expires_at};
use crate::error::AuthError;
use crate::mailer::EmailSender;
use crate::password::{check_strength, hash_password};
use crate::secret::{generate_token, hash_secret, secret_matches};

pub const VERIFY_EMAIL_PATH: &str = "verify-email";
pub const RESET_PASSWORD_PATH: &str = "reset-password";

/// A freshly generated token: plaintext for the email, hashed state for
/// the store.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub plaintext: String,
    pub state: SingleUseToken,
}

impl IssuedToken {
    pub fn generate(
        kind: TokenKind,
        config: &AuthConfig,
        now: DateTime<Utc>,
    ) -> Result<Self, AuthError> {
        let lifetime = match kind {
            TokenKind::EmailVerification => config.verification_token_lifetime_secs,
            TokenKind::PasswordReset => config.reset_token_lifetime_secs,
        };
        let plaintext = generate_token();
        let state = SingleUseToken {
            token_hash: hash_secret(&plaintext),
            expires_at: expires_at(lifetime, now)?,
        };
        Ok(Self { plaintext, state })
    }
}

/// Checks a presented token against the stored state at `now`.
///
/// A token is accepted at any instant strictly before its expiry.
pub fn check_token(
    stored: Option<&SingleUseToken>,
    presented: &str,
    now: DateTime<Utc>,
) -> QuillResult<()> {
    let stored = stored.ok_or(QuillError::InvalidToken)?;
    if !secret_matches(presented, &stored.token_hash) {
        return Err(QuillError::InvalidToken);
    }
    if stored.is_expired_at(now) {
        return Err(QuillError::Expired);
    }
    Ok(())
}

pub struct TokenLifecycle<U: UserRepository, M: EmailSender> {
    users: U,
    mailer: M,
    config: AuthConfig,
}

impl<U: UserRepository, M: EmailSender> TokenLifecycle<U, M> {
    pub fn new(users: U, mailer: M, config: AuthConfig) -> Self {
        Self {
            users,
            mailer,
            config,
        }
    }

    /// Issues a new verification token for `user`, replacing any earlier
    /// one, and emails it.
    pub async fn issue_verification(&self, user: &User) -> QuillResult<()> {
        let token =
            IssuedToken::generate(TokenKind::EmailVerification, &self.config, Utc::now())?;
        self.users
            .set_token(user.id, TokenKind::EmailVerification, token.state)
            .await?;

        let link = self.config.link(VERIFY_EMAIL_PATH, &user.email, &token.plaintext);
        if !self
            .mailer
            .send_verification(&user.email, &user.full_name, &token.plaintext, &link)
            .await
        {
            warn!(user_id = %user.id, "Failed to send verification email");
        }
        Ok(())
    }

    /// Re-sends verification. Succeeds silently for unknown or already
    /// verified addresses.
    pub async fn resend_verification(&self, email: &str) -> QuillResult<()> {
        match self.users.get_by_email(email.trim()).await {
            Ok(user) if !user.email_verified => self.issue_verification(&user).await,
            Ok(_) | Err(QuillError::NotFound { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub async fn verify_email(&self, email: &str, token: &str) -> QuillResult<()> {
        let user = self.users.get_by_email(email.trim()).await?;
        if user.email_verified {
            return Err(QuillError::AlreadyDone {
                message: "email is already verified".into(),
            });
        }
        check_token(user.verification.as_ref(), token, Utc::now())?;

        if !self
            .users
            .consume_verification(user.id, &hash_secret(token))
            .await?
        {
            return Err(QuillError::InvalidToken);
        }
        info!(user_id = %user.id, tenant_id = %user.tenant_id, "Email verified");

        if !self.mailer.send_welcome(&user.email, &user.full_name).await {
            warn!(user_id = %user.id, "Failed to send welcome email");
        }
        Ok(())
    }

    /// Issues a reset token if the address belongs to a user. The outcome
    /// is the same either way.
    pub async fn forgot_password(&self, email: &str) -> QuillResult<()> {
        let user = match self.users.get_by_email(email.trim()).await {
            Ok(user) => user,
            Err(QuillError::NotFound { .. }) => return Ok(()),
            Err(e) => return Err(e),
        };

        let token = IssuedToken::generate(TokenKind::PasswordReset, &self.config, Utc::now())?;
        self.users
            .set_token(user.id, TokenKind::PasswordReset, token.state)
            .await?;

        let link = self.config.link(RESET_PASSWORD_PATH, &user.email, &token.plaintext);
        if !self
            .mailer
            .send_reset(&user.email, &user.full_name, &token.plaintext, &link)
            .await
        {
            warn!(user_id = %user.id, "Failed to send password reset email");
        }
        Ok(())
    }

    pub async fn validate_reset_token(&self, email: &str, token: &str) -> QuillResult<()> {
        let user = self.reset_candidate(email).await?;
        check_token(user.password_reset.as_ref(), token, Utc::now())
    }

    pub async fn reset_password(
        &self,
        email: &str,
        token: &str,
        new_password: &str,
    ) -> QuillResult<()> {
        let user = self.reset_candidate(email).await?;
        check_token(user.password_reset.as_ref(), token, Utc::now())?;
        check_strength(new_password, self.config.min_password_length)?;

        let new_hash = hash_password(new_password, self.config.pepper())?;
        if !self
            .users
            .consume_password_reset(user.id, &hash_secret(token), new_hash)
            .await?
        {
            return Err(QuillError::InvalidToken);
        }
        info!(user_id = %user.id, "Password reset");
        Ok(())
    }

    /// Unknown addresses look like a bad token on the reset paths.
    async fn reset_candidate(&self, email: &str) -> QuillResult<User> {
        match self.users.get_by_email(email.trim()).await {
            Err(QuillError::NotFound { .. }) => Err(QuillError::InvalidToken),
            other => other,
        }
    }
}
