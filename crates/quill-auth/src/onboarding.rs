//! Tenant self-registration: a new tenant plus its first admin, created
//! atomically, followed by a verification email.

use chrono::Utc;
use quill_core::error::{QuillError, QuillResult};
use quill_core::models::tenant::{SubscriptionPlan, Tenant};
use quill_core::models::user::{TokenKind, User};
use quill_core::repository::{OnboardTenant, OnboardingStore, TenantRepository, UserRepository};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::AuthConfig;
use crate::lifecycle::{IssuedToken, VERIFY_EMAIL_PATH};
use crate::mailer::EmailSender;
use crate::password::{check_strength, hash_password};

/// Input for tenant registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterTenant {
    pub organization_name: String,
    pub admin_name: String,
    pub email: String,
    pub password: String,
}

/// Successful registration.
#[derive(Debug, Clone)]
pub struct Registration {
    pub tenant: Tenant,
    pub admin: User,
}

fn required<'a>(value: &'a str, field: &str) -> QuillResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(QuillError::validation(format!("{field} is required")));
    }
    Ok(value)
}

pub struct OnboardingService<T, U, O, M>
where
    T: TenantRepository,
    U: UserRepository,
    O: OnboardingStore,
    M: EmailSender,
{
    tenants: T,
    users: U,
    store: O,
    mailer: M,
    config: AuthConfig,
}

impl<T, U, O, M> OnboardingService<T, U, O, M>
where
    T: TenantRepository,
    U: UserRepository,
    O: OnboardingStore,
    M: EmailSender,
{
    pub fn new(tenants: T, users: U, store: O, mailer: M, config: AuthConfig) -> Self {
        Self {
            tenants,
            users,
            store,
            mailer,
            config,
        }
    }

    pub async fn register(&self, input: RegisterTenant) -> QuillResult<Registration> {
        let organization_name = required(&input.organization_name, "organization name")?;
        let admin_name = required(&input.admin_name, "admin name")?;
        let email = required(&input.email, "email")?;
        if input.password.is_empty() {
            return Err(QuillError::validation("password is required"));
        }
        if !email.contains('@') {
            return Err(QuillError::validation("email address is malformed"));
        }
        check_strength(&input.password, self.config.min_password_length)?;

        match self.users.get_by_email(email).await {
            Ok(_) => return Err(QuillError::conflict("user email already exists")),
            Err(QuillError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }
        match self.tenants.get_by_name(organization_name).await {
            Ok(_) => return Err(QuillError::conflict("organization name already exists")),
            Err(QuillError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let password_hash = hash_password(&input.password, self.config.pepper())?;
        let token =
            IssuedToken::generate(TokenKind::EmailVerification, &self.config, Utc::now())?;

        let (tenant, admin) = self
            .store
            .onboard(OnboardTenant {
                tenant_name: organization_name.to_string(),
                plan: SubscriptionPlan::Free,
                admin_full_name: admin_name.to_string(),
                admin_email: email.to_string(),
                admin_password_hash: password_hash,
                verification: token.state,
            })
            .await?;

        info!(tenant_id = %tenant.id, user_id = %admin.id, "Tenant registered");

        let link = self.config.link(VERIFY_EMAIL_PATH, &admin.email, &token.plaintext);
        if !self
            .mailer
            .send_verification(&admin.email, &admin.full_name, &token.plaintext, &link)
            .await
        {
            warn!(tenant_id = %tenant.id, "Failed to send verification email");
        }

        Ok(Registration { tenant, admin })
    }
}
