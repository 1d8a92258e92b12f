//! Atomic tenant + admin user creation.

use chrono::Utc;
use quill_core::error::{QuillError, QuillResult};
use quill_core::models::tenant::Tenant;
use quill_core::models::user::{User, UserRole};
use quill_core::repository::{OnboardTenant, OnboardingStore};
use surrealdb::{Connection, Surreal};
use tracing::{info, warn};
use uuid::Uuid;

const ONBOARD_TRANSACTION: &str = "\
BEGIN TRANSACTION;
CREATE type::record('tenant', $tenant_id) SET
    name = $tenant_name, plan = $plan, created_at = $created_at;
CREATE type::record('user', $user_id) SET
    tenant_id = $tenant_id,
    full_name = $full_name, email = $email,
    password_hash = $password_hash, role = $role,
    email_verified = false,
    verification_token_hash = $token_hash,
    verification_expires_at = $expires_at,
    created_at = $created_at;
COMMIT TRANSACTION;";

/// SurrealDB implementation of the onboarding store.
#[derive(Clone)]
pub struct SurrealOnboardingStore<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealOnboardingStore<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> OnboardingStore for SurrealOnboardingStore<C> {
    async fn onboard(&self, input: OnboardTenant) -> QuillResult<(Tenant, User)> {
        let tenant_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();
        let created_at = Utc::now();
        let role = UserRole::Admin;

        let outcome = self
            .db
            .query(ONBOARD_TRANSACTION)
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("tenant_name", input.tenant_name.clone()))
            .bind(("plan", input.plan.as_str().to_string()))
            .bind(("user_id", user_id.to_string()))
            .bind(("full_name", input.admin_full_name.clone()))
            .bind(("email", input.admin_email.clone()))
            .bind(("password_hash", input.admin_password_hash.clone()))
            .bind(("role", role.as_str().to_string()))
            .bind(("token_hash", input.verification.token_hash.clone()))
            .bind(("expires_at", input.verification.expires_at))
            .bind(("created_at", created_at))
            .await
            .and_then(|response| response.check());

        if let Err(e) = outcome {
            warn!(tenant = %input.tenant_name, error = %e, "Onboarding transaction rolled back");
            return Err(QuillError::TransactionFailure {
                reason: e.to_string(),
            });
        }

        info!(tenant_id = %tenant_id, user_id = %user_id, "Tenant onboarded");

        let tenant = Tenant {
            id: tenant_id,
            name: input.tenant_name,
            plan: input.plan,
            created_at,
        };
        let user = User {
            id: user_id,
            tenant_id,
            full_name: input.admin_full_name,
            email: input.admin_email,
            password_hash: input.admin_password_hash,
            role,
            email_verified: false,
            verification: Some(input.verification),
            password_reset: None,
            created_at,
        };
        Ok((tenant, user))
    }
}
