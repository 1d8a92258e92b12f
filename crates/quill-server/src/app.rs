//! Service graph over one SurrealDB connection.

use quill_auth::{
    ApiKeyService, AuthConfig, AuthService, CredentialResolver, LogEmailSender,
    OnboardingService, TenantAdminService, TokenLifecycle,
};
use quill_content::{ContentEntryService, ContentTypeService, DashboardService, DeliveryService};
use quill_db::DbManager;
use quill_db::repository::{
    SurrealApiKeyRepository, SurrealContentEntryRepository, SurrealContentTypeRepository,
    SurrealOnboardingStore, SurrealTenantRepository, SurrealUserRepository,
};
use surrealdb::engine::any::Any;

type Tenants = SurrealTenantRepository<Any>;
type Users = SurrealUserRepository<Any>;
type ApiKeys = SurrealApiKeyRepository<Any>;
type Types = SurrealContentTypeRepository<Any>;
type Entries = SurrealContentEntryRepository<Any>;
type Onboarding = SurrealOnboardingStore<Any>;

/// Every service the transport layer dispatches to.
pub struct App {
    pub resolver: CredentialResolver<Tenants, ApiKeys>,
    pub auth: AuthService<Users>,
    pub onboarding: OnboardingService<Tenants, Users, Onboarding, LogEmailSender>,
    pub tokens: TokenLifecycle<Users, LogEmailSender>,
    pub api_keys: ApiKeyService<Tenants, ApiKeys>,
    pub tenants: TenantAdminService<Tenants>,
    pub content_types: ContentTypeService<Tenants, Types>,
    pub content_entries: ContentEntryService<Tenants, Types, Entries>,
    pub delivery: DeliveryService<Types, Entries>,
    pub dashboard: DashboardService<Types, Entries, ApiKeys>,
}

impl App {
    pub fn new(db: &DbManager, auth: AuthConfig) -> Self {
        let repos = db.repositories();
        let mailer = LogEmailSender;

        Self {
            resolver: CredentialResolver::new(
                repos.tenants.clone(),
                repos.api_keys.clone(),
                auth.clone(),
            ),
            auth: AuthService::new(repos.users.clone(), auth.clone()),
            onboarding: OnboardingService::new(
                repos.tenants.clone(),
                repos.users.clone(),
                repos.onboarding.clone(),
                mailer.clone(),
                auth.clone(),
            ),
            tokens: TokenLifecycle::new(repos.users.clone(), mailer, auth),
            api_keys: ApiKeyService::new(repos.tenants.clone(), repos.api_keys.clone()),
            tenants: TenantAdminService::new(repos.tenants.clone()),
            content_types: ContentTypeService::new(
                repos.tenants.clone(),
                repos.content_types.clone(),
            ),
            content_entries: ContentEntryService::new(
                repos.tenants.clone(),
                repos.content_types.clone(),
                repos.content_entries.clone(),
            ),
            delivery: DeliveryService::new(
                repos.content_types.clone(),
                repos.content_entries.clone(),
            ),
            dashboard: DashboardService::new(
                repos.content_types,
                repos.content_entries,
                repos.api_keys,
            ),
        }
    }
}
