//! SurrealDB repository implementations.

mod api_key;
mod content_entry;
mod content_type;
mod onboarding;
mod tenant;
mod user;

pub use api_key::SurrealApiKeyRepository;
pub use content_entry::SurrealContentEntryRepository;
pub use content_type::SurrealContentTypeRepository;
pub use onboarding::SurrealOnboardingStore;
pub use tenant::SurrealTenantRepository;
pub use user::SurrealUserRepository;

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
pub(crate) struct CountRow {
    pub(crate) total: u64,
}

pub(crate) fn parse_uuid(raw: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(raw).map_err(|e| DbError::Decode(format!("invalid {what} UUID: {e}")))
}

/// One handle per repository, all sharing the same client.
#[derive(Clone)]
pub struct Repositories<C: Connection> {
    pub tenants: SurrealTenantRepository<C>,
    pub users: SurrealUserRepository<C>,
    pub api_keys: SurrealApiKeyRepository<C>,
    pub content_types: SurrealContentTypeRepository<C>,
    pub content_entries: SurrealContentEntryRepository<C>,
    pub onboarding: SurrealOnboardingStore<C>,
}

impl<C: Connection> Repositories<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self {
            tenants: SurrealTenantRepository::new(db.clone()),
            users: SurrealUserRepository::new(db.clone()),
            api_keys: SurrealApiKeyRepository::new(db.clone()),
            content_types: SurrealContentTypeRepository::new(db.clone()),
            content_entries: SurrealContentEntryRepository::new(db.clone()),
            onboarding: SurrealOnboardingStore::new(db),
        }
    }
}
