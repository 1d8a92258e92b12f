//! API key domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A long-lived machine credential scoped to one tenant.
///
/// Only the SHA-256 hash of the key is stored; the plaintext exists
/// only in the [`CreatedApiKey`] returned at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    pub id: Uuid,
    pub tenant_id: Uuid,
    /// Display name, unique within the tenant.
    pub name: String,
    pub key_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateApiKey {
    pub tenant_id: Uuid,
    pub name: String,
    pub key_hash: String,
}

/// Creation response. `key` is the plaintext and is never retrievable again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedApiKey {
    pub id: Uuid,
    pub name: String,
    pub key: String,
    pub created_at: DateTime<Utc>,
}

/// Read view of a stored key. `key` holds a redacted hash suffix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiKeySummary {
    pub id: Uuid,
    pub name: String,
    pub key: String,
    pub created_at: DateTime<Utc>,
}
