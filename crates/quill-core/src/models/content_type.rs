//! Content type domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::Document;

/// A tenant-defined named schema. The schema is never enforced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentType {
    pub id: Uuid,
    pub tenant_id: Uuid,
    /// Unique within the tenant.
    pub name: String,
    pub schema: Document,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateContentType {
    pub tenant_id: Uuid,
    pub name: String,
    pub schema: Document,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateContentType {
    pub name: String,
    pub schema: Document,
}
