//! The resolved identity of an authenticated caller.
//!
//! A [`Principal`] is produced once per request by the credential
//! resolver and passed explicitly to every tenant-scoped operation.
//! Its `tenant_id` is the only tenant id downstream code may trust.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserRole;
use crate::error::{QuillError, QuillResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuthMethod {
    ApiKey,
    Bearer,
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey => f.write_str("ApiKey"),
            Self::Bearer => f.write_str("Bearer"),
        }
    }
}

/// Operations guarded by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ManageContentTypes,
    WriteEntries,
    ReadContent,
    ManageApiKeys,
    ReadDelivery,
    ViewDashboard,
    ManageTenants,
}

impl Capability {
    pub fn granted_to(&self, role: UserRole) -> bool {
        use UserRole::*;
        match self {
            Self::ManageContentTypes | Self::ManageApiKeys => {
                matches!(role, Admin | SuperAdmin)
            }
            Self::WriteEntries | Self::ReadContent => matches!(role, Admin | User | SuperAdmin),
            Self::ReadDelivery | Self::ViewDashboard => true,
            Self::ManageTenants => role == SuperAdmin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub tenant_id: Uuid,
    pub role: UserRole,
    pub auth_method: AuthMethod,
    /// Set for bearer-token principals.
    pub user_id: Option<Uuid>,
    /// Set for API-key principals.
    pub api_key_id: Option<Uuid>,
}

impl Principal {
    /// Machine principal for a matched API key.
    pub fn api_key(tenant_id: Uuid, api_key_id: Uuid) -> Self {
        Self {
            tenant_id,
            role: UserRole::Viewer,
            auth_method: AuthMethod::ApiKey,
            user_id: None,
            api_key_id: Some(api_key_id),
        }
    }

    /// Interactive principal from verified bearer-token claims.
    pub fn user(tenant_id: Uuid, user_id: Uuid, role: UserRole) -> Self {
        Self {
            tenant_id,
            role,
            auth_method: AuthMethod::Bearer,
            user_id: Some(user_id),
            api_key_id: None,
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        capability.granted_to(self.role)
    }

    /// Fails with `Forbidden` when the role lacks `capability`.
    pub fn require(&self, capability: Capability) -> QuillResult<()> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(QuillError::forbidden(format!(
                "role {} lacks {capability:?}",
                self.role
            )))
        }
    }
}
