//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Tenant-scoped repositories
//! require a `tenant_id` parameter on every call, including lookups by
//! id, so a row owned by another tenant is indistinguishable from a
//! missing one.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{QuillError, QuillResult};
use crate::models::{
    api_key::{ApiKey, CreateApiKey},
    content_entry::{ContentEntry, CreateContentEntry, EntryFilter},
    content_type::{ContentType, CreateContentType, UpdateContentType},
    document::Document,
    tenant::{CreateTenant, SubscriptionPlan, Tenant},
    user::{CreateUser, SingleUseToken, TokenKind, User},
};

/// Page parameters shared by every paginated listing. Both values are 1-based
/// and must be at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u64,
    page_size: u64,
}

impl PageRequest {
    pub const DEFAULT_PAGE_SIZE: u64 = 10;

    pub fn new(page: i64, page_size: i64) -> QuillResult<Self> {
        if page < 1 {
            return Err(QuillError::validation("page must be greater than 0"));
        }
        if page_size < 1 {
            return Err(QuillError::validation("page_size must be greater than 0"));
        }
        Ok(Self {
            page: page as u64,
            page_size: page_size as u64,
        })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_records: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_records: u64, request: PageRequest) -> Self {
        Self {
            items,
            total_records,
            page: request.page(),
            page_size: request.page_size(),
            total_pages: total_records.div_ceil(request.page_size()),
        }
    }

    /// Paginate an already filtered and ordered set in memory.
    pub fn from_filtered(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(request.limit()).unwrap_or(usize::MAX))
            .collect();
        Self::new(items, total, request)
    }
}

/// Everything the onboarding transaction persists.
#[derive(Debug, Clone)]
pub struct OnboardTenant {
    pub tenant_name: String,
    pub plan: SubscriptionPlan,
    pub admin_full_name: String,
    pub admin_email: String,
    pub admin_password_hash: String,
    pub verification: SingleUseToken,
}

// ---------------------------------------------------------------------------
// Global scope
// ---------------------------------------------------------------------------

pub trait TenantRepository: Send + Sync {
    fn create(&self, input: CreateTenant) -> impl Future<Output = QuillResult<Tenant>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = QuillResult<Tenant>> + Send;
    fn get_by_name(&self, name: &str) -> impl Future<Output = QuillResult<Tenant>> + Send;
    fn list(&self) -> impl Future<Output = QuillResult<Vec<Tenant>>> + Send;
    /// Deletes the tenant and everything it owns in one transaction.
    fn delete(&self, id: Uuid) -> impl Future<Output = QuillResult<()>> + Send;
}

/// Atomic tenant + admin creation.
pub trait OnboardingStore: Send + Sync {
    /// Persists tenant and admin user together or not at all.
    fn onboard(
        &self,
        input: OnboardTenant,
    ) -> impl Future<Output = QuillResult<(Tenant, User)>> + Send;
}

// ---------------------------------------------------------------------------
// Users (email is globally unique)
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = QuillResult<User>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = QuillResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = QuillResult<User>> + Send;
    /// Stores a freshly issued token, replacing any previous one of that kind.
    fn set_token(
        &self,
        user_id: Uuid,
        kind: TokenKind,
        token: SingleUseToken,
    ) -> impl Future<Output = QuillResult<()>> + Send;
    /// Clears the verification token and marks the email verified, but only
    /// if the stored hash still equals `token_hash`. Returns whether it did.
    fn consume_verification(
        &self,
        user_id: Uuid,
        token_hash: &str,
    ) -> impl Future<Output = QuillResult<bool>> + Send;
    /// Clears the reset token and replaces the password hash, but only if the
    /// stored hash still equals `token_hash`. Returns whether it did.
    fn consume_password_reset(
        &self,
        user_id: Uuid,
        token_hash: &str,
        new_password_hash: String,
    ) -> impl Future<Output = QuillResult<bool>> + Send;
}

// ---------------------------------------------------------------------------
// Tenant-scoped repositories
// ---------------------------------------------------------------------------

pub trait ApiKeyRepository: Send + Sync {
    fn create(&self, input: CreateApiKey) -> impl Future<Output = QuillResult<ApiKey>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = QuillResult<ApiKey>> + Send;
    /// Global lookup used only by credential resolution.
    fn get_by_hash(&self, key_hash: &str) -> impl Future<Output = QuillResult<ApiKey>> + Send;
    fn name_exists(
        &self,
        tenant_id: Uuid,
        name: &str,
    ) -> impl Future<Output = QuillResult<bool>> + Send;
    fn list(&self, tenant_id: Uuid) -> impl Future<Output = QuillResult<Vec<ApiKey>>> + Send;
    fn delete(&self, tenant_id: Uuid, id: Uuid) -> impl Future<Output = QuillResult<()>> + Send;
    fn count(&self, tenant_id: Uuid) -> impl Future<Output = QuillResult<u64>> + Send;
}

pub trait ContentTypeRepository: Send + Sync {
    fn create(
        &self,
        input: CreateContentType,
    ) -> impl Future<Output = QuillResult<ContentType>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = QuillResult<ContentType>> + Send;
    /// Case-insensitive name lookup.
    fn get_by_name(
        &self,
        tenant_id: Uuid,
        name: &str,
    ) -> impl Future<Output = QuillResult<ContentType>> + Send;
    /// Whether another type of this tenant already uses `name`.
    fn name_taken(
        &self,
        tenant_id: Uuid,
        name: &str,
        exclude: Option<Uuid>,
    ) -> impl Future<Output = QuillResult<bool>> + Send;
    fn list(
        &self,
        tenant_id: Uuid,
    ) -> impl Future<Output = QuillResult<Vec<ContentType>>> + Send;
    fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateContentType,
    ) -> impl Future<Output = QuillResult<ContentType>> + Send;
    /// Deletes the type and its entries.
    fn delete(&self, tenant_id: Uuid, id: Uuid) -> impl Future<Output = QuillResult<()>> + Send;
    fn count(&self, tenant_id: Uuid) -> impl Future<Output = QuillResult<u64>> + Send;
}

pub trait ContentEntryRepository: Send + Sync {
    fn create(
        &self,
        input: CreateContentEntry,
    ) -> impl Future<Output = QuillResult<ContentEntry>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = QuillResult<ContentEntry>> + Send;
    fn update_data(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        data: Document,
    ) -> impl Future<Output = QuillResult<ContentEntry>> + Send;
    fn toggle_visibility(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = QuillResult<ContentEntry>> + Send;
    fn delete(&self, tenant_id: Uuid, id: Uuid) -> impl Future<Output = QuillResult<()>> + Send;
    /// Entries of one type, newest first, filtered then paginated.
    fn list_by_type(
        &self,
        tenant_id: Uuid,
        content_type_id: Uuid,
        filter: &EntryFilter,
        page: PageRequest,
    ) -> impl Future<Output = QuillResult<Page<ContentEntry>>> + Send;
    fn count(&self, tenant_id: Uuid) -> impl Future<Output = QuillResult<u64>> + Send;
    /// Most recently created entries across all types.
    fn recent(
        &self,
        tenant_id: Uuid,
        limit: u64,
    ) -> impl Future<Output = QuillResult<Vec<ContentEntry>>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_rejects_values_below_one() {
        assert!(matches!(
            PageRequest::new(0, 10),
            Err(QuillError::Validation { .. })
        ));
        assert!(matches!(
            PageRequest::new(1, 0),
            Err(QuillError::Validation { .. })
        ));
        assert!(PageRequest::new(-3, 5).is_err());
        assert!(PageRequest::new(1, 1).is_ok());
    }

    #[test]
    fn offset_is_zero_based() {
        let req = PageRequest::new(3, 20).unwrap();
        assert_eq!(req.offset(), 40);
        assert_eq!(req.limit(), 20);
    }

    #[test]
    fn last_page_holds_the_remainder() {
        for (n, p) in [(23u64, 5u64), (20, 5), (1, 7), (7, 1), (100, 30)] {
            let all: Vec<u64> = (0..n).collect();
            let total_pages = n.div_ceil(p);
            let last = PageRequest::new(total_pages as i64, p as i64).unwrap();
            let page = Page::from_filtered(all, last);
            assert_eq!(page.total_pages, total_pages);
            assert_eq!(page.total_records, n);
            assert_eq!(page.items.len() as u64, n - p * ((n - 1) / p), "n={n} p={p}");
        }
    }

    #[test]
    fn page_beyond_the_last_is_empty() {
        let page = Page::from_filtered(vec![1, 2, 3], PageRequest::new(5, 2).unwrap());
        assert!(page.items.is_empty());
        assert_eq!(page.total_records, 3);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn empty_set_has_zero_pages() {
        let page: Page<u8> = Page::from_filtered(Vec::new(), PageRequest::default());
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }
}
