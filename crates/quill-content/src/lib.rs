//! Quill Content — tenant-scoped content management.
//!
//! Every operation takes the caller's [`Principal`](quill_core::models::principal::Principal)
//! and reads the tenant id from it; no caller-supplied tenant id is ever
//! trusted.

pub mod dashboard;
pub mod delivery;
pub mod entries;
pub mod query;
pub mod types;

pub use dashboard::{DashboardService, DashboardStats};
pub use delivery::DeliveryService;
pub use entries::ContentEntryService;
pub use query::ListQuery;
pub use types::{ContentTypeInput, ContentTypeService};
