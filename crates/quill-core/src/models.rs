//! Domain models for Quill.
//!
//! These are the core types shared across all crates.

pub mod api_key;
pub mod content_entry;
pub mod content_type;
pub mod document;
pub mod principal;
pub mod tenant;
pub mod user;
