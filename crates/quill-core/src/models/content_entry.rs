//! Content entry domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::Document;

/// One stored document instance of a content type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentEntry {
    pub id: Uuid,
    pub tenant_id: Uuid,
    /// Immutable after creation.
    pub content_type_id: Uuid,
    pub data: Document,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateContentEntry {
    pub tenant_id: Uuid,
    pub content_type_id: Uuid,
    pub data: Document,
}

/// Filter applied when listing the entries of one content type.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Case-insensitive substring over the rendered data document.
    pub search: Option<String>,
    /// Restrict to `is_visible == true` (public delivery).
    pub visible_only: bool,
}

impl EntryFilter {
    pub fn search(term: Option<&str>) -> Self {
        Self {
            search: term.filter(|t| !t.is_empty()).map(str::to_string),
            visible_only: false,
        }
    }

    pub fn visible(mut self) -> Self {
        self.visible_only = true;
        self
    }

    pub fn matches(&self, entry: &ContentEntry) -> bool {
        if self.visible_only && !entry.is_visible {
            return false;
        }
        match &self.search {
            Some(term) => entry.data.contains_text(term),
            None => true,
        }
    }
}

/// Dashboard row for a recently created entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentEntry {
    pub id: Uuid,
    pub type_name: String,
    pub created_at: DateTime<Utc>,
}
