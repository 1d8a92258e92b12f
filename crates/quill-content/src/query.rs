//! Listing parameters shared by entry listing and public delivery.

use quill_core::error::QuillResult;
use quill_core::models::content_entry::EntryFilter;
use quill_core::repository::PageRequest;
use serde::{Deserialize, Serialize};

/// Page, page size, and optional search term as received from a caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub page: i64,
    pub page_size: i64,
    pub search: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: PageRequest::DEFAULT_PAGE_SIZE as i64,
            search: None,
        }
    }
}

impl ListQuery {
    pub fn page(page: i64, page_size: i64) -> Self {
        Self {
            page,
            page_size,
            search: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub(crate) fn page_request(&self) -> QuillResult<PageRequest> {
        PageRequest::new(self.page, self.page_size)
    }

    pub(crate) fn filter(&self) -> EntryFilter {
        EntryFilter::search(self.search.as_deref().map(str::trim))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_ten() {
        let query: ListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 10);
        assert!(query.page_request().is_ok());
    }

    #[test]
    fn blank_search_is_no_filter() {
        assert!(ListQuery::default().search("   ").filter().search.is_none());
        assert_eq!(
            ListQuery::default().search("Book").filter().search.as_deref(),
            Some("Book")
        );
    }

    #[test]
    fn zero_page_is_rejected() {
        assert!(ListQuery::page(0, 10).page_request().is_err());
        assert!(ListQuery::page(1, 0).page_request().is_err());
    }
}
