use serde::{Deserialize, Serialize};

use crate::domain::artwork::ArtworkId;
use crate::ValidationError;

pub const MAX_QUERY_LEN: usize = 200;
pub const MAX_PAGE_SIZE: usize = 100;

/// Validated full-text search request against a collection source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    text: String,
    page: u32,
    page_size: usize,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, page: u32, page_size: usize) -> Result<Self, ValidationError> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        if trimmed.len() > MAX_QUERY_LEN {
            return Err(ValidationError::QueryTooLong {
                len: trimmed.len(),
                max: MAX_QUERY_LEN,
            });
        }
        if page == 0 {
            return Err(ValidationError::ZeroPage);
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(ValidationError::PageSizeOutOfRange {
                value: page_size,
                max: MAX_PAGE_SIZE,
            });
        }

        Ok(Self {
            text: trimmed.to_owned(),
            page,
            page_size,
        })
    }

    pub fn first_page(text: impl Into<String>, page_size: usize) -> Result<Self, ValidationError> {
        Self::new(text, 1, page_size)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn page(&self) -> u32 {
        self.page
    }

    pub const fn page_size(&self) -> usize {
        self.page_size
    }
}

/// One page of search results: pagination counters plus the identifiers to
/// hydrate. An empty `ids` is a valid no-match page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    pub total: u64,
    pub page: u32,
    pub page_size: usize,
    pub total_pages: u32,
    pub ids: Vec<ArtworkId>,
}

impl SearchPage {
    pub fn empty(page: u32, page_size: usize) -> Self {
        Self {
            total: 0,
            page,
            page_size,
            total_pages: 0,
            ids: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_accepts_valid_query() {
        let query = SearchQuery::new("  monet  ", 1, 12).expect("valid query");
        assert_eq!(query.text(), "monet");
        assert_eq!(query.page(), 1);
        assert_eq!(query.page_size(), 12);
    }

    #[test]
    fn rejects_empty_query() {
        let err = SearchQuery::new("   ", 1, 12).expect_err("must fail");
        assert!(matches!(err, ValidationError::EmptyQuery));
    }

    #[test]
    fn rejects_zero_page_and_oversized_page_size() {
        assert!(matches!(
            SearchQuery::new("monet", 0, 12).expect_err("must fail"),
            ValidationError::ZeroPage
        ));
        assert!(matches!(
            SearchQuery::new("monet", 1, 0).expect_err("must fail"),
            ValidationError::PageSizeOutOfRange { .. }
        ));
        assert!(matches!(
            SearchQuery::new("monet", 1, 101).expect_err("must fail"),
            ValidationError::PageSizeOutOfRange { .. }
        ));
    }

    #[test]
    fn empty_page_reports_no_ids() {
        let page = SearchPage::empty(1, 12);
        assert!(page.is_empty());
        assert_eq!(page.total, 0);
    }
}
