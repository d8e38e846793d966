use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("page must be >= 1, got {0}")]
    InvalidPage(i64),

    #[error("limit must be >= 1, got {0}")]
    InvalidLimit(i64),
}

/// Validated 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Result<Self, PaginationError> {
        let page = u64::try_from(page)
            .ok()
            .filter(|p| *p >= 1)
            .ok_or(PaginationError::InvalidPage(page))?;
        let limit = u64::try_from(limit)
            .ok()
            .filter(|l| *l >= 1)
            .ok_or(PaginationError::InvalidLimit(limit))?;
        Ok(Self { page, limit })
    }

    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Saturates instead of wrapping for pages far past any real data.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
    pub pages_left: u64,
}

impl PageMeta {
    #[must_use]
    pub const fn new(total: u64, request: PageRequest) -> Self {
        let total_pages = total.div_ceil(request.limit);
        Self {
            total,
            page: request.page,
            limit: request.limit,
            total_pages,
            pages_left: total_pages.saturating_sub(request.page),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    #[must_use]
    pub fn new(data: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            data,
            meta: PageMeta::new(total, request),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_values() {
        assert_eq!(PageRequest::new(0, 10), Err(PaginationError::InvalidPage(0)));
        assert_eq!(
            PageRequest::new(1, -5),
            Err(PaginationError::InvalidLimit(-5))
        );
        assert!(PageRequest::new(1, 1).is_ok());
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(1, 10).unwrap().offset(), 0);
        assert_eq!(PageRequest::new(3, 10).unwrap().offset(), 20);
        assert_eq!(
            PageRequest::new(i64::MAX, 100).unwrap().offset(),
            u64::MAX
        );
    }

    #[test]
    fn test_meta_for_partial_last_page() {
        let meta = PageMeta::new(25, PageRequest::new(3, 10).unwrap());
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.pages_left, 0);

        let meta = PageMeta::new(25, PageRequest::new(1, 10).unwrap());
        assert_eq!(meta.pages_left, 2);
    }

    #[test]
    fn test_meta_past_the_end_and_empty() {
        let meta = PageMeta::new(25, PageRequest::new(7, 10).unwrap());
        assert_eq!(meta.pages_left, 0);

        let meta = PageMeta::new(0, PageRequest::new(1, 10).unwrap());
        assert_eq!(meta.total_pages, 0);
        assert_eq!(meta.pages_left, 0);
    }

    #[test]
    fn test_meta_serializes_camel_case() {
        let meta = PageMeta::new(5, PageRequest::new(1, 2).unwrap());
        let json = serde_json::to_value(meta).unwrap();
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["pagesLeft"], 2);
    }
}
