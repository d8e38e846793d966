use super::ApiError;
use crate::constants::limits::{
    DEFAULT_PAGE, DEFAULT_PAGE_SIZE, DEFAULT_RELEASE_LIMIT, MAX_COLLECTION_TYPE_LEN, MAX_PAGE,
    MAX_PAGE_SIZE, MAX_RELEASE_LIMIT,
};
use crate::domain::PageRequest;

pub fn validate_search_query(query: Option<&str>) -> Result<&str, ApiError> {
    let trimmed = query.unwrap_or_default().trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Search query cannot be empty"));
    }
    Ok(trimmed)
}

/// Ids end up as a provider URL path segment, so `.` and `..` are refused.
pub fn validate_id<'a>(name: &str, id: &'a str) -> Result<&'a str, ApiError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("{name} cannot be empty")));
    }
    validate_path_segment(name, trimmed)
}

pub fn validate_path_segment<'a>(name: &str, value: &'a str) -> Result<&'a str, ApiError> {
    if matches!(value, "." | "..") {
        return Err(ApiError::validation(format!(
            "Invalid {name}: {value:?} is not allowed"
        )));
    }
    Ok(value)
}

/// Personalization lists: page defaults to 1, limit to 10 and is capped.
pub fn page_request(page: Option<i64>, limit: Option<i64>) -> Result<PageRequest, ApiError> {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);
    if limit > MAX_PAGE_SIZE {
        return Err(ApiError::validation(format!(
            "Invalid limit: {limit}. Limit must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }
    let page = page.unwrap_or(DEFAULT_PAGE);
    if page > MAX_PAGE {
        return Err(ApiError::validation(format!(
            "Invalid page: {page}. Page must be between 1 and {MAX_PAGE}"
        )));
    }
    Ok(PageRequest::new(page, limit)?)
}

pub fn validate_page(page: Option<i64>) -> Result<u32, ApiError> {
    let page = page.unwrap_or(DEFAULT_PAGE);
    u32::try_from(page)
        .ok()
        .filter(|p| *p >= 1)
        .ok_or_else(|| ApiError::validation(format!("Invalid page: {page}. Page must be >= 1")))
}

pub fn validate_release_limit(limit: Option<i64>) -> Result<u32, ApiError> {
    let limit = limit.unwrap_or(DEFAULT_RELEASE_LIMIT);
    if !(1..=MAX_RELEASE_LIMIT).contains(&limit) {
        return Err(ApiError::validation(format!(
            "Invalid limit: {limit}. Limit must be between 1 and {MAX_RELEASE_LIMIT}"
        )));
    }
    u32::try_from(limit).map_err(|_| ApiError::validation("Invalid limit"))
}

pub fn validate_collection_type(kind: Option<&str>) -> Result<&str, ApiError> {
    let kind = kind.unwrap_or_default().trim();
    if kind.is_empty() {
        return Err(ApiError::validation("Collection type cannot be empty"));
    }
    if kind.chars().count() > MAX_COLLECTION_TYPE_LEN {
        return Err(ApiError::validation(format!(
            "Collection type must be {MAX_COLLECTION_TYPE_LEN} characters or less"
        )));
    }
    Ok(kind)
}

pub fn validate_non_negative(name: &str, value: i32) -> Result<i32, ApiError> {
    if value < 0 {
        return Err(ApiError::validation(format!(
            "Invalid {name}: {value}. Must not be negative"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query(Some("  Frieren ")).unwrap(), "Frieren");
        assert!(validate_search_query(Some("   ")).is_err());
        assert!(validate_search_query(None).is_err());
    }

    #[test]
    fn test_ids_cannot_be_dot_segments() {
        assert_eq!(validate_id("id", " 9919 ").unwrap(), "9919");
        assert_eq!(validate_id("id", "...").unwrap(), "...");
        assert!(validate_id("id", "..").is_err());
        assert!(validate_id("id", " . ").is_err());
        assert!(validate_path_segment("query", "..").is_err());
        assert_eq!(validate_path_segment("query", "info").unwrap(), "info");
    }

    #[test]
    fn test_page_request_defaults_and_bounds() {
        let req = page_request(None, None).unwrap();
        assert_eq!((req.page(), req.limit()), (1, 10));

        assert!(page_request(Some(0), None).is_err());
        assert!(page_request(None, Some(0)).is_err());
        assert!(page_request(None, Some(101)).is_err());
        assert!(page_request(Some(3), Some(100)).is_ok());
    }

    #[test]
    fn test_page_request_rejects_unreachable_pages() {
        let req = page_request(Some(MAX_PAGE), Some(MAX_PAGE_SIZE)).unwrap();
        assert!(req.offset() < i64::MAX as u64);

        assert!(page_request(Some(MAX_PAGE + 1), Some(1)).is_err());
        assert!(page_request(Some(i64::MAX), Some(100)).is_err());
    }

    #[test]
    fn test_validate_release_limit() {
        assert_eq!(validate_release_limit(None).unwrap(), 14);
        assert_eq!(validate_release_limit(Some(50)).unwrap(), 50);
        assert!(validate_release_limit(Some(0)).is_err());
        assert!(validate_release_limit(Some(51)).is_err());
    }

    #[test]
    fn test_validate_page() {
        assert_eq!(validate_page(None).unwrap(), 1);
        assert!(validate_page(Some(-2)).is_err());
    }

    #[test]
    fn test_validate_collection_type() {
        assert_eq!(validate_collection_type(Some("watching")).unwrap(), "watching");
        assert!(validate_collection_type(Some("")).is_err());
        assert!(validate_collection_type(None).is_err());
        assert!(validate_collection_type(Some(&"x".repeat(65))).is_err());
    }
}
