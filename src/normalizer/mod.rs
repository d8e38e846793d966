//! Maps provider payloads onto the canonical model.
//!
//! This is the only module that reads the provider-specific types from
//! [`crate::clients`]; everything downstream sees [`SearchResult`], [`Anime`],
//! [`Episode`] and [`Genre`] only. All functions here are pure.
//!
//! [`SearchResult`]: crate::models::anime::SearchResult
//! [`Anime`]: crate::models::anime::Anime
//! [`Episode`]: crate::models::episode::Episode
//! [`Genre`]: crate::models::anime::Genre

pub mod anilibria;
pub mod consumet;

/// Turns a provider-relative asset path into an absolute URL.
///
/// Already absolute URLs pass through; an empty path stays empty.
#[must_use]
pub fn absolute_url(origin: &str, path: &str) -> String {
    let path = path.trim();
    if path.is_empty() || path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }

    let origin = origin.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{origin}{path}")
    } else {
        format!("{origin}/{path}")
    }
}

/// Extracts a four digit year from free-form dates such as `"Oct 6, 2023"`.
#[must_use]
pub fn year_from_text(text: &str) -> Option<i32> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|part| part.len() == 4)
        .find_map(|part| part.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_url() {
        assert_eq!(
            absolute_url("https://aniliberty.top", "/storage/p.webp"),
            "https://aniliberty.top/storage/p.webp"
        );
        assert_eq!(
            absolute_url("https://aniliberty.top/", "storage/p.webp"),
            "https://aniliberty.top/storage/p.webp"
        );
        assert_eq!(
            absolute_url("https://aniliberty.top", "https://cdn/p.webp"),
            "https://cdn/p.webp"
        );
        assert_eq!(absolute_url("https://aniliberty.top", ""), "");
    }

    #[test]
    fn test_year_from_text() {
        assert_eq!(year_from_text("Oct 6, 2023"), Some(2023));
        assert_eq!(year_from_text("2019"), Some(2019));
        assert_eq!(year_from_text("unknown"), None);
    }
}
