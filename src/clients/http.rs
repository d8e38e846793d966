//! Shared upstream transport.
//!
//! Every provider call goes through [`UpstreamClient::get_json`]: one GET, a
//! hard requirement on status 200, and a JSON decode into the caller's shape.
//! There is no retry and no backoff; a failure surfaces once to the caller.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid upstream url: {0}")]
    InvalidUrl(String),

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Raw text transport, the seam replaced by test doubles.
#[async_trait::async_trait]
pub trait HttpFetch: Send + Sync {
    /// Performs a GET and returns the body of a `200 OK` response.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::Transport`] when the request cannot be sent or read
    /// - [`UpstreamError::Status`] for any status other than 200
    async fn get_text(&self, url: &str) -> Result<String, UpstreamError>;
}

/// Builds the HTTP client shared by all providers.
///
/// Only the connect phase is bounded; slow bodies are not cut off.
pub fn build_http_client(connect_timeout: Duration, user_agent: &str) -> anyhow::Result<Client> {
    Client::builder()
        .connect_timeout(connect_timeout)
        .user_agent(user_agent)
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl HttpFetch for ReqwestFetcher {
    async fn get_text(&self, url: &str) -> Result<String, UpstreamError> {
        let transport = |e: reqwest::Error| UpstreamError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            debug!(url, status = status.as_u16(), body = %body, "Upstream rejected request");
            return Err(UpstreamError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(transport)
    }
}

#[derive(Clone)]
pub struct UpstreamClient {
    fetcher: Arc<dyn HttpFetch>,
}

impl UpstreamClient {
    #[must_use]
    pub fn new(fetcher: Arc<dyn HttpFetch>) -> Self {
        Self { fetcher }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, UpstreamError> {
        let body = self.fetcher.get_text(url.as_str()).await?;

        serde_json::from_str(&body).map_err(|e| UpstreamError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

/// Appends `segments` to a provider base URL, then the query pairs.
///
/// Each segment is percent-encoded on its own, so `/`, `?` and `#` in caller
/// input stay inside one segment. Empty and dot segments are refused.
pub fn endpoint(
    base: &Url,
    segments: &[&str],
    params: &[(&str, &str)],
) -> Result<Url, UpstreamError> {
    if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
        return Err(UpstreamError::InvalidUrl(format!(
            "{base}: invalid path segment {bad:?}"
        )));
    }

    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| UpstreamError::InvalidUrl(format!("{base} cannot be a base")))?
        .pop_if_empty()
        .extend(segments);

    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
    }

    Ok(url)
}

/// Parses a configured base URL.
pub fn base_url(raw: &str) -> Result<Url, UpstreamError> {
    Url::parse(raw).map_err(|e| UpstreamError::InvalidUrl(format!("{raw}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(&'static str);

    #[async_trait::async_trait]
    impl HttpFetch for Canned {
        async fn get_text(&self, _url: &str) -> Result<String, UpstreamError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_endpoint_appends_segments_and_encodes() {
        let base = base_url("https://aniliberty.top/api/v1").unwrap();
        let url = endpoint(
            &base,
            &["app", "search", "releases"],
            &[("query", "a&b c")],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://aniliberty.top/api/v1/app/search/releases?query=a%26b+c"
        );

        let slashed = base_url("https://aniliberty.top/api/v1/").unwrap();
        let url = endpoint(&slashed, &["anime", "genres"], &[]).unwrap();
        assert_eq!(url.as_str(), "https://aniliberty.top/api/v1/anime/genres");
    }

    #[test]
    fn test_endpoint_keeps_caller_input_in_one_segment() {
        let base = base_url("https://consumet.test/anime/zoro").unwrap();
        let url = endpoint(&base, &["../info?id=x#y"], &[]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://consumet.test/anime/zoro/..%2Finfo%3Fid=x%23y"
        );
        assert_eq!(url.path_segments().unwrap().count(), 3);
    }

    #[test]
    fn test_endpoint_rejects_dot_segments() {
        let base = base_url("https://consumet.test/anime/zoro/").unwrap();
        for bad in ["..", ".", ""] {
            assert!(matches!(
                endpoint(&base, &[bad], &[("page", "1")]),
                Err(UpstreamError::InvalidUrl(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_decode_failure_is_reported() {
        let client = UpstreamClient::new(Arc::new(Canned("<html>")));
        let url = Url::parse("http://provider.test/x").unwrap();
        let result: Result<Vec<String>, _> = client.get_json(&url).await;
        assert!(matches!(result, Err(UpstreamError::Decode { .. })));
    }

    #[tokio::test]
    async fn test_decodes_json_body() {
        let client = UpstreamClient::new(Arc::new(Canned(r#"["Action","Drama"]"#)));
        let url = Url::parse("http://provider.test/genre/list").unwrap();
        let genres: Vec<String> = client.get_json(&url).await.unwrap();
        assert_eq!(genres, ["Action", "Drama"]);
    }
}
