use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::http::{UpstreamClient, UpstreamError, endpoint};
use crate::domain::Provider;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumetAnime {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub image: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub release_date: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumetPage {
    pub current_page: Option<u32>,
    #[serde(default)]
    pub has_next_page: bool,
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub results: Vec<ConsumetAnime>,
}

/// `most-popular`, `top-airing` and `genre/{name}` come back paged on current
/// deployments and as bare arrays on older ones.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResultList {
    Paged(ConsumetPage),
    Bare(Vec<ConsumetAnime>),
}

impl ResultList {
    fn into_results(self) -> Vec<ConsumetAnime> {
        match self {
            Self::Paged(page) => page.results,
            Self::Bare(results) => results,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConsumetPreviewEpisode {
    pub id: String,
    #[serde(default)]
    pub number: i32,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumetAnimeInfo {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub image: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub release_date: Option<String>,
    pub total_episodes: Option<i32>,
    #[serde(default)]
    pub episodes: Vec<ConsumetPreviewEpisode>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Interval {
    #[serde(default)]
    pub start: i32,
    #[serde(default)]
    pub end: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumetSource {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(rename = "isM3U8", default)]
    pub is_m3u8: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConsumetSubtitle {
    pub url: String,
    #[serde(default)]
    pub lang: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConsumetWatch {
    pub title: Option<String>,
    pub number: Option<i32>,
    pub intro: Option<Interval>,
    pub outro: Option<Interval>,
    #[serde(default)]
    pub sources: Vec<ConsumetSource>,
    #[serde(default)]
    pub subtitles: Vec<ConsumetSubtitle>,
}

#[derive(Clone)]
pub struct ConsumetClient {
    upstream: UpstreamClient,
    base: Url,
}

impl ConsumetClient {
    #[must_use]
    pub const fn new(upstream: UpstreamClient, base: Url) -> Self {
        Self { upstream, base }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&str, &str)],
    ) -> Result<T, UpstreamError> {
        let url = endpoint(&self.base, segments, params)?;
        let result = self.upstream.get_json(&url).await;
        super::record_outcome(Provider::Consumet, result.is_ok());
        result
    }

    async fn list(&self, segments: &[&str]) -> Result<Vec<ConsumetAnime>, UpstreamError> {
        let list: ResultList = self.get(segments, &[]).await?;
        Ok(list.into_results())
    }

    pub async fn search(&self, query: &str, page: u32) -> Result<ConsumetPage, UpstreamError> {
        let page = page.to_string();
        self.get(&[query], &[("page", &page)]).await
    }

    pub async fn most_popular(&self) -> Result<Vec<ConsumetAnime>, UpstreamError> {
        self.list(&["most-popular"]).await
    }

    pub async fn top_airing(&self) -> Result<Vec<ConsumetAnime>, UpstreamError> {
        self.list(&["top-airing"]).await
    }

    pub async fn genre_releases(&self, genre: &str) -> Result<Vec<ConsumetAnime>, UpstreamError> {
        self.list(&["genre", genre]).await
    }

    pub async fn genres(&self) -> Result<Vec<String>, UpstreamError> {
        self.get(&["genre", "list"], &[]).await
    }

    pub async fn info(&self, id: &str) -> Result<ConsumetAnimeInfo, UpstreamError> {
        self.get(&["info"], &[("id", id)]).await
    }

    pub async fn watch(&self, episode_id: &str, dub: bool) -> Result<ConsumetWatch, UpstreamError> {
        let dub = if dub { "true" } else { "false" };
        self.get(&["watch"], &[("episodeId", episode_id), ("dub", dub)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpFetch;
    use crate::clients::http::base_url;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder {
        urls: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl HttpFetch for Recorder {
        async fn get_text(&self, url: &str) -> Result<String, UpstreamError> {
            self.urls.lock().unwrap().push(url.to_string());
            Ok(r#"{"currentPage": 1, "hasNextPage": false, "results": []}"#.to_string())
        }
    }

    fn client(recorder: &Arc<Recorder>) -> ConsumetClient {
        let base = base_url("https://consumet.test/anime/zoro/").unwrap();
        ConsumetClient::new(UpstreamClient::new(recorder.clone()), base)
    }

    #[tokio::test]
    async fn test_search_query_stays_under_the_provider_path() {
        let recorder = Arc::new(Recorder::default());
        let consumet = client(&recorder);

        for query in ["naruto shippuden", "../info", "a/b?c#d"] {
            consumet.search(query, 1).await.unwrap();
        }

        let urls = recorder.urls.lock().unwrap().clone();
        assert_eq!(
            urls,
            [
                "https://consumet.test/anime/zoro/naruto%20shippuden?page=1",
                "https://consumet.test/anime/zoro/..%2Finfo?page=1",
                "https://consumet.test/anime/zoro/a%2Fb%3Fc%23d?page=1",
            ]
        );
    }

    #[tokio::test]
    async fn test_dot_queries_never_reach_the_provider() {
        let recorder = Arc::new(Recorder::default());
        let consumet = client(&recorder);

        for query in ["..", "."] {
            let result = consumet.search(query, 1).await;
            assert!(matches!(result, Err(UpstreamError::InvalidUrl(_))));
        }
        let result = consumet.genre_releases("..").await;
        assert!(matches!(result, Err(UpstreamError::InvalidUrl(_))));

        assert!(recorder.urls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_result_list_accepts_both_shapes() {
        let paged = r#"{"currentPage": 1, "hasNextPage": true, "results": [{"id": "a", "title": "A"}]}"#;
        let bare = r#"[{"id": "b", "title": "B", "type": "TV"}]"#;

        let paged: ResultList = serde_json::from_str(paged).unwrap();
        let bare: ResultList = serde_json::from_str(bare).unwrap();

        assert_eq!(paged.into_results()[0].id, "a");
        assert_eq!(bare.into_results()[0].kind.as_deref(), Some("TV"));
    }

    #[test]
    fn test_preview_episode_uses_number() {
        let json = r#"{"id": "x", "title": "T", "episodes": [{"id": "x$ep=1", "number": 1}]}"#;
        let info: ConsumetAnimeInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.episodes[0].number, 1);
    }

    #[test]
    fn test_watch_payload() {
        let json = r#"{
            "intro": {"start": 10, "end": 95},
            "sources": [{"url": "https://cdn/master.m3u8", "isM3U8": true}],
            "subtitles": [{"url": "https://cdn/en.vtt", "lang": "English"}]
        }"#;
        let watch: ConsumetWatch = serde_json::from_str(json).unwrap();
        assert_eq!(watch.intro.unwrap().end, 95);
        assert!(watch.sources[0].is_m3u8);
        assert!(watch.outro.is_none());
    }
}
