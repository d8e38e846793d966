use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::http::{UpstreamClient, UpstreamError, endpoint};
use crate::constants::providers::{
    ANILIBRIA_EPISODE_FIELDS, ANILIBRIA_GENRE_FIELDS, ANILIBRIA_LIST_FIELDS,
    ANILIBRIA_RELEASE_FIELDS,
};
use crate::domain::Provider;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValueField {
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NameField {
    #[serde(default)]
    pub main: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PosterOptimized {
    pub thumbnail: Option<String>,
    pub src: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Poster {
    pub src: Option<String>,
    pub thumbnail: Option<String>,
    pub optimized: Option<PosterOptimized>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnilibriaRelease {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: Option<ValueField>,
    pub year: Option<i32>,
    #[serde(default)]
    pub name: NameField,
    pub poster: Option<Poster>,
}

/// List endpoints answer either with a bare array or a `{data: [...]}` page.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReleaseList {
    Paged { data: Vec<AnilibriaRelease> },
    Bare(Vec<AnilibriaRelease>),
}

impl ReleaseList {
    fn into_releases(self) -> Vec<AnilibriaRelease> {
        match self {
            Self::Paged { data } | Self::Bare(data) => data,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenreName {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnilibriaPreviewEpisode {
    pub id: String,
    pub name: Option<String>,
    #[serde(default)]
    pub ordinal: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnilibriaReleaseDetail {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: Option<ValueField>,
    pub year: Option<i32>,
    #[serde(default)]
    pub name: NameField,
    pub poster: Option<Poster>,
    #[serde(default)]
    pub is_ongoing: bool,
    pub description: Option<String>,
    pub episodes_total: Option<i32>,
    #[serde(default)]
    pub genres: Vec<GenreName>,
    #[serde(default)]
    pub episodes: Vec<AnilibriaPreviewEpisode>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Marker {
    pub start: Option<i32>,
    pub stop: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnilibriaEpisode {
    pub id: String,
    pub name: Option<String>,
    #[serde(default)]
    pub ordinal: i32,
    pub opening: Option<Marker>,
    pub ending: Option<Marker>,
    pub hls_480: Option<String>,
    pub hls_720: Option<String>,
    pub hls_1080: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnilibriaGenre {
    pub id: i64,
    pub name: String,
    pub total_releases: Option<i64>,
}

#[derive(Clone)]
pub struct AnilibriaClient {
    upstream: UpstreamClient,
    base: Url,
}

impl AnilibriaClient {
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
        super::record_outcome(Provider::Anilibria, result.is_ok());
        result
    }

    async fn releases(
        &self,
        segments: &[&str],
        extra: &[(&str, &str)],
    ) -> Result<Vec<AnilibriaRelease>, UpstreamError> {
        let mut params = vec![("include", ANILIBRIA_LIST_FIELDS)];
        params.extend_from_slice(extra);
        let list: ReleaseList = self.get(segments, &params).await?;
        Ok(list.into_releases())
    }

    pub async fn search(&self, query: &str) -> Result<Vec<AnilibriaRelease>, UpstreamError> {
        self.releases(&["app", "search", "releases"], &[("query", query)])
            .await
    }

    pub async fn recommended(
        &self,
        limit: u32,
        page: u32,
    ) -> Result<Vec<AnilibriaRelease>, UpstreamError> {
        let (limit, page) = (limit.to_string(), page.to_string());
        self.releases(
            &["anime", "releases", "recommended"],
            &[("limit", &limit), ("page", &page)],
        )
        .await
    }

    pub async fn latest(&self, limit: u32) -> Result<Vec<AnilibriaRelease>, UpstreamError> {
        let limit = limit.to_string();
        self.releases(&["anime", "releases", "latest"], &[("limit", &limit)])
            .await
    }

    pub async fn random(&self, limit: u32) -> Result<Vec<AnilibriaRelease>, UpstreamError> {
        let limit = limit.to_string();
        self.releases(&["anime", "releases", "random"], &[("limit", &limit)])
            .await
    }

    pub async fn genre_releases(
        &self,
        genre_id: i64,
        limit: u32,
        page: u32,
    ) -> Result<Vec<AnilibriaRelease>, UpstreamError> {
        let (limit, page) = (limit.to_string(), page.to_string());
        let genre_id = genre_id.to_string();
        self.releases(
            &["anime", "genres", &genre_id, "releases"],
            &[("limit", &limit), ("page", &page)],
        )
        .await
    }

    pub async fn genres(&self) -> Result<Vec<AnilibriaGenre>, UpstreamError> {
        self.get(&["anime", "genres"], &[("include", ANILIBRIA_GENRE_FIELDS)])
            .await
    }

    pub async fn release(&self, id: &str) -> Result<AnilibriaReleaseDetail, UpstreamError> {
        self.get(
            &["anime", "releases", id],
            &[("include", ANILIBRIA_RELEASE_FIELDS)],
        )
        .await
    }

    pub async fn episode(&self, id: &str) -> Result<AnilibriaEpisode, UpstreamError> {
        self.get(
            &["anime", "releases", "episodes", id],
            &[("include", ANILIBRIA_EPISODE_FIELDS)],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_list_accepts_both_shapes() {
        let bare = r#"[{"id": 1, "name": {"main": "A"}}]"#;
        let paged = r#"{"data": [{"id": 2, "name": {"main": "B"}}], "meta": {}}"#;

        let bare: ReleaseList = serde_json::from_str(bare).unwrap();
        let paged: ReleaseList = serde_json::from_str(paged).unwrap();

        assert_eq!(bare.into_releases()[0].id, 1);
        assert_eq!(paged.into_releases()[0].name.main, "B");
    }

    #[test]
    fn test_episode_tolerates_missing_streams() {
        let json = r#"{"id": "ep-1", "ordinal": 3, "hls_720": "https://cdn/720.m3u8"}"#;
        let episode: AnilibriaEpisode = serde_json::from_str(json).unwrap();
        assert!(episode.hls_480.is_none());
        assert!(episode.hls_1080.is_none());
        assert!(episode.opening.is_none());
    }
}
