use serde::{Deserialize, Serialize};

/// List-level entry returned by every search-like endpoint.
///
/// `id` is provider assigned and only unique per provider; the relational
/// store keys on `id` alone and the provider tag is informational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    #[serde(rename = "image")]
    pub poster: String,
    pub year: i32,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "parser_type")]
    pub provider: String,
}

/// One page of a provider that paginates upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    pub results: Vec<SearchResult>,
    pub page: u32,
    pub has_next_page: bool,
    pub total_pages: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimeStatus {
    Ongoing,
    Completed,
}

impl AnimeStatus {
    #[must_use]
    pub const fn from_ongoing(ongoing: bool) -> Self {
        if ongoing { Self::Ongoing } else { Self::Completed }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewEpisode {
    pub id: String,
    pub ordinal: i32,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anime {
    pub id: String,
    pub title: String,
    #[serde(rename = "image")]
    pub poster: String,
    pub description: String,
    pub genres: Vec<String>,
    pub status: AnimeStatus,
    pub year: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub total_episodes: i32,
    pub episodes: Vec<PreviewEpisode>,
}

/// Genre as exposed by each provider.
///
/// Anilibria carries a numeric id and a release count, Consumet only a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Genre {
    Catalogued {
        id: i64,
        name: String,
        total_releases: i64,
    },
    Named(String),
}
