use super::year_from_text;
use crate::clients::consumet::{
    ConsumetAnime, ConsumetAnimeInfo, ConsumetPage, ConsumetWatch, Interval,
};
use crate::domain::Provider;
use crate::models::anime::{Anime, AnimeStatus, Genre, PreviewEpisode, SearchPage, SearchResult};
use crate::models::episode::{Episode, EpisodeOverrides, Source, Subtitle, TimeSegment};

/// Zoro reports airing state as text; only these values mean ongoing.
fn is_ongoing(status: Option<&str>) -> bool {
    status.is_some_and(|s| {
        let s = s.trim();
        s.eq_ignore_ascii_case("ongoing") || s.eq_ignore_ascii_case("currently airing")
    })
}

fn segment(interval: Option<Interval>) -> TimeSegment {
    let interval = interval.unwrap_or_default();
    TimeSegment {
        start: interval.start,
        end: interval.end,
    }
}

fn year(explicit: Option<i32>, release_date: Option<&str>) -> i32 {
    explicit
        .or_else(|| release_date.and_then(year_from_text))
        .unwrap_or_default()
}

#[must_use]
pub fn search_result(raw: ConsumetAnime) -> SearchResult {
    SearchResult {
        year: year(raw.year, raw.release_date.as_deref()),
        id: raw.id,
        title: raw.title,
        poster: raw.image.unwrap_or_default(),
        kind: raw.kind.unwrap_or_default(),
        provider: Provider::Consumet.label().to_string(),
    }
}

#[must_use]
pub fn search_results(raw: Vec<ConsumetAnime>) -> Vec<SearchResult> {
    raw.into_iter().map(search_result).collect()
}

#[must_use]
pub fn search_page(raw: ConsumetPage, requested_page: u32) -> SearchPage {
    SearchPage {
        page: raw.current_page.unwrap_or(requested_page),
        has_next_page: raw.has_next_page,
        total_pages: raw.total_pages,
        results: search_results(raw.results),
    }
}

#[must_use]
pub fn anime(raw: ConsumetAnimeInfo) -> Anime {
    let episodes = raw
        .episodes
        .into_iter()
        .map(|e| PreviewEpisode {
            id: e.id,
            ordinal: e.number,
            title: e.title.unwrap_or_default(),
        })
        .collect::<Vec<_>>();

    let total_episodes = raw
        .total_episodes
        .unwrap_or_else(|| i32::try_from(episodes.len()).unwrap_or(i32::MAX));

    Anime {
        year: year(None, raw.release_date.as_deref()),
        status: AnimeStatus::from_ongoing(is_ongoing(raw.status.as_deref())),
        id: raw.id,
        title: raw.title,
        poster: raw.image.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        genres: raw.genres,
        kind: raw.kind.unwrap_or_default(),
        total_episodes,
        episodes,
    }
}

/// Builds an episode from a watch payload. Caller overrides win over the
/// provider's own title and number.
#[must_use]
pub fn episode(id: &str, raw: ConsumetWatch, overrides: EpisodeOverrides) -> Episode {
    let sources = raw
        .sources
        .into_iter()
        .filter(|s| !s.url.trim().is_empty())
        .map(|s| Source {
            kind: s
                .kind
                .unwrap_or_else(|| (if s.is_m3u8 { "hls" } else { "mp4" }).to_string()),
            url: s.url,
        })
        .collect();

    let subtitles = raw
        .subtitles
        .into_iter()
        .filter(|s| !s.url.trim().is_empty())
        .map(|s| Subtitle {
            url: s.url,
            lang: s.lang,
        })
        .collect();

    Episode {
        id: id.to_string(),
        ordinal: overrides.ordinal.or(raw.number).unwrap_or_default(),
        title: overrides.title.or(raw.title).unwrap_or_default(),
        opening: segment(raw.intro),
        ending: segment(raw.outro),
        sources,
        subtitles,
    }
}

#[must_use]
pub fn genre(name: String) -> Genre {
    Genre::Named(name)
}
