use super::absolute_url;
use crate::clients::anilibria::{
    AnilibriaEpisode, AnilibriaGenre, AnilibriaRelease, AnilibriaReleaseDetail, Marker, Poster,
    ValueField,
};
use crate::domain::Provider;
use crate::models::anime::{Anime, AnimeStatus, Genre, PreviewEpisode, SearchResult};
use crate::models::episode::{Episode, HlsQuality, Source, TimeSegment};

fn kind(field: Option<ValueField>) -> String {
    field.and_then(|f| f.value).unwrap_or_default()
}

/// List entries prefer the optimized thumbnail, detail pages the full poster.
fn list_poster(origin: &str, poster: Option<&Poster>) -> String {
    let path = poster.and_then(|p| {
        p.optimized
            .as_ref()
            .and_then(|o| o.thumbnail.as_deref().or(o.src.as_deref()))
            .or(p.thumbnail.as_deref())
            .or(p.src.as_deref())
    });
    absolute_url(origin, path.unwrap_or_default())
}

fn detail_poster(origin: &str, poster: Option<&Poster>) -> String {
    let path = poster.and_then(|p| {
        p.src
            .as_deref()
            .or_else(|| p.optimized.as_ref().and_then(|o| o.src.as_deref()))
    });
    absolute_url(origin, path.unwrap_or_default())
}

fn segment(marker: Option<Marker>) -> TimeSegment {
    let marker = marker.unwrap_or_default();
    TimeSegment {
        start: marker.start.unwrap_or_default(),
        end: marker.stop.unwrap_or_default(),
    }
}

#[must_use]
pub fn search_result(origin: &str, release: AnilibriaRelease) -> SearchResult {
    SearchResult {
        id: release.id.to_string(),
        title: release.name.main,
        poster: list_poster(origin, release.poster.as_ref()),
        year: release.year.unwrap_or_default(),
        kind: kind(release.kind),
        provider: Provider::Anilibria.label().to_string(),
    }
}

#[must_use]
pub fn search_results(origin: &str, releases: Vec<AnilibriaRelease>) -> Vec<SearchResult> {
    releases
        .into_iter()
        .map(|r| search_result(origin, r))
        .collect()
}

#[must_use]
pub fn anime(origin: &str, detail: AnilibriaReleaseDetail) -> Anime {
    let poster = detail_poster(origin, detail.poster.as_ref());

    let episodes = detail
        .episodes
        .into_iter()
        .map(|e| PreviewEpisode {
            id: e.id,
            ordinal: e.ordinal,
            title: e.name.unwrap_or_default(),
        })
        .collect::<Vec<_>>();

    let total_episodes = detail
        .episodes_total
        .unwrap_or_else(|| i32::try_from(episodes.len()).unwrap_or(i32::MAX));

    Anime {
        id: detail.id.to_string(),
        title: detail.name.main,
        poster,
        description: detail.description.unwrap_or_default(),
        genres: detail.genres.into_iter().map(|g| g.name).collect(),
        status: AnimeStatus::from_ongoing(detail.is_ongoing),
        year: detail.year.unwrap_or_default(),
        kind: kind(detail.kind),
        total_episodes,
        episodes,
    }
}

#[must_use]
pub fn episode(raw: AnilibriaEpisode) -> Episode {
    let streams = [raw.hls_480, raw.hls_720, raw.hls_1080];

    let sources = HlsQuality::ASCENDING
        .into_iter()
        .zip(streams)
        .filter_map(|(quality, url)| {
            url.filter(|u| !u.trim().is_empty()).map(|url| Source {
                url,
                kind: quality.source_type().to_string(),
            })
        })
        .collect();

    Episode {
        id: raw.id,
        ordinal: raw.ordinal,
        title: raw.name.unwrap_or_default(),
        opening: segment(raw.opening),
        ending: segment(raw.ending),
        sources,
        subtitles: Vec::new(),
    }
}

#[must_use]
pub fn genre(raw: AnilibriaGenre) -> Genre {
    Genre::Catalogued {
        id: raw.id,
        name: raw.name,
        total_releases: raw.total_releases.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://aniliberty.top";

    fn detail(is_ongoing: bool) -> AnilibriaReleaseDetail {
        serde_json::from_value(serde_json::json!({
            "id": 9000,
            "type": {"value": "TV"},
            "year": 2023,
            "name": {"main": "Frieren"},
            "poster": {"src": "/storage/releases/posters/9000/full.webp"},
            "is_ongoing": is_ongoing,
            "description": "Elf mage",
            "genres": [{"name": "Fantasy"}, {"name": "Adventure"}],
            "episodes": [
                {"id": "e1", "name": "Journey's End", "ordinal": 1},
                {"id": "e2", "ordinal": 2}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_status_follows_ongoing_flag() {
        assert_eq!(anime(ORIGIN, detail(true)).status, AnimeStatus::Ongoing);
        assert_eq!(anime(ORIGIN, detail(false)).status, AnimeStatus::Completed);
    }

    #[test]
    fn test_anime_mapping() {
        let anime = anime(ORIGIN, detail(false));
        assert_eq!(anime.id, "9000");
        assert_eq!(
            anime.poster,
            "https://aniliberty.top/storage/releases/posters/9000/full.webp"
        );
        assert_eq!(anime.genres, ["Fantasy", "Adventure"]);
        assert_eq!(anime.total_episodes, 2);
        assert_eq!(anime.episodes[1].ordinal, 2);
        assert_eq!(anime.episodes[1].title, "");
    }

    #[test]
    fn test_single_720_source() {
        let raw: AnilibriaEpisode = serde_json::from_value(serde_json::json!({
            "id": "ep",
            "ordinal": 1,
            "hls_480": null,
            "hls_720": "https://cdn/720.m3u8",
            "hls_1080": ""
        }))
        .unwrap();

        let episode = episode(raw);
        assert_eq!(episode.sources.len(), 1);
        assert_eq!(episode.sources[0].kind, "hls720");
    }

    #[test]
    fn test_sources_ascending_and_markers() {
        let raw: AnilibriaEpisode = serde_json::from_value(serde_json::json!({
            "id": "ep",
            "name": "Pilot",
            "ordinal": 4,
            "opening": {"start": 0, "stop": 90},
            "ending": {"start": 1300, "stop": null},
            "hls_1080": "https://cdn/1080.m3u8",
            "hls_480": "https://cdn/480.m3u8"
        }))
        .unwrap();

        let episode = episode(raw);
        let kinds: Vec<_> = episode.sources.iter().map(|s| s.kind.as_str()).collect();
        assert_eq!(kinds, ["hls480", "hls1080"]);
        assert_eq!(episode.opening, TimeSegment { start: 0, end: 90 });
        assert_eq!(episode.ending, TimeSegment { start: 1300, end: 0 });
    }

    #[test]
    fn test_search_result_uses_thumbnail_and_string_id() {
        let raw: AnilibriaRelease = serde_json::from_value(serde_json::json!({
            "id": 42,
            "type": {"value": "MOVIE"},
            "year": 2001,
            "name": {"main": "Spirited Away"},
            "poster": {"optimized": {"thumbnail": "/thumbs/42.webp"}}
        }))
        .unwrap();

        let result = search_result(ORIGIN, raw);
        assert_eq!(result.id, "42");
        assert_eq!(result.poster, "https://aniliberty.top/thumbs/42.webp");
        assert_eq!(result.kind, "MOVIE");
        assert_eq!(result.provider, "Anilibria");
    }
}
