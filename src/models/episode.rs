use serde::{Deserialize, Serialize};

/// Half-open interval `[start, end)` in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSegment {
    pub start: i32,
    pub end: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtitle {
    pub url: String,
    pub lang: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub ordinal: i32,
    pub title: String,
    pub opening: TimeSegment,
    pub ending: TimeSegment,
    pub sources: Vec<Source>,
    pub subtitles: Vec<Subtitle>,
}

/// HLS renditions Anilibria exposes, in ascending resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HlsQuality {
    P480,
    P720,
    P1080,
}

impl HlsQuality {
    pub const ASCENDING: [Self; 3] = [Self::P480, Self::P720, Self::P1080];

    #[must_use]
    pub const fn source_type(self) -> &'static str {
        match self {
            Self::P480 => "hls480",
            Self::P720 => "hls720",
            Self::P1080 => "hls1080",
        }
    }
}

/// Caller-supplied corrections applied on top of a provider watch payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeOverrides {
    pub title: Option<String>,
    pub ordinal: Option<i32>,
}

impl EpisodeOverrides {
    /// Ordinal value callers send to mean "no override".
    pub const NO_ORDINAL: i32 = -1;

    /// Builds overrides from raw query values, dropping empty titles and the
    /// `-1` ordinal sentinel.
    #[must_use]
    pub fn from_query(title: Option<String>, ordinal: Option<i32>) -> Self {
        Self {
            title: title.filter(|t| !t.trim().is_empty()),
            ordinal: ordinal.filter(|o| *o != Self::NO_ORDINAL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_drop_sentinels() {
        let overrides = EpisodeOverrides::from_query(Some("  ".into()), Some(-1));
        assert_eq!(overrides, EpisodeOverrides::default());

        let overrides = EpisodeOverrides::from_query(Some("Pilot".into()), Some(0));
        assert_eq!(overrides.title.as_deref(), Some("Pilot"));
        assert_eq!(overrides.ordinal, Some(0));
    }

    #[test]
    fn test_quality_order() {
        let types: Vec<_> = HlsQuality::ASCENDING
            .iter()
            .map(|q| q.source_type())
            .collect();
        assert_eq!(types, ["hls480", "hls720", "hls1080"]);
    }
}
