use std::fmt;
use std::time::Duration;

use crate::constants::cache::{GENRE_CATALOG_TTL, ITEM_TTL, KEY_PREFIX, LIST_TTL};
use crate::domain::Provider;

/// Every cached read, keyed by operation and parameters.
///
/// Free-text parameters are percent-encoded before they are joined with `:`
/// so a query containing the separator can never collide with another tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    SearchById(String),
    Anime {
        provider: Provider,
        id: String,
    },
    Search {
        provider: Provider,
        query: String,
        page: Option<u32>,
    },
    Recommended {
        provider: Provider,
        limit: Option<u32>,
        page: Option<u32>,
    },
    Latest {
        provider: Provider,
        limit: Option<u32>,
    },
    Random {
        provider: Provider,
        limit: Option<u32>,
    },
    GenreReleases {
        provider: Provider,
        genre: String,
        limit: Option<u32>,
        page: Option<u32>,
    },
    Genres(Provider),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    Item,
    List,
    GenreCatalog,
}

impl CacheKind {
    #[must_use]
    pub const fn ttl(self) -> Duration {
        match self {
            Self::Item => ITEM_TTL,
            Self::List => LIST_TTL,
            Self::GenreCatalog => GENRE_CATALOG_TTL,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::List => "list",
            Self::GenreCatalog => "genres",
        }
    }
}

impl CacheKey {
    #[must_use]
    pub const fn kind(&self) -> CacheKind {
        match self {
            Self::SearchById(_) | Self::Anime { .. } => CacheKind::Item,
            Self::Genres(_) => CacheKind::GenreCatalog,
            Self::Search { .. }
            | Self::Recommended { .. }
            | Self::Latest { .. }
            | Self::Random { .. }
            | Self::GenreReleases { .. } => CacheKind::List,
        }
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.kind().ttl()
    }
}

struct Opt(Option<u32>);

impl fmt::Display for Opt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("-"),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use urlencoding::encode;

        match self {
            Self::SearchById(id) => write!(f, "{KEY_PREFIX}:search:id:{}", encode(id)),
            Self::Anime { provider, id } => {
                write!(f, "{KEY_PREFIX}:{}:id:{}", provider.slug(), encode(id))
            }
            Self::Search {
                provider,
                query,
                page,
            } => write!(
                f,
                "{KEY_PREFIX}:search:{}:query:{}:page:{}",
                provider.slug(),
                encode(query),
                Opt(*page)
            ),
            Self::Recommended {
                provider,
                limit,
                page,
            } => write!(
                f,
                "{KEY_PREFIX}:search:{}:recommended:limit:{}:page:{}",
                provider.slug(),
                Opt(*limit),
                Opt(*page)
            ),
            Self::Latest { provider, limit } => write!(
                f,
                "{KEY_PREFIX}:search:{}:latest:limit:{}",
                provider.slug(),
                Opt(*limit)
            ),
            Self::Random { provider, limit } => write!(
                f,
                "{KEY_PREFIX}:search:{}:random:limit:{}",
                provider.slug(),
                Opt(*limit)
            ),
            Self::GenreReleases {
                provider,
                genre,
                limit,
                page,
            } => write!(
                f,
                "{KEY_PREFIX}:search:{}:genre:{}:limit:{}:page:{}",
                provider.slug(),
                encode(genre),
                Opt(*limit),
                Opt(*page)
            ),
            Self::Genres(provider) => write!(f, "{KEY_PREFIX}:{}:genres", provider.slug()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_key_format() {
        let key = CacheKey::Search {
            provider: Provider::Anilibria,
            query: "one piece".into(),
            page: Some(2),
        };
        assert_eq!(
            key.to_string(),
            "anime:search:anilibria:query:one%20piece:page:2"
        );
        assert_eq!(
            CacheKey::Genres(Provider::Consumet).to_string(),
            "anime:consumet:genres"
        );
    }

    #[test]
    fn test_separator_in_query_does_not_collide() {
        let crafted = CacheKey::Search {
            provider: Provider::Consumet,
            query: "naruto:page:1".into(),
            page: Some(2),
        };
        let plain = CacheKey::Search {
            provider: Provider::Consumet,
            query: "naruto".into(),
            page: Some(1),
        };
        assert_ne!(crafted.to_string(), plain.to_string());
    }

    #[test]
    fn test_distinct_parameters_give_distinct_keys() {
        let keys = [
            CacheKey::Latest {
                provider: Provider::Anilibria,
                limit: Some(10),
            },
            CacheKey::Latest {
                provider: Provider::Anilibria,
                limit: Some(14),
            },
            CacheKey::Latest {
                provider: Provider::Consumet,
                limit: None,
            },
            CacheKey::Random {
                provider: Provider::Anilibria,
                limit: Some(10),
            },
            CacheKey::Recommended {
                provider: Provider::Anilibria,
                limit: Some(1),
                page: Some(11),
            },
            CacheKey::Recommended {
                provider: Provider::Anilibria,
                limit: Some(11),
                page: Some(1),
            },
            CacheKey::SearchById("1".into()),
            CacheKey::Anime {
                provider: Provider::Anilibria,
                id: "1".into(),
            },
            CacheKey::Anime {
                provider: Provider::Consumet,
                id: "1".into(),
            },
        ];
        let rendered: HashSet<_> = keys.iter().map(ToString::to_string).collect();
        assert_eq!(rendered.len(), keys.len());
    }

    #[test]
    fn test_ttl_by_kind() {
        assert_eq!(CacheKey::SearchById("x".into()).ttl(), ITEM_TTL);
        assert_eq!(
            CacheKey::GenreReleases {
                provider: Provider::Consumet,
                genre: "action".into(),
                limit: None,
                page: None,
            }
            .ttl(),
            LIST_TTL
        );
        assert_eq!(
            CacheKey::Genres(Provider::Anilibria).ttl(),
            GENRE_CATALOG_TTL
        );
        assert_eq!(ITEM_TTL.as_secs(), 3600);
        assert_eq!(LIST_TTL.as_secs(), 8 * 3600);
        assert_eq!(GENRE_CATALOG_TTL.as_secs(), 24 * 3600);
    }
}
