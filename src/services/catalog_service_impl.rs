//! Cache-aside implementation of [`CatalogService`] over both provider clients.

use crate::analytics::{Analytics, AnalyticsEvent};
use crate::cache::{CacheKey, CacheLayer};
use crate::clients::{AnilibriaClient, ConsumetClient};
use crate::db::Store;
use crate::domain::Provider;
use crate::models::anime::{Anime, Genre, SearchPage, SearchResult};
use crate::models::episode::{Episode, EpisodeOverrides};
use crate::normalizer::{anilibria, consumet};
use crate::services::catalog_service::{CatalogError, CatalogService};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct DefaultCatalogService {
    store: Arc<Store>,
    cache: CacheLayer,
    analytics: Analytics,
    anilibria: AnilibriaClient,
    consumet: ConsumetClient,
    /// Prefix for relative Anilibria poster paths.
    origin: String,
}

impl DefaultCatalogService {
    #[must_use]
    pub const fn new(
        store: Arc<Store>,
        cache: CacheLayer,
        analytics: Analytics,
        anilibria: AnilibriaClient,
        consumet: ConsumetClient,
        origin: String,
    ) -> Self {
        Self {
            store,
            cache,
            analytics,
            anilibria,
            consumet,
            origin,
        }
    }

    async fn persist_results(&self, results: &[SearchResult]) {
        match self.store.insert_search_results(results).await {
            Ok(written) => debug!(written, "Persisted search results"),
            Err(e) => warn!(error = %e, "Failed to persist search results"),
        }
    }

    fn record_search(&self, label: String, provider: Provider, results: usize) {
        self.analytics.record(AnalyticsEvent::Search {
            query: label,
            provider: provider.slug(),
            results,
        });
    }

    /// Cache-aside read of a result list; a miss persists what it fetched.
    async fn list<Fut>(
        &self,
        key: CacheKey,
        label: String,
        provider: Provider,
        fetch: Fut,
    ) -> Result<Vec<SearchResult>, CatalogError>
    where
        Fut: Future<Output = Result<Vec<SearchResult>, CatalogError>> + Send,
    {
        let results = self
            .cache
            .get_or_fetch(&key, || async move {
                let results = fetch.await?;
                self.persist_results(&results).await;
                Ok::<_, CatalogError>(results)
            })
            .await?;

        self.record_search(label, provider, results.len());
        Ok(results)
    }
}

#[async_trait::async_trait]
impl CatalogService for DefaultCatalogService {
    async fn search_by_id(&self, id: &str) -> Result<SearchResult, CatalogError> {
        self.cache
            .get_or_fetch(&CacheKey::SearchById(id.to_string()), || async {
                self.store
                    .get_search_result(id)
                    .await?
                    .ok_or_else(|| CatalogError::NotFound(format!("search result {id}")))
            })
            .await
    }

    async fn anilibria_search(&self, query: &str) -> Result<Vec<SearchResult>, CatalogError> {
        let key = CacheKey::Search {
            provider: Provider::Anilibria,
            query: query.to_string(),
            page: None,
        };
        let fetch = async {
            let releases = self.anilibria.search(query).await?;
            Ok::<_, CatalogError>(anilibria::search_results(&self.origin, releases))
        };
        self.list(key, query.to_string(), Provider::Anilibria, fetch)
            .await
    }

    async fn anilibria_recommended(
        &self,
        limit: u32,
        page: u32,
    ) -> Result<Vec<SearchResult>, CatalogError> {
        let key = CacheKey::Recommended {
            provider: Provider::Anilibria,
            limit: Some(limit),
            page: Some(page),
        };
        let fetch = async {
            let releases = self.anilibria.recommended(limit, page).await?;
            Ok::<_, CatalogError>(anilibria::search_results(&self.origin, releases))
        };
        self.list(key, "recommended".into(), Provider::Anilibria, fetch)
            .await
    }

    async fn anilibria_latest(&self, limit: u32) -> Result<Vec<SearchResult>, CatalogError> {
        let key = CacheKey::Latest {
            provider: Provider::Anilibria,
            limit: Some(limit),
        };
        let fetch = async {
            let releases = self.anilibria.latest(limit).await?;
            Ok::<_, CatalogError>(anilibria::search_results(&self.origin, releases))
        };
        self.list(key, "latest".into(), Provider::Anilibria, fetch)
            .await
    }

    async fn anilibria_random(&self, limit: u32) -> Result<Vec<SearchResult>, CatalogError> {
        let key = CacheKey::Random {
            provider: Provider::Anilibria,
            limit: Some(limit),
        };
        let fetch = async {
            let releases = self.anilibria.random(limit).await?;
            Ok::<_, CatalogError>(anilibria::search_results(&self.origin, releases))
        };
        self.list(key, "random".into(), Provider::Anilibria, fetch)
            .await
    }

    async fn anilibria_genres(&self) -> Result<Vec<Genre>, CatalogError> {
        self.cache
            .get_or_fetch(&CacheKey::Genres(Provider::Anilibria), || async {
                let genres = self.anilibria.genres().await?;
                Ok::<_, CatalogError>(genres.into_iter().map(anilibria::genre).collect())
            })
            .await
    }

    async fn anilibria_genre_releases(
        &self,
        genre_id: i64,
        limit: u32,
        page: u32,
    ) -> Result<Vec<SearchResult>, CatalogError> {
        let key = CacheKey::GenreReleases {
            provider: Provider::Anilibria,
            genre: genre_id.to_string(),
            limit: Some(limit),
            page: Some(page),
        };
        let fetch = async {
            let releases = self.anilibria.genre_releases(genre_id, limit, page).await?;
            Ok::<_, CatalogError>(anilibria::search_results(&self.origin, releases))
        };
        self.list(key, format!("genre-{genre_id}"), Provider::Anilibria, fetch)
            .await
    }

    async fn anilibria_anime(&self, id: &str) -> Result<Anime, CatalogError> {
        let key = CacheKey::Anime {
            provider: Provider::Anilibria,
            id: id.to_string(),
        };
        self.cache
            .get_or_fetch(&key, || async {
                let detail = self.anilibria.release(id).await?;
                Ok::<_, CatalogError>(anilibria::anime(&self.origin, detail))
            })
            .await
    }

    async fn anilibria_episode(&self, id: &str) -> Result<Episode, CatalogError> {
        match self.store.get_episode(id).await {
            Ok(Some(episode)) => {
                debug!(episode_id = %id, "Serving stored episode");
                return Ok(episode);
            }
            Ok(None) => {}
            Err(e) => warn!(episode_id = %id, error = %e, "Stored episode lookup failed"),
        }

        let raw = self.anilibria.episode(id).await?;
        let episode = anilibria::episode(raw);

        if let Err(e) = self.store.insert_episode(&episode).await {
            warn!(episode_id = %id, error = %e, "Failed to persist episode");
        }

        Ok(episode)
    }

    async fn consumet_search(&self, query: &str, page: u32) -> Result<SearchPage, CatalogError> {
        let key = CacheKey::Search {
            provider: Provider::Consumet,
            query: query.to_string(),
            page: Some(page),
        };

        let found: SearchPage = self
            .cache
            .get_or_fetch(&key, || async {
                let raw = self.consumet.search(query, page).await?;
                let found = consumet::search_page(raw, page);
                self.persist_results(&found.results).await;
                Ok::<_, CatalogError>(found)
            })
            .await?;

        self.record_search(query.to_string(), Provider::Consumet, found.results.len());
        Ok(found)
    }

    async fn consumet_recommended(&self) -> Result<Vec<SearchResult>, CatalogError> {
        let key = CacheKey::Recommended {
            provider: Provider::Consumet,
            limit: None,
            page: None,
        };
        let fetch = async {
            Ok::<_, CatalogError>(consumet::search_results(
                self.consumet.most_popular().await?,
            ))
        };
        self.list(key, "recommended".into(), Provider::Consumet, fetch)
            .await
    }

    async fn consumet_latest(&self) -> Result<Vec<SearchResult>, CatalogError> {
        let key = CacheKey::Latest {
            provider: Provider::Consumet,
            limit: None,
        };
        let fetch = async {
            Ok::<_, CatalogError>(consumet::search_results(
                self.consumet.top_airing().await?,
            ))
        };
        self.list(key, "latest".into(), Provider::Consumet, fetch)
            .await
    }

    async fn consumet_genres(&self) -> Result<Vec<Genre>, CatalogError> {
        self.cache
            .get_or_fetch(&CacheKey::Genres(Provider::Consumet), || async {
                let names = self.consumet.genres().await?;
                Ok::<_, CatalogError>(names.into_iter().map(consumet::genre).collect())
            })
            .await
    }

    async fn consumet_genre_releases(
        &self,
        genre: &str,
    ) -> Result<Vec<SearchResult>, CatalogError> {
        let key = CacheKey::GenreReleases {
            provider: Provider::Consumet,
            genre: genre.to_string(),
            limit: None,
            page: None,
        };
        let fetch = async {
            Ok::<_, CatalogError>(consumet::search_results(
                self.consumet.genre_releases(genre).await?,
            ))
        };
        self.list(key, format!("genre-{genre}"), Provider::Consumet, fetch)
            .await
    }

    async fn consumet_anime(&self, id: &str) -> Result<Anime, CatalogError> {
        let key = CacheKey::Anime {
            provider: Provider::Consumet,
            id: id.to_string(),
        };
        self.cache
            .get_or_fetch(&key, || async {
                Ok::<_, CatalogError>(consumet::anime(self.consumet.info(id).await?))
            })
            .await
    }

    async fn consumet_episode(
        &self,
        id: &str,
        overrides: EpisodeOverrides,
        dub: bool,
    ) -> Result<Episode, CatalogError> {
        let raw = self.consumet.watch(id, dub).await?;
        Ok(consumet::episode(id, raw, overrides))
    }
}
