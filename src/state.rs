use std::sync::Arc;
use std::time::Duration;

use crate::analytics::{Analytics, AnalyticsSink, ClickHouseSink, NoopSink};
use crate::cache::{CacheLayer, KeyValueStore, MemoryStore, RedisStore};
use crate::clients::http::{base_url, build_http_client};
use crate::clients::{AnilibriaClient, ConsumetClient, HttpFetch, ReqwestFetcher, UpstreamClient};
use crate::config::{CacheBackend, Config};
use crate::db::Store;
use crate::services::{
    CatalogService, DefaultCatalogService, DeviceService, PersonalizationService,
    SeaOrmDeviceService, SeaOrmPersonalizationService,
};

/// Everything a request handler needs, built once at startup and passed
/// down explicitly.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Arc<Store>,

    pub catalog: Arc<dyn CatalogService>,

    pub personalization: Arc<dyn PersonalizationService>,

    pub devices: Arc<dyn DeviceService>,
}

impl SharedState {
    /// Connects every backing store named in `config`.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::connect(&config.database).await?;

        let http = build_http_client(
            Duration::from_secs(config.providers.connect_timeout_secs),
            &config.providers.user_agent,
        )?;
        let fetcher: Arc<dyn HttpFetch> = Arc::new(ReqwestFetcher::new(http));

        let kv: Arc<dyn KeyValueStore> = match config.cache.backend {
            CacheBackend::Memory => Arc::new(MemoryStore::new()),
            CacheBackend::Redis => {
                let url = config.cache.redis_url.as_deref().unwrap_or_default();
                Arc::new(RedisStore::new(url)?)
            }
        };

        let sink: Arc<dyn AnalyticsSink> = if config.analytics.enabled {
            let analytics = &config.analytics;
            Arc::new(ClickHouseSink::new(
                &analytics.url,
                &analytics.database,
                &analytics.username,
                &analytics.password,
                Duration::from_secs(analytics.timeout_secs),
            )?)
        } else {
            Arc::new(NoopSink)
        };

        Self::from_components(config, store, fetcher, kv, sink)
    }

    /// Wires services over already constructed backends. Tests use this to
    /// swap in an in-memory cache and a fake upstream.
    pub fn from_components(
        config: Config,
        store: Store,
        fetcher: Arc<dyn HttpFetch>,
        kv: Arc<dyn KeyValueStore>,
        sink: Arc<dyn AnalyticsSink>,
    ) -> anyhow::Result<Self> {
        let store = Arc::new(store);
        let upstream = UpstreamClient::new(fetcher);
        let cache = CacheLayer::new(kv, config.cache.single_flight);
        let analytics = Analytics::new(sink);

        let anilibria = AnilibriaClient::new(
            upstream.clone(),
            base_url(&config.providers.anilibria_base_url)?,
        );
        let consumet =
            ConsumetClient::new(upstream, base_url(&config.providers.consumet_base_url)?);

        let catalog: Arc<dyn CatalogService> = Arc::new(DefaultCatalogService::new(
            store.clone(),
            cache,
            analytics.clone(),
            anilibria,
            consumet,
            config.providers.anilibria_origin.clone(),
        ));

        let personalization: Arc<dyn PersonalizationService> = Arc::new(
            SeaOrmPersonalizationService::new(store.clone(), analytics.clone()),
        );

        let devices: Arc<dyn DeviceService> =
            Arc::new(SeaOrmDeviceService::new(store.clone(), analytics));

        Ok(Self {
            config: Arc::new(config),
            store,
            catalog,
            personalization,
            devices,
        })
    }
}
