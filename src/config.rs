use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;
use url::Url;

use crate::constants::providers;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub database: DatabaseConfig,

    pub cache: CacheConfig,

    pub analytics: AnalyticsConfig,

    pub providers: ProvidersConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// Number of tokio worker threads (default: 4)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            worker_threads: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Accept `?device_id=` in addition to the `Authorization: Device` header.
    pub allow_device_id_in_query: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_allowed_origins: vec!["*".to_string()],
            allow_device_id_in_query: false,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Accepts `:8080` or `host:8080`.
    fn apply_address(&mut self, address: &str) -> Result<()> {
        let (host, port) = address
            .rsplit_once(':')
            .with_context(|| format!("Invalid server address: {address}"))?;

        self.port = port
            .parse()
            .with_context(|| format!("Invalid server port: {port}"))?;
        if !host.is_empty() {
            self.host = host.to_string();
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `sqlite:` or `postgres://` connection URL.
    pub url: String,

    pub max_connections: u32,

    pub min_connections: u32,

    pub max_lifetime_secs: u64,

    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:data/anigate.db".to_string(),
            max_connections: 25,
            min_connections: 1,
            max_lifetime_secs: 300,
            connect_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    Memory,
    Redis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,

    pub redis_url: Option<String>,

    /// Collapse concurrent misses on one key into a single upstream fetch.
    pub single_flight: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Memory,
            redis_url: None,
            single_flight: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub enabled: bool,

    /// ClickHouse HTTP interface.
    pub url: String,

    pub database: String,

    pub username: String,

    pub password: String,

    pub timeout_secs: u64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: "http://localhost:8123".to_string(),
            database: "default".to_string(),
            username: "default".to_string(),
            password: String::new(),
            timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub anilibria_base_url: String,

    /// Origin prepended to relative Anilibria poster paths.
    pub anilibria_origin: String,

    pub consumet_base_url: String,

    pub connect_timeout_secs: u64,

    pub user_agent: String,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            anilibria_base_url: providers::ANILIBRIA_BASE_URL.to_string(),
            anilibria_origin: providers::ANILIBRIA_ORIGIN.to_string(),
            consumet_base_url: providers::CONSUMET_BASE_URL.to_string(),
            connect_timeout_secs: 5,
            user_agent: format!("anigate/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,

    pub loki_labels: HashMap<String, String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        let mut labels = HashMap::new();
        labels.insert("app".to_string(), "anigate".to_string());

        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
            loki_labels: labels,
        }
    }
}

impl Config {
    /// Loads `.env`, the config file (`explicit` or the first one found),
    /// then environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = match explicit {
            Some(path) => Self::load_from_path(path)?,
            None => Self::load_file()?,
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    /// Deployment environment variables take precedence over the file.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(address) = var("SERVER_ADDRESS") {
            self.server.apply_address(&address)?;
        }

        if let Some(url) = var("DATABASE_URL").or_else(|| var("POSTGRES_DSN")) {
            self.database.url = url;
        }

        if let Some(url) = var("REDIS_URL") {
            self.cache.backend = CacheBackend::Redis;
            self.cache.redis_url = Some(url);
        }

        if let Some(host) = var("CLICKHOUSE_HOST") {
            self.analytics.enabled = true;
            self.analytics.url = if host.contains("://") {
                host
            } else {
                format!("http://{host}")
            };
        }

        if let Some(username) = var("CLICKHOUSE_USERNAME") {
            self.analytics.username = username;
        }

        if let Some(password) = lookup("CLICKHOUSE_PASSWORD") {
            self.analytics.password = password;
        }

        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("anigate").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".anigate").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.url.trim().is_empty() {
            anyhow::bail!("Database URL cannot be empty");
        }

        if self.database.max_connections == 0
            || self.database.min_connections > self.database.max_connections
        {
            anyhow::bail!("Database pool bounds are invalid");
        }

        for (name, raw) in [
            ("anilibria_base_url", &self.providers.anilibria_base_url),
            ("anilibria_origin", &self.providers.anilibria_origin),
            ("consumet_base_url", &self.providers.consumet_base_url),
        ] {
            Url::parse(raw).with_context(|| format!("Invalid providers.{name}: {raw}"))?;
        }

        if self.cache.backend == CacheBackend::Redis
            && self.cache.redis_url.as_deref().is_none_or(str::is_empty)
        {
            anyhow::bail!("Redis URL cannot be empty when the redis cache backend is selected");
        }

        if self.analytics.enabled && self.analytics.url.is_empty() {
            anyhow::bail!("ClickHouse URL cannot be empty when analytics are enabled");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.max_connections, 25);
        assert_eq!(config.database.max_lifetime_secs, 300);
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert!(config.cache.single_flight);
        assert!(!config.analytics.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[database]"));
        assert!(toml_str.contains("[providers]"));
        assert!(toml_str.contains("backend = \"memory\""));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [cache]
            backend = "redis"
            redis_url = "redis://cache:6379"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.cache.backend, CacheBackend::Redis);
        assert!(config.cache.single_flight);

        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env_overrides(env(&[
                ("SERVER_ADDRESS", ":9000"),
                ("POSTGRES_DSN", "postgres://u:p@db/anime"),
                ("REDIS_URL", "redis://cache:6379"),
                ("CLICKHOUSE_HOST", "clickhouse:8123"),
                ("CLICKHOUSE_PASSWORD", "secret"),
            ]))
            .unwrap();

        assert_eq!(config.server.bind_address(), "0.0.0.0:9000");
        assert_eq!(config.database.url, "postgres://u:p@db/anime");
        assert_eq!(config.cache.backend, CacheBackend::Redis);
        assert!(config.analytics.enabled);
        assert_eq!(config.analytics.url, "http://clickhouse:8123");
        assert_eq!(config.analytics.password, "secret");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_database_url_takes_precedence_over_dsn() {
        let mut config = Config::default();
        config
            .apply_env_overrides(env(&[
                ("DATABASE_URL", "sqlite::memory:"),
                ("POSTGRES_DSN", "postgres://ignored"),
            ]))
            .unwrap();
        assert_eq!(config.database.url, "sqlite::memory:");
    }

    #[test]
    fn test_invalid_server_address() {
        let mut config = Config::default();
        assert!(
            config
                .apply_env_overrides(env(&[("SERVER_ADDRESS", "localhost")]))
                .is_err()
        );
    }

    #[test]
    fn test_validate_rejects_redis_without_url() {
        let mut config = Config::default();
        config.cache.backend = CacheBackend::Redis;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.providers.consumet_base_url = "not a url".into();
        assert!(config.validate().is_err());
    }
}
