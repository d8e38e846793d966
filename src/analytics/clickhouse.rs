use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use url::Url;

use super::{AnalyticsEvent, AnalyticsSink};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Writes events through the ClickHouse HTTP interface as `JSONEachRow`.
///
/// Counter tables are expected to be `SummingMergeTree`s, so a removal is a
/// row with a negative delta.
pub struct ClickHouseSink {
    client: Client,
    endpoint: Url,
    database: String,
    username: String,
    password: String,
}

impl ClickHouseSink {
    pub fn new(
        url: &str,
        database: &str,
        username: &str,
        password: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let endpoint = Url::parse(url).with_context(|| format!("Invalid ClickHouse URL: {url}"))?;

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .context("Failed to build ClickHouse HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            database: database.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    fn insert_url(&self, table: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair(
            "query",
            &format!("INSERT INTO {}.{table} FORMAT JSONEachRow", self.database),
        );
        url
    }
}

/// Renders the row for an event at `now`.
#[must_use]
pub fn event_row(event: &AnalyticsEvent, now: DateTime<Utc>) -> Value {
    let timestamp = now.format(TIMESTAMP_FORMAT).to_string();

    match event {
        AnalyticsEvent::Search {
            query,
            provider,
            results,
        } => json!({
            "query": query,
            "type": provider,
            "results": results,
            "searched_at": timestamp,
        }),
        AnalyticsEvent::Collection {
            anime_id,
            kind,
            delta,
        } => json!({
            "anime_id": anime_id,
            "type": kind,
            "count": delta,
        }),
        AnalyticsEvent::Favourite { anime_id, delta } => json!({
            "anime_id": anime_id,
            "favourites": delta,
        }),
        AnalyticsEvent::DeviceCreated { device_id } => json!({
            "device_id": device_id,
            "created_at": timestamp,
        }),
    }
}

#[async_trait::async_trait]
impl AnalyticsSink for ClickHouseSink {
    async fn write(&self, event: &AnalyticsEvent) -> Result<()> {
        let row = event_row(event, Utc::now());

        let mut request = self
            .client
            .post(self.insert_url(event.table()))
            .body(row.to_string());

        if !self.username.is_empty() {
            request = request.basic_auth(&self.username, Some(&self.password));
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("ClickHouse error: {} - {}", status, body));
        }

        Ok(())
    }
}
