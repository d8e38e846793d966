//! Best-effort analytics sink.
//!
//! Events are write-only: nothing in the service reads them back, and the
//! columnar store may drift from the relational counts. A failed write is
//! logged and dropped.

pub mod clickhouse;

pub use clickhouse::ClickHouseSink;

use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsEvent {
    Search {
        query: String,
        provider: &'static str,
        results: usize,
    },
    Collection {
        anime_id: String,
        kind: String,
        delta: i8,
    },
    Favourite {
        anime_id: String,
        delta: i8,
    },
    DeviceCreated {
        device_id: String,
    },
}

impl AnalyticsEvent {
    #[must_use]
    pub const fn table(&self) -> &'static str {
        match self {
            Self::Search { .. } => "search_analytics",
            Self::Collection { .. } => "collection_analytics",
            Self::Favourite { .. } => "favourite_analytics",
            Self::DeviceCreated { .. } => "device_analytics",
        }
    }
}

#[async_trait::async_trait]
pub trait AnalyticsSink: Send + Sync {
    async fn write(&self, event: &AnalyticsEvent) -> anyhow::Result<()>;
}

/// Sink used when analytics are disabled.
pub struct NoopSink;

#[async_trait::async_trait]
impl AnalyticsSink for NoopSink {
    async fn write(&self, _event: &AnalyticsEvent) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Clone)]
pub struct Analytics {
    sink: Arc<dyn AnalyticsSink>,
}

impl Analytics {
    #[must_use]
    pub fn new(sink: Arc<dyn AnalyticsSink>) -> Self {
        Self { sink }
    }

    /// Dispatches the event on a background task; the caller never waits.
    pub fn record(&self, event: AnalyticsEvent) {
        let this = self.clone();
        tokio::spawn(async move { this.record_now(event).await });
    }

    /// Writes the event inline, swallowing any failure.
    pub async fn record_now(&self, event: AnalyticsEvent) {
        let table = event.table();
        let outcome = match self.sink.write(&event).await {
            Ok(()) => "success",
            Err(e) => {
                warn!(table, error = %e, "Analytics write failed");
                "error"
            }
        };
        metrics::counter!("analytics_events_total", "table" => table, "outcome" => outcome)
            .increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording(Mutex<Vec<AnalyticsEvent>>);

    #[async_trait::async_trait]
    impl AnalyticsSink for Recording {
        async fn write(&self, event: &AnalyticsEvent) -> anyhow::Result<()> {
            self.0.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    struct Failing;

    #[async_trait::async_trait]
    impl AnalyticsSink for Failing {
        async fn write(&self, _event: &AnalyticsEvent) -> anyhow::Result<()> {
            anyhow::bail!("clickhouse unreachable")
        }
    }

    #[tokio::test]
    async fn test_record_now_writes_event() {
        let sink = Arc::new(Recording::default());
        let analytics = Analytics::new(sink.clone());

        analytics
            .record_now(AnalyticsEvent::Favourite {
                anime_id: "1".into(),
                delta: 1,
            })
            .await;

        assert_eq!(sink.0.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_swallowed() {
        let analytics = Analytics::new(Arc::new(Failing));
        analytics
            .record_now(AnalyticsEvent::DeviceCreated {
                device_id: "d".into(),
            })
            .await;
    }
}
