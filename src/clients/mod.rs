pub mod anilibria;
pub mod consumet;
pub mod http;

pub use anilibria::AnilibriaClient;
pub use consumet::ConsumetClient;
pub use http::{HttpFetch, ReqwestFetcher, UpstreamClient, UpstreamError};

use crate::domain::Provider;

fn record_outcome(provider: Provider, ok: bool) {
    let outcome = if ok { "success" } else { "error" };
    metrics::counter!(
        "upstream_requests_total",
        "provider" => provider.slug(),
        "outcome" => outcome
    )
    .increment(1);
}
