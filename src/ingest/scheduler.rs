// src/ingest/scheduler.rs
use metrics::counter;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::config::DigestConfig;
use crate::listing::ListingProvider;
use crate::metrics::{ensure_described, RUNS_TOTAL, RUN_ERRORS_TOTAL};
use crate::notify::DigestSink;

/// Run the digest on a fixed interval. The first tick fires immediately.
/// A failed run is logged and the loop keeps going.
pub fn spawn_scheduler(
    cfg: DigestConfig,
    interval_secs: u64,
    provider: Arc<dyn ListingProvider>,
    sink: Arc<dyn DigestSink>,
) -> JoinHandle<()> {
    ensure_described();
    tokio::spawn(async move {
        let period = std::time::Duration::from_secs(interval_secs.max(1));
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let now = chrono::Utc::now();

            match crate::ingest::run_and_deliver(provider.as_ref(), sink.as_ref(), &cfg, now).await
            {
                Ok(report) => {
                    counter!(RUNS_TOTAL).increment(1);
                    tracing::info!(
                        target: "ingest",
                        kept = report.outcome.listings().len(),
                        empty = report.outcome.is_empty(),
                        "scheduled digest tick"
                    );
                }
                Err(e) => {
                    counter!(RUN_ERRORS_TOTAL).increment(1);
                    tracing::error!(error = ?e, "scheduled digest run failed");
                }
            }
        }
    })
}
