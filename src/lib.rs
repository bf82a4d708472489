// src/lib.rs
// Public library surface for the binary, integration tests and demos.

pub mod config;
pub mod dedup;
pub mod ingest;
pub mod listing;
pub mod metrics;
pub mod notify;
pub mod recency;

// ---- Re-exports for stable public API ----
pub use crate::config::DigestConfig;
pub use crate::dedup::dedupe;
pub use crate::ingest::types::{PipelineOutcome, RunReport, RunStats};
pub use crate::listing::{DedupKey, ListingProvider, RawListing};
pub use crate::notify::{Digest, DigestSink, EmailSink, LogSink};
pub use crate::recency::{classify, is_recent, Classification, RecencyPolicy, RecencyRule};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global tracing subscriber.
/// `RUST_LOG` wins; otherwise `job_digest=info,ingest=info,warn`. `DIGEST_LOG_JSON=1`
/// switches to JSON lines.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("job_digest=info,ingest=info,warn"));
    let json = std::env::var("DIGEST_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    let res = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
    if res.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
