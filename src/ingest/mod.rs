// src/ingest/mod.rs
pub mod providers;
pub mod scheduler;
pub mod types;

use chrono::{DateTime, Utc};
use metrics::{counter, gauge, histogram};

use crate::config::DigestConfig;
use crate::dedup::dedupe_counted;
use crate::listing::{ListingProvider, RawListing};
use crate::metrics::{
    ensure_described, DEDUP_TOTAL, FETCH_MS, LAST_RUN_TS, LISTINGS_TOTAL, PROVIDER_ERRORS_TOTAL,
    RECENT_TOTAL, TRUNCATED_TOTAL,
};
use crate::notify::{Digest, DigestSink};
use crate::recency::{filter_recent, RecencyPolicy};
use types::{PipelineOutcome, RunReport, RunStats};

/// Normalize scraped text: decode entities, collapse whitespace, trim.
pub fn normalize_text(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The pure core: classify + filter, dedupe, truncate.
/// `raw` must already be concatenated in keyword order.
pub fn process_listings(
    raw: Vec<RawListing>,
    policy: &RecencyPolicy,
    now: DateTime<Utc>,
    max_listings: usize,
) -> (Vec<RawListing>, RunStats) {
    let fetched = raw.len();

    let (recent, hits) = filter_recent(raw, policy, now);
    let recent_cnt = recent.len();
    for (rule, n) in &hits {
        tracing::debug!(target: "recency", rule = rule.as_str(), hits = n, "rule summary");
    }

    let (mut unique, dup_cnt) = dedupe_counted(recent);

    let truncated = unique.len().saturating_sub(max_listings);
    unique.truncate(max_listings);

    let stats = RunStats {
        fetched,
        recent: recent_cnt,
        duplicates: dup_cnt,
        truncated,
        failed_keywords: Vec::new(),
    };
    (unique, stats)
}

/// Fetch every keyword in order. A failing keyword is logged and
/// contributes nothing. Returns listings plus the keywords that failed.
pub async fn fetch_all(
    provider: &dyn ListingProvider,
    keywords: &[String],
) -> (Vec<RawListing>, Vec<String>) {
    let mut raw = Vec::new();
    let mut failed = Vec::new();
    for kw in keywords {
        let t0 = std::time::Instant::now();
        match provider.fetch(kw).await {
            Ok(mut v) => {
                tracing::info!(provider = provider.name(), keyword = %kw, count = v.len(), "fetched");
                raw.append(&mut v);
            }
            Err(e) => {
                tracing::warn!(error = ?e, provider = provider.name(), keyword = %kw, "provider error");
                counter!(PROVIDER_ERRORS_TOTAL).increment(1);
                failed.push(kw.clone());
            }
        }
        histogram!(FETCH_MS).record(t0.elapsed().as_secs_f64() * 1_000.0);
    }
    (raw, failed)
}

/// Run the pipeline once: ingest per keyword, then the core.
pub async fn run_once(
    provider: &dyn ListingProvider,
    cfg: &DigestConfig,
    now: DateTime<Utc>,
) -> RunReport {
    ensure_described();

    let (raw, failed) = fetch_all(provider, &cfg.keywords).await;
    let (kept, mut stats) = process_listings(raw, &cfg.recency_policy(), now, cfg.max_listings);
    stats.failed_keywords = failed;

    // Telemetry
    counter!(LISTINGS_TOTAL).increment(stats.fetched as u64);
    counter!(RECENT_TOTAL).increment(stats.recent as u64);
    counter!(DEDUP_TOTAL).increment(stats.duplicates as u64);
    counter!(TRUNCATED_TOTAL).increment(stats.truncated as u64);
    gauge!(LAST_RUN_TS).set(now.timestamp() as f64);

    tracing::info!(
        target: "ingest",
        fetched = stats.fetched,
        recent = stats.recent,
        duplicates = stats.duplicates,
        truncated = stats.truncated,
        kept = kept.len(),
        failed = stats.failed_keywords.len(),
        "pipeline run"
    );

    RunReport {
        outcome: PipelineOutcome::from_listings(kept),
        stats,
    }
}

/// Run the pipeline and hand the result to `sink`. An empty outcome is
/// delivered only when `send_empty` is set.
pub async fn run_and_deliver(
    provider: &dyn ListingProvider,
    sink: &dyn DigestSink,
    cfg: &DigestConfig,
    now: DateTime<Utc>,
) -> anyhow::Result<RunReport> {
    let report = run_once(provider, cfg, now).await;

    if report.outcome.is_empty() && !cfg.send_empty {
        tracing::info!(sink = sink.name(), "no fresh listings; skipping delivery");
        return Ok(report);
    }

    let digest = Digest::new(report.outcome.listings().to_vec(), &cfg.subject, now);
    sink.deliver(&digest).await?;
    tracing::info!(sink = sink.name(), count = digest.len(), "digest delivered");
    Ok(report)
}
