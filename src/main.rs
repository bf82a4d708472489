//! job-digest — binary entrypoint.
//! Loads config, scrapes each keyword, filters to fresh unique listings and
//! mails the digest. Runs once, or forever when `interval_secs` is set.

use anyhow::{Context, Result};
use std::sync::Arc;

use job_digest::ingest::{self, providers::linkedin::LinkedInProvider, scheduler};
use job_digest::{DigestConfig, DigestSink, EmailSink, ListingProvider, LogSink};

/// `DIGEST_DRY_RUN=1` logs the digest instead of sending mail.
fn build_sink() -> Result<Arc<dyn DigestSink>> {
    let dry_run = std::env::var("DIGEST_DRY_RUN")
        .ok()
        .is_some_and(|v| v == "1");
    if dry_run {
        return Ok(Arc::new(LogSink));
    }
    Ok(Arc::new(EmailSink::from_env().context("configuring email sink")?))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    job_digest::init_tracing();

    let cfg = DigestConfig::load_default().context("loading digest config")?;
    tracing::info!(
        keywords = ?cfg.keywords,
        window_hours = cfg.window_hours,
        max_listings = cfg.max_listings,
        "config loaded"
    );

    let provider: Arc<dyn ListingProvider> = Arc::new(LinkedInProvider::from_config(&cfg)?);
    let sink = build_sink()?;

    match cfg.interval_secs {
        Some(secs) => {
            let handle = scheduler::spawn_scheduler(cfg.clone(), secs, provider, sink);
            tokio::signal::ctrl_c().await.context("waiting for ctrl-c")?;
            handle.abort();
            tracing::info!("scheduler stopped");
        }
        None => {
            let report =
                ingest::run_and_deliver(provider.as_ref(), sink.as_ref(), &cfg, chrono::Utc::now())
                    .await?;
            if report.outcome.is_empty() {
                tracing::info!("no fresh listings this run");
            }
        }
    }
    Ok(())
}
