//! Demo that runs the pipeline over an in-memory fixture and logs the digest.

use chrono::Utc;
use job_digest::ingest::{self, providers::fixture::FixtureProvider};
use job_digest::{DigestConfig, LogSink, RawListing};

fn listing(title: &str, company: &str, posted: &str) -> RawListing {
    RawListing {
        title: title.into(),
        company: company.into(),
        location: "Bengaluru".into(),
        link: format!("https://example.test/jobs/{}", title.to_lowercase().replace(' ', "-")),
        posted_time: Some(posted.into()),
        posted_timestamp: None,
        source: "LinkedIn".into(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let cfg = DigestConfig {
        keywords: vec!["Node.js Developer".into(), "Full Stack Developer".into()],
        ..Default::default()
    };
    let provider = FixtureProvider::new()
        .with_listings(
            "Node.js Developer",
            vec![
                listing("Node.js Developer", "Acme", "2 hours ago"),
                listing("Backend Engineer", "Globex", "3 days ago"),
                listing("API Developer", "Initech", "Recently"),
            ],
        )
        .with_listings(
            "Full Stack Developer",
            vec![
                listing("Node.js Developer", "Acme", "2 hours ago"),
                listing("Full Stack Developer", "Umbrella", "Just now"),
            ],
        );

    let report = ingest::run_and_deliver(&provider, &LogSink, &cfg, Utc::now()).await?;
    println!(
        "digest-demo done: {} kept, {:?}",
        report.outcome.listings().len(),
        report.stats
    );
    Ok(())
}
