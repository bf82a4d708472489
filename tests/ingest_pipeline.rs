// tests/ingest_pipeline.rs
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use job_digest::ingest::providers::fixture::FixtureProvider;
use job_digest::ingest::{self, process_listings};
use job_digest::{Digest, DigestConfig, DigestSink, PipelineOutcome, RawListing, RecencyPolicy};
use std::sync::Mutex;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 6, 9, 0, 0).unwrap()
}

fn job(title: &str, posted: &str) -> RawListing {
    RawListing {
        title: title.into(),
        company: "Acme".into(),
        location: "Remote".into(),
        link: "https://example.test/job".into(),
        posted_time: Some(posted.into()),
        posted_timestamp: None,
        source: "LinkedIn".into(),
    }
}

fn cfg(keywords: &[&str]) -> DigestConfig {
    DigestConfig {
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        ..Default::default()
    }
}

#[derive(Default)]
struct RecordingSink {
    calls: Mutex<Vec<Digest>>,
}

#[async_trait]
impl DigestSink for RecordingSink {
    async fn deliver(&self, digest: &Digest) -> Result<()> {
        self.calls.lock().unwrap().push(digest.clone());
        Ok(())
    }
    fn name(&self) -> &'static str {
        "recording"
    }
}

#[test]
fn end_to_end_scenario_yields_one_listing() {
    let raw = vec![job("Dev", "2 hours ago"), job("Dev", "2 hours ago"), job("QA", "3 days ago")];
    let (out, stats) = process_listings(raw, &RecencyPolicy::default(), now(), 60);
    assert_eq!(stats.recent, 2);
    assert_eq!(stats.duplicates, 1);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].title, "Dev");
}

#[tokio::test]
async fn failing_keyword_does_not_abort_others() {
    let provider = FixtureProvider::new()
        .with_listings("Rust", vec![job("Rust Dev", "1 hour ago")])
        .failing_on("Go")
        .with_listings("Node", vec![job("Node Dev", "Just now")]);

    let report = ingest::run_once(&provider, &cfg(&["Rust", "Go", "Node"]), now()).await;
    let titles: Vec<_> = report.outcome.listings().iter().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, vec!["Rust Dev", "Node Dev"]);
    assert_eq!(report.stats.failed_keywords, vec!["Go".to_string()]);
}

#[tokio::test]
async fn keyword_order_decides_which_duplicate_survives() {
    let mut a = job("Full Stack Dev", "1 hour ago");
    a.link = "from-first".into();
    let mut b = job("Full Stack Dev", "1 hour ago");
    b.link = "from-second".into();
    let provider = FixtureProvider::new()
        .with_listings("first", vec![a])
        .with_listings("second", vec![b]);

    let report = ingest::run_once(&provider, &cfg(&["second", "first"]), now()).await;
    assert_eq!(report.outcome.listings().len(), 1);
    assert_eq!(report.outcome.listings()[0].link, "from-second");
}

#[tokio::test]
async fn nothing_fresh_is_a_distinct_empty_outcome() {
    let provider = FixtureProvider::new().with_listings("Rust", vec![job("Old", "2 weeks ago")]);
    let report = ingest::run_once(&provider, &cfg(&["Rust"]), now()).await;
    assert_eq!(report.outcome, PipelineOutcome::Empty);
    assert!(report.outcome.listings().is_empty());
    assert_eq!(report.stats.fetched, 1);
}

#[tokio::test]
async fn empty_digest_delivery_follows_send_empty() {
    let provider = FixtureProvider::new();
    let sink = RecordingSink::default();

    let mut c = cfg(&["Rust"]);
    c.send_empty = false;
    ingest::run_and_deliver(&provider, &sink, &c, now()).await.unwrap();
    assert!(sink.calls.lock().unwrap().is_empty());

    c.send_empty = true;
    ingest::run_and_deliver(&provider, &sink, &c, now()).await.unwrap();
    let calls = sink.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].is_empty());
}

#[tokio::test]
async fn delivered_digest_respects_max_listings() {
    let listings: Vec<RawListing> = (0..10).map(|i| job(&format!("Job {i}"), "Just now")).collect();
    let provider = FixtureProvider::new().with_listings("Rust", listings);
    let sink = RecordingSink::default();
    let mut c = cfg(&["Rust"]);
    c.max_listings = 3;

    let report = ingest::run_and_deliver(&provider, &sink, &c, now()).await.unwrap();
    assert_eq!(report.stats.truncated, 7);
    let calls = sink.calls.lock().unwrap();
    let titles: Vec<_> = calls[0].listings.iter().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, vec!["Job 0", "Job 1", "Job 2"]);
    assert_eq!(calls[0].subject, c.subject);
}

#[tokio::test]
async fn fixture_provider_loads_json() {
    let json = r##"{
        "Rust": [
            {"title":"Rust Dev","company":"Ferris","location":"Remote","link":"#","postedTime":"3 hours ago","source":"LinkedIn"},
            {"title":"Rust Lead","company":"Ferris","location":"Remote","link":"#","source":"LinkedIn"}
        ]
    }"##;
    let provider = FixtureProvider::from_json(json).unwrap();
    let report = ingest::run_once(&provider, &cfg(&["Rust"]), now()).await;
    assert_eq!(report.outcome.listings().len(), 1);
    assert_eq!(report.outcome.listings()[0].title, "Rust Dev");
}
