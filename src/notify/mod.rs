pub mod email;
pub mod render;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::listing::RawListing;

pub use email::EmailSink;

/// Final, ordered listing set handed to a sink.
#[derive(Debug, Clone)]
pub struct Digest {
    pub subject: String,
    pub listings: Vec<RawListing>,
    pub generated_at: DateTime<Utc>,
}

impl Digest {
    pub fn new(listings: Vec<RawListing>, subject: &str, generated_at: DateTime<Utc>) -> Self {
        Self {
            subject: subject.to_string(),
            listings,
            generated_at,
        }
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

#[async_trait::async_trait]
pub trait DigestSink: Send + Sync {
    async fn deliver(&self, digest: &Digest) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Dry-run sink: writes the digest to the log instead of mailing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait::async_trait]
impl DigestSink for LogSink {
    async fn deliver(&self, digest: &Digest) -> Result<()> {
        tracing::info!(
            subject = %render::subject(digest),
            count = digest.len(),
            "digest (dry run)"
        );
        for (i, l) in digest.listings.iter().enumerate() {
            tracing::info!(
                n = i + 1,
                title = %l.title,
                company = %l.company,
                location = %l.location,
                link = %l.link,
                "listing"
            );
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
