// src/listing.rs
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One job posting as surfaced by an ingestion source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawListing {
    pub title: String,
    pub company: String,  // may contain masking chars like `*`
    pub location: String, // may be empty
    pub link: String,
    #[serde(default)]
    pub posted_time: Option<String>, // free text: "3 hours ago", "Just now", "2025-09-06"
    #[serde(default)]
    pub posted_timestamp: Option<String>, // exact ISO-8601, wins over `posted_time`
    pub source: String, // e.g. "LinkedIn"
}

/// Identity of a posting for deduplication. Exact, case-sensitive comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub title: String,
    pub company: String,
    pub location: String,
}

impl RawListing {
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            title: self.title.clone(),
            company: self.company.clone(),
            location: self.location.clone(),
        }
    }
}

/// Collaborator that turns a search keyword into raw listings.
#[async_trait::async_trait]
pub trait ListingProvider: Send + Sync {
    async fn fetch(&self, keyword: &str) -> Result<Vec<RawListing>>;
    fn name(&self) -> &'static str;
}
