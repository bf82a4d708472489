// src/ingest/providers/fixture.rs
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

use crate::listing::{ListingProvider, RawListing};

/// In-memory provider keyed by search keyword. Keywords listed as failing
/// return an error, which lets callers exercise per-keyword isolation.
#[derive(Debug, Default, Clone)]
pub struct FixtureProvider {
    by_keyword: HashMap<String, Vec<RawListing>>,
    failing: HashSet<String>,
}

impl FixtureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listings(mut self, keyword: &str, listings: Vec<RawListing>) -> Self {
        self.by_keyword
            .entry(keyword.to_string())
            .or_default()
            .extend(listings);
        self
    }

    pub fn failing_on(mut self, keyword: &str) -> Self {
        self.failing.insert(keyword.to_string());
        self
    }

    /// Load `{ "keyword": [listing, ...] }` JSON.
    pub fn from_json(s: &str) -> Result<Self> {
        let by_keyword: HashMap<String, Vec<RawListing>> = serde_json::from_str(s)?;
        Ok(Self {
            by_keyword,
            failing: HashSet::new(),
        })
    }
}

#[async_trait]
impl ListingProvider for FixtureProvider {
    async fn fetch(&self, keyword: &str) -> Result<Vec<RawListing>> {
        if self.failing.contains(keyword) {
            return Err(anyhow!("fixture configured to fail for '{keyword}'"));
        }
        Ok(self.by_keyword.get(keyword).cloned().unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "Fixture"
    }
}
