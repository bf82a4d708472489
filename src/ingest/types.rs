// src/ingest/types.rs
use crate::listing::RawListing;

/// Counters for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct RunStats {
    pub fetched: usize,
    pub recent: usize,
    pub duplicates: usize,
    pub truncated: usize,
    pub failed_keywords: Vec<String>,
}

/// Result of the core pipeline. An empty digest is a valid outcome and is
/// kept apart from failures, which never reach this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Ready(Vec<RawListing>),
    Empty,
}

impl PipelineOutcome {
    pub fn from_listings(listings: Vec<RawListing>) -> Self {
        if listings.is_empty() {
            PipelineOutcome::Empty
        } else {
            PipelineOutcome::Ready(listings)
        }
    }

    pub fn listings(&self) -> &[RawListing] {
        match self {
            PipelineOutcome::Ready(v) => v,
            PipelineOutcome::Empty => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, PipelineOutcome::Empty)
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: PipelineOutcome,
    pub stats: RunStats,
}
