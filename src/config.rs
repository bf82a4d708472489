// src/config.rs
use anyhow::{anyhow, Context, Result};
use chrono::{Duration as ChronoDuration, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::recency::RecencyPolicy;

pub const ENV_CONFIG_PATH: &str = "DIGEST_CONFIG_PATH";
const ENV_WINDOW_HOURS: &str = "DIGEST_WINDOW_HOURS";
const ENV_MAX_LISTINGS: &str = "DIGEST_MAX_LISTINGS";
const ENV_KEYWORDS: &str = "DIGEST_KEYWORDS";

/// Offsets beyond ±14h do not exist anywhere.
const MAX_OFFSET_MINUTES: i32 = 14 * 60;
/// One year; anything wider is not a freshness window.
const MAX_WINDOW_HOURS: u32 = 24 * 366;

fn default_keywords() -> Vec<String> {
    vec![
        "Full Stack Developer".to_string(),
        "MERN Stack Developer".to_string(),
        "Node.js Developer".to_string(),
    ]
}
fn default_location() -> String {
    "India".to_string()
}
fn default_experience_levels() -> String {
    // entry level + associate
    "1,2".to_string()
}
fn default_per_keyword_limit() -> usize {
    10
}
fn default_window_hours() -> u32 {
    6
}
fn default_max_listings() -> usize {
    60
}
fn default_offset_minutes() -> i32 {
    330
}
fn default_high_trust() -> Vec<String> {
    vec!["LinkedIn".to_string()]
}
fn default_unknown_markers() -> Vec<String> {
    vec!["unknown".to_string(), "n/a".to_string()]
}
fn default_send_empty() -> bool {
    true
}
fn default_subject() -> String {
    "Daily Full Stack / MERN / Node.js Jobs".to_string()
}
fn default_request_timeout_secs() -> u64 {
    15
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DigestConfig {
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
    #[serde(default = "default_location")]
    pub location: String,
    /// LinkedIn `f_E` filter, comma separated.
    #[serde(default = "default_experience_levels")]
    pub experience_levels: String,
    #[serde(default = "default_per_keyword_limit")]
    pub per_keyword_limit: usize,
    #[serde(default = "default_window_hours")]
    pub window_hours: u32,
    #[serde(default = "default_max_listings")]
    pub max_listings: usize,
    /// Reference zone for "today" as minutes east of UTC.
    #[serde(default = "default_offset_minutes")]
    pub reference_utc_offset_minutes: i32,
    #[serde(default = "default_high_trust")]
    pub high_trust_sources: Vec<String>,
    #[serde(default = "default_unknown_markers")]
    pub unknown_markers: Vec<String>,
    /// Mail the digest even when nothing survived filtering.
    #[serde(default = "default_send_empty")]
    pub send_empty: bool,
    #[serde(default = "default_subject")]
    pub subject: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// When set, the binary keeps running and repeats every N seconds.
    #[serde(default)]
    pub interval_secs: Option<u64>,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            location: default_location(),
            experience_levels: default_experience_levels(),
            per_keyword_limit: default_per_keyword_limit(),
            window_hours: default_window_hours(),
            max_listings: default_max_listings(),
            reference_utc_offset_minutes: default_offset_minutes(),
            high_trust_sources: default_high_trust(),
            unknown_markers: default_unknown_markers(),
            send_empty: default_send_empty(),
            subject: default_subject(),
            request_timeout_secs: default_request_timeout_secs(),
            interval_secs: None,
        }
    }
}

impl DigestConfig {
    /// Load from an explicit path. Supports TOML or JSON formats.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading digest config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg: DigestConfig = match ext.as_str() {
            "json" => serde_json::from_str(&content).context("parsing digest config json")?,
            _ => toml::from_str(&content).context("parsing digest config toml")?,
        };
        Ok(cfg.sanitized())
    }

    /// Load using env var + fallbacks, then apply env overrides:
    /// 1) $DIGEST_CONFIG_PATH
    /// 2) config/digest.toml
    /// 3) config/digest.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        let base = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else if Path::new("config/digest.toml").exists() {
            Self::load_from(Path::new("config/digest.toml"))?
        } else if Path::new("config/digest.json").exists() {
            Self::load_from(Path::new("config/digest.json"))?
        } else {
            Self::default()
        };
        base.with_env_overrides()
    }

    /// Apply `DIGEST_WINDOW_HOURS`, `DIGEST_MAX_LISTINGS`, `DIGEST_KEYWORDS`.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(v) = std::env::var(ENV_WINDOW_HOURS) {
            self.window_hours = v
                .trim()
                .parse()
                .with_context(|| format!("invalid {ENV_WINDOW_HOURS}: {v}"))?;
        }
        if let Ok(v) = std::env::var(ENV_MAX_LISTINGS) {
            self.max_listings = v
                .trim()
                .parse()
                .with_context(|| format!("invalid {ENV_MAX_LISTINGS}: {v}"))?;
        }
        if let Ok(v) = std::env::var(ENV_KEYWORDS) {
            self.keywords = v.split(',').map(str::to_string).collect();
        }
        Ok(self.sanitized())
    }

    /// Clamp out-of-range values back to something usable.
    pub fn sanitized(mut self) -> Self {
        if self.window_hours == 0 {
            self.window_hours = default_window_hours();
        }
        self.window_hours = self.window_hours.min(MAX_WINDOW_HOURS);
        if self.max_listings == 0 {
            self.max_listings = default_max_listings();
        }
        if self.per_keyword_limit == 0 {
            self.per_keyword_limit = default_per_keyword_limit();
        }
        if self.reference_utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            self.reference_utc_offset_minutes = default_offset_minutes();
        }
        if self.interval_secs == Some(0) {
            self.interval_secs = None;
        }
        // keyword order matters for dedup, so keep first occurrence
        self.keywords = clean_list(self.keywords);
        self.high_trust_sources = clean_list(self.high_trust_sources);
        self.unknown_markers = clean_list(self.unknown_markers);
        self
    }

    pub fn reference_tz(&self) -> FixedOffset {
        FixedOffset::east_opt(self.reference_utc_offset_minutes * 60)
            .or_else(|| FixedOffset::east_opt(default_offset_minutes() * 60))
            .unwrap_or_else(|| chrono::Offset::fix(&chrono::Utc))
    }

    pub fn recency_policy(&self) -> RecencyPolicy {
        RecencyPolicy {
            window: ChronoDuration::hours(i64::from(self.window_hours)),
            reference_tz: self.reference_tz(),
            high_trust_sources: self.high_trust_sources.clone(),
            unknown_markers: self.unknown_markers.clone(),
        }
    }
}

/// Trim, drop empties, drop repeats; keeps the original order.
fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim();
        if !t.is_empty() && !out.iter().any(|o| o == t) {
            out.push(t.to_string());
        }
    }
    out
}
