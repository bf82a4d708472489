//! # Recency
//!
//! Decides whether a listing's posting-time signal falls inside the freshness
//! window. Sources hand us free text ("3 hours ago", "Just now", "2025-09-06")
//! and occasionally an exact timestamp; this module turns that into a boolean.
//!
//! Rules are evaluated in a fixed priority order and the first match wins:
//!
//! 1. exact timestamp → `ts >= now - window`
//! 2. no signal (absent, empty, unknown marker) → reject
//! 3. minutes / "just now" → accept
//! 4. "N hours ago" → `N <= window hours`
//! 5. `YYYY-MM-DD` → accept only if it is today in the reference timezone
//! 6. "N days ago" → accept only `N == 0`
//! 7. weeks / months → reject
//! 8. "recently" from a high-trust source → accept
//! 9. anything else → reject
//!
//! Classification is pure. Each decision carries the rule that fired; the
//! same pair is emitted as a `debug!` event under target `recency`.

use chrono::{DateTime, Duration as ChronoDuration, FixedOffset, NaiveDate, Offset, Utc};
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::listing::RawListing;

/// Literal text some sources render when they have no parseable age.
pub const RECENTLY_SENTINEL: &str = "recently";

/// Tunables for the classifier. Cheap to clone; build once per run.
#[derive(Debug, Clone)]
pub struct RecencyPolicy {
    pub window: ChronoDuration,
    /// Zone used for "is this date today". Never the host zone.
    pub reference_tz: FixedOffset,
    /// Sources granted leniency for the "recently" sentinel.
    pub high_trust_sources: Vec<String>,
    /// Extra texts meaning "no signal" (matched case-insensitively).
    pub unknown_markers: Vec<String>,
}

impl Default for RecencyPolicy {
    fn default() -> Self {
        Self {
            window: ChronoDuration::hours(6),
            // IST, the market the default searches target
            reference_tz: FixedOffset::east_opt(330 * 60).unwrap_or(Utc.fix()),
            high_trust_sources: vec!["LinkedIn".to_string()],
            unknown_markers: vec!["unknown".to_string(), "n/a".to_string()],
        }
    }
}

impl RecencyPolicy {
    /// Today's calendar date in the reference timezone.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.reference_tz).date_naive()
    }

    pub fn is_high_trust(&self, source: &str) -> bool {
        self.high_trust_sources
            .iter()
            .any(|s| s.eq_ignore_ascii_case(source.trim()))
    }

    fn is_unknown_marker(&self, text: &str) -> bool {
        self.unknown_markers
            .iter()
            .any(|m| m.trim().eq_ignore_ascii_case(text))
    }

    fn hours_within_window(&self, hours: u32) -> bool {
        i64::from(hours) * 3600 <= self.window.num_seconds()
    }
}

/// Which rule produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecencyRule {
    ExactTimestamp,
    NoSignal,
    Immediate,
    Hours,
    CalendarDate,
    Days,
    WeeksOrMonths,
    TrustedSource,
    Fallback,
}

impl RecencyRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecencyRule::ExactTimestamp => "exact_timestamp",
            RecencyRule::NoSignal => "no_signal",
            RecencyRule::Immediate => "immediate",
            RecencyRule::Hours => "hours",
            RecencyRule::CalendarDate => "calendar_date",
            RecencyRule::Days => "days",
            RecencyRule::WeeksOrMonths => "weeks_or_months",
            RecencyRule::TrustedSource => "trusted_source",
            RecencyRule::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub rule: RecencyRule,
    pub recent: bool,
}

/// A listing paired with its decision. Only used for diagnostics; the
/// pipeline keeps plain `RawListing`s.
#[derive(Debug, Clone)]
pub struct ClassifiedListing {
    pub listing: RawListing,
    pub classification: Classification,
}

/// Shapes of free-text posting signals we recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostedPhrase {
    NoSignal,
    Immediate,
    HoursAgo(u32),
    CalendarDate(NaiveDate),
    DaysAgo(u32),
    WeeksOrMonths,
    RecentlySentinel,
    Unrecognized,
}

fn re_hours() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*(?:hours?|hrs?)\b").unwrap())
}

fn re_days() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*days?\b").unwrap())
}

fn re_immediate() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"just now|moments? ago|minute|\bmins?\b").unwrap())
}

fn re_weeks_months() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"\b(?:weeks?|months?)\b").unwrap())
}

fn re_iso_date() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap())
}

/// First capture group of `re` as a number. Overflow and missing digits are
/// both `None`.
fn capture_number(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
}

/// Map free text onto a phrase shape, honoring rule priority.
/// "hour" without a usable number is not an hour phrase.
pub fn recognize(posted_time: Option<&str>, policy: &RecencyPolicy) -> PostedPhrase {
    let text = posted_time.unwrap_or_default().trim().to_lowercase();

    if text.is_empty() || policy.is_unknown_marker(&text) {
        return PostedPhrase::NoSignal;
    }
    if re_immediate().is_match(&text) {
        return PostedPhrase::Immediate;
    }
    if let Some(n) = capture_number(re_hours(), &text) {
        return PostedPhrase::HoursAgo(n);
    }
    if re_iso_date().is_match(&text) {
        if let Ok(d) = NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
            return PostedPhrase::CalendarDate(d);
        }
    }
    if let Some(n) = capture_number(re_days(), &text) {
        return PostedPhrase::DaysAgo(n);
    }
    if re_weeks_months().is_match(&text) {
        return PostedPhrase::WeeksOrMonths;
    }
    if text == RECENTLY_SENTINEL {
        return PostedPhrase::RecentlySentinel;
    }
    PostedPhrase::Unrecognized
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            // "2025-09-06T09:00:00" without offset is read as UTC
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|n| n.and_utc())
        })
}

fn decide(listing: &RawListing, policy: &RecencyPolicy, now: DateTime<Utc>) -> Classification {
    let hit = |rule, recent| Classification { rule, recent };

    if let Some(ts) = listing.posted_timestamp.as_deref().and_then(parse_timestamp) {
        // a window reaching past the representable range admits everything
        let recent = now
            .checked_sub_signed(policy.window)
            .map_or(true, |cutoff| ts >= cutoff);
        return hit(RecencyRule::ExactTimestamp, recent);
    }

    match recognize(listing.posted_time.as_deref(), policy) {
        PostedPhrase::NoSignal => hit(RecencyRule::NoSignal, false),
        PostedPhrase::Immediate => hit(RecencyRule::Immediate, true),
        PostedPhrase::HoursAgo(n) => hit(RecencyRule::Hours, policy.hours_within_window(n)),
        PostedPhrase::CalendarDate(d) => hit(RecencyRule::CalendarDate, d == policy.today(now)),
        PostedPhrase::DaysAgo(n) => hit(RecencyRule::Days, n == 0),
        PostedPhrase::WeeksOrMonths => hit(RecencyRule::WeeksOrMonths, false),
        PostedPhrase::RecentlySentinel if policy.is_high_trust(&listing.source) => {
            hit(RecencyRule::TrustedSource, true)
        }
        PostedPhrase::RecentlySentinel | PostedPhrase::Unrecognized => {
            hit(RecencyRule::Fallback, false)
        }
    }
}

/// Classify one listing and emit its trace.
pub fn classify(listing: &RawListing, policy: &RecencyPolicy, now: DateTime<Utc>) -> Classification {
    let c = decide(listing, policy, now);
    tracing::debug!(
        target: "recency",
        rule = c.rule.as_str(),
        recent = c.recent,
        title = %listing.title,
        posted_time = listing.posted_time.as_deref().unwrap_or_default(),
        source = %listing.source,
        "classified"
    );
    c
}

pub fn is_recent(listing: &RawListing, policy: &RecencyPolicy, now: DateTime<Utc>) -> bool {
    classify(listing, policy, now).recent
}

/// Classify every listing without dropping any.
pub fn classify_all(
    listings: &[RawListing],
    policy: &RecencyPolicy,
    now: DateTime<Utc>,
) -> Vec<ClassifiedListing> {
    listings
        .iter()
        .map(|l| ClassifiedListing {
            listing: l.clone(),
            classification: classify(l, policy, now),
        })
        .collect()
}

/// Keep only recent listings (input order preserved), plus per-rule hit
/// counts for diagnostics.
pub fn filter_recent(
    listings: Vec<RawListing>,
    policy: &RecencyPolicy,
    now: DateTime<Utc>,
) -> (Vec<RawListing>, BTreeMap<RecencyRule, usize>) {
    let mut hits = BTreeMap::new();
    let mut keep = Vec::with_capacity(listings.len());
    for l in listings {
        let c = classify(&l, policy, now);
        *hits.entry(c.rule).or_insert(0) += 1;
        if c.recent {
            keep.push(l);
        }
    }
    (keep, hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        // 2025-09-06 09:00 UTC == 14:30 IST
        Utc.with_ymd_and_hms(2025, 9, 6, 9, 0, 0).unwrap()
    }

    fn listing(posted: Option<&str>, source: &str) -> RawListing {
        RawListing {
            title: "Dev".into(),
            company: "Acme".into(),
            location: "Pune".into(),
            link: "#".into(),
            posted_time: posted.map(str::to_string),
            posted_timestamp: None,
            source: source.into(),
        }
    }

    fn rule_of(posted: Option<&str>) -> Classification {
        decide(&listing(posted, "Indeed"), &RecencyPolicy::default(), now())
    }

    #[test]
    fn number_capture_is_failure_tolerant() {
        assert_eq!(capture_number(re_hours(), "3 hours ago"), Some(3));
        assert_eq!(capture_number(re_hours(), "hours ago"), None);
        assert_eq!(capture_number(re_hours(), "99999999999 hours ago"), None);
    }

    #[test]
    fn recognizes_phrase_shapes() {
        let p = RecencyPolicy::default();
        assert_eq!(recognize(Some("Just now"), &p), PostedPhrase::Immediate);
        assert_eq!(recognize(Some("12 minutes ago"), &p), PostedPhrase::Immediate);
        assert_eq!(recognize(Some("1 hour ago"), &p), PostedPhrase::HoursAgo(1));
        assert_eq!(recognize(Some("5 hrs ago"), &p), PostedPhrase::HoursAgo(5));
        assert_eq!(recognize(Some("0 days ago"), &p), PostedPhrase::DaysAgo(0));
        assert_eq!(recognize(Some("2 weeks ago"), &p), PostedPhrase::WeeksOrMonths);
        assert_eq!(recognize(Some(" Recently "), &p), PostedPhrase::RecentlySentinel);
        assert_eq!(recognize(Some("N/A"), &p), PostedPhrase::NoSignal);
        assert_eq!(recognize(None, &p), PostedPhrase::NoSignal);
        assert_eq!(
            recognize(Some("2025-09-06"), &p),
            PostedPhrase::CalendarDate(NaiveDate::from_ymd_opt(2025, 9, 6).unwrap())
        );
    }

    #[test]
    fn hour_without_number_falls_through_to_fallback() {
        let c = rule_of(Some("an hour ago"));
        assert_eq!(c.rule, RecencyRule::Fallback);
        assert!(!c.recent);
    }

    #[test]
    fn invalid_calendar_date_is_rejected() {
        let c = rule_of(Some("2025-13-40"));
        assert_eq!(c.rule, RecencyRule::Fallback);
        assert!(!c.recent);
    }

    #[test]
    fn today_uses_reference_zone_not_utc() {
        // 20:00 UTC on the 5th is already the 6th in IST
        let late = Utc.with_ymd_and_hms(2025, 9, 5, 20, 0, 0).unwrap();
        let p = RecencyPolicy::default();
        assert!(decide(&listing(Some("2025-09-06"), "x"), &p, late).recent);
        assert!(!decide(&listing(Some("2025-09-05"), "x"), &p, late).recent);
    }

    #[test]
    fn huge_window_with_timestamp_does_not_overflow() {
        let p = RecencyPolicy {
            window: ChronoDuration::hours(i64::from(u32::MAX)),
            ..Default::default()
        };
        let mut l = listing(Some("3 weeks ago"), "x");
        l.posted_timestamp = Some("2025-09-06T01:00:00Z".into());
        let c = decide(&l, &p, now());
        assert_eq!(c.rule, RecencyRule::ExactTimestamp);
        assert!(c.recent);
    }

    #[test]
    fn window_in_hours_respects_partial_windows() {
        let p = RecencyPolicy {
            window: ChronoDuration::minutes(90),
            ..Default::default()
        };
        assert!(p.hours_within_window(1));
        assert!(!p.hours_within_window(2));
    }

    #[test]
    fn filter_recent_counts_rules() {
        let input = vec![
            listing(Some("2 hours ago"), "x"),
            listing(Some("3 days ago"), "x"),
            listing(None, "x"),
        ];
        let (kept, hits) = filter_recent(input, &RecencyPolicy::default(), now());
        assert_eq!(kept.len(), 1);
        assert_eq!(hits.get(&RecencyRule::Hours), Some(&1));
        assert_eq!(hits.get(&RecencyRule::Days), Some(&1));
        assert_eq!(hits.get(&RecencyRule::NoSignal), Some(&1));
    }
}
