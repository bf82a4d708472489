use metrics::{describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;

pub const LISTINGS_TOTAL: &str = "digest_listings_total";
pub const RECENT_TOTAL: &str = "digest_recent_total";
pub const DEDUP_TOTAL: &str = "digest_dedup_total";
pub const TRUNCATED_TOTAL: &str = "digest_truncated_total";
pub const PROVIDER_ERRORS_TOTAL: &str = "digest_provider_errors_total";
pub const FETCH_MS: &str = "digest_fetch_ms";
pub const LAST_RUN_TS: &str = "digest_last_run_ts";
pub const RUNS_TOTAL: &str = "digest_runs_total";
pub const RUN_ERRORS_TOTAL: &str = "digest_run_errors_total";

/// One-time metrics registration (so series carry descriptions once a
/// recorder is installed).
pub fn ensure_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(LISTINGS_TOTAL, "Raw listings returned by providers.");
        describe_counter!(RECENT_TOTAL, "Listings inside the freshness window.");
        describe_counter!(DEDUP_TOTAL, "Listings removed as duplicates.");
        describe_counter!(TRUNCATED_TOTAL, "Listings cut by the digest size cap.");
        describe_counter!(
            PROVIDER_ERRORS_TOTAL,
            "Per-keyword provider fetch/parse errors."
        );
        describe_histogram!(FETCH_MS, "Provider fetch time per keyword in milliseconds.");
        describe_gauge!(LAST_RUN_TS, "Unix ts when the digest pipeline last ran.");
        describe_counter!(RUNS_TOTAL, "Scheduled digest runs that completed.");
        describe_counter!(RUN_ERRORS_TOTAL, "Scheduled digest runs that failed.");
    });
}
