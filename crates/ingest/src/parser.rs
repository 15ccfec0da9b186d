use chrono::{DateTime, SecondsFormat, Utc};
use usage_core::RawUsageRecord;

use crate::headers::HeaderSource;

pub const PRIMARY_USED_PERCENT: &str = "x-codex-primary-used-percent";
pub const PRIMARY_RESET_AFTER_SECONDS: &str = "x-codex-primary-reset-after-seconds";
pub const PRIMARY_WINDOW_MINUTES: &str = "x-codex-primary-window-minutes";
pub const SECONDARY_USED_PERCENT: &str = "x-codex-secondary-used-percent";
pub const SECONDARY_RESET_AFTER_SECONDS: &str = "x-codex-secondary-reset-after-seconds";
pub const SECONDARY_WINDOW_MINUTES: &str = "x-codex-secondary-window-minutes";
pub const PRIMARY_OVER_SECONDARY_LIMIT_PERCENT: &str =
    "x-codex-primary-over-secondary-limit-percent";

/// Every header the extractor looks at.
pub const USAGE_HEADERS: [&str; 7] = [
    PRIMARY_USED_PERCENT,
    PRIMARY_RESET_AFTER_SECONDS,
    PRIMARY_WINDOW_MINUTES,
    SECONDARY_USED_PERCENT,
    SECONDARY_RESET_AFTER_SECONDS,
    SECONDARY_WINDOW_MINUTES,
    PRIMARY_OVER_SECONDARY_LIMIT_PERCENT,
];

fn parse_f64_header<H: HeaderSource + ?Sized>(headers: &H, name: &str) -> Option<f64> {
    let value = headers.header(name)?.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

fn parse_u64_header<H: HeaderSource + ?Sized>(headers: &H, name: &str) -> Option<u64> {
    headers.header(name)?.trim().parse::<u64>().ok()
}

/// Extracts Codex rate-limit usage from upstream response headers.
///
/// Returns `None` when none of the usage headers carry a parseable value. Headers that
/// fail to parse are skipped individually.
pub fn extract_usage_from_headers<H: HeaderSource + ?Sized>(headers: &H) -> Option<RawUsageRecord> {
    extract_usage_at(headers, Utc::now())
}

pub fn extract_usage_at<H: HeaderSource + ?Sized>(
    headers: &H,
    now: DateTime<Utc>,
) -> Option<RawUsageRecord> {
    let record = RawUsageRecord {
        primary_used_percent: parse_f64_header(headers, PRIMARY_USED_PERCENT),
        primary_reset_after_seconds: parse_u64_header(headers, PRIMARY_RESET_AFTER_SECONDS),
        primary_window_minutes: parse_u64_header(headers, PRIMARY_WINDOW_MINUTES),
        secondary_used_percent: parse_f64_header(headers, SECONDARY_USED_PERCENT),
        secondary_reset_after_seconds: parse_u64_header(headers, SECONDARY_RESET_AFTER_SECONDS),
        secondary_window_minutes: parse_u64_header(headers, SECONDARY_WINDOW_MINUTES),
        primary_over_secondary_percent: parse_f64_header(
            headers,
            PRIMARY_OVER_SECONDARY_LIMIT_PERCENT,
        ),
        updated_at: String::new(),
    };
    if record.is_empty() {
        return None;
    }
    Some(RawUsageRecord {
        updated_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        ..record
    })
}
