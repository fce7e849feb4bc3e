pub mod devig;
pub mod export;
pub mod extractor;
pub mod ingest;
pub mod matcher;
pub mod normalize;

use chrono::{DateTime, SecondsFormat, Timelike, Utc};

/// Format an instant the way it is stored: RFC-3339 UTC, whole seconds,
/// `Z` suffix (e.g. `2026-01-19T15:00:00Z`).
pub fn fmt_instant(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a provider timestamp into a UTC instant.
///
/// Returns `None` for anything unparsable; upstream payload quality is not
/// this crate's to enforce.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Current UTC time truncated to whole seconds, so stored stamps round-trip
/// byte-identically through `fmt_instant`/`parse_instant`.
pub fn utc_now_second() -> DateTime<Utc> {
    let now = Utc::now();
    now.with_nanosecond(0).unwrap_or(now)
}
