//! Time model.
//!
//! # Design
//!
//! Every timestamp in the workspace is an absolute UTC instant
//! ([`Timestamp`]), and every duration is a [`chrono::Duration`].  Both are
//! integer-backed (seconds + nanoseconds), so sums of waiting-time components
//! are exact: `total == batching + contention + … + extraneous` holds with
//! `==`, not within an epsilon.
//!
//! Logs arrive with a variety of timestamp spellings.  [`parse_timestamp`]
//! accepts RFC 3339 and the common `YYYY-MM-DD HH:MM:SS[.fff][±HH:MM]` form;
//! values without an offset are taken as UTC.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::{CoreError, CoreResult};

/// An absolute point in time.
pub type Timestamp = DateTime<Utc>;

/// Seconds in one calendar day.
pub const SECS_PER_DAY: u32 = 86_400;

/// Seconds in one week.
pub const SECS_PER_WEEK: u32 = 7 * SECS_PER_DAY;

// ── Parsing ───────────────────────────────────────────────────────────────────

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%:z"];
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a log timestamp into UTC.
///
/// Tries RFC 3339 first, then explicit-offset formats, then naive formats
/// (interpreted as UTC), then a bare date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> CoreResult<Timestamp> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(CoreError::Parse("empty timestamp".into()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(CoreError::Parse(format!("unrecognized timestamp {s:?}")))
}

/// Parse an optional timestamp cell: empty / `NaT` / `nan` cells are `None`.
pub fn parse_optional_timestamp(raw: &str) -> CoreResult<Option<Timestamp>> {
    match raw.trim() {
        "" | "NaT" | "nan" | "NaN" | "null" => Ok(None),
        s => parse_timestamp(s).map(Some),
    }
}

// ── Day arithmetic ────────────────────────────────────────────────────────────

/// Midnight (00:00 UTC) of the calendar day containing `t`.
#[inline]
pub fn start_of_day(t: Timestamp) -> Timestamp {
    t.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// The first midnight strictly after `t`.
#[inline]
pub fn next_midnight(t: Timestamp) -> Timestamp {
    start_of_day(t) + Duration::days(1)
}

// ── Duration helpers ──────────────────────────────────────────────────────────

/// Duration as fractional seconds, for reporting.
#[inline]
pub fn as_secs_f64(d: Duration) -> f64 {
    d.num_milliseconds() as f64 / 1_000.0
}

/// Clamp a (possibly negative) duration to zero.
#[inline]
pub fn non_negative(d: Duration) -> Duration {
    d.max(Duration::zero())
}
