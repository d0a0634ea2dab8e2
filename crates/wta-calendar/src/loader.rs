//! JSON calendar loader.
//!
//! # JSON format
//!
//! One key per resource (or [`UNDIFFERENTIATED_POOL`](crate::UNDIFFERENTIATED_POOL)),
//! each holding a list of slots:
//!
//! ```json
//! {
//!   "Alice": [
//!     { "weekday_from": "MONDAY", "weekday_to": "FRIDAY", "time_from": "09:00:00", "time_to": "12:00:00" },
//!     { "weekday_from": "MONDAY", "weekday_to": "FRIDAY", "time_from": "13:00:00", "time_to": "17:00:00" }
//!   ],
//!   "Bob": [
//!     { "from": "SATURDAY", "to": "SATURDAY", "beginTime": "00:00", "endTime": "24:00" }
//!   ]
//! }
//! ```
//!
//! | Field          | Alias       | Value                                       |
//! |----------------|-------------|---------------------------------------------|
//! | `weekday_from` | `from`      | weekday name, any case, long or short       |
//! | `weekday_to`   | `to`        | inclusive; wraps from Sunday to Monday      |
//! | `time_from`    | `beginTime` | `HH:MM[:SS[.fff]]`                          |
//! | `time_to`      | `endTime`   | `HH:MM[:SS[.fff]]`, or `24:00[:00]`         |
//!
//! A day range produces the same slot on every day it covers.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveTime, Timelike, Weekday};
use serde::Deserialize;
use tracing::debug;

use wta_core::time::SECS_PER_DAY;

use crate::{CalendarError, CalendarResult, ResourceCalendar, WeeklyInterval};

// ── JSON record ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SlotRecord {
    #[serde(alias = "from")]
    weekday_from: String,
    #[serde(alias = "to")]
    weekday_to:   String,
    #[serde(alias = "beginTime")]
    time_from:    String,
    #[serde(alias = "endTime")]
    time_to:      String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`ResourceCalendar`] from a JSON file.
pub fn load_calendar_json(path: &Path) -> CalendarResult<ResourceCalendar> {
    let file = std::fs::File::open(path)?;
    load_calendar_reader(file)
}

/// Like [`load_calendar_json`] but accepts any `Read` source.
pub fn load_calendar_reader<R: Read>(reader: R) -> CalendarResult<ResourceCalendar> {
    let records: BTreeMap<String, Vec<SlotRecord>> = serde_json::from_reader(reader)?;

    let mut calendar = ResourceCalendar::new();
    for (resource, rows) in records {
        let mut slots = Vec::with_capacity(rows.len());
        for row in &rows {
            expand_record(row, &mut slots)
                .map_err(|e| CalendarError::Parse(format!("resource {resource:?}: {e}")))?;
        }
        calendar.insert(resource, slots);
    }

    debug!(resources = calendar.len(), "loaded resource calendar");
    Ok(calendar)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn expand_record(row: &SlotRecord, out: &mut Vec<WeeklyInterval>) -> CalendarResult<()> {
    let first = parse_weekday(&row.weekday_from)?;
    let last = parse_weekday(&row.weekday_to)?;
    let begin = parse_time_of_day(&row.time_from)?;
    let end = parse_time_of_day(&row.time_to)?;

    let mut day = first;
    loop {
        out.push(WeeklyInterval::try_new(day, begin, end)?);
        if day == last {
            break;
        }
        day = day.succ();
    }
    Ok(())
}

fn parse_weekday(s: &str) -> CalendarResult<Weekday> {
    s.trim()
        .parse::<Weekday>()
        .map_err(|_| CalendarError::Parse(format!("unknown weekday {s:?}")))
}

/// Seconds of day; `24:00[:00]` is the end of the day.
fn parse_time_of_day(s: &str) -> CalendarResult<u32> {
    let s = s.trim();
    if matches!(s, "24:00" | "24:00:00") {
        return Ok(SECS_PER_DAY);
    }
    ["%H:%M:%S%.f", "%H:%M"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
        .map(|t| t.num_seconds_from_midnight())
        .ok_or_else(|| CalendarError::Parse(format!("unrecognized time of day {s:?}")))
}
