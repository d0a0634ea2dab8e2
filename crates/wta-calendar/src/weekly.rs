//! Weekly-recurring time.
//!
//! # Week axis
//!
//! A [`WeekTime`] is an offset in seconds from Monday 00:00, in
//! `0..=SECS_PER_WEEK`.  Weekly slots are mapped onto this axis so that the
//! generic interval algebra in `wta-core` can merge them, then mapped back to
//! per-day [`WeeklyInterval`]s.
//!
//! # Absolute time
//!
//! A weekly slot only becomes concrete against a specific calendar day.
//! [`split_at_midnight`] cuts an absolute interval into single-day pieces
//! tagged with their weekday; [`weekly_to_absolute`] then intersects a slot
//! with one such piece.

use std::fmt;

use chrono::{Datelike, Duration, Weekday};
use serde::{Deserialize, Serialize};

use wta_core::time::{next_midnight, start_of_day, SECS_PER_DAY, SECS_PER_WEEK};
use wta_core::{Interval, TimeInterval, TimePoint};

use crate::{CalendarError, CalendarResult};

// ── WeekTime ──────────────────────────────────────────────────────────────────

/// Seconds since Monday 00:00 of a recurring week.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct WeekTime(pub u32);

impl WeekTime {
    #[inline]
    pub fn at(weekday: Weekday, secs_of_day: u32) -> Self {
        Self(weekday.num_days_from_monday() * SECS_PER_DAY + secs_of_day)
    }

    /// Day of the week this offset falls on.  The end-of-week offset maps to
    /// Sunday.
    #[inline]
    pub fn weekday(self) -> Weekday {
        let day = (self.0 / SECS_PER_DAY).min(6);
        Weekday::try_from(day as u8).unwrap_or(Weekday::Sun)
    }
}

impl TimePoint for WeekTime {
    #[inline]
    fn elapsed(from: Self, to: Self) -> Duration {
        Duration::seconds(i64::from(to.0) - i64::from(from.0))
    }
}

// ── WeeklyInterval ────────────────────────────────────────────────────────────

/// A working-time slot on one weekday, `[begin, end]` in seconds of day.
///
/// `end` may equal `SECS_PER_DAY` (24:00), meaning the slot runs to the end of
/// the day.  A slot never crosses midnight.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct WeeklyInterval {
    pub weekday: Weekday,
    pub begin:   u32,
    pub end:     u32,
}

impl WeeklyInterval {
    /// Validate and construct a slot.
    pub fn try_new(weekday: Weekday, begin: u32, end: u32) -> CalendarResult<Self> {
        if end > SECS_PER_DAY {
            return Err(CalendarError::Slot(format!(
                "{weekday}: end {end}s is past the end of the day"
            )));
        }
        if begin > end {
            return Err(CalendarError::Slot(format!(
                "{weekday}: begin {begin}s is after end {end}s (slots may not cross midnight)"
            )));
        }
        Ok(Self { weekday, begin, end })
    }

    #[inline]
    pub fn duration(&self) -> Duration {
        Duration::seconds(i64::from(self.end - self.begin))
    }

    /// The slot on the week axis.
    #[inline]
    pub fn to_week_interval(&self) -> Interval<WeekTime> {
        Interval::new(WeekTime::at(self.weekday, self.begin), WeekTime::at(self.weekday, self.end))
    }

    /// Cut a week-axis interval back into per-day slots.
    pub fn from_week_interval(iv: Interval<WeekTime>) -> Vec<Self> {
        let mut out = Vec::new();
        let mut cursor = iv.start.0.min(SECS_PER_WEEK);
        let end = iv.end.0.min(SECS_PER_WEEK);

        while cursor < end {
            let day = cursor / SECS_PER_DAY;
            let day_end = ((day + 1) * SECS_PER_DAY).min(end);
            let weekday = WeekTime(cursor).weekday();
            out.push(Self { weekday, begin: cursor - day * SECS_PER_DAY, end: day_end - day * SECS_PER_DAY });
            cursor = day_end;
        }
        out
    }
}

impl fmt::Display for WeeklyInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hms = |s: u32| format!("{:02}:{:02}:{:02}", s / 3_600, (s / 60) % 60, s % 60);
        write!(f, "{} {}-{}", self.weekday, hms(self.begin), hms(self.end))
    }
}

// ── Absolute ↔ weekly ─────────────────────────────────────────────────────────

/// Split an absolute interval at every midnight it crosses.
///
/// Each piece lies within a single calendar day (it may end exactly at the
/// following midnight) and is tagged with that day's weekday.  A zero-length
/// interval yields one zero-length piece.
pub fn split_at_midnight(iv: TimeInterval) -> Vec<(Weekday, TimeInterval)> {
    if iv.is_empty() {
        return vec![(iv.start.weekday(), iv)];
    }

    let mut pieces = Vec::new();
    let mut cursor = iv.start;
    while cursor < iv.end {
        let piece_end = next_midnight(cursor).min(iv.end);
        pieces.push((cursor.weekday(), Interval::new(cursor, piece_end)));
        cursor = piece_end;
    }
    pieces
}

/// Concrete occurrence of `slot` within the single-day interval `within`.
///
/// `within` must not cross midnight (see [`split_at_midnight`]).  Returns
/// `None` when the slot is on another weekday or does not overlap `within`.
pub fn weekly_to_absolute(slot: &WeeklyInterval, within: &TimeInterval) -> Option<TimeInterval> {
    if within.start.weekday() != slot.weekday {
        return None;
    }
    let day = start_of_day(within.start);
    let occurrence = Interval::new(
        day + Duration::seconds(i64::from(slot.begin)),
        day + Duration::seconds(i64::from(slot.end)),
    );
    occurrence.intersection(within)
}
