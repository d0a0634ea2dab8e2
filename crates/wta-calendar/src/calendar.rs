//! Per-resource weekly working hours.

use chrono::Duration;
use rustc_hash::FxHashMap;

use wta_core::{merge_overlaps, Interval, TimeInterval};

use crate::weekly::{split_at_midnight, weekly_to_absolute, WeekTime, WeeklyInterval};

/// Calendar key shared by every resource when calendars are not
/// differentiated per resource.
pub const UNDIFFERENTIATED_POOL: &str = "undifferentiated_resource_pool";

/// Read-only lookup `resource → weekly working slots`.
///
/// Slots are kept normalized: sorted by week offset, non-overlapping, with
/// adjacent slots coalesced (re-split at midnight).
#[derive(Clone, Debug, Default)]
pub struct ResourceCalendar {
    slots: FxHashMap<String, Vec<WeeklyInterval>>,
}

impl ResourceCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add working slots for `resource`, merging with any it already has.
    pub fn insert(&mut self, resource: impl Into<String>, slots: impl IntoIterator<Item = WeeklyInterval>) {
        let entry = self.slots.entry(resource.into()).or_default();
        entry.extend(slots);

        let week: Vec<Interval<WeekTime>> = entry.iter().map(WeeklyInterval::to_week_interval).collect();
        *entry = merge_overlaps(&week)
            .into_iter()
            .flat_map(WeeklyInterval::from_week_interval)
            .collect();
    }

    #[inline]
    pub fn contains(&self, resource: &str) -> bool {
        self.slots.contains_key(resource)
    }

    /// Normalized slots of `resource`; empty for an unknown resource.
    pub fn slots(&self, resource: &str) -> &[WeeklyInterval] {
        self.slots.get(resource).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resource ids with a calendar, in no particular order.
    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Calendar key to look up for `resource`.
    #[inline]
    pub fn key_for<'a>(resource: &'a str, differentiated: bool) -> &'a str {
        if differentiated { resource } else { UNDIFFERENTIATED_POOL }
    }

    /// Concrete working intervals of `resource` inside `within`.
    ///
    /// The result is disjoint, sorted and contained in `within`.  An unknown
    /// resource has no working hours; treating that as "always available" is
    /// up to the caller.
    pub fn working_hours(&self, resource: &str, within: &TimeInterval) -> Vec<TimeInterval> {
        let slots = self.slots(resource);
        if slots.is_empty() {
            return Vec::new();
        }

        let occurrences: Vec<TimeInterval> = split_at_midnight(*within)
            .into_iter()
            .flat_map(|(weekday, day)| {
                slots
                    .iter()
                    .filter(move |slot| slot.weekday == weekday)
                    .filter_map(move |slot| weekly_to_absolute(slot, &day))
            })
            .collect();

        merge_overlaps(&occurrences)
    }

    /// Total working time per week for `resource`.
    pub fn weekly_duration(&self, resource: &str) -> Duration {
        self.slots(resource)
            .iter()
            .fold(Duration::zero(), |acc, slot| acc + slot.duration())
    }
}
