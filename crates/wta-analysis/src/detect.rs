//! Waiting-cause detectors.
//!
//! Each detector looks at one *destination* instance and returns the
//! intervals of its waiting window `[enabled, start]` attributable to one
//! cause.  Intervals from different detectors may overlap; the
//! [decomposer](crate::decompose) resolves that.
//!
//! | Cause          | Source of the intervals                                         |
//! |----------------|-----------------------------------------------------------------|
//! | batching       | `[enabled, batch_enabled]`                                      |
//! | contention     | resource busy with work enabled no later than the destination   |
//! | prioritization | resource busy with work enabled after the destination           |
//! | unavailability | resource idle *and* outside its working hours                   |
//!
//! # Reference enablement
//!
//! A batched destination competes with two populations.  Instances of its
//! own batch are compared against its own enabled time; everything else is
//! compared against the time the batch became ready (clamped into
//! `[enabled, start]`), since the destination could not start earlier
//! anyway.  An unbatched destination uses its enabled time throughout.

use wta_calendar::ResourceCalendar;
use wta_core::{intersect, merge_overlaps, subtract, Interval, TimeInterval};
use wta_log::{ActivityInstance, EventLog};

use crate::CaseContext;

/// Raw, possibly overlapping cause intervals for one destination.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WaitingCauses {
    pub batching:       Option<TimeInterval>,
    pub contention:     Vec<TimeInterval>,
    pub prioritization: Vec<TimeInterval>,
    pub unavailability: Vec<TimeInterval>,
}

/// Run every detector for `destination`.
pub fn detect_causes(destination: &ActivityInstance, ctx: &CaseContext<'_>) -> WaitingCauses {
    let (contention, prioritization) = contention_and_prioritization(destination, ctx.log);
    WaitingCauses {
        batching: batching_interval(destination),
        contention,
        prioritization,
        unavailability: unavailability(
            destination,
            ctx.log,
            ctx.calendar,
            ctx.config.differentiated_calendars,
        ),
    }
}

/// Other instances of the destination's resource that were running at some
/// point of its waiting window.
pub fn other_processing<'a>(
    destination: &'a ActivityInstance,
    log:         &'a EventLog,
) -> impl Iterator<Item = &'a ActivityInstance> + 'a {
    let ids = log.by_resource(&destination.resource);
    // `by_resource` is sorted by start: everything from here on starts too late.
    let upto = ids.partition_point(|&id| log.instance(id).start < destination.start);
    ids[..upto]
        .iter()
        .map(move |&id| log.instance(id))
        .filter(move |other| other.id != destination.id && other.end > destination.enabled)
}

/// Contention and prioritization intervals, in that order.
pub fn contention_and_prioritization(
    destination: &ActivityInstance,
    log:         &EventLog,
) -> (Vec<TimeInterval>, Vec<TimeInterval>) {
    let out_of_batch_reference = destination
        .batch_enabled
        .map(|b| b.min(destination.start).max(destination.enabled))
        .unwrap_or(destination.enabled);

    let mut contention = Vec::new();
    let mut prioritization = Vec::new();

    for other in other_processing(destination, log) {
        let reference = if destination.same_batch(other) {
            destination.enabled
        } else {
            out_of_batch_reference
        };
        let Some(busy) = Interval::try_new(reference.max(other.start), destination.start.min(other.end)) else {
            continue;
        };
        if other.enabled <= reference {
            contention.push(busy);
        } else {
            prioritization.push(busy);
        }
    }

    (contention, prioritization)
}

/// Intervals where the resource was idle and off its working hours.
///
/// A resource (or pool) without a calendar is treated as always available.
pub fn unavailability(
    destination:    &ActivityInstance,
    log:            &EventLog,
    calendar:       &ResourceCalendar,
    differentiated: bool,
) -> Vec<TimeInterval> {
    let key = ResourceCalendar::key_for(&destination.resource, differentiated);
    if !calendar.contains(key) {
        return Vec::new();
    }

    let window = destination.waiting_window();
    let busy: Vec<TimeInterval> = other_processing(destination, log).map(ActivityInstance::span).collect();
    let idle = subtract(&[window], &merge_overlaps(&busy));
    let off_hours = subtract(&[window], &calendar.working_hours(key, &window));

    let mut out = intersect(&idle, &off_hours);
    out.retain(|iv| !iv.is_empty());
    out
}

/// `[enabled, batch_enabled]`, ending no later than the start; `None` when
/// the destination is not batched or its batch was ready before it was.
pub fn batching_interval(destination: &ActivityInstance) -> Option<TimeInterval> {
    let ready = destination.batch_enabled?;
    if ready < destination.enabled {
        return None;
    }
    Interval::try_new(destination.enabled, ready.min(destination.start))
}
