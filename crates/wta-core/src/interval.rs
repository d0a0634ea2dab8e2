//! Interval algebra over ordered time points.
//!
//! # Model
//!
//! An [`Interval`] is a closed span `[start, end]` with `start ≤ end`.  Two
//! intervals *overlap* only if they share more than an endpoint; intervals
//! whose endpoints coincide are adjacent, and subtracting one from the other
//! removes nothing.  Zero-length intervals are legal: they take part in
//! subtraction (a covered point is removed) but contribute no duration.
//!
//! The operations are generic over [`TimePoint`] so the same code serves
//! absolute UTC timestamps and the week-relative offsets used by resource
//! calendars.
//!
//! # Operations
//!
//! | Function           | Result                                                 |
//! |--------------------|--------------------------------------------------------|
//! | [`subtract`]       | `minuend \ subtrahend`, sorted                         |
//! | [`intersect`]      | pairwise overlaps, sorted                              |
//! | [`merge_overlaps`] | disjoint, sorted union (adjacent pieces coalesced)     |
//! | [`duration_sum`]   | Σ `end − start`                                        |
//!
//! None of these recurse: each is a loop over an explicit work-list, so stack
//! depth is constant regardless of how many intervals a waiting window holds.

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::Timestamp;

// ── TimePoint ─────────────────────────────────────────────────────────────────

/// A totally ordered point on a time axis with a notion of elapsed time.
pub trait TimePoint: Copy + Ord + fmt::Debug {
    /// Time elapsed from `from` to `to` (negative if `to < from`).
    fn elapsed(from: Self, to: Self) -> Duration;
}

impl TimePoint for Timestamp {
    #[inline]
    fn elapsed(from: Self, to: Self) -> Duration {
        to - from
    }
}

// ── Interval ──────────────────────────────────────────────────────────────────

/// A closed span `[start, end]` on a time axis.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Interval<T> {
    pub start: T,
    pub end:   T,
}

/// An interval between two absolute timestamps.
pub type TimeInterval = Interval<Timestamp>;

impl<T: TimePoint> Interval<T> {
    /// Construct an interval.
    ///
    /// # Panics
    /// Panics in debug mode if `start > end`.
    #[inline]
    pub fn new(start: T, end: T) -> Self {
        debug_assert!(start <= end, "interval start {start:?} is after end {end:?}");
        Self { start, end }
    }

    /// Construct an interval, or `None` if `start > end`.
    #[inline]
    pub fn try_new(start: T, end: T) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// `true` for a zero-length interval.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn duration(&self) -> Duration {
        T::elapsed(self.start, self.end)
    }

    /// `true` if the two intervals share more than an endpoint.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// `true` if `other` lies entirely within `self` (endpoints inclusive).
    #[inline]
    pub fn covers(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// The overlapping span, or `None` if the intervals do not overlap.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Self::new(self.start.max(other.start), self.end.min(other.end)))
    }

    /// Push `self \ cut` onto `out`: zero, one, or two pieces.
    ///
    /// - `cut` covers `self` → nothing (this is how zero-length intervals are
    ///   removed).
    /// - `cut` is zero-length or only touches `self` → `self` unchanged.
    /// - otherwise the uncovered left and/or right remainder, each of
    ///   positive length.
    pub fn subtract_into(&self, cut: &Self, out: &mut Vec<Self>) {
        if cut.covers(self) {
            return;
        }
        if cut.is_empty() || !self.overlaps(cut) {
            out.push(*self);
            return;
        }
        if self.start < cut.start {
            out.push(Self::new(self.start, cut.start));
        }
        if cut.end < self.end {
            out.push(Self::new(cut.end, self.end));
        }
    }
}

impl<T: TimePoint> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}, {:?}]", self.start, self.end)
    }
}

// ── Set operations ────────────────────────────────────────────────────────────

/// Remove every subtrahend interval from the minuend set.
///
/// Subtrahend intervals are folded in one at a time; each step splits any
/// overlapped minuend piece into at most two remainders.  The pieces are
/// sorted before returning, so the result does not depend on the order of
/// either input.
pub fn subtract<T: TimePoint>(minuend: &[Interval<T>], subtrahend: &[Interval<T>]) -> Vec<Interval<T>> {
    let mut rest: Vec<Interval<T>> = minuend.to_vec();
    let mut next: Vec<Interval<T>> = Vec::with_capacity(rest.len());

    for cut in subtrahend {
        if rest.is_empty() {
            break;
        }
        next.clear();
        for piece in &rest {
            piece.subtract_into(cut, &mut next);
        }
        std::mem::swap(&mut rest, &mut next);
    }

    sort_by_start(&mut rest);
    rest
}

/// Pairwise overlaps of `a` and `b`, each clipped to the shared span.
pub fn intersect<T: TimePoint>(a: &[Interval<T>], b: &[Interval<T>]) -> Vec<Interval<T>> {
    let mut out: Vec<Interval<T>> = a
        .iter()
        .flat_map(|x| b.iter().filter_map(move |y| x.intersection(y)))
        .collect();
    sort_by_start(&mut out);
    out
}

/// Union of `intervals` as a disjoint, sorted set.
///
/// Intervals are sorted by start and taken off the front of a work-list one
/// at a time; each taken interval is subtracted from everything still
/// waiting.  What remains in the accumulator is pairwise non-overlapping, and
/// a final pass coalesces pieces that touch (`[0,60] ∪ [30,90] = [0,90]`).
pub fn merge_overlaps<T: TimePoint>(intervals: &[Interval<T>]) -> Vec<Interval<T>> {
    let mut work: Vec<Interval<T>> = intervals.to_vec();
    sort_by_start(&mut work);

    let mut accumulated: Vec<Interval<T>> = Vec::with_capacity(work.len());
    while let Some(&head) = work.first() {
        accumulated.push(head);
        work = subtract(&work[1..], &[head]);
    }

    sort_by_start(&mut accumulated);
    let mut merged: Vec<Interval<T>> = Vec::with_capacity(accumulated.len());
    for piece in accumulated {
        match merged.last_mut() {
            Some(last) if piece.start <= last.end => last.end = last.end.max(piece.end),
            _ => merged.push(piece),
        }
    }
    merged
}

/// Total length of the intervals (overlaps are counted twice).
pub fn duration_sum<T: TimePoint>(intervals: &[Interval<T>]) -> Duration {
    intervals
        .iter()
        .fold(Duration::zero(), |acc, iv| acc + iv.duration())
}

#[inline]
fn sort_by_start<T: TimePoint>(intervals: &mut [Interval<T>]) {
    intervals.sort_unstable_by(|a, b| (a.start, a.end).cmp(&(b.start, b.end)));
}
