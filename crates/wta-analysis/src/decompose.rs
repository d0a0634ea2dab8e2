//! Five-way waiting-time decomposition.
//!
//! Causes are resolved in a fixed precedence so that every instant of the
//! waiting window is attributed exactly once:
//!
//! ```text
//! batching        = |B|
//! contention      = |merge(C) \ B|
//! prioritization  = |merge(P) \ B \ C'|
//! unavailability  = |merge(U) \ B \ C' \ P'|
//! extraneous      = total − (batching + contention + prioritization + unavailability)
//! ```
//!
//! where `C'` and `P'` are the already-resolved contention and
//! prioritization sets.  Durations are integer-backed, so the sum check is
//! exact.

use std::fmt;
use std::ops::{Add, AddAssign};

use chrono::Duration;
use thiserror::Error;

use wta_core::time::as_secs_f64;
use wta_core::{duration_sum, merge_overlaps, subtract, TimeInterval};

use crate::WaitingCauses;

// ── WaitingTimeBreakdown ──────────────────────────────────────────────────────

/// Waiting time of one transition (or a sum of them), split by cause.
///
/// For a single transition `total == batching + contention + prioritization
/// + unavailability + extraneous` and every component lies in `[0, total]`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct WaitingTimeBreakdown {
    pub total:          Duration,
    pub batching:       Duration,
    pub contention:     Duration,
    pub prioritization: Duration,
    pub unavailability: Duration,
    pub extraneous:     Duration,
}

impl Default for WaitingTimeBreakdown {
    fn default() -> Self {
        let zero = Duration::zero();
        Self {
            total:          zero,
            batching:       zero,
            contention:     zero,
            prioritization: zero,
            unavailability: zero,
            extraneous:     zero,
        }
    }
}

impl WaitingTimeBreakdown {
    /// The five cause components, in precedence order.
    pub fn components(&self) -> [(Cause, Duration); 5] {
        [
            (Cause::Batching, self.batching),
            (Cause::Contention, self.contention),
            (Cause::Prioritization, self.prioritization),
            (Cause::Unavailability, self.unavailability),
            (Cause::Extraneous, self.extraneous),
        ]
    }

    pub fn get(&self, cause: Cause) -> Duration {
        match cause {
            Cause::Batching => self.batching,
            Cause::Contention => self.contention,
            Cause::Prioritization => self.prioritization,
            Cause::Unavailability => self.unavailability,
            Cause::Extraneous => self.extraneous,
        }
    }

    /// Check the single-transition invariants.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let fail = |rule: &'static str| Err(InvariantViolation { rule, breakdown: *self });

        if self.total < Duration::zero() {
            return fail("total is negative");
        }
        for (_, d) in self.components() {
            if d < Duration::zero() {
                return fail("component is negative");
            }
            if d > self.total {
                return fail("component exceeds total");
            }
        }
        let sum = self
            .components()
            .iter()
            .fold(Duration::zero(), |acc, (_, d)| acc + *d);
        if sum != self.total {
            return fail("components do not sum to total");
        }
        Ok(())
    }
}

impl Add for WaitingTimeBreakdown {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for WaitingTimeBreakdown {
    fn add_assign(&mut self, rhs: Self) {
        self.total = self.total + rhs.total;
        self.batching = self.batching + rhs.batching;
        self.contention = self.contention + rhs.contention;
        self.prioritization = self.prioritization + rhs.prioritization;
        self.unavailability = self.unavailability + rhs.unavailability;
        self.extraneous = self.extraneous + rhs.extraneous;
    }
}

impl fmt::Display for WaitingTimeBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total {}s = batching {}s + contention {}s + prioritization {}s + unavailability {}s + extraneous {}s",
            as_secs_f64(self.total),
            as_secs_f64(self.batching),
            as_secs_f64(self.contention),
            as_secs_f64(self.prioritization),
            as_secs_f64(self.unavailability),
            as_secs_f64(self.extraneous),
        )
    }
}

// ── Cause ─────────────────────────────────────────────────────────────────────

/// One of the five waiting-time causes.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub enum Cause {
    Batching,
    Contention,
    Prioritization,
    Unavailability,
    Extraneous,
}

impl Cause {
    pub const ALL: [Cause; 5] = [
        Cause::Batching,
        Cause::Contention,
        Cause::Prioritization,
        Cause::Unavailability,
        Cause::Extraneous,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Cause::Batching => "batching",
            Cause::Contention => "contention",
            Cause::Prioritization => "prioritization",
            Cause::Unavailability => "unavailability",
            Cause::Extraneous => "extraneous",
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── InvariantViolation ────────────────────────────────────────────────────────

/// A breakdown that failed its sum or bound checks.  Always a defect, never
/// a property of the input.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invariant violated ({rule}): {breakdown}")]
pub struct InvariantViolation {
    pub rule:      &'static str,
    pub breakdown: WaitingTimeBreakdown,
}

// ── decompose ─────────────────────────────────────────────────────────────────

/// Split `total` into the five causes.
///
/// `total == 0` yields the all-zero breakdown regardless of `causes`.
pub fn decompose(total: Duration, causes: &WaitingCauses) -> Result<WaitingTimeBreakdown, InvariantViolation> {
    if total == Duration::zero() {
        return Ok(WaitingTimeBreakdown::default());
    }

    let batching: Vec<TimeInterval> = causes.batching.into_iter().collect();
    let contention = subtract(&merge_overlaps(&causes.contention), &batching);
    let prioritization = subtract(&subtract(&merge_overlaps(&causes.prioritization), &batching), &contention);
    let unavailability = subtract(
        &subtract(&subtract(&merge_overlaps(&causes.unavailability), &batching), &contention),
        &prioritization,
    );

    let batching = duration_sum(&batching);
    let contention = duration_sum(&contention);
    let prioritization = duration_sum(&prioritization);
    let unavailability = duration_sum(&unavailability);

    let breakdown = WaitingTimeBreakdown {
        total,
        batching,
        contention,
        prioritization,
        unavailability,
        extraneous: total - batching - contention - prioritization - unavailability,
    };
    breakdown.validate()?;
    Ok(breakdown)
}
