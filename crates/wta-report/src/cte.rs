//! Cycle-time efficiency (CTE) and the impact of removing waiting time.
//!
//! ```text
//! cte        = pt / (pt + wt)
//! impact(x)  = pt / (pt + wt − x)      // CTE if waiting time x were eliminated
//! ```
//!
//! All ratios are computed in seconds.  A zero (or negative) denominator
//! makes the ratio undefined and yields `None`.

use chrono::Duration;
use serde::Serialize;

use wta_analysis::{Cause, WaitingTimeBreakdown};
use wta_core::time::as_secs_f64;

/// `pt / (pt + wt)`.
pub fn cte(processing: Duration, waiting: Duration) -> Option<f64> {
    ratio(as_secs_f64(processing), as_secs_f64(processing) + as_secs_f64(waiting))
}

/// CTE after removing `removed` from `waiting`.
pub fn impact(processing: Duration, waiting: Duration, removed: Duration) -> Option<f64> {
    let pt = as_secs_f64(processing);
    ratio(pt, pt + as_secs_f64(waiting) - as_secs_f64(removed))
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator <= 0.0 {
        return None;
    }
    let r = numerator / denominator;
    r.is_finite().then_some(r)
}

/// CTE impact of eliminating each cause.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct CteImpact {
    pub batching_impact:       Option<f64>,
    pub contention_impact:     Option<f64>,
    pub prioritization_impact: Option<f64>,
    pub unavailability_impact: Option<f64>,
    pub extraneous_impact:     Option<f64>,
}

impl CteImpact {
    /// Impact of each component of `removable`, against the process totals
    /// `processing` and `waiting`.
    pub fn new(processing: Duration, waiting: Duration, removable: &WaitingTimeBreakdown) -> Self {
        let of = |cause: Cause| impact(processing, waiting, removable.get(cause));
        Self {
            batching_impact:       of(Cause::Batching),
            contention_impact:     of(Cause::Contention),
            prioritization_impact: of(Cause::Prioritization),
            unavailability_impact: of(Cause::Unavailability),
            extraneous_impact:     of(Cause::Extraneous),
        }
    }

    pub fn get(&self, cause: Cause) -> Option<f64> {
        match cause {
            Cause::Batching => self.batching_impact,
            Cause::Contention => self.contention_impact,
            Cause::Prioritization => self.prioritization_impact,
            Cause::Unavailability => self.unavailability_impact,
            Cause::Extraneous => self.extraneous_impact,
        }
    }
}
