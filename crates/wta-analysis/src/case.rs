//! Per-case processing: transitions → causes → breakdowns.

use chrono::Duration;
use tracing::{debug, error};

use wta_core::time::non_negative;
use wta_core::CaseIndex;
use wta_log::Transition;

use crate::decompose::{decompose, InvariantViolation, WaitingTimeBreakdown};
use crate::detect::detect_causes;
use crate::{CaseContext, CaseError};

/// One analyzed transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionRecord {
    pub transition:           Transition,
    pub source_activity:      String,
    pub source_resource:      String,
    pub destination_activity: String,
    pub destination_resource: String,
    pub breakdown:            WaitingTimeBreakdown,
}

/// A transition dropped because its breakdown failed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViolationRecord {
    pub transition: Transition,
    pub violation:  InvariantViolation,
}

/// Complete result of one case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaseOutcome {
    pub case_index:      CaseIndex,
    pub case_id:         String,
    pub num_instances:   usize,
    /// Σ `end − start` over the case's instances.
    pub processing_time: Duration,
    /// Valid transitions, ordered by destination.
    pub transitions:     Vec<TransitionRecord>,
    pub violations:      Vec<ViolationRecord>,
    /// Transitions whose destination was enabled after it started.
    pub clock_skew:      usize,
    /// Transitions to or from a boundary marker, not analyzed.
    pub sentinel_transitions: usize,
}

impl CaseOutcome {
    /// Σ total waiting time over the case's valid transitions.
    pub fn waiting_time(&self) -> Duration {
        self.transitions
            .iter()
            .fold(Duration::zero(), |acc, t| acc + t.breakdown.total)
    }
}

/// Analyze every transition of `ctx.case`.
///
/// Fails only for cases that cannot hold a transition.  Invariant violations
/// are collected in the outcome, not returned as errors.
pub fn process_case(ctx: &CaseContext<'_>) -> Result<CaseOutcome, CaseError> {
    let case = ctx.case;
    let log = ctx.log;

    if case.instances.len() < 2 {
        return Err(CaseError::Input {
            case_id: case.case_id.clone(),
            reason:  format!("{} activity instance(s), at least 2 are needed", case.instances.len()),
        });
    }

    let mut outcome = CaseOutcome {
        case_index:           case.index,
        case_id:              case.case_id.clone(),
        num_instances:        case.instances.len(),
        processing_time:      log
            .case_instances(case)
            .fold(Duration::zero(), |acc, inst| acc + inst.processing_time()),
        transitions:          Vec::new(),
        violations:           Vec::new(),
        clock_skew:           0,
        sentinel_transitions: 0,
    };

    for transition in wta_log::identify_transitions(log, case, ctx.parallel) {
        let source = log.instance(transition.source);
        let destination = log.instance(transition.destination);

        if ctx.config.is_sentinel(&source.activity, &source.resource)
            || ctx.config.is_sentinel(&destination.activity, &destination.resource)
        {
            outcome.sentinel_transitions += 1;
            continue;
        }

        let raw = destination.raw_wait();
        if raw < Duration::zero() {
            outcome.clock_skew += 1;
            debug!(
                case = %case.case_id,
                activity = %destination.activity,
                skew_secs = -raw.num_seconds(),
                "enabled after start, waiting time clamped to zero"
            );
        }
        let total = non_negative(raw);

        let result = if total == Duration::zero() {
            Ok(WaitingTimeBreakdown::default())
        } else {
            decompose(total, &detect_causes(destination, ctx))
        };

        match result {
            Ok(breakdown) => outcome.transitions.push(TransitionRecord {
                transition,
                source_activity:      source.activity.clone(),
                source_resource:      source.resource.clone(),
                destination_activity: destination.activity.clone(),
                destination_resource: destination.resource.clone(),
                breakdown,
            }),
            Err(violation) => {
                error!(
                    case = %case.case_id,
                    source = %source.activity,
                    destination = %destination.activity,
                    %violation,
                    "transition excluded"
                );
                outcome.violations.push(ViolationRecord { transition, violation });
            }
        }
    }

    Ok(outcome)
}
