//! Transition identification.
//!
//! A *transition* links an activity instance to the instance whose
//! completion most plausibly enabled it: the nearest earlier instance of the
//! same case that is neither concurrent with it (per the parallel-activity
//! relation) nor still running when it starts.
//!
//! ```text
//! case (sorted by end, start):   A ── B ── C ── D
//! scan for D, backwards:         C ∥ D?  skip
//!                                B.end > D.start?  skip
//!                                A  → Transition { source: A, destination: D }
//! ```

use serde::{Deserialize, Serialize};

use wta_core::InstanceId;

use crate::{ActivityInstance, Case, EventLog, ParallelActivities};

/// Ordered pair of activity instances within one case.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Transition {
    pub source:      InstanceId,
    pub destination: InstanceId,
}

/// Position (within `case`) of the nearest non-concurrent, non-overlapping
/// predecessor of the instance at `pos`.
///
/// `case` must be sorted by `(end, start)`.
pub fn nearest_predecessor(
    instances: &[ActivityInstance],
    case:      &[InstanceId],
    pos:       usize,
    parallel:  &ParallelActivities,
) -> Option<usize> {
    let current = &instances[case[pos].index()];
    (0..pos).rev().find(|&p| {
        let prev = &instances[case[p].index()];
        !parallel.are_parallel(&current.activity, &prev.activity) && prev.end <= current.start
    })
}

/// All transitions of one case, ordered by destination.
///
/// Instances without a qualifying predecessor (typically the first of the
/// case) have no incoming transition.
pub fn identify_transitions(log: &EventLog, case: &Case, parallel: &ParallelActivities) -> Vec<Transition> {
    let ids = case.instances.as_slice();
    let mut out: Vec<Transition> = (0..ids.len())
        .rev()
        .filter_map(|pos| {
            nearest_predecessor(log.instances(), ids, pos, parallel).map(|src| Transition {
                source:      ids[src],
                destination: ids[pos],
            })
        })
        .collect();
    out.reverse();
    out
}
