//! Enabled-time estimation.
//!
//! Logs produced without a concurrency oracle lack enabled times.  The
//! estimate is the end of the nearest non-concurrent, non-overlapping
//! predecessor in the case (the same scan as transition identification), or
//! the instance's own start when it has none.
//!
//! Batched instances without a batch enabled time get the latest enabled
//! time among all members of their batch.

use rustc_hash::FxHashMap;
use tracing::debug;

use wta_core::{InstanceId, Timestamp};

use crate::transition::nearest_predecessor;
use crate::{ActivityInstance, ParallelActivities};

/// Overwrite the enabled time of every instance in `case` flagged in
/// `missing` (indexed by `InstanceId`).
///
/// `case` must be sorted by `(end, start)`.  Returns the number of estimates
/// made.
pub fn estimate_enabled_times(
    instances: &mut [ActivityInstance],
    case:      &[InstanceId],
    missing:   &[bool],
    parallel:  &ParallelActivities,
) -> usize {
    let mut estimated = 0;
    for pos in 0..case.len() {
        let id = case[pos];
        if !missing[id.index()] {
            continue;
        }
        let enabled = match nearest_predecessor(instances, case, pos, parallel) {
            Some(p) => instances[case[p].index()].end,
            None => instances[id.index()].start,
        };
        instances[id.index()].enabled = enabled;
        estimated += 1;
    }
    estimated
}

/// Fill missing batch enabled times with the maximum enabled time of the
/// batch.  Returns the number of instances updated.
pub fn fill_batch_enabled_times(instances: &mut [ActivityInstance]) -> usize {
    let mut latest: FxHashMap<&str, Timestamp> = FxHashMap::default();
    for inst in instances.iter() {
        if let Some(batch) = inst.batch_id.as_deref() {
            latest
                .entry(batch)
                .and_modify(|t| *t = (*t).max(inst.enabled))
                .or_insert(inst.enabled);
        }
    }

    // Resolve before mutating: `latest` borrows batch ids from `instances`.
    let updates: Vec<(usize, Timestamp)> = instances
        .iter()
        .enumerate()
        .filter(|(_, inst)| inst.batch_enabled.is_none())
        .filter_map(|(i, inst)| inst.batch_id.as_deref().and_then(|b| latest.get(b)).map(|&t| (i, t)))
        .collect();

    for &(i, t) in &updates {
        instances[i].batch_enabled = Some(t);
    }
    if !updates.is_empty() {
        debug!(count = updates.len(), "derived batch enabled times");
    }
    updates.len()
}
