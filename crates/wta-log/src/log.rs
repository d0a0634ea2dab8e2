//! The event log and its builder.
//!
//! # Layout
//!
//! ```text
//! instances   Vec<ActivityInstance>            indexed by InstanceId
//! cases       Vec<Case>                        indexed by CaseIndex, first-seen order
//!             └ instances: Vec<InstanceId>     sorted by (end, start, activity)
//! by_resource FxHashMap<resource, Vec<InstanceId>>  sorted by start
//! ```
//!
//! The log is immutable once built and shared read-only across the analysis
//! worker threads.

use chrono::Duration;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info, warn};

use wta_core::{CaseIndex, InstanceId, Timestamp};

use crate::enablement::{estimate_enabled_times, fill_batch_enabled_times};
use crate::{ActivityInstance, BatchAnnotations, LogError, LogResult, ParallelActivities};

// ── Case ──────────────────────────────────────────────────────────────────────

/// The activity instances of one case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Case {
    pub index:     CaseIndex,
    pub case_id:   String,
    /// Sorted by `(end, start, activity)`.
    pub instances: Vec<InstanceId>,
}

// ── EventLog ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct EventLog {
    instances:   Vec<ActivityInstance>,
    cases:       Vec<Case>,
    by_resource: FxHashMap<String, Vec<InstanceId>>,
}

impl EventLog {
    #[inline]
    pub fn instance(&self, id: InstanceId) -> &ActivityInstance {
        &self.instances[id.index()]
    }

    #[inline]
    pub fn instances(&self) -> &[ActivityInstance] {
        &self.instances
    }

    #[inline]
    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    #[inline]
    pub fn case(&self, index: CaseIndex) -> &Case {
        &self.cases[index.index()]
    }

    /// Iterate a case's instances in sorted order.
    pub fn case_instances<'a>(&'a self, case: &'a Case) -> impl Iterator<Item = &'a ActivityInstance> + 'a {
        case.instances.iter().map(move |&id| self.instance(id))
    }

    /// Every instance executed by `resource`, sorted by start.
    pub fn by_resource(&self, resource: &str) -> &[InstanceId] {
        self.by_resource.get(resource).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn num_cases(&self) -> usize {
        self.cases.len()
    }

    /// Σ `end − start` over all instances.
    pub fn total_processing_time(&self) -> Duration {
        self.instances
            .iter()
            .fold(Duration::zero(), |acc, inst| acc + inst.processing_time())
    }
}

// ── Build result ──────────────────────────────────────────────────────────────

/// A case left out of the log because its input was unusable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedCase {
    pub case_id: String,
    pub reason:  String,
}

/// A built log plus what was dropped on the way.
#[derive(Debug, Default)]
pub struct LoadedLog {
    pub log:                  EventLog,
    pub skipped:              Vec<SkippedCase>,
    /// Annotations whose `(case, activity, start)` matched no instance.
    pub unmatched_annotations: usize,
}

// ── InstanceRecord ────────────────────────────────────────────────────────────

/// One activity instance as supplied to the builder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstanceRecord {
    pub case_id:       String,
    pub activity:      String,
    pub resource:      String,
    pub start:         Timestamp,
    pub end:           Timestamp,
    /// `None` when the log has no enabled time for this instance.
    pub enabled:       Option<Timestamp>,
    pub batch_id:      Option<String>,
    pub batch_enabled: Option<Timestamp>,
}

// ── EventLogBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`EventLog`].
///
/// # Optional inputs (have defaults)
///
/// | Method                       | Default                                |
/// |------------------------------|----------------------------------------|
/// | `.parallel(p)`               | empty relation                         |
/// | `.batches(b)`                | no annotations                         |
/// | `.estimate_enabled_times(b)` | `true`                                 |
///
/// # Example
///
/// ```rust,ignore
/// let loaded = load_log_csv(path, &config.log_ids)?
///     .parallel(parallel.clone())
///     .batches(annotations)
///     .estimate_enabled_times(config.estimate_enabled_times)
///     .build()?;
/// for skipped in &loaded.skipped { /* already logged */ }
/// let log = loaded.log;
/// ```
#[derive(Default)]
pub struct EventLogBuilder {
    records:  Vec<InstanceRecord>,
    skipped:  FxHashMap<String, String>,
    parallel: ParallelActivities,
    batches:  BatchAnnotations,
    estimate: Option<bool>,
}

impl EventLogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one instance.
    pub fn record(&mut self, record: InstanceRecord) -> &mut Self {
        self.records.push(record);
        self
    }

    /// Exclude a whole case from the log; the first reason given is kept.
    pub fn skip_case(&mut self, case_id: &str, reason: impl Into<String>) -> &mut Self {
        self.skipped.entry(case_id.to_owned()).or_insert_with(|| reason.into());
        self
    }

    /// Parallel-activity relation used when estimating enabled times.
    pub fn parallel(mut self, parallel: ParallelActivities) -> Self {
        self.parallel = parallel;
        self
    }

    /// Batch annotations to merge into matching instances.
    pub fn batches(mut self, batches: BatchAnnotations) -> Self {
        self.batches = batches;
        self
    }

    /// Estimate missing enabled times (`true`, the default) or skip cases
    /// that have any.
    pub fn estimate_enabled_times(mut self, estimate: bool) -> Self {
        self.estimate = Some(estimate);
        self
    }

    /// Validate records, merge annotations, estimate enabled times, and index
    /// the log.
    pub fn build(self) -> LogResult<LoadedLog> {
        let estimate = self.estimate.unwrap_or(true);
        let mut skipped = self.skipped;

        // ── Per-record validation ─────────────────────────────────────────
        for rec in &self.records {
            if rec.start > rec.end {
                skipped
                    .entry(rec.case_id.clone())
                    .or_insert_with(|| format!("{:?} starts after it ends", rec.activity));
            } else if rec.enabled.is_none() && !estimate {
                skipped
                    .entry(rec.case_id.clone())
                    .or_insert_with(|| format!("{:?} has no enabled time", rec.activity));
            }
        }

        // ── Group kept records by case, in first-seen order ───────────────
        let mut case_slot: FxHashMap<String, usize> = FxHashMap::default();
        let mut grouped: Vec<(String, Vec<InstanceRecord>)> = Vec::new();
        for rec in self.records {
            if skipped.contains_key(&rec.case_id) {
                continue;
            }
            let slot = *case_slot.entry(rec.case_id.clone()).or_insert_with(|| {
                grouped.push((rec.case_id.clone(), Vec::new()));
                grouped.len() - 1
            });
            grouped[slot].1.push(rec);
        }

        let total: usize = grouped.iter().map(|(_, recs)| recs.len()).sum();
        if u32::try_from(total).is_err() || u32::try_from(grouped.len()).is_err() {
            return Err(LogError::TooLarge(total));
        }

        // ── Assign ids; merge batch annotations ───────────────────────────
        let mut instances: Vec<ActivityInstance> = Vec::with_capacity(total);
        let mut missing_enabled: Vec<bool> = Vec::with_capacity(total);
        let mut cases: Vec<Case> = Vec::with_capacity(grouped.len());
        let mut matched: FxHashSet<(&str, &str, Timestamp)> = FxHashSet::default();

        for (ci, (case_id, mut recs)) in grouped.into_iter().enumerate() {
            recs.sort_by(|a, b| (a.end, a.start, &a.activity).cmp(&(b.end, b.start, &b.activity)));

            let mut ids = Vec::with_capacity(recs.len());
            for rec in recs {
                let id = InstanceId(instances.len() as u32);
                let mut inst = ActivityInstance {
                    id,
                    case_id:       rec.case_id,
                    activity:      rec.activity,
                    resource:      rec.resource,
                    start:         rec.start,
                    end:           rec.end,
                    enabled:       rec.enabled.unwrap_or(rec.start),
                    batch_id:      rec.batch_id,
                    batch_enabled: rec.batch_enabled,
                };
                if let Some(a) = self.batches.get(&inst.case_id, &inst.activity, inst.start) {
                    matched.insert((a.case_id.as_str(), a.activity.as_str(), a.start));
                    if inst.batch_id.is_none() {
                        inst.batch_id = Some(a.batch_id.clone());
                    }
                    if inst.batch_enabled.is_none() {
                        inst.batch_enabled = a.batch_enabled;
                    }
                }
                missing_enabled.push(rec.enabled.is_none());
                instances.push(inst);
                ids.push(id);
            }
            cases.push(Case { index: CaseIndex(ci as u32), case_id, instances: ids });
        }

        let unmatched_annotations = self.batches.len() - matched.len();
        if unmatched_annotations > 0 {
            warn!(unmatched = unmatched_annotations, "batch annotations matched no activity instance");
        }

        // ── Derived times ─────────────────────────────────────────────────
        let estimated: usize = cases
            .iter()
            .map(|case| estimate_enabled_times(&mut instances, &case.instances, &missing_enabled, &self.parallel))
            .sum();
        if estimated > 0 {
            debug!(count = estimated, "estimated enabled times");
        }
        fill_batch_enabled_times(&mut instances);

        // ── Resource index ────────────────────────────────────────────────
        let mut by_resource: FxHashMap<String, Vec<InstanceId>> = FxHashMap::default();
        for inst in &instances {
            by_resource.entry(inst.resource.clone()).or_default().push(inst.id);
        }
        for ids in by_resource.values_mut() {
            ids.sort_by_key(|id| (instances[id.index()].start, *id));
        }

        // ── Skipped cases, reported in a stable order ─────────────────────
        let mut skipped: Vec<SkippedCase> = skipped
            .into_iter()
            .map(|(case_id, reason)| SkippedCase { case_id, reason })
            .collect();
        skipped.sort_by(|a, b| a.case_id.cmp(&b.case_id));
        for s in &skipped {
            warn!(case = %s.case_id, reason = %s.reason, "skipping case");
        }

        info!(
            cases = cases.len(),
            instances = instances.len(),
            skipped = skipped.len(),
            "event log built"
        );

        Ok(LoadedLog {
            log: EventLog { instances, cases, by_resource },
            skipped,
            unmatched_annotations,
        })
    }
}
