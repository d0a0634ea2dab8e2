//! Analysis configuration.
//!
//! Every entry point takes an explicit [`AnalysisConfig`]; there is no
//! process-wide default.  Applications typically load it from a JSON file
//! and pass it down:
//!
//! ```json
//! {
//!   "log_ids": { "case": "case_id", "activity": "Activity", "resource": "Resource",
//!                "start_timestamp": "start_time", "end_timestamp": "end_time" },
//!   "num_threads": 8,
//!   "differentiated_calendars": true
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::CoreResult;

// ── LogIds ────────────────────────────────────────────────────────────────────

/// Column names of the event-log fields.
///
/// Source logs name their columns differently (XES-style `concept:name`,
/// plain `Activity`, …).  Unset keys keep their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogIds {
    pub case:     String,
    pub activity: String,
    pub resource: String,
    #[serde(alias = "start_timestamp")]
    pub start_time: String,
    #[serde(alias = "end_timestamp")]
    pub end_time: String,
    #[serde(alias = "enabled_timestamp")]
    pub enabled_time: String,
    pub batch_id: String,
    #[serde(alias = "batch_instance_enabled")]
    pub batch_enabled_time: String,
}

impl Default for LogIds {
    fn default() -> Self {
        Self {
            case:               "case:concept:name".into(),
            activity:           "concept:name".into(),
            resource:           "org:resource".into(),
            start_time:         "start_timestamp".into(),
            end_time:           "time:timestamp".into(),
            enabled_time:       "enabled_timestamp".into(),
            batch_id:           "batch_instance_id".into(),
            batch_enabled_time: "batch_instance_enabled".into(),
        }
    }
}

// ── AnalysisConfig ────────────────────────────────────────────────────────────

/// Top-level analysis configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Column mapping for the input log.
    pub log_ids: LogIds,

    /// Worker thread count for the case pool.  `None` uses all logical cores.
    pub num_threads: Option<usize>,

    /// Look up working hours per resource (`true`) or for the whole
    /// undifferentiated resource pool (`false`).
    pub differentiated_calendars: bool,

    /// Estimate missing enabled times from the case's predecessors instead
    /// of rejecting the case.
    pub estimate_enabled_times: bool,

    /// Activity names that mark artificial case boundaries.
    pub sentinel_activities: Vec<String>,

    /// Resource names that execute the boundary markers.
    pub sentinel_resources: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            log_ids:                  LogIds::default(),
            num_threads:              None,
            differentiated_calendars: true,
            estimate_enabled_times:   true,
            sentinel_activities:      vec!["Start".into(), "End".into()],
            sentinel_resources:       vec!["Start".into(), "End".into()],
        }
    }
}

impl AnalysisConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_path(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// `true` if the (activity, resource) pair is an artificial boundary
    /// event such as `Start`/`End`.
    pub fn is_sentinel(&self, activity: &str, resource: &str) -> bool {
        self.sentinel_activities.iter().any(|a| a == activity)
            && self.sentinel_resources.iter().any(|r| r == resource)
    }
}
