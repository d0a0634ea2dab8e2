//! Regrouping of report rows by activity pair.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use wta_analysis::WaitingTimeBreakdown;

use crate::row::{TransitionReportRow, WaitingSeconds};

/// One `(source_resource, destination_resource)` slice of an activity pair.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResourcePairRow {
    pub source_resource:      String,
    pub destination_resource: String,
    pub case_freq:            usize,
    pub total_freq:           u64,
    #[serde(flatten)]
    pub wt:                   WaitingSeconds,
}

/// All transitions between two activities, whoever performed them.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActivityPairRow {
    pub source_activity:      String,
    pub destination_activity: String,
    /// Distinct cases across every resource pair.
    pub case_freq:            usize,
    pub total_freq:           u64,
    #[serde(flatten)]
    pub wt:                   WaitingSeconds,
    pub wt_by_resource:       Vec<ResourcePairRow>,
}

/// Regroup `rows` by `(source_activity, destination_activity)`, sorted by
/// activity pair and then by resource pair.
pub fn by_activity_pair(rows: &[TransitionReportRow]) -> Vec<ActivityPairRow> {
    let mut groups: BTreeMap<(&str, &str), Vec<&TransitionReportRow>> = BTreeMap::new();
    for row in rows {
        groups
            .entry((row.key.source_activity.as_str(), row.key.destination_activity.as_str()))
            .or_default()
            .push(row);
    }

    groups
        .into_iter()
        .map(|((source, destination), mut members)| {
            members.sort_by(|a, b| a.key.cmp(&b.key));

            let mut cases: BTreeSet<&str> = BTreeSet::new();
            let mut breakdown = WaitingTimeBreakdown::default();
            let mut total_freq = 0;
            let mut wt_by_resource = Vec::with_capacity(members.len());

            for row in members {
                cases.extend(row.case_ids.iter().map(String::as_str));
                breakdown += row.breakdown;
                total_freq += row.frequency;
                wt_by_resource.push(ResourcePairRow {
                    source_resource:      row.key.source_resource.clone(),
                    destination_resource: row.key.destination_resource.clone(),
                    case_freq:            row.case_ids.len(),
                    total_freq:           row.frequency,
                    wt:                   WaitingSeconds::from(&row.breakdown),
                });
            }

            ActivityPairRow {
                source_activity: source.to_owned(),
                destination_activity: destination.to_owned(),
                case_freq: cases.len(),
                total_freq,
                wt: WaitingSeconds::from(&breakdown),
                wt_by_resource,
            }
        })
        .collect()
}
