//! Unit tests for wta-report.

#[cfg(test)]
mod support {
    use chrono::{Duration, TimeZone, Utc};

    use wta_analysis::{AnalysisOutput, Analyzer, AnalyzerBuilder, NoopObserver};
    use wta_core::{AnalysisConfig, Timestamp};
    use wta_log::{EventLogBuilder, InstanceRecord};

    use crate::{ReportAggregator, TransitionsReport};

    pub fn t(minutes: i64) -> Timestamp {
        Utc.with_ymd_and_hms(2022, 4, 25, 0, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    pub fn mins(m: i64) -> Duration {
        Duration::minutes(m)
    }

    fn rec(case: &str, activity: &str, resource: &str, enabled: i64, start: i64, end: i64) -> InstanceRecord {
        InstanceRecord {
            case_id:       case.into(),
            activity:      activity.into(),
            resource:      resource.into(),
            start:         t(start),
            end:           t(end),
            enabled:       Some(t(enabled)),
            batch_id:      None,
            batch_enabled: None,
        }
    }

    /// Two analyzable cases sharing the transition (A, R1) → (B, R2), one of
    /// which waits 30 minutes, and one single-instance case.
    pub fn analyzer() -> Analyzer {
        let mut b = EventLogBuilder::new();
        b.record(rec("1", "A", "R1", 0, 0, 60))
            .record(rec("1", "B", "R2", 60, 90, 120))
            .record(rec("2", "A", "R1", 0, 60, 120))
            .record(rec("2", "B", "R2", 120, 120, 150))
            .record(rec("3", "X", "R3", 0, 0, 10));
        let log = b.build().unwrap().log;
        AnalyzerBuilder::new(log, AnalysisConfig::default()).build().unwrap()
    }

    pub fn report() -> TransitionsReport {
        let analyzer = analyzer();
        let mut aggregator = ReportAggregator::new();
        analyzer.run(&mut aggregator);
        aggregator.finish(&analyzer.log)
    }

    pub fn outcomes() -> (Analyzer, AnalysisOutput) {
        let analyzer = analyzer();
        let output = analyzer.run(&mut NoopObserver);
        (analyzer, output)
    }
}

#[cfg(test)]
mod cte {
    use super::support::mins;
    use crate::{cte, impact, CteImpact};
    use chrono::Duration;
    use wta_analysis::WaitingTimeBreakdown;

    #[test]
    fn ratios() {
        assert_eq!(cte(mins(30), mins(90)), Some(0.25));
        assert_eq!(cte(mins(60), Duration::zero()), Some(1.0));
        assert_eq!(impact(mins(30), mins(90), mins(90)), Some(1.0));
        assert_eq!(impact(mins(30), mins(90), mins(30)), Some(1.0 / 3.0));
    }

    #[test]
    fn zero_denominator_is_undefined() {
        assert_eq!(cte(Duration::zero(), Duration::zero()), None);
        assert_eq!(impact(Duration::zero(), mins(10), mins(10)), None);
    }

    #[test]
    fn per_cause_impact() {
        let removable = WaitingTimeBreakdown {
            total: mins(90),
            batching: mins(60),
            extraneous: mins(30),
            ..WaitingTimeBreakdown::default()
        };
        let i = CteImpact::new(mins(30), mins(90), &removable);
        assert_eq!(i.batching_impact, Some(0.5));
        assert_eq!(i.extraneous_impact, Some(1.0 / 3.0));
        assert_eq!(i.contention_impact, Some(0.25));
    }
}

#[cfg(test)]
mod aggregate {
    use super::support::{mins, outcomes, report};
    use crate::ReportAggregator;

    #[test]
    fn summary_counts() {
        let r = report();
        let s = &r.summary;
        assert_eq!(s.num_cases, 3);
        assert_eq!(s.num_activities, 3);
        assert_eq!(s.num_activity_instances, 5);
        assert_eq!(s.num_transitions, 1);
        assert_eq!(s.num_transition_instances, 2);
        assert_eq!(s.num_failed_cases, 1);
        assert_eq!(s.num_violations, 0);
        // 60 + 30 + 60 + 30 + 10, including the case without transitions.
        assert_eq!(s.total_processing_time, mins(190));
        assert_eq!(r.total_waiting_time(), mins(30));
        assert_eq!(s.totals.extraneous, mins(30));
        assert_eq!(s.process_cte, Some(190.0 / 220.0));
        assert_eq!(s.cte_impact_by_cause.extraneous_impact, Some(1.0));
        assert_eq!(s.cte_impact_by_cause.batching_impact, Some(190.0 / 220.0));
    }

    #[test]
    fn rows_are_grouped_by_key() {
        let r = report();
        let row = &r.rows[0];
        assert_eq!(row.key.source_activity, "A");
        assert_eq!(row.key.destination_resource, "R2");
        assert_eq!(row.frequency, 2);
        assert_eq!(row.breakdown.total, mins(30));
        assert_eq!(row.case_ids.iter().collect::<Vec<_>>(), ["1", "2"]);
        assert_eq!(row.cte_impact, Some(1.0));
    }

    #[test]
    fn case_summaries_in_log_order() {
        let r = report();
        let ids: Vec<_> = r.cases.iter().map(|c| c.case_id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
        assert_eq!(r.cases[0].waiting_time, mins(30));
        assert_eq!(r.cases[0].cte, Some(0.75));
        assert_eq!(r.cases[1].cte, Some(1.0));
    }

    #[test]
    fn merge_is_order_independent() {
        let (analyzer, out) = outcomes();

        let mut forward = ReportAggregator::new();
        for c in &out.cases {
            forward.add_case(c);
        }

        let mut left = ReportAggregator::new();
        let mut right = ReportAggregator::new();
        right.add_case(&out.cases[0]);
        left.add_case(&out.cases[1]);
        left.merge(right);

        assert_eq!(forward.num_groups(), left.num_groups());
        assert_eq!(forward.finish(&analyzer.log), left.finish(&analyzer.log));
    }
}

#[cfg(test)]
mod regroup {
    use std::collections::BTreeSet;

    use super::support::mins;
    use crate::{by_activity_pair, CteImpact, TransitionKey, TransitionReportRow};
    use wta_analysis::WaitingTimeBreakdown;

    fn row(src_res: &str, dst_res: &str, cases: &[&str], wait: i64) -> TransitionReportRow {
        TransitionReportRow {
            key: TransitionKey {
                source_activity:      "A".into(),
                source_resource:      src_res.into(),
                destination_activity: "B".into(),
                destination_resource: dst_res.into(),
            },
            frequency: cases.len() as u64,
            breakdown: WaitingTimeBreakdown {
                total: mins(wait),
                contention: mins(wait),
                ..WaitingTimeBreakdown::default()
            },
            case_ids: cases.iter().map(|c| c.to_string()).collect::<BTreeSet<_>>(),
            cte_impact: None,
            cte_impact_by_cause: CteImpact::default(),
        }
    }

    #[test]
    fn resource_pairs_nest_under_activity_pair() {
        let pairs = by_activity_pair(&[row("R2", "R3", &["2", "3"], 20), row("R1", "R3", &["1", "2"], 10)]);
        assert_eq!(pairs.len(), 1);

        let p = &pairs[0];
        assert_eq!(p.case_freq, 3);
        assert_eq!(p.total_freq, 4);
        assert_eq!(p.wt.total_wt, 1_800.0);
        assert_eq!(p.wt.contention_wt, 1_800.0);

        let resources: Vec<_> = p.wt_by_resource.iter().map(|r| r.source_resource.as_str()).collect();
        assert_eq!(resources, ["R1", "R2"]);
        assert_eq!(p.wt_by_resource[0].case_freq, 2);
        assert_eq!(p.wt_by_resource[0].wt.total_wt, 600.0);
    }
}

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use super::support::report;
    use crate::csv::TRANSITIONS_HEADER;
    use crate::{CsvReportWriter, ReportWriter};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn header_and_rows() {
        let dir = tmp();
        let mut w = CsvReportWriter::new(dir.path(), "log").unwrap();
        w.write_report(&report()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();

        let path = dir.path().join("log_transitions_report.csv");
        assert_eq!(w.path(), path);

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, TRANSITIONS_HEADER);

        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "A");
        assert_eq!(&rows[0][4], "2"); // frequency
        assert_eq!(&rows[0][5], "1800"); // wt_total
        assert_eq!(&rows[0][10], "1800"); // wt_extraneous
        assert_eq!(&rows[0][11], "1"); // cte_impact
        assert_eq!(&rows[0][12], "1,2");
    }

    #[test]
    fn csv_error_message_is_not_prefixed_twice() {
        let inner = csv::Error::from(std::io::Error::other("disk full"));
        let expected = inner.to_string();
        assert_eq!(crate::ReportError::from(inner).to_string(), expected);
    }
}

#[cfg(test)]
mod json_tests {
    use serde_json::Value;

    use super::support::report;
    use crate::{JsonReportWriter, ReportWriter};

    fn read(path: &std::path::Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn transitions_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = JsonReportWriter::new(dir.path(), "log");
        w.write_report(&report()).unwrap();
        w.finish().unwrap();

        let doc = read(&dir.path().join("log_transitions_report.json"));
        assert_eq!(doc["num_cases"], 3);
        assert_eq!(doc["num_transition_instances"], 2);
        assert_eq!(doc["total_wt"], 1_800.0);
        assert_eq!(doc["total_extraneous_wt"], 1_800.0);

        let pair = &doc["report"][0];
        assert_eq!(pair["source_activity"], "A");
        assert_eq!(pair["case_freq"], 2);
        assert_eq!(pair["wt_by_resource"][0]["destination_resource"], "R2");
        assert_eq!(doc["cases"][1]["case_id"], "2");
    }

    #[test]
    fn cte_impact_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = JsonReportWriter::new(dir.path(), "log");
        w.write_report(&report()).unwrap();

        let doc = read(w.cte_impact_path());
        assert_eq!(doc["extraneous_impact"], 1.0);
        assert!(doc["batching_impact"].as_f64().unwrap() < 1.0);
    }
}
