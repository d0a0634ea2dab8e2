//! Unit tests for wta-analysis.

#[cfg(test)]
mod support {
    use chrono::{Duration, TimeZone, Utc};

    use wta_calendar::ResourceCalendar;
    use wta_core::{AnalysisConfig, Timestamp};
    use wta_log::{EventLog, EventLogBuilder, InstanceRecord, ParallelActivities};

    use crate::{AnalysisOutput, AnalyzerBuilder, NoopObserver, WaitingTimeBreakdown};

    /// Monday 2022-04-25 00:00 UTC plus `minutes`.
    pub fn t(minutes: i64) -> Timestamp {
        Utc.with_ymd_and_hms(2022, 4, 25, 0, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    pub fn mins(m: i64) -> Duration {
        Duration::minutes(m)
    }

    pub fn rec(case: &str, activity: &str, resource: &str, enabled: i64, start: i64, end: i64) -> InstanceRecord {
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

    pub fn batched(mut r: InstanceRecord, batch: &str, ready: Option<i64>) -> InstanceRecord {
        r.batch_id = Some(batch.into());
        r.batch_enabled = ready.map(t);
        r
    }

    pub fn log_of(records: Vec<InstanceRecord>) -> EventLog {
        let mut b = EventLogBuilder::new();
        for r in records {
            b.record(r);
        }
        b.build().unwrap().log
    }

    pub fn run(log: EventLog, calendar: ResourceCalendar, config: AnalysisConfig) -> AnalysisOutput {
        AnalyzerBuilder::new(log, config)
            .parallel(ParallelActivities::new())
            .calendar(calendar)
            .build()
            .unwrap()
            .run(&mut NoopObserver)
    }

    /// Breakdown of the transition into `destination` in `case`.
    pub fn breakdown_of(out: &AnalysisOutput, case: &str, destination: &str) -> WaitingTimeBreakdown {
        out.cases
            .iter()
            .find(|c| c.case_id == case)
            .and_then(|c| c.transitions.iter().find(|t| t.destination_activity == destination))
            .map(|t| t.breakdown)
            .unwrap_or_else(|| panic!("no transition into {destination} in case {case}"))
    }
}

#[cfg(test)]
mod decompose {
    use chrono::Duration;

    use super::support::{mins, t};
    use crate::{decompose, Cause, WaitingCauses, WaitingTimeBreakdown};
    use wta_core::TimeInterval;

    fn iv(a: i64, b: i64) -> TimeInterval {
        TimeInterval::new(t(a), t(b))
    }

    #[test]
    fn zero_total_is_all_zero() {
        let causes = WaitingCauses {
            batching:       Some(iv(0, 30)),
            contention:     vec![iv(0, 60)],
            prioritization: vec![iv(0, 60)],
            unavailability: vec![iv(0, 60)],
        };
        assert_eq!(decompose(Duration::zero(), &causes).unwrap(), WaitingTimeBreakdown::default());
    }

    #[test]
    fn no_causes_is_all_extraneous() {
        let b = decompose(mins(45), &WaitingCauses::default()).unwrap();
        assert_eq!(b.extraneous, mins(45));
        assert_eq!(b.total, mins(45));
    }

    #[test]
    fn causes_resolve_in_precedence_order() {
        // Window [0, 120].
        let causes = WaitingCauses {
            batching:       Some(iv(0, 20)),
            contention:     vec![iv(10, 50), iv(40, 60)],
            prioritization: vec![iv(30, 80)],
            unavailability: vec![iv(70, 100), iv(0, 5)],
        };
        let b = decompose(mins(120), &causes).unwrap();
        assert_eq!(b.batching, mins(20));
        assert_eq!(b.contention, mins(40)); // [20, 60]
        assert_eq!(b.prioritization, mins(20)); // [60, 80]
        assert_eq!(b.unavailability, mins(20)); // [80, 100]
        assert_eq!(b.extraneous, mins(20));
        assert!(b.validate().is_ok());
    }

    #[test]
    fn batching_only() {
        let causes = WaitingCauses { batching: Some(iv(540, 600)), ..WaitingCauses::default() };
        let b = decompose(mins(90), &causes).unwrap();
        assert_eq!(b.batching, mins(60));
        assert_eq!(b.contention + b.prioritization + b.unavailability, Duration::zero());
        assert_eq!(b.extraneous, mins(30));
    }

    #[test]
    fn oversized_cause_is_a_violation() {
        let causes = WaitingCauses { contention: vec![iv(0, 120)], ..WaitingCauses::default() };
        let err = decompose(mins(60), &causes).unwrap_err();
        assert_eq!(err.breakdown.contention, mins(120));
        assert!(err.to_string().contains("invariant violated"));
    }

    #[test]
    fn breakdowns_add_componentwise() {
        let a = decompose(mins(30), &WaitingCauses { batching: Some(iv(0, 10)), ..Default::default() }).unwrap();
        let b = decompose(mins(20), &WaitingCauses::default()).unwrap();
        let sum = a + b;
        assert_eq!(sum.total, mins(50));
        assert_eq!(sum.get(Cause::Batching), mins(10));
        assert_eq!(sum.get(Cause::Extraneous), mins(40));
    }
}

#[cfg(test)]
mod decompose_properties {
    use proptest::prelude::*;

    use super::support::{mins, t};
    use crate::{decompose, WaitingCauses};
    use wta_core::TimeInterval;

    const WINDOW: i64 = 600;

    fn arb_in_window() -> impl Strategy<Value = Vec<TimeInterval>> {
        prop::collection::vec((0..WINDOW, 0..WINDOW), 0..8).prop_map(|v| {
            v.into_iter()
                .map(|(a, b)| TimeInterval::new(t(a.min(b)), t(a.max(b))))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn breakdown_sums_exactly(
            batch_end in proptest::option::of(0..WINDOW),
            contention in arb_in_window(),
            prioritization in arb_in_window(),
            unavailability in arb_in_window(),
        ) {
            let causes = WaitingCauses {
                batching: batch_end.map(|e| TimeInterval::new(t(0), t(e))),
                contention,
                prioritization,
                unavailability,
            };
            let b = decompose(mins(WINDOW), &causes).unwrap();
            prop_assert_eq!(
                b.batching + b.contention + b.prioritization + b.unavailability + b.extraneous,
                b.total
            );
            for (_, d) in b.components() {
                prop_assert!(d >= chrono::Duration::zero() && d <= b.total);
            }
        }
    }
}

#[cfg(test)]
mod detect {
    use chrono::Weekday;

    use super::support::{batched, log_of, rec, t};
    use crate::detect::{batching_interval, contention_and_prioritization, unavailability};
    use wta_calendar::{ResourceCalendar, WeeklyInterval, UNDIFFERENTIATED_POOL};
    use wta_core::TimeInterval;

    fn iv(a: i64, b: i64) -> TimeInterval {
        TimeInterval::new(t(a), t(b))
    }

    #[test]
    fn contention_vs_prioritization_by_enablement() {
        let log = log_of(vec![
            rec("1", "A", "R", 480, 540, 600), // enabled before C
            rec("2", "B", "R", 560, 600, 630), // enabled after C
            rec("3", "C", "R", 540, 630, 660),
        ]);
        let c = log.instances().iter().find(|i| i.activity == "C").unwrap();
        let (contention, prioritization) = contention_and_prioritization(c, &log);
        assert_eq!(contention, vec![iv(540, 600)]);
        assert_eq!(prioritization, vec![iv(600, 630)]);
    }

    #[test]
    fn other_resources_and_later_work_are_ignored() {
        let log = log_of(vec![
            rec("1", "A", "S", 480, 540, 600),
            rec("2", "B", "R", 480, 700, 720),
            rec("3", "C", "R", 540, 630, 660),
        ]);
        let c = log.instances().iter().find(|i| i.activity == "C").unwrap();
        let (contention, prioritization) = contention_and_prioritization(c, &log);
        assert!(contention.is_empty() && prioritization.is_empty());
    }

    #[test]
    fn dual_reference_for_batched_destination() {
        // C waits from 540; its batch is ready at 600; it starts at 660.
        let log = log_of(vec![
            batched(rec("1", "M", "R", 570, 600, 630), "b", Some(600)), // batch mate
            rec("2", "X", "R", 580, 630, 660),                          // outsider, enabled before 600
            batched(rec("3", "C", "R", 540, 660, 690), "b", Some(600)),
        ]);
        let c = log.instances().iter().find(|i| i.activity == "C").unwrap();
        let (contention, prioritization) = contention_and_prioritization(c, &log);

        // Mate: compared with C's own enabled time (540) → enabled later.
        assert_eq!(prioritization, vec![iv(600, 630)]);
        // Outsider: compared with the batch-ready time (600) → enabled earlier.
        assert_eq!(contention, vec![iv(630, 660)]);
    }

    #[test]
    fn batching_interval_cases() {
        let log = log_of(vec![
            batched(rec("1", "A", "R", 540, 630, 660), "b1", Some(600)),
            batched(rec("2", "B", "R", 540, 630, 660), "b2", Some(700)),
            batched(rec("3", "C", "R", 540, 630, 660), "b3", Some(500)),
            rec("4", "D", "R", 540, 630, 660),
        ]);
        let by = |name: &str| log.instances().iter().find(|i| i.activity == name).unwrap();
        assert_eq!(batching_interval(by("A")), Some(iv(540, 600)));
        assert_eq!(batching_interval(by("B")), Some(iv(540, 630))); // clamped to start
        assert_eq!(batching_interval(by("C")), None);
        assert_eq!(batching_interval(by("D")), None);
    }

    fn office() -> Vec<WeeklyInterval> {
        vec![
            WeeklyInterval::try_new(Weekday::Mon, 9 * 3_600, 12 * 3_600).unwrap(),
            WeeklyInterval::try_new(Weekday::Mon, 13 * 3_600, 17 * 3_600).unwrap(),
        ]
    }

    #[test]
    fn unavailability_is_idle_off_hours() {
        // Waits 11:00 → 14:00; lunch 12:00–13:00 is off.
        let log = log_of(vec![rec("1", "C", "R", 660, 840, 900)]);
        let mut cal = ResourceCalendar::new();
        cal.insert("R", office());
        let c = &log.instances()[0];
        assert_eq!(unavailability(c, &log, &cal, true), vec![iv(720, 780)]);
    }

    #[test]
    fn busy_off_hours_are_not_unavailability() {
        let log = log_of(vec![
            rec("1", "W", "R", 700, 710, 750),
            rec("2", "C", "R", 660, 840, 900),
        ]);
        let mut cal = ResourceCalendar::new();
        cal.insert("R", office());
        let c = log.instances().iter().find(|i| i.activity == "C").unwrap();
        assert_eq!(unavailability(c, &log, &cal, true), vec![iv(750, 780)]);
    }

    #[test]
    fn missing_calendar_means_available() {
        let log = log_of(vec![rec("1", "C", "R", 0, 840, 900)]);
        let mut cal = ResourceCalendar::new();
        cal.insert("Someone else", office());
        assert!(unavailability(&log.instances()[0], &log, &cal, true).is_empty());
    }

    #[test]
    fn pooled_calendar() {
        let log = log_of(vec![rec("1", "C", "R", 660, 840, 900)]);
        let mut cal = ResourceCalendar::new();
        cal.insert(UNDIFFERENTIATED_POOL, office());
        assert_eq!(unavailability(&log.instances()[0], &log, &cal, false), vec![iv(720, 780)]);
        assert!(unavailability(&log.instances()[0], &log, &cal, true).is_empty());
    }
}

#[cfg(test)]
mod case {
    use chrono::Duration;

    use super::support::{batched, breakdown_of, log_of, mins, rec, run};
    use crate::{process_case, CaseContext, CaseError, WaitingTimeBreakdown};
    use wta_calendar::ResourceCalendar;
    use wta_core::AnalysisConfig;
    use wta_log::ParallelActivities;

    #[test]
    fn single_blocking_instance_is_contention() {
        let log = log_of(vec![
            rec("1", "A", "R", 540, 540, 690), // 09:00–11:30
            rec("1", "B", "S", 690, 690, 700),
            rec("2", "P", "S", 480, 480, 540),
            rec("2", "C", "R", 540, 690, 720), // waits 09:00 → 11:30
        ]);
        let out = run(log, ResourceCalendar::new(), AnalysisConfig::default());
        let b = breakdown_of(&out, "2", "C");
        assert_eq!(b.contention, Duration::hours(2) + mins(30));
        assert_eq!(b.total, b.contention);
        assert_eq!(b.extraneous, Duration::zero());
    }

    #[test]
    fn no_wait_gives_zero_breakdown() {
        let log = log_of(vec![
            rec("1", "A", "R", 0, 0, 60),
            rec("1", "B", "R", 60, 60, 90),
        ]);
        let out = run(log, ResourceCalendar::new(), AnalysisConfig::default());
        assert_eq!(breakdown_of(&out, "1", "B"), WaitingTimeBreakdown::default());
    }

    #[test]
    fn batching_only_transition() {
        let log = log_of(vec![
            rec("1", "A", "S", 480, 480, 540),
            batched(rec("1", "B", "R", 540, 630, 660), "b", Some(600)),
        ]);
        let out = run(log, ResourceCalendar::new(), AnalysisConfig::default());
        let b = breakdown_of(&out, "1", "B");
        assert_eq!(b.batching, mins(60));
        assert_eq!(b.contention + b.prioritization + b.unavailability, Duration::zero());
        assert_eq!(b.extraneous, b.total - b.batching);
    }

    #[test]
    fn too_few_instances_is_an_input_error() {
        let log = log_of(vec![rec("1", "A", "R", 0, 0, 10)]);
        let cal = ResourceCalendar::new();
        let cfg = AnalysisConfig::default();
        let p = ParallelActivities::new();
        let ctx = CaseContext::new(&log.cases()[0], &log, &p, &cal, &cfg);
        assert!(matches!(process_case(&ctx), Err(CaseError::Input { .. })));
    }

    #[test]
    fn sentinel_transitions_are_dropped() {
        let log = log_of(vec![
            rec("1", "Start", "Start", 0, 0, 0),
            rec("1", "A", "R", 0, 10, 20),
            rec("1", "B", "R", 20, 30, 40),
            rec("1", "End", "End", 40, 40, 40),
        ]);
        let out = run(log, ResourceCalendar::new(), AnalysisConfig::default());
        let case = &out.cases[0];
        assert_eq!(case.sentinel_transitions, 2);
        let names: Vec<_> = case
            .transitions
            .iter()
            .map(|t| (t.source_activity.as_str(), t.destination_activity.as_str()))
            .collect();
        assert_eq!(names, vec![("A", "B")]);
    }

    #[test]
    fn clock_skew_is_clamped_and_counted() {
        let log = log_of(vec![
            rec("1", "A", "R", 0, 0, 10),
            rec("1", "B", "R", 30, 20, 40), // enabled after start
        ]);
        let out = run(log, ResourceCalendar::new(), AnalysisConfig::default());
        assert_eq!(out.cases[0].clock_skew, 1);
        assert_eq!(breakdown_of(&out, "1", "B").total, Duration::zero());
    }

    #[test]
    fn processing_and_waiting_time_per_case() {
        let log = log_of(vec![
            rec("1", "A", "R", 0, 0, 10),
            rec("1", "B", "R", 10, 25, 40),
        ]);
        let out = run(log, ResourceCalendar::new(), AnalysisConfig::default());
        assert_eq!(out.cases[0].processing_time, mins(25));
        assert_eq!(out.cases[0].waiting_time(), mins(15));
    }
}

#[cfg(test)]
mod runner {
    use super::support::{log_of, rec};
    use crate::{AnalysisObserver, AnalyzerBuilder, CaseError, CaseOutcome, NoopObserver};
    use wta_core::AnalysisConfig;

    #[derive(Default)]
    struct Recorder {
        started: Option<usize>,
        done:    Vec<String>,
        failed:  Vec<String>,
        ended:   bool,
    }

    impl AnalysisObserver for Recorder {
        fn on_run_start(&mut self, n: usize) {
            self.started = Some(n);
        }
        fn on_case_done(&mut self, outcome: &CaseOutcome) {
            self.done.push(outcome.case_id.clone());
        }
        fn on_case_failed(&mut self, error: &CaseError) {
            self.failed.push(error.case_id().to_owned());
        }
        fn on_run_end(&mut self, _output: &crate::AnalysisOutput) {
            self.ended = true;
        }
    }

    fn three_cases() -> wta_log::EventLog {
        log_of(vec![
            rec("a", "X", "R", 0, 0, 10),
            rec("a", "Y", "R", 10, 20, 30),
            rec("b", "X", "R", 0, 40, 50),
            rec("c", "X", "S", 0, 0, 10),
            rec("c", "Y", "S", 10, 15, 30),
        ])
    }

    #[test]
    fn observer_sees_cases_in_log_order() {
        let analyzer = AnalyzerBuilder::new(three_cases(), AnalysisConfig::default()).build().unwrap();
        let mut recorder = Recorder::default();
        let out = analyzer.run(&mut recorder);

        assert_eq!(recorder.started, Some(3));
        assert_eq!(recorder.done, vec!["a", "c"]);
        assert_eq!(recorder.failed, vec!["b"]);
        assert!(recorder.ended);
        assert_eq!(out.cases.len(), 2);
        assert_eq!(out.failed.len(), 1);
        assert_eq!(out.num_transitions(), 2);
        assert_eq!(out.violations().count(), 0);
    }

    #[test]
    fn cancelled_run_drops_every_case() {
        let analyzer = AnalyzerBuilder::new(three_cases(), AnalysisConfig::default()).build().unwrap();
        analyzer.cancel_token().cancel();
        let out = analyzer.run(&mut NoopObserver);
        assert!(out.cases.is_empty());
        assert_eq!(out.cancelled, 3);
    }

    #[test]
    fn thread_count_is_validated() {
        let cfg = AnalysisConfig { num_threads: Some(0), ..AnalysisConfig::default() };
        assert!(AnalyzerBuilder::new(three_cases(), cfg).build().is_err());

        let cfg = AnalysisConfig { num_threads: Some(2), ..AnalysisConfig::default() };
        let out = AnalyzerBuilder::new(three_cases(), cfg).build().unwrap().run(&mut NoopObserver);
        assert_eq!(out.cases.len(), 2);
    }

    /// Forty cases over three shared resources; every seventh case has a
    /// single instance and fails.
    #[cfg(feature = "parallel")]
    fn many_cases() -> wta_log::EventLog {
        let mut records = Vec::new();
        for i in 0..40_i64 {
            let case = format!("c{i:02}");
            let resource = format!("R{}", i % 3);
            records.push(rec(&case, "X", &resource, i, i, i + 10));
            if i % 7 != 0 {
                records.push(rec(&case, "Y", &resource, i + 10, i + 15 + i % 4, i + 30));
            }
        }
        log_of(records)
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_run_matches_case_by_case_processing() {
        use crate::{process_case, CaseContext};

        let cfg = AnalysisConfig { num_threads: Some(4), ..AnalysisConfig::default() };
        let analyzer = AnalyzerBuilder::new(many_cases(), cfg).build().unwrap();
        let out = analyzer.run(&mut NoopObserver);

        let mut expected_done = Vec::new();
        let mut expected_failed = Vec::new();
        for case in analyzer.log.cases() {
            let ctx = CaseContext::new(case, &analyzer.log, &analyzer.parallel, &analyzer.calendar, &analyzer.config);
            match process_case(&ctx) {
                Ok(outcome) => expected_done.push(outcome),
                Err(e) => expected_failed.push(e),
            }
        }

        assert_eq!(out.cancelled, 0);
        assert_eq!(out.failed.len(), 6);
        assert_eq!(out.cases, expected_done);
        assert_eq!(out.failed, expected_failed);

        let single = AnalysisConfig { num_threads: Some(1), ..AnalysisConfig::default() };
        let serial = AnalyzerBuilder::new(many_cases(), single).build().unwrap().run(&mut NoopObserver);
        assert_eq!(serial.cases, out.cases);
        assert_eq!(serial.failed, out.failed);
    }
}
