//! handoff: waiting-time analysis of a small purchase-to-pay log.
//!
//! Three purchase orders pass between a clerk, a manager, the warehouse and
//! accounts payable over two working days.  Goods receipt and invoice
//! checking run concurrently.  The log has no enabled-time column, so
//! enabled times are estimated from each instance's predecessor.
//!
//! Reports are written to `./output`.  Set `RUST_LOG=debug` for per-case
//! timing.
//!
//! Usage: `handoff [config.json]`.  Without an argument the embedded
//! configuration is used.

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use wta_analysis::{AnalyzerBuilder, Cause};
use wta_calendar::load_calendar_reader;
use wta_core::time::as_secs_f64;
use wta_core::AnalysisConfig;
use wta_log::{load_log_reader, load_parallel_reader};
use wta_report::{CsvReportWriter, JsonReportWriter, ReportAggregator, ReportWriter};

// ── Constants ─────────────────────────────────────────────────────────────────

const LOG_STEM:   &str = "purchase_to_pay";
const OUTPUT_DIR: &str = "./output";

// ── Embedded inputs ───────────────────────────────────────────────────────────

// Monday 2022-04-25 and Tuesday 2022-04-26, UTC.
const LOG_CSV: &str = "\
case:concept:name,concept:name,org:resource,start_timestamp,time:timestamp\n\
po-1,Create PO,Clerk,2022-04-25 09:00:00,2022-04-25 09:20:00\n\
po-1,Approve PO,Manager,2022-04-25 09:40:00,2022-04-25 10:00:00\n\
po-1,Send PO,Clerk,2022-04-25 10:00:00,2022-04-25 10:10:00\n\
po-1,Check Invoice,Accountant,2022-04-25 11:00:00,2022-04-25 11:45:00\n\
po-1,Receive Goods,Warehouse,2022-04-25 13:00:00,2022-04-25 13:30:00\n\
po-1,Pay Invoice,Accountant,2022-04-25 14:00:00,2022-04-25 14:10:00\n\
po-2,Create PO,Clerk,2022-04-25 09:20:00,2022-04-25 09:40:00\n\
po-2,Approve PO,Manager,2022-04-25 10:00:00,2022-04-25 10:30:00\n\
po-2,Send PO,Clerk,2022-04-25 10:30:00,2022-04-25 10:40:00\n\
po-2,Check Invoice,Accountant,2022-04-25 12:00:00,2022-04-25 12:30:00\n\
po-2,Receive Goods,Warehouse,2022-04-25 14:00:00,2022-04-25 14:20:00\n\
po-2,Pay Invoice,Accountant,2022-04-25 14:20:00,2022-04-25 14:30:00\n\
po-3,Create PO,Clerk,2022-04-25 16:30:00,2022-04-25 16:50:00\n\
po-3,Approve PO,Manager,2022-04-26 09:05:00,2022-04-26 09:25:00\n\
po-3,Send PO,Clerk,2022-04-26 09:30:00,2022-04-26 09:40:00\n\
po-3,Check Invoice,Accountant,2022-04-26 10:00:00,2022-04-26 10:20:00\n\
po-3,Receive Goods,Warehouse,2022-04-26 11:00:00,2022-04-26 11:10:00\n\
po-3,Pay Invoice,Accountant,2022-04-26 11:30:00,2022-04-26 11:40:00\n\
";

const CALENDAR_JSON: &str = r#"{
  "Clerk":      [{ "weekday_from": "MONDAY", "weekday_to": "FRIDAY", "time_from": "09:00:00", "time_to": "17:00:00" }],
  "Manager":    [{ "weekday_from": "MONDAY", "weekday_to": "FRIDAY", "time_from": "09:00:00", "time_to": "17:00:00" }],
  "Warehouse":  [{ "weekday_from": "MONDAY", "weekday_to": "FRIDAY", "time_from": "08:00:00", "time_to": "16:00:00" }],
  "Accountant": [
    { "weekday_from": "MONDAY", "weekday_to": "FRIDAY", "time_from": "09:00:00", "time_to": "12:00:00" },
    { "weekday_from": "MONDAY", "weekday_to": "FRIDAY", "time_from": "13:00:00", "time_to": "17:00:00" }
  ]
}"#;

const PARALLEL_JSON: &str = r#"{ "Receive Goods": ["Check Invoice"] }"#;

const CONFIG_JSON: &str = r#"{ "num_threads": 2 }"#;

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== handoff: waiting-time analysis ===");
    let started = Instant::now();

    // 1. Inputs.
    let config = match std::env::args().nth(1) {
        Some(path) => AnalysisConfig::from_json_path(Path::new(&path))
            .with_context(|| format!("loading configuration from {path}"))?,
        None => AnalysisConfig::from_json(CONFIG_JSON).context("parsing configuration")?,
    };
    let parallel = load_parallel_reader(Cursor::new(PARALLEL_JSON)).context("loading parallel activities")?;
    let calendar = load_calendar_reader(Cursor::new(CALENDAR_JSON)).context("loading calendar")?;

    // 2. Event log.
    let loaded = load_log_reader(Cursor::new(LOG_CSV), &config.log_ids)
        .context("reading event log")?
        .parallel(parallel.clone())
        .estimate_enabled_times(config.estimate_enabled_times)
        .build()
        .context("building event log")?;
    println!(
        "Log: {} cases, {} activity instances ({} cases skipped)",
        loaded.log.num_cases(),
        loaded.log.len(),
        loaded.skipped.len()
    );

    // 3. Analysis.
    let analyzer = AnalyzerBuilder::new(loaded.log, config)
        .parallel(parallel)
        .calendar(calendar)
        .build()
        .context("configuring analyzer")?;
    let mut aggregator = ReportAggregator::new();
    analyzer.run(&mut aggregator);
    let report = aggregator.finish(&analyzer.log);

    // 4. Console summary.
    let s = &report.summary;
    println!();
    println!(
        "Transitions: {} kinds, {} instances",
        s.num_transitions, s.num_transition_instances
    );
    println!(
        "Processing {:.0}s, waiting {:.0}s, CTE {}",
        as_secs_f64(s.total_processing_time),
        as_secs_f64(s.totals.total),
        fmt_ratio(s.process_cte)
    );
    for cause in Cause::ALL {
        println!(
            "  {:<15} {:>8.0}s  → CTE {}",
            cause.as_str(),
            as_secs_f64(s.totals.get(cause)),
            fmt_ratio(s.cte_impact_by_cause.get(cause))
        );
    }
    println!();
    for row in &report.rows {
        println!(
            "  {} ({}) → {} ({}) ×{}: {}",
            row.key.source_activity,
            row.key.source_resource,
            row.key.destination_activity,
            row.key.destination_resource,
            row.frequency,
            row.breakdown
        );
    }

    // 5. Report files.
    let dir = Path::new(OUTPUT_DIR);
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut csv = CsvReportWriter::new(dir, LOG_STEM)?;
    csv.write_report(&report)?;
    csv.finish()?;

    let mut json = JsonReportWriter::new(dir, LOG_STEM);
    json.write_report(&report)?;
    json.finish()?;

    info!(
        csv = %csv.path().display(),
        json = %json.transitions_path().display(),
        cte_impact = %json.cte_impact_path().display(),
        "reports written"
    );
    println!();
    println!("Done in {:.1} ms", started.elapsed().as_secs_f64() * 1_000.0);
    Ok(())
}

fn fmt_ratio(r: Option<f64>) -> String {
    r.map(|v| format!("{v:.3}")).unwrap_or_else(|| "n/a".into())
}
