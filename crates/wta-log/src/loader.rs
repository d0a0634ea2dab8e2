//! CSV event-log loader.
//!
//! # CSV format
//!
//! One row per activity instance.  Column names come from [`LogIds`]; extra
//! columns are ignored.
//!
//! ```csv
//! case:concept:name,concept:name,org:resource,enabled_timestamp,start_timestamp,time:timestamp
//! 1,Register,Ann,2022-04-25 08:00:00,2022-04-25 08:00:00,2022-04-25 08:20:00
//! 1,Approve,Bob,2022-04-25 08:20:00,2022-04-25 09:10:00,2022-04-25 09:30:00
//! ```
//!
//! | Column             | Required | Notes                                     |
//! |--------------------|----------|-------------------------------------------|
//! | case               | yes      |                                           |
//! | activity           | yes      |                                           |
//! | resource           | yes      |                                           |
//! | start_time         | yes      |                                           |
//! | end_time           | yes      |                                           |
//! | enabled_time       | no       | estimated when absent or empty            |
//! | batch_id           | no       | empty cell = not batched                  |
//! | batch_enabled_time | no       | derived from the batch when empty         |
//!
//! A required column missing from the header fails the load.  A row with an
//! empty required cell or an unreadable timestamp excludes its whole case.

use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::debug;

use wta_core::time::{parse_optional_timestamp, parse_timestamp};
use wta_core::LogIds;

use crate::log::{EventLogBuilder, InstanceRecord};
use crate::{LogError, LogResult};

// ── Header lookup ─────────────────────────────────────────────────────────────

/// Column positions by name.
pub(crate) struct HeaderIndex {
    names: Vec<String>,
}

/// CSV reader that accepts rows of any length.  Short rows read as empty
/// cells and are rejected row by row instead of failing the whole load.
pub(crate) fn flexible_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().flexible(true).from_reader(reader)
}

impl HeaderIndex {
    pub(crate) fn new(header: &StringRecord) -> Self {
        Self { names: header.iter().map(|h| h.trim().to_owned()).collect() }
    }

    pub(crate) fn optional(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|h| h == name)
    }

    pub(crate) fn require(&self, name: &str) -> LogResult<usize> {
        self.optional(name).ok_or_else(|| LogError::MissingColumn(name.to_owned()))
    }
}

struct Columns {
    case:          usize,
    activity:      usize,
    resource:      usize,
    start:         usize,
    end:           usize,
    enabled:       Option<usize>,
    batch_id:      Option<usize>,
    batch_enabled: Option<usize>,
}

impl Columns {
    fn resolve(header: &HeaderIndex, ids: &LogIds) -> LogResult<Self> {
        Ok(Self {
            case:          header.require(&ids.case)?,
            activity:      header.require(&ids.activity)?,
            resource:      header.require(&ids.resource)?,
            start:         header.require(&ids.start_time)?,
            end:           header.require(&ids.end_time)?,
            enabled:       header.optional(&ids.enabled_time),
            batch_id:      header.optional(&ids.batch_id),
            batch_enabled: header.optional(&ids.batch_enabled_time),
        })
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Read an event log from a CSV file into an [`EventLogBuilder`].
///
/// Cases with unreadable rows are already marked as skipped on the returned
/// builder; finish with [`EventLogBuilder::build`].
pub fn load_log_csv(path: &Path, ids: &LogIds) -> LogResult<EventLogBuilder> {
    let file = std::fs::File::open(path)?;
    load_log_reader(file, ids)
}

/// Like [`load_log_csv`] but accepts any `Read` source.
pub fn load_log_reader<R: Read>(reader: R, ids: &LogIds) -> LogResult<EventLogBuilder> {
    let mut csv_reader = flexible_reader(reader);
    let header = HeaderIndex::new(csv_reader.headers()?);
    let cols = Columns::resolve(&header, ids)?;

    let mut builder = EventLogBuilder::new();
    let mut rows = 0usize;
    for record in csv_reader.records() {
        let record = record?;
        rows += 1;
        let case_id = cell(&record, cols.case).to_owned();
        match parse_row(&record, &cols, &case_id) {
            Ok(rec) => {
                builder.record(rec);
            }
            Err(reason) => {
                // Line numbers count the header as line 1.
                builder.skip_case(&case_id, format!("line {}: {reason}", rows + 1));
            }
        }
    }

    debug!(rows, "read event log rows");
    Ok(builder)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn cell(record: &StringRecord, col: usize) -> &str {
    record.get(col).unwrap_or("").trim()
}

fn required<'r>(record: &'r StringRecord, col: usize, what: &str) -> Result<&'r str, String> {
    match cell(record, col) {
        "" => Err(format!("missing {what}")),
        v => Ok(v),
    }
}

fn parse_row(record: &StringRecord, cols: &Columns, case_id: &str) -> Result<InstanceRecord, String> {
    if case_id.is_empty() {
        return Err("missing case id".into());
    }
    let activity = required(record, cols.activity, "activity")?;
    let resource = required(record, cols.resource, "resource")?;
    let start = parse_timestamp(required(record, cols.start, "start time")?).map_err(|e| e.to_string())?;
    let end = parse_timestamp(required(record, cols.end, "end time")?).map_err(|e| e.to_string())?;
    if start > end {
        return Err(format!("{activity:?} starts after it ends"));
    }

    let optional_time = |col: Option<usize>| -> Result<_, String> {
        match col {
            Some(c) => parse_optional_timestamp(cell(record, c)).map_err(|e| e.to_string()),
            None => Ok(None),
        }
    };
    let enabled = optional_time(cols.enabled)?;
    let batch_enabled = optional_time(cols.batch_enabled)?;
    let batch_id = cols
        .batch_id
        .map(|c| cell(record, c))
        .filter(|v| !v.is_empty() && *v != "nan")
        .map(str::to_owned);

    Ok(InstanceRecord {
        case_id: case_id.to_owned(),
        activity: activity.to_owned(),
        resource: resource.to_owned(),
        start,
        end,
        enabled,
        batch_id,
        batch_enabled,
    })
}
