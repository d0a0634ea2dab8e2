//! Batch annotations.
//!
//! Batch discovery runs outside this workspace.  Its output is a table of
//! `(case, activity, start) → (batch id, batch enabled time)` rows that the
//! [`EventLogBuilder`](crate::EventLogBuilder) merges into matching activity
//! instances.
//!
//! # CSV format
//!
//! Column names follow the [`LogIds`] mapping:
//!
//! ```csv
//! case:concept:name,concept:name,start_timestamp,batch_instance_id,batch_instance_enabled
//! 7,Approve,2022-04-25 10:00:00,b1,2022-04-25 09:30:00
//! 8,Approve,2022-04-25 10:05:00,b1,
//! ```
//!
//! The batch-enabled column is optional; empty cells are derived later from
//! the batch members' enabled times.

use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashMap;
use tracing::warn;

use wta_core::time::{parse_optional_timestamp, parse_timestamp};
use wta_core::{LogIds, Timestamp};

use crate::loader::{flexible_reader, HeaderIndex};
use crate::LogResult;

/// Annotation matched to an instance by `(case_id, activity, start)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchAnnotation {
    pub case_id:       String,
    pub activity:      String,
    pub start:         Timestamp,
    pub batch_id:      String,
    pub batch_enabled: Option<Timestamp>,
}

type AnnotationKey = (String, String, Timestamp);

/// Batch annotations keyed for instance matching.
#[derive(Clone, Debug, Default)]
pub struct BatchAnnotations {
    by_key:          FxHashMap<AnnotationKey, BatchAnnotation>,
    /// Rows dropped while loading because a cell could not be read.
    pub rejected_rows: usize,
}

impl BatchAnnotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an annotation, replacing any earlier one for the same key.
    pub fn insert(&mut self, annotation: BatchAnnotation) {
        let key = (annotation.case_id.clone(), annotation.activity.clone(), annotation.start);
        self.by_key.insert(key, annotation);
    }

    pub fn get(&self, case_id: &str, activity: &str, start: Timestamp) -> Option<&BatchAnnotation> {
        self.by_key.get(&(case_id.to_owned(), activity.to_owned(), start))
    }

    pub fn iter(&self) -> impl Iterator<Item = &BatchAnnotation> {
        self.by_key.values()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

impl FromIterator<BatchAnnotation> for BatchAnnotations {
    fn from_iter<I: IntoIterator<Item = BatchAnnotation>>(iter: I) -> Self {
        let mut out = Self::new();
        for a in iter {
            out.insert(a);
        }
        out
    }
}

// ── CSV loading ───────────────────────────────────────────────────────────────

/// Load batch annotations from a CSV file.
pub fn load_batches_csv(path: &Path, ids: &LogIds) -> LogResult<BatchAnnotations> {
    let file = std::fs::File::open(path)?;
    load_batches_reader(file, ids)
}

/// Like [`load_batches_csv`] but accepts any `Read` source.
///
/// A missing key column is fatal.  Truncated rows and rows whose cells
/// cannot be read are counted in `rejected_rows` with a warning.  Rows with
/// an empty batch id are ignored.
pub fn load_batches_reader<R: Read>(reader: R, ids: &LogIds) -> LogResult<BatchAnnotations> {
    let mut csv_reader = flexible_reader(reader);
    let header = HeaderIndex::new(csv_reader.headers()?);

    let case_col = header.require(&ids.case)?;
    let activity_col = header.require(&ids.activity)?;
    let start_col = header.require(&ids.start_time)?;
    let batch_col = header.require(&ids.batch_id)?;
    let enabled_col = header.optional(&ids.batch_enabled_time);
    let key_width = [case_col, activity_col, start_col, batch_col].into_iter().max().unwrap_or(0) + 1;

    let mut out = BatchAnnotations::new();
    for (line, record) in csv_reader.records().enumerate() {
        let record = record?;
        if record.len() < key_width {
            warn!(row = line + 2, fields = record.len(), "skipping truncated batch annotation");
            out.rejected_rows += 1;
            continue;
        }
        let cell = |col: usize| record.get(col).unwrap_or("").trim();

        let batch_id = cell(batch_col);
        if batch_id.is_empty() {
            continue;
        }
        let parsed = parse_timestamp(cell(start_col)).and_then(|start| {
            let enabled = match enabled_col {
                Some(col) => parse_optional_timestamp(cell(col))?,
                None => None,
            };
            Ok((start, enabled))
        });
        match parsed {
            Ok((start, batch_enabled)) => out.insert(BatchAnnotation {
                case_id: cell(case_col).to_owned(),
                activity: cell(activity_col).to_owned(),
                start,
                batch_id: batch_id.to_owned(),
                batch_enabled,
            }),
            Err(e) => {
                warn!(row = line + 2, error = %e, "skipping unreadable batch annotation");
                out.rejected_rows += 1;
            }
        }
    }
    Ok(out)
}
