//! Parallel-activity relation.
//!
//! Which activities may run concurrently within a case is discovered by an
//! external concurrency oracle; this module only stores and queries the
//! result.  The relation is symmetric: inserting `A ∥ B` also records
//! `B ∥ A`.
//!
//! # JSON format
//!
//! ```json
//! { "Check credit": ["Check stock"], "Check stock": ["Check credit", "Notify"] }
//! ```

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::LogResult;

/// Symmetric `activity ↔ activity` concurrency relation.
#[derive(Clone, Debug, Default)]
pub struct ParallelActivities {
    relation: FxHashMap<String, FxHashSet<String>>,
}

impl ParallelActivities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `a` and `b` may run concurrently.
    pub fn insert_pair(&mut self, a: &str, b: &str) {
        self.relation.entry(a.to_owned()).or_default().insert(b.to_owned());
        self.relation.entry(b.to_owned()).or_default().insert(a.to_owned());
    }

    #[inline]
    pub fn are_parallel(&self, a: &str, b: &str) -> bool {
        self.relation.get(a).is_some_and(|set| set.contains(b))
    }

    /// Activities that may run concurrently with `activity`.
    pub fn parallel_to(&self, activity: &str) -> impl Iterator<Item = &str> {
        self.relation.get(activity).into_iter().flatten().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.relation.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<(S, S)> for ParallelActivities {
    fn from_iter<I: IntoIterator<Item = (S, S)>>(pairs: I) -> Self {
        let mut out = Self::new();
        for (a, b) in pairs {
            out.insert_pair(a.as_ref(), b.as_ref());
        }
        out
    }
}

/// Load a [`ParallelActivities`] relation from a JSON file.
pub fn load_parallel_json(path: &Path) -> LogResult<ParallelActivities> {
    let file = std::fs::File::open(path)?;
    load_parallel_reader(file)
}

/// Like [`load_parallel_json`] but accepts any `Read` source.
pub fn load_parallel_reader<R: Read>(reader: R) -> LogResult<ParallelActivities> {
    let raw: BTreeMap<String, Vec<String>> = serde_json::from_reader(reader)?;
    Ok(raw
        .iter()
        .flat_map(|(a, others)| others.iter().map(move |b| (a.as_str(), b.as_str())))
        .collect())
}
