//! `wta-core`: foundational types for the waiting-time analysis workspace.
//!
//! This crate is a dependency of every other `wta-*` crate.  It has no
//! `wta-*` dependencies.
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `InstanceId`, `CaseIndex`                                 |
//! | [`time`]        | `Timestamp`, timestamp parsing, day/duration helpers      |
//! | [`interval`]    | `Interval`, `TimePoint`, subtract / intersect / merge     |
//! | [`config`]      | `LogIds` (column mapping), `AnalysisConfig`               |
//! | [`error`]       | `CoreError`, `CoreResult`                                 |

pub mod config;
pub mod error;
pub mod ids;
pub mod interval;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{AnalysisConfig, LogIds};
pub use error::{CoreError, CoreResult};
pub use ids::{CaseIndex, InstanceId};
pub use interval::{duration_sum, intersect, merge_overlaps, subtract, Interval, TimeInterval, TimePoint};
pub use time::Timestamp;
