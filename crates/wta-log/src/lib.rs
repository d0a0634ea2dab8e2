//! `wta-log`: event logs, their inputs, and transition identification.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                       |
//! |-----------------|----------------------------------------------------------------|
//! | [`instance`]    | `ActivityInstance`                                             |
//! | [`log`]         | `EventLog`, `Case`, `EventLogBuilder`, `InstanceRecord`, `LoadedLog` |
//! | [`loader`]      | `load_log_csv`, `load_log_reader`                              |
//! | [`batch`]       | `BatchAnnotation(s)`, `load_batches_csv`, `load_batches_reader` |
//! | [`concurrency`] | `ParallelActivities`, `load_parallel_json`, `load_parallel_reader` |
//! | [`transition`]  | `Transition`, `identify_transitions`, `nearest_predecessor`    |
//! | [`enablement`]  | enabled-time and batch-enabled-time estimation                 |
//! | [`error`]       | `LogError`, `LogResult<T>`                                     |
//!
//! # Loading pipeline (summary)
//!
//! ```text
//! CSV ──load_log_reader──▶ EventLogBuilder ──.parallel().batches().build()──▶ LoadedLog
//!                           (bad cases marked)   (annotations merged, enabled
//!                                                 times estimated, indexed)
//! ```

pub mod batch;
pub mod concurrency;
pub mod enablement;
pub mod error;
pub mod instance;
pub mod loader;
pub mod log;
pub mod transition;


pub use batch::{load_batches_csv, load_batches_reader, BatchAnnotation, BatchAnnotations};
pub use concurrency::{load_parallel_json, load_parallel_reader, ParallelActivities};
pub use error::{LogError, LogResult};
pub use instance::ActivityInstance;
pub use loader::{load_log_csv, load_log_reader};
pub use log::{Case, EventLog, EventLogBuilder, InstanceRecord, LoadedLog, SkippedCase};
pub use transition::{identify_transitions, nearest_predecessor, Transition};
