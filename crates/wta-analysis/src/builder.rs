//! Fluent builder for constructing an [`Analyzer`].

use tracing::debug;

use wta_calendar::ResourceCalendar;
use wta_core::AnalysisConfig;
use wta_log::{EventLog, ParallelActivities};

use crate::runner::CancelToken;
use crate::{AnalysisError, AnalysisResult, Analyzer};

/// Fluent builder for [`Analyzer`].
///
/// # Required inputs
///
/// - [`EventLog`], from [`wta_log::EventLogBuilder`]
/// - [`AnalysisConfig`]: thread count, calendar keying, sentinels, …
///
/// # Optional inputs (have defaults)
///
/// | Method             | Default                                     |
/// |--------------------|---------------------------------------------|
/// | `.parallel(p)`     | empty relation (nothing runs concurrently)  |
/// | `.calendar(c)`     | empty calendar (every resource available)   |
/// | `.cancel_token(t)` | a fresh token                               |
///
/// # Example
///
/// ```rust,ignore
/// let analyzer = AnalyzerBuilder::new(log, config)
///     .parallel(parallel)
///     .calendar(calendar)
///     .build()?;
/// let output = analyzer.run(&mut NoopObserver);
/// ```
pub struct AnalyzerBuilder {
    log:      EventLog,
    config:   AnalysisConfig,
    parallel: Option<ParallelActivities>,
    calendar: Option<ResourceCalendar>,
    cancel:   Option<CancelToken>,
}

impl AnalyzerBuilder {
    pub fn new(log: EventLog, config: AnalysisConfig) -> Self {
        Self { log, config, parallel: None, calendar: None, cancel: None }
    }

    /// Parallel-activity relation used for transition identification.
    pub fn parallel(mut self, parallel: ParallelActivities) -> Self {
        self.parallel = Some(parallel);
        self
    }

    /// Working-hour calendar used by the unavailability detector.
    ///
    /// Keys are resource names, or
    /// [`UNDIFFERENTIATED_POOL`](wta_calendar::UNDIFFERENTIATED_POOL) when
    /// `config.differentiated_calendars` is `false`.
    pub fn calendar(mut self, calendar: ResourceCalendar) -> Self {
        self.calendar = Some(calendar);
        self
    }

    /// Share an existing cancellation token.
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Validate the configuration and return a ready-to-run [`Analyzer`].
    pub fn build(self) -> AnalysisResult<Analyzer> {
        if self.config.num_threads == Some(0) {
            return Err(AnalysisError::Config("num_threads must be at least 1".into()));
        }

        let calendar = self.calendar.unwrap_or_default();
        if calendar.is_empty() {
            debug!("no resource calendar; unavailability will be zero");
        }

        #[cfg(feature = "parallel")]
        let pool = {
            let mut pool = rayon::ThreadPoolBuilder::new();
            if let Some(n) = self.config.num_threads {
                pool = pool.num_threads(n);
            }
            pool.build().map_err(|e| AnalysisError::ThreadPool(e.to_string()))?
        };

        if cfg!(not(feature = "parallel")) && self.config.num_threads.is_some_and(|n| n > 1) {
            debug!("built without the `parallel` feature; cases run sequentially");
        }

        Ok(Analyzer {
            log: self.log,
            parallel: self.parallel.unwrap_or_default(),
            calendar,
            config: self.config,
            cancel: self.cancel.unwrap_or_default(),
            #[cfg(feature = "parallel")]
            pool,
        })
    }
}
