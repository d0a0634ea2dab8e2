//! Activity instances: one executed activity of one case.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use wta_core::{InstanceId, Interval, TimeInterval, Timestamp};

/// One activity execution as read from the log.
///
/// Instances are immutable once the [`EventLog`](crate::EventLog) is built.
/// `enabled ≤ start ≤ end` is expected; a log may still carry an enabled time
/// after the start (clock skew), which the analysis clamps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityInstance {
    /// Position in the log's instance table.
    pub id:            InstanceId,
    pub case_id:       String,
    pub activity:      String,
    pub resource:      String,
    pub start:         Timestamp,
    pub end:           Timestamp,
    pub enabled:       Timestamp,
    pub batch_id:      Option<String>,
    /// When the batch this instance belongs to became ready to start.
    pub batch_enabled: Option<Timestamp>,
}

impl ActivityInstance {
    /// `[start, end]`.
    #[inline]
    pub fn span(&self) -> TimeInterval {
        Interval::new(self.start, self.end)
    }

    #[inline]
    pub fn processing_time(&self) -> Duration {
        self.end - self.start
    }

    /// `start − enabled`, negative under clock skew.
    #[inline]
    pub fn raw_wait(&self) -> Duration {
        self.start - self.enabled
    }

    /// `[enabled, start]`, collapsed to `[start, start]` under clock skew.
    #[inline]
    pub fn waiting_window(&self) -> TimeInterval {
        Interval::new(self.enabled.min(self.start), self.start)
    }

    #[inline]
    pub fn is_batched(&self) -> bool {
        self.batch_id.is_some()
    }

    /// `true` if both instances carry the same batch id.
    #[inline]
    pub fn same_batch(&self, other: &Self) -> bool {
        matches!((&self.batch_id, &other.batch_id), (Some(a), Some(b)) if a == b)
    }
}
