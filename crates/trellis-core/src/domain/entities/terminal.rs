//! Terminal entity.

use crate::TerminalId;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Status reported for a terminal that has not been heard from in time.
pub const TERMINAL_STATUS_OFFLINE: &str = "offline";

/// Default heartbeat timeout in seconds.
pub const DEFAULT_TERMINAL_TIMEOUT_SECS: i32 = 60;

/// A terminal and the last status it reported.
///
/// The stored `status` is only trusted while the terminal is within its
/// `timeout` window; see [`Terminal::effective_status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terminal {
    /// Unique identifier.
    pub id: TerminalId,

    /// Last reported status, free-form.
    pub status: String,

    /// Heartbeat timeout in seconds.
    pub timeout: i32,

    /// When the status was last written.
    pub last_updated: DateTime<Utc>,
}

impl Terminal {
    /// Creates an offline terminal with the default timeout.
    #[must_use]
    pub fn new(id: TerminalId) -> Self {
        Self {
            id,
            status: TERMINAL_STATUS_OFFLINE.to_string(),
            timeout: DEFAULT_TERMINAL_TIMEOUT_SECS,
            last_updated: Utc::now(),
        }
    }

    /// Returns the timeout as a duration.
    #[must_use]
    pub fn timeout_duration(&self) -> Duration {
        Duration::seconds(i64::from(self.timeout))
    }

    /// Checks whether more than `timeout` has passed since the last update.
    #[must_use]
    pub fn is_timed_out(&self, now: DateTime<Utc>) -> bool {
        now - self.last_updated > self.timeout_duration()
    }

    /// Returns the stored status, or `"offline"` once the terminal timed out.
    #[must_use]
    pub fn effective_status(&self, now: DateTime<Utc>) -> &str {
        if self.is_timed_out(now) {
            TERMINAL_STATUS_OFFLINE
        } else {
            &self.status
        }
    }
}
