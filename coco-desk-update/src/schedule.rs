//! When to run background update checks.

use chrono::{DateTime, Utc};
use coco_desk_config::{UpdateCheckFrequency, UpdateConfig};
use std::time::Duration;

/// How often the scheduler wakes up to ask [`UpdateSchedule::should_check`].
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Copy)]
pub struct UpdateSchedule {
    poll_interval: Duration,
}

impl Default for UpdateSchedule {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl UpdateSchedule {
    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Check if a background check is due based on the update settings.
    pub fn should_check(&self, config: &UpdateConfig, now: DateTime<Utc>) -> bool {
        if config.update_check_frequency == UpdateCheckFrequency::Never {
            return false;
        }
        let Some(check_interval_secs) = config.update_check_frequency.as_seconds() else {
            return false;
        };

        let Some(ref last_check_str) = config.last_update_check else {
            return true;
        };
        // Unreadable timestamp: treat as never checked
        let Ok(last_check) = DateTime::parse_from_rfc3339(last_check_str) else {
            return true;
        };

        let elapsed = now.signed_duration_since(last_check.with_timezone(&Utc));
        elapsed.num_seconds() >= check_interval_secs as i64
    }

    /// Like [`should_check`](Self::should_check), but a failed attempt also
    /// counts: after a failure the next try waits a full frequency period.
    pub fn is_due(
        &self,
        config: &UpdateConfig,
        last_failure: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> bool {
        if !self.should_check(config, now) {
            return false;
        }
        let Some(check_interval_secs) = config.update_check_frequency.as_seconds() else {
            return false;
        };
        last_failure.is_none_or(|failed_at| {
            now.signed_duration_since(failed_at).num_seconds() >= check_interval_secs as i64
        })
    }
}
