use crate::types::UpdateCheckFrequency;
use serde::{Deserialize, Serialize};

/// Configuration for automatic update checking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateConfig {
    /// How often to check for new releases in the background
    /// - never: Disable automatic update checks
    /// - daily: Check once per day (default)
    /// - weekly: Check once per week
    /// - monthly: Check once per month
    #[serde(default = "crate::defaults::update_check_frequency")]
    pub update_check_frequency: UpdateCheckFrequency,

    /// RFC 3339 timestamp of the last successful update check (auto-managed)
    #[serde(default)]
    pub last_update_check: Option<String>,

    /// Version that user chose to skip prompts for
    #[serde(default)]
    pub skipped_version: Option<String>,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            update_check_frequency: crate::defaults::update_check_frequency(),
            last_update_check: None,
            skipped_version: None,
        }
    }
}

impl UpdateConfig {
    /// Set or clear the skip marker. Returns true if it changed.
    pub fn set_skipped_version(&mut self, version: Option<String>) -> bool {
        if self.skipped_version == version {
            return false;
        }
        self.skipped_version = version;
        true
    }
}
