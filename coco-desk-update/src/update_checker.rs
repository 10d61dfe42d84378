//! Update check bookkeeping.
//!
//! The actual fetch is done by whoever answers `check_update` (the native
//! shell, or [`crate::ReleaseFeed`] when running headless). This module keeps
//! the pieces that do not depend on where the answer comes from: the
//! single-flight guard, the last result, and skip-version evaluation.

use crate::error::UpdateError;
use crate::info::UpdateInfo;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Result of an update check
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateCheckResult {
    /// No update available
    UpToDate,
    /// A new version is available and should be offered
    UpdateAvailable(UpdateInfo),
    /// A new version is available but the user skipped it
    SkippedVersion(UpdateInfo),
    /// Another check was already running; nothing was done
    InProgress,
    /// The check failed
    Error(UpdateError),
}

impl UpdateCheckResult {
    /// Classify a fetched release against the user's skip marker.
    pub fn from_fetch(info: Option<UpdateInfo>, skipped_version: Option<&str>) -> Self {
        match info {
            None => Self::UpToDate,
            Some(info) if is_skipped(skipped_version, &info.version) => Self::SkippedVersion(info),
            Some(info) => Self::UpdateAvailable(info),
        }
    }
}

/// Whether `version` is the one the user chose to skip.
///
/// A leading `v` on either side is ignored, so a skip of `1.2.0` also hides
/// a release tagged `v1.2.0`.
pub fn is_skipped(skipped_version: Option<&str>, version: &str) -> bool {
    let Some(skipped) = skipped_version else {
        return false;
    };
    let bare = |s: &str| s.strip_prefix('v').unwrap_or(s).to_string();
    skipped == version || bare(skipped) == bare(version)
}

/// Single-flight guard plus the last result, shared for UI access.
#[derive(Debug, Default)]
pub struct UpdateChecker {
    last_result: Mutex<Option<UpdateCheckResult>>,
    check_in_progress: AtomicBool,
}

/// Held while a check runs; releases the in-flight flag on drop.
#[derive(Debug)]
pub struct CheckGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for CheckGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl UpdateChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the in-flight slot, or `None` if a check is already running.
    pub fn try_begin(&self) -> Option<CheckGuard<'_>> {
        self.check_in_progress
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| CheckGuard {
                flag: &self.check_in_progress,
            })
    }

    pub fn is_checking(&self) -> bool {
        self.check_in_progress.load(Ordering::SeqCst)
    }

    pub fn record(&self, result: UpdateCheckResult) {
        *self.last_result.lock() = Some(result);
    }

    pub fn last_result(&self) -> Option<UpdateCheckResult> {
        self.last_result.lock().clone()
    }
}

/// Get the current timestamp in RFC 3339 format
pub fn current_timestamp() -> String {
    Utc::now().to_rfc3339()
}

/// Format a timestamp for display
pub fn format_timestamp(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => timestamp.to_string(),
    }
}
