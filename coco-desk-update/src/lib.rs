//! Update checks for the coco-desk launcher.
//!
//! Provides:
//! - `info`: release metadata forwarded from the shell
//! - `update_checker`: single-flight guard, last result, skip-version evaluation
//! - `schedule`: background check timing from the update settings
//! - `release_feed`: the `.latest.json` release feed client
//! - `http`: HTTPS agent and host allowlist

pub mod error;
pub mod http;
pub mod info;
pub mod release_feed;
pub mod schedule;
pub mod update_checker;

pub use error::UpdateError;
pub use info::UpdateInfo;
pub use release_feed::{ReleaseFeed, UpdateChannel};
pub use schedule::UpdateSchedule;
pub use update_checker::{
    CheckGuard, UpdateCheckResult, UpdateChecker, current_timestamp, format_timestamp, is_skipped,
};
