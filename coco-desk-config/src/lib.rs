//! Persisted settings for the coco-desk launcher window.
//!
//! This crate owns everything that survives a restart:
//!
//! - Appearance settings (window opacity, snapshot update channel)
//! - Shortcut settings (modifier key and the action letters)
//! - Update settings (skipped version, check frequency, last check)
//! - YAML state-file persistence with atomic writes
//! - Default values and typed config errors
//!
//! Runtime-only state (window focus, key presses, pending update prompts)
//! lives in the `coco-desk` crate and is never written here.

pub mod appearance;
pub mod defaults;
pub mod error;
pub mod persistence;
pub mod shortcuts;
mod types;
pub mod update;

pub use appearance::AppearanceConfig;
pub use error::ConfigError;
pub use persistence::{StateFile, config_dir};
pub use shortcuts::ShortcutConfig;
pub use types::{ModifierKey, UpdateCheckFrequency};
pub use update::UpdateConfig;
