//! Default value functions for persisted settings.
//!
//! Used as `#[serde(default = "crate::defaults::...")]` attributes so that a
//! state file written by an older build (missing newer fields) still loads.

use crate::types::{ModifierKey, UpdateCheckFrequency};

// ── Primitive helpers ──────────────────────────────────────────────────────

pub fn bool_false() -> bool {
    false
}

// ── Appearance ─────────────────────────────────────────────────────────────

/// Window background opacity in percent.
pub const OPACITY: u8 = 30;

pub fn opacity() -> u8 {
    OPACITY
}

// ── Shortcuts ──────────────────────────────────────────────────────────────

pub fn modifier_key() -> ModifierKey {
    #[cfg(target_os = "macos")]
    {
        ModifierKey::Meta
    }
    #[cfg(not(target_os = "macos"))]
    {
        ModifierKey::Ctrl
    }
}

pub fn mode_switch() -> String {
    "T".to_string()
}

pub fn return_to_input() -> String {
    "I".to_string()
}

pub fn voice_input() -> String {
    "K".to_string()
}

pub fn add_file() -> String {
    "A".to_string()
}

pub fn deep_thinking() -> String {
    "D".to_string()
}

pub fn internet_search() -> String {
    "G".to_string()
}

pub fn internet_search_scope() -> String {
    "J".to_string()
}

pub fn mcp_search() -> String {
    "B".to_string()
}

pub fn mcp_search_scope() -> String {
    "L".to_string()
}

pub fn historical_records() -> String {
    "Y".to_string()
}

pub fn ai_assistant() -> String {
    "U".to_string()
}

pub fn new_session() -> String {
    "N".to_string()
}

pub fn fixed_window() -> String {
    "P".to_string()
}

pub fn service_list() -> String {
    "S".to_string()
}

pub fn external() -> String {
    "E".to_string()
}

// ── Update ─────────────────────────────────────────────────────────────────

pub fn update_check_frequency() -> UpdateCheckFrequency {
    UpdateCheckFrequency::Daily
}
