//! Shortcut settings: the modifier key and the action letters it arms.

use crate::defaults;
use crate::types::ModifierKey;
use serde::{Deserialize, Serialize};

/// Persisted shortcut subset.
///
/// Every field here survives a restart. Live key state (is the modifier
/// currently held, is a popover open) is deliberately not part of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutConfig {
    /// Key that arms the shortcut overlay while held
    #[serde(default = "crate::defaults::modifier_key")]
    pub modifier_key: ModifierKey,

    /// Switch between search and chat mode
    #[serde(default = "crate::defaults::mode_switch")]
    pub mode_switch: String,

    #[serde(default = "crate::defaults::return_to_input")]
    pub return_to_input: String,

    #[serde(default = "crate::defaults::voice_input")]
    pub voice_input: String,

    #[serde(default = "crate::defaults::add_file")]
    pub add_file: String,

    #[serde(default = "crate::defaults::deep_thinking")]
    pub deep_thinking: String,

    #[serde(default = "crate::defaults::internet_search")]
    pub internet_search: String,

    #[serde(default = "crate::defaults::internet_search_scope")]
    pub internet_search_scope: String,

    #[serde(default = "crate::defaults::mcp_search")]
    pub mcp_search: String,

    #[serde(default = "crate::defaults::mcp_search_scope")]
    pub mcp_search_scope: String,

    #[serde(default = "crate::defaults::historical_records")]
    pub historical_records: String,

    #[serde(default = "crate::defaults::ai_assistant")]
    pub ai_assistant: String,

    #[serde(default = "crate::defaults::new_session")]
    pub new_session: String,

    /// Pin the window so blur no longer hides it
    #[serde(default = "crate::defaults::fixed_window")]
    pub fixed_window: String,

    #[serde(default = "crate::defaults::service_list")]
    pub service_list: String,

    #[serde(default = "crate::defaults::external")]
    pub external: String,

    /// Set once the legacy `F` pin shortcut has been migrated
    #[serde(default = "crate::defaults::bool_false")]
    pub reset_fixed_window: bool,
}

impl Default for ShortcutConfig {
    fn default() -> Self {
        Self {
            modifier_key: defaults::modifier_key(),
            mode_switch: defaults::mode_switch(),
            return_to_input: defaults::return_to_input(),
            voice_input: defaults::voice_input(),
            add_file: defaults::add_file(),
            deep_thinking: defaults::deep_thinking(),
            internet_search: defaults::internet_search(),
            internet_search_scope: defaults::internet_search_scope(),
            mcp_search: defaults::mcp_search(),
            mcp_search_scope: defaults::mcp_search_scope(),
            historical_records: defaults::historical_records(),
            ai_assistant: defaults::ai_assistant(),
            new_session: defaults::new_session(),
            fixed_window: defaults::fixed_window(),
            service_list: defaults::service_list(),
            external: defaults::external(),
            reset_fixed_window: false,
        }
    }
}

impl ShortcutConfig {
    /// Change the modifier key. Returns true if it changed.
    pub fn set_modifier_key(&mut self, modifier_key: ModifierKey) -> bool {
        if self.modifier_key == modifier_key {
            return false;
        }
        self.modifier_key = modifier_key;
        true
    }

    /// One-time migration of the pin shortcut from `F` to `P`.
    ///
    /// Older builds bound "pin window" to `F`, which now belongs to search.
    /// Runs at most once per settings file; returns true if anything changed.
    pub fn migrate_fixed_window(&mut self) -> bool {
        if self.reset_fixed_window {
            return false;
        }
        if self.fixed_window == "F" {
            log::info!("Migrating pin-window shortcut from F to P");
            self.fixed_window = defaults::fixed_window();
        }
        self.reset_fixed_window = true;
        true
    }

    /// All action letters with the field they come from, in display order.
    pub fn action_letters(&self) -> [(&'static str, &str); 15] {
        [
            ("mode_switch", self.mode_switch.as_str()),
            ("return_to_input", self.return_to_input.as_str()),
            ("voice_input", self.voice_input.as_str()),
            ("add_file", self.add_file.as_str()),
            ("deep_thinking", self.deep_thinking.as_str()),
            ("internet_search", self.internet_search.as_str()),
            ("internet_search_scope", self.internet_search_scope.as_str()),
            ("mcp_search", self.mcp_search.as_str()),
            ("mcp_search_scope", self.mcp_search_scope.as_str()),
            ("historical_records", self.historical_records.as_str()),
            ("ai_assistant", self.ai_assistant.as_str()),
            ("new_session", self.new_session.as_str()),
            ("fixed_window", self.fixed_window.as_str()),
            ("service_list", self.service_list.as_str()),
            ("external", self.external.as_str()),
        ]
    }
}
