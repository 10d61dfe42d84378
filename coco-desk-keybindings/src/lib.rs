//! Keyboard handling for the coco-desk launcher window.
//!
//! Features:
//! - Key combination parsing (`CmdOrCtrl+Shift+B`, `Alt+[KeyZ]`, ...)
//! - Logical and physical-position matching of key events
//! - Matching of the configurable shortcut modifier key
//! - Registry resolving action letters to [`ShortcutAction`]s

mod event;
mod matcher;
mod modifier;
pub mod parser;
pub mod platform;

pub use event::KeyEvent;
pub use matcher::KeybindingMatcher;
pub use modifier::{is_modifier_event, is_modifier_held};
pub use parser::{KeyCombo, ParseError, ParsedKey, parse_key_combo};

pub use winit::event::ElementState;
pub use winit::keyboard::{Key, KeyCode, ModifiersState, NamedKey, PhysicalKey};

use coco_desk_config::ShortcutConfig;
use std::fmt;

/// Something the user can trigger by holding the modifier and pressing a letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutAction {
    ModeSwitch,
    ReturnToInput,
    VoiceInput,
    AddFile,
    DeepThinking,
    InternetSearch,
    InternetSearchScope,
    McpSearch,
    McpSearchScope,
    HistoricalRecords,
    AiAssistant,
    NewSession,
    FixedWindow,
    ServiceList,
    External,
}

impl ShortcutAction {
    /// Look up an action by its `shortcuts.yaml` field name.
    pub fn from_field(field: &str) -> Option<Self> {
        let action = match field {
            "mode_switch" => Self::ModeSwitch,
            "return_to_input" => Self::ReturnToInput,
            "voice_input" => Self::VoiceInput,
            "add_file" => Self::AddFile,
            "deep_thinking" => Self::DeepThinking,
            "internet_search" => Self::InternetSearch,
            "internet_search_scope" => Self::InternetSearchScope,
            "mcp_search" => Self::McpSearch,
            "mcp_search_scope" => Self::McpSearchScope,
            "historical_records" => Self::HistoricalRecords,
            "ai_assistant" => Self::AiAssistant,
            "new_session" => Self::NewSession,
            "fixed_window" => Self::FixedWindow,
            "service_list" => Self::ServiceList,
            "external" => Self::External,
            _ => return None,
        };
        Some(action)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ModeSwitch => "mode_switch",
            Self::ReturnToInput => "return_to_input",
            Self::VoiceInput => "voice_input",
            Self::AddFile => "add_file",
            Self::DeepThinking => "deep_thinking",
            Self::InternetSearch => "internet_search",
            Self::InternetSearchScope => "internet_search_scope",
            Self::McpSearch => "mcp_search",
            Self::McpSearchScope => "mcp_search_scope",
            Self::HistoricalRecords => "historical_records",
            Self::AiAssistant => "ai_assistant",
            Self::NewSession => "new_session",
            Self::FixedWindow => "fixed_window",
            Self::ServiceList => "service_list",
            Self::External => "external",
        }
    }
}

impl fmt::Display for ShortcutAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action letters from the shortcut settings, in display order.
///
/// Lookups return the first action bound to a key, so a letter configured
/// twice resolves to whichever comes first in the settings.
#[derive(Debug, Default)]
pub struct ShortcutRegistry {
    bindings: Vec<(ParsedKey, ShortcutAction)>,
}

impl ShortcutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from shortcut settings.
    ///
    /// Letters that do not parse as a key are logged and skipped.
    pub fn from_config(config: &ShortcutConfig) -> Self {
        let mut registry = Self::new();

        for (field, letter) in config.action_letters() {
            let Some(action) = ShortcutAction::from_field(field) else {
                continue;
            };
            match parser::parse_key(letter.trim()) {
                Ok(key) => {
                    log::debug!("Registered shortcut: {} -> {:?}", action, key);
                    registry.bindings.push((key, action));
                }
                Err(e) => {
                    log::warn!("Invalid shortcut letter '{}' for '{}': {}", letter, action, e);
                }
            }
        }

        log::info!(
            "Shortcut registry initialized with {} actions",
            registry.bindings.len()
        );
        registry
    }

    /// Resolve a key press to an action, ignoring held modifiers.
    pub fn lookup(&self, event: &KeyEvent, use_physical_keys: bool) -> Option<ShortcutAction> {
        let matcher = KeybindingMatcher::from_event(event);
        self.bindings
            .iter()
            .find(|(key, _)| matcher.key_matches(key, use_physical_keys))
            .map(|(_, action)| *action)
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }
}
