//! Key event matching.
//!
//! Matches [`KeyEvent`]s against parsed [`KeyCombo`]s, either by the logical
//! key (character produced) or by physical key position.

use crate::event::KeyEvent;
use crate::parser::{KeyCombo, Modifiers, ParsedKey};
use crate::platform::{physical_key_matches_char, resolve_cmd_or_ctrl};
use winit::keyboard::{Key, KeyCode, NamedKey, PhysicalKey};

/// Snapshot of one key event, normalized for matching.
#[derive(Debug)]
pub struct KeybindingMatcher {
    modifiers: Modifiers,
    key: Option<MatchKey>,
    physical_key: Option<KeyCode>,
}

#[derive(Debug)]
enum MatchKey {
    Character(char),
    Named(NamedKey),
}

impl KeybindingMatcher {
    pub fn from_event(event: &KeyEvent) -> Self {
        let modifiers = Modifiers {
            ctrl: event.modifiers.control_key(),
            alt: event.modifiers.alt_key(),
            shift: event.modifiers.shift_key(),
            super_key: event.modifiers.super_key(),
            cmd_or_ctrl: false,
        };

        let key = match &event.logical_key {
            Key::Character(c) => c
                .chars()
                .next()
                .map(|ch| MatchKey::Character(ch.to_ascii_uppercase())),
            Key::Named(named) => Some(MatchKey::Named(*named)),
            _ => None,
        };

        let physical_key = match event.physical_key {
            PhysicalKey::Code(code) => Some(code),
            PhysicalKey::Unidentified(_) => None,
        };

        Self {
            modifiers,
            key,
            physical_key,
        }
    }

    /// Check if this event matches the given key combo (logical matching).
    pub fn matches(&self, combo: &KeyCombo) -> bool {
        self.matches_with_physical_preference(combo, false)
    }

    /// Check if this event matches the given combo.
    ///
    /// With `use_physical_keys`, character bindings match by key position
    /// first, so they survive non-Latin layouts.
    pub fn matches_with_physical_preference(
        &self,
        combo: &KeyCombo,
        use_physical_keys: bool,
    ) -> bool {
        self.key_matches(&combo.key, use_physical_keys) && self.modifiers_match(&combo.modifiers)
    }

    /// Key-only comparison, ignoring modifiers.
    ///
    /// Used for action letters, which fire while the shortcut modifier is
    /// held regardless of what else is down.
    pub fn key_matches(&self, key: &ParsedKey, use_physical_keys: bool) -> bool {
        let logical_char = |expected: &char| match &self.key {
            Some(MatchKey::Character(ch)) => ch.eq_ignore_ascii_case(expected),
            _ => false,
        };

        match key {
            ParsedKey::Physical(code) => self.physical_key.as_ref() == Some(code),
            ParsedKey::Character(expected) if use_physical_keys => match self.physical_key {
                Some(physical) => physical_key_matches_char(physical, *expected),
                None => logical_char(expected),
            },
            ParsedKey::Character(expected) => logical_char(expected),
            ParsedKey::Named(expected) => {
                matches!(&self.key, Some(MatchKey::Named(named)) if named == expected)
            }
        }
    }

    fn modifiers_match(&self, combo_mods: &Modifiers) -> bool {
        let (expected_ctrl, expected_super) =
            resolve_cmd_or_ctrl(combo_mods.cmd_or_ctrl, combo_mods.ctrl, combo_mods.super_key);

        self.modifiers.ctrl == expected_ctrl
            && self.modifiers.alt == combo_mods.alt
            && self.modifiers.shift == combo_mods.shift
            && self.modifiers.super_key == expected_super
    }
}
