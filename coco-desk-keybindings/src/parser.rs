//! Key combination parser.
//!
//! Parses human-readable key strings like "CmdOrCtrl+Shift+B" into [`KeyCombo`]s.
//! Physical key codes are written in brackets for layout-independent bindings
//! (e.g. "Alt+[KeyZ]").

use crate::platform::{parse_named_key, parse_physical_key_code};
use std::fmt;
use winit::keyboard::{KeyCode, NamedKey};

/// Error type for key parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseError {}

/// Set of active modifiers for a key combination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub super_key: bool,
    /// Cmd on macOS, Ctrl elsewhere
    pub cmd_or_ctrl: bool,
}

/// A parsed key combination (modifiers + key).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub modifiers: Modifiers,
    pub key: ParsedKey,
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = [
            (self.modifiers.cmd_or_ctrl, "CmdOrCtrl"),
            (self.modifiers.ctrl, "Ctrl"),
            (self.modifiers.alt, "Alt"),
            (self.modifiers.shift, "Shift"),
            (self.modifiers.super_key, "Super"),
        ];
        for (_, name) in flags.iter().filter(|(on, _)| *on) {
            write!(f, "{}+", name)?;
        }
        match &self.key {
            ParsedKey::Character(c) => write!(f, "{}", c),
            ParsedKey::Named(n) => write!(f, "{:?}", n),
            ParsedKey::Physical(k) => write!(f, "[{:?}]", k),
        }
    }
}

/// The key part of a combo.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParsedKey {
    /// A single character, stored uppercase
    Character(char),
    /// A named key (F1, Enter, Escape, ...)
    Named(NamedKey),
    /// A key position, independent of the active layout
    Physical(KeyCode),
}

/// Parse a key combination string into a [`KeyCombo`].
///
/// Format: `"Modifier+Modifier+Key"`.
///
/// Modifiers:
/// - `Ctrl`, `Control`
/// - `Alt`, `Option`
/// - `Shift`
/// - `Super`, `Cmd`, `Command`, `Meta`, `Win`
/// - `CmdOrCtrl`
///
/// Keys are single characters, named keys (`F1`-`F12`, `Enter`, `Escape`,
/// `Space`, ...) or bracketed physical codes (`[KeyZ]`).
pub fn parse_key_combo(s: &str) -> Result<KeyCombo, ParseError> {
    if s.trim().is_empty() {
        return Err(ParseError("Empty key combination".to_string()));
    }
    // "Ctrl++" means Ctrl and the plus key.
    let normalized = s.trim().replace("++", "+Plus");
    let parts: Vec<&str> = normalized.split('+').map(str::trim).collect();

    let mut modifiers = Modifiers::default();
    let mut key_part = None;

    for (i, part) in parts.iter().enumerate() {
        let is_last = i == parts.len() - 1;

        let flag = match part.to_lowercase().as_str() {
            "ctrl" | "control" => Some(&mut modifiers.ctrl),
            "alt" | "option" => Some(&mut modifiers.alt),
            "shift" => Some(&mut modifiers.shift),
            "super" | "cmd" | "command" | "meta" | "win" => Some(&mut modifiers.super_key),
            "cmdorctrl" => Some(&mut modifiers.cmd_or_ctrl),
            _ => None,
        };

        match flag {
            Some(_) if is_last => {
                return Err(ParseError(
                    "Key combination ends with modifier, no key specified".to_string(),
                ));
            }
            Some(flag) => *flag = true,
            None if key_part.is_some() => {
                return Err(ParseError(format!(
                    "Multiple keys specified: already have key, found '{}'",
                    part
                )));
            }
            None => key_part = Some(*part),
        }
    }

    let key_str = key_part.ok_or_else(|| ParseError("No key specified".to_string()))?;
    let key = parse_key(key_str)?;

    Ok(KeyCombo { modifiers, key })
}

/// Parse the key part of a combo.
pub(crate) fn parse_key(s: &str) -> Result<ParsedKey, ParseError> {
    if let Some(code_str) = s.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
        return parse_physical_key_code(code_str)
            .map(ParsedKey::Physical)
            .ok_or_else(|| ParseError(format!("Unknown physical key code: '{}'", code_str)));
    }

    if s.eq_ignore_ascii_case("plus") {
        return Ok(ParsedKey::Character('+'));
    }

    if let Some(named) = parse_named_key(s) {
        return Ok(ParsedKey::Named(named));
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(ParsedKey::Character(c.to_ascii_uppercase())),
        (None, _) => Err(ParseError("No key specified".to_string())),
        _ => Err(ParseError(format!("Unknown key: '{}'", s))),
    }
}
