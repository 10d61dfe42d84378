//! Platform-specific key resolution.
//!
//! Contains:
//! - `CmdOrCtrl` expansion (Cmd on macOS, Ctrl elsewhere)
//! - Physical key position to QWERTY character mapping
//! - Named key aliases (string to `NamedKey`)
//! - Physical key code names (string to `KeyCode`)

use winit::keyboard::{KeyCode, NamedKey};

const LETTER_CODES: [KeyCode; 26] = [
    KeyCode::KeyA,
    KeyCode::KeyB,
    KeyCode::KeyC,
    KeyCode::KeyD,
    KeyCode::KeyE,
    KeyCode::KeyF,
    KeyCode::KeyG,
    KeyCode::KeyH,
    KeyCode::KeyI,
    KeyCode::KeyJ,
    KeyCode::KeyK,
    KeyCode::KeyL,
    KeyCode::KeyM,
    KeyCode::KeyN,
    KeyCode::KeyO,
    KeyCode::KeyP,
    KeyCode::KeyQ,
    KeyCode::KeyR,
    KeyCode::KeyS,
    KeyCode::KeyT,
    KeyCode::KeyU,
    KeyCode::KeyV,
    KeyCode::KeyW,
    KeyCode::KeyX,
    KeyCode::KeyY,
    KeyCode::KeyZ,
];

const DIGIT_CODES: [KeyCode; 10] = [
    KeyCode::Digit0,
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

/// Punctuation keys with their code name and unshifted US QWERTY character.
const SYMBOL_CODES: [(KeyCode, &str, char); 11] = [
    (KeyCode::Minus, "minus", '-'),
    (KeyCode::Equal, "equal", '='),
    (KeyCode::BracketLeft, "bracketleft", '['),
    (KeyCode::BracketRight, "bracketright", ']'),
    (KeyCode::Backslash, "backslash", '\\'),
    (KeyCode::Semicolon, "semicolon", ';'),
    (KeyCode::Quote, "quote", '\''),
    (KeyCode::Backquote, "backquote", '`'),
    (KeyCode::Comma, "comma", ','),
    (KeyCode::Period, "period", '.'),
    (KeyCode::Slash, "slash", '/'),
];

const FUNCTION_CODES: [KeyCode; 12] = [
    KeyCode::F1,
    KeyCode::F2,
    KeyCode::F3,
    KeyCode::F4,
    KeyCode::F5,
    KeyCode::F6,
    KeyCode::F7,
    KeyCode::F8,
    KeyCode::F9,
    KeyCode::F10,
    KeyCode::F11,
    KeyCode::F12,
];

const FUNCTION_KEYS: [NamedKey; 12] = [
    NamedKey::F1,
    NamedKey::F2,
    NamedKey::F3,
    NamedKey::F4,
    NamedKey::F5,
    NamedKey::F6,
    NamedKey::F7,
    NamedKey::F8,
    NamedKey::F9,
    NamedKey::F10,
    NamedKey::F11,
    NamedKey::F12,
];

/// Resolve the `CmdOrCtrl` modifier for the current platform.
///
/// Returns `(expected_ctrl, expected_super)` given a `cmd_or_ctrl` flag and the
/// raw `ctrl`/`super_key` values from the parsed combo.
#[inline]
pub fn resolve_cmd_or_ctrl(cmd_or_ctrl: bool, ctrl: bool, super_key: bool) -> (bool, bool) {
    if !cmd_or_ctrl {
        return (ctrl, super_key);
    }
    if cfg!(target_os = "macos") {
        (ctrl, true)
    } else {
        (true, super_key)
    }
}

/// The character a physical key produces on a US QWERTY layout, if any.
pub fn qwerty_char(code: KeyCode) -> Option<char> {
    if let Some(i) = LETTER_CODES.iter().position(|c| *c == code) {
        return Some((b'A' + i as u8) as char);
    }
    if let Some(i) = DIGIT_CODES.iter().position(|c| *c == code) {
        return Some((b'0' + i as u8) as char);
    }
    SYMBOL_CODES
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(_, _, ch)| *ch)
}

/// Check if a physical key code sits where `ch` is on a QWERTY layout.
///
/// Lets action letters keep working under non-Latin keyboard layouts.
pub fn physical_key_matches_char(code: KeyCode, ch: char) -> bool {
    qwerty_char(code).is_some_and(|expected| expected.eq_ignore_ascii_case(&ch))
}

/// The physical key for a QWERTY letter or digit, if any.
pub fn code_for_char(ch: char) -> Option<KeyCode> {
    let upper = ch.to_ascii_uppercase();
    if upper.is_ascii_uppercase() {
        return Some(LETTER_CODES[(upper as u8 - b'A') as usize]);
    }
    if upper.is_ascii_digit() {
        return Some(DIGIT_CODES[(upper as u8 - b'0') as usize]);
    }
    SYMBOL_CODES
        .iter()
        .find(|(_, _, c)| *c == upper)
        .map(|(code, _, _)| *code)
}

fn function_index(lower: &str) -> Option<usize> {
    let n: usize = lower.strip_prefix('f')?.parse().ok()?;
    (1..=12).contains(&n).then(|| n - 1)
}

/// Parse a named key string into a [`NamedKey`].
///
/// Accepts aliases such as `"Enter"`, `"Return"`, `"Esc"`, `"PgUp"`, arrow
/// keys, function keys F1-F12 and the modifier names themselves (so a bare
/// `"Meta"` or `"Control"` can be fed through the CLI). Case-insensitive.
pub fn parse_named_key(s: &str) -> Option<NamedKey> {
    let lower = s.to_lowercase();
    if let Some(i) = function_index(&lower) {
        return Some(FUNCTION_KEYS[i]);
    }
    let named = match lower.as_str() {
        "enter" | "return" => NamedKey::Enter,
        "escape" | "esc" => NamedKey::Escape,
        "space" => NamedKey::Space,
        "tab" => NamedKey::Tab,
        "backspace" => NamedKey::Backspace,
        "delete" | "del" => NamedKey::Delete,
        "insert" | "ins" => NamedKey::Insert,
        "home" => NamedKey::Home,
        "end" => NamedKey::End,
        "pageup" | "pgup" => NamedKey::PageUp,
        "pagedown" | "pgdn" => NamedKey::PageDown,
        "up" | "arrowup" => NamedKey::ArrowUp,
        "down" | "arrowdown" => NamedKey::ArrowDown,
        "left" | "arrowleft" => NamedKey::ArrowLeft,
        "right" | "arrowright" => NamedKey::ArrowRight,
        "meta" | "super" | "cmd" | "command" | "win" => NamedKey::Super,
        "ctrl" | "control" => NamedKey::Control,
        "alt" | "option" => NamedKey::Alt,
        "shift" => NamedKey::Shift,
        _ => return None,
    };
    Some(named)
}

/// Parse a physical key code string into a [`KeyCode`].
///
/// Supports `"KeyA"`..`"KeyZ"`, `"Digit0"`..`"Digit9"`, punctuation names,
/// `"F1"`..`"F12"`, navigation keys and the left/right modifier keys.
/// Case-insensitive.
pub fn parse_physical_key_code(s: &str) -> Option<KeyCode> {
    let lower = s.to_lowercase();

    if let Some(rest) = lower.strip_prefix("key") {
        let mut chars = rest.chars();
        if let (Some(c), None) = (chars.next(), chars.next())
            && c.is_ascii_lowercase()
        {
            return Some(LETTER_CODES[(c as u8 - b'a') as usize]);
        }
    }
    if let Some(rest) = lower.strip_prefix("digit") {
        let mut chars = rest.chars();
        if let (Some(c), None) = (chars.next(), chars.next())
            && c.is_ascii_digit()
        {
            return Some(DIGIT_CODES[(c as u8 - b'0') as usize]);
        }
    }
    if let Some(i) = function_index(&lower) {
        return Some(FUNCTION_CODES[i]);
    }
    if let Some((code, _, _)) = SYMBOL_CODES.iter().find(|(_, name, _)| *name == lower) {
        return Some(*code);
    }

    let code = match lower.as_str() {
        "arrowup" => KeyCode::ArrowUp,
        "arrowdown" => KeyCode::ArrowDown,
        "arrowleft" => KeyCode::ArrowLeft,
        "arrowright" => KeyCode::ArrowRight,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "insert" => KeyCode::Insert,
        "delete" => KeyCode::Delete,
        "enter" => KeyCode::Enter,
        "escape" => KeyCode::Escape,
        "space" => KeyCode::Space,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "controlleft" => KeyCode::ControlLeft,
        "controlright" => KeyCode::ControlRight,
        "altleft" => KeyCode::AltLeft,
        "altright" => KeyCode::AltRight,
        "superleft" | "metaleft" => KeyCode::SuperLeft,
        "superright" | "metaright" => KeyCode::SuperRight,
        "shiftleft" => KeyCode::ShiftLeft,
        "shiftright" => KeyCode::ShiftRight,
        _ => return None,
    };
    Some(code)
}
