//! Key events as delivered by the native shell.
//!
//! winit's own `KeyEvent` cannot be built outside winit, so the shell bridge
//! (and the headless runner) produce this plain copy of the fields we match on.

use crate::parser::{KeyCombo, ParseError, ParsedKey, parse_key_combo};
use crate::platform::{code_for_char, parse_named_key, resolve_cmd_or_ctrl};
use winit::event::ElementState;
use winit::keyboard::{Key, KeyCode, ModifiersState, NamedKey, NativeKeyCode, PhysicalKey};

/// A single key press or release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub logical_key: Key,
    pub physical_key: PhysicalKey,
    pub state: ElementState,
    /// Auto-repeat from the OS while the key is held
    pub repeat: bool,
    /// Modifier state at the time of the event
    pub modifiers: ModifiersState,
}

impl KeyEvent {
    /// A press of a character key, with the physical key guessed from QWERTY.
    pub fn character(text: &str) -> Self {
        let physical_key = text
            .chars()
            .next()
            .and_then(code_for_char)
            .map(PhysicalKey::Code)
            .unwrap_or(PhysicalKey::Unidentified(NativeKeyCode::Unidentified));
        Self {
            logical_key: Key::Character(text.into()),
            physical_key,
            state: ElementState::Pressed,
            repeat: false,
            modifiers: ModifiersState::empty(),
        }
    }

    /// A press of a named key.
    pub fn named(key: NamedKey) -> Self {
        let physical_key = match key {
            NamedKey::Escape => PhysicalKey::Code(KeyCode::Escape),
            NamedKey::Enter => PhysicalKey::Code(KeyCode::Enter),
            NamedKey::Super => PhysicalKey::Code(KeyCode::SuperLeft),
            NamedKey::Control => PhysicalKey::Code(KeyCode::ControlLeft),
            NamedKey::Alt => PhysicalKey::Code(KeyCode::AltLeft),
            NamedKey::Shift => PhysicalKey::Code(KeyCode::ShiftLeft),
            _ => PhysicalKey::Unidentified(NativeKeyCode::Unidentified),
        };
        Self {
            logical_key: Key::Named(key),
            physical_key,
            state: ElementState::Pressed,
            repeat: false,
            modifiers: ModifiersState::empty(),
        }
    }

    /// A press of a bare physical key with no known logical meaning.
    pub fn physical(code: KeyCode) -> Self {
        Self {
            logical_key: Key::Unidentified(winit::keyboard::NativeKey::Unidentified),
            physical_key: PhysicalKey::Code(code),
            state: ElementState::Pressed,
            repeat: false,
            modifiers: ModifiersState::empty(),
        }
    }

    /// Build the press that would trigger `combo`.
    pub fn from_combo(combo: &KeyCombo) -> Self {
        let mut event = match &combo.key {
            ParsedKey::Character(c) => Self::character(&c.to_string()),
            ParsedKey::Named(n) => Self::named(*n),
            ParsedKey::Physical(code) => Self::physical(*code),
        };
        let (ctrl, super_key) = resolve_cmd_or_ctrl(
            combo.modifiers.cmd_or_ctrl,
            combo.modifiers.ctrl,
            combo.modifiers.super_key,
        );
        let mut modifiers = ModifiersState::empty();
        modifiers.set(ModifiersState::CONTROL, ctrl);
        modifiers.set(ModifiersState::SUPER, super_key);
        modifiers.set(ModifiersState::ALT, combo.modifiers.alt);
        modifiers.set(ModifiersState::SHIFT, combo.modifiers.shift);
        event.modifiers = modifiers;
        event
    }

    /// Parse a key token as typed on the command line.
    ///
    /// Bare modifier names (`Meta`, `Ctrl`, `Alt`, `Shift`) become presses of
    /// that modifier key; anything else goes through [`parse_key_combo`].
    pub fn parse(token: &str) -> Result<Self, ParseError> {
        match parse_named_key(token) {
            Some(named) => Ok(Self::named(named)),
            None => parse_key_combo(token).map(|combo| Self::from_combo(&combo)),
        }
    }

    pub fn with_modifiers(mut self, modifiers: ModifiersState) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn repeated(mut self) -> Self {
        self.repeat = true;
        self
    }

    /// The same key, released.
    pub fn released(mut self) -> Self {
        self.state = ElementState::Released;
        self.repeat = false;
        self
    }

    pub fn is_pressed(&self) -> bool {
        self.state == ElementState::Pressed
    }

    pub fn is_escape(&self) -> bool {
        matches!(self.logical_key, Key::Named(NamedKey::Escape))
            || self.physical_key == PhysicalKey::Code(KeyCode::Escape)
    }
}
