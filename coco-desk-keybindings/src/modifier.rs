//! Matching the configured shortcut modifier against key events.

use crate::event::KeyEvent;
use coco_desk_config::ModifierKey;
use winit::keyboard::{Key, KeyCode, ModifiersState, NamedKey, PhysicalKey};

/// Whether `event` is a press or release of the modifier key itself.
///
/// Either the left or the right physical key counts.
pub fn is_modifier_event(modifier: ModifierKey, event: &KeyEvent) -> bool {
    let named = match &event.logical_key {
        Key::Named(named) => Some(*named),
        _ => None,
    };
    let code = match event.physical_key {
        PhysicalKey::Code(code) => Some(code),
        PhysicalKey::Unidentified(_) => None,
    };

    match modifier {
        ModifierKey::Meta => {
            matches!(named, Some(NamedKey::Super | NamedKey::Meta))
                || matches!(code, Some(KeyCode::SuperLeft | KeyCode::SuperRight | KeyCode::Meta))
        }
        ModifierKey::Ctrl => {
            named == Some(NamedKey::Control)
                || matches!(code, Some(KeyCode::ControlLeft | KeyCode::ControlRight))
        }
        ModifierKey::Alt => {
            matches!(named, Some(NamedKey::Alt | NamedKey::AltGraph))
                || matches!(code, Some(KeyCode::AltLeft | KeyCode::AltRight))
        }
    }
}

/// Whether the modifier is held according to a modifier state snapshot.
pub fn is_modifier_held(modifier: ModifierKey, state: ModifiersState) -> bool {
    match modifier {
        ModifierKey::Meta => state.super_key(),
        ModifierKey::Ctrl => state.control_key(),
        ModifierKey::Alt => state.alt_key(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_and_right_variants_match() {
        for code in [KeyCode::ControlLeft, KeyCode::ControlRight] {
            assert!(is_modifier_event(ModifierKey::Ctrl, &KeyEvent::physical(code)));
        }
        for code in [KeyCode::AltLeft, KeyCode::AltRight] {
            assert!(is_modifier_event(ModifierKey::Alt, &KeyEvent::physical(code)));
        }
        assert!(is_modifier_event(
            ModifierKey::Meta,
            &KeyEvent::physical(KeyCode::SuperRight)
        ));
    }

    #[test]
    fn test_named_meta_matches() {
        assert!(is_modifier_event(
            ModifierKey::Meta,
            &KeyEvent::named(NamedKey::Super)
        ));
        assert!(is_modifier_event(
            ModifierKey::Meta,
            &KeyEvent::named(NamedKey::Meta)
        ));
        assert!(!is_modifier_event(
            ModifierKey::Ctrl,
            &KeyEvent::named(NamedKey::Super)
        ));
    }

    #[test]
    fn test_letters_never_match() {
        for modifier in [ModifierKey::Meta, ModifierKey::Ctrl, ModifierKey::Alt] {
            assert!(!is_modifier_event(modifier, &KeyEvent::character("k")));
        }
    }

    #[test]
    fn test_is_modifier_held() {
        assert!(is_modifier_held(ModifierKey::Alt, ModifiersState::ALT));
        assert!(!is_modifier_held(ModifierKey::Meta, ModifiersState::CONTROL));
    }
}
