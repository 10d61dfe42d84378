//! End-to-end tests: shortcut settings in, key events through, actions out.

use coco_desk_config::{ModifierKey, ShortcutConfig};
use coco_desk_keybindings::{
    KeyCode, KeyEvent, KeybindingMatcher, ModifiersState, NamedKey, PhysicalKey, ShortcutAction,
    ShortcutRegistry, is_modifier_event, parse_key_combo,
};

#[test]
fn test_custom_letters_from_yaml() {
    let config: ShortcutConfig =
        serde_yaml_ng::from_str("modifier_key: alt\nmode_switch: M\nfixed_window: \"[KeyQ]\"\n")
            .unwrap();
    let registry = ShortcutRegistry::from_config(&config);

    assert_eq!(
        registry.lookup(&KeyEvent::character("m"), false),
        Some(ShortcutAction::ModeSwitch)
    );
    // Old default letter no longer maps to mode switch
    assert_eq!(registry.lookup(&KeyEvent::character("t"), false), None);
    assert_eq!(
        registry.lookup(&KeyEvent::physical(KeyCode::KeyQ), false),
        Some(ShortcutAction::FixedWindow)
    );
}

#[test]
fn test_action_letter_with_modifier_held() {
    let registry = ShortcutRegistry::from_config(&ShortcutConfig::default());
    let event = KeyEvent::character("g").with_modifiers(ModifiersState::SUPER);
    assert_eq!(
        registry.lookup(&event, false),
        Some(ShortcutAction::InternetSearch)
    );
}

#[test]
fn test_physical_lookup_on_non_latin_layout() {
    let registry = ShortcutRegistry::from_config(&ShortcutConfig::default());
    let event = KeyEvent {
        logical_key: coco_desk_keybindings::Key::Character("к".into()),
        physical_key: PhysicalKey::Code(KeyCode::KeyK),
        ..KeyEvent::character("k")
    };
    assert_eq!(registry.lookup(&event, false), None);
    assert_eq!(
        registry.lookup(&event, true),
        Some(ShortcutAction::VoiceInput)
    );
}

#[test]
fn test_modifier_key_swap_changes_what_matches() {
    let meta = KeyEvent::named(NamedKey::Super);
    let alt = KeyEvent::named(NamedKey::Alt);

    assert!(is_modifier_event(ModifierKey::Meta, &meta));
    assert!(!is_modifier_event(ModifierKey::Meta, &alt));
    assert!(is_modifier_event(ModifierKey::Alt, &alt));
    assert!(!is_modifier_event(ModifierKey::Alt, &meta));
}

#[test]
fn test_settings_combo_from_parsed_event() {
    let combo = parse_key_combo("CmdOrCtrl+,").unwrap();
    let event = KeyEvent::parse("CmdOrCtrl+,").unwrap();
    let matcher = KeybindingMatcher::from_event(&event);
    assert!(matcher.matches(&combo));
}
