//! Persisted subsets survive a restart; runtime state does not.

mod common;

use coco_desk::NativeEvent;
use coco_desk::coordinator::UpdateTrigger;
use coco_desk_config::ModifierKey;
use coco_desk_keybindings::{KeyEvent, NamedKey};
use coco_desk_update::UpdateInfo;
use common::TestDesk;

#[tokio::test]
async fn test_round_trip_keeps_persisted_and_resets_transient() {
    let desk = TestDesk::new();
    let app = &desk.app;

    app.session().set_opacity(Some(55));
    app.session().set_snapshot_update(true);
    app.session().set_pinned(true);
    app.dispatch(NativeEvent::Blur);
    app.session().set_context_menu_visible(true);

    app.shortcuts().set_modifier_key(ModifierKey::Alt);
    app.dispatch(NativeEvent::KeyDown(KeyEvent::named(NamedKey::Alt)));
    assert!(app.shortcuts().state().modifier_key_pressed);

    desk.adapter.push_update(Ok(Some(UpdateInfo::new("1.2.0"))));
    app.updates().check(UpdateTrigger::Manual).await;
    app.updates().skip_version();

    app.persist().unwrap();
    let reloaded = TestDesk::in_dir(desk.into_dir());
    let app = &reloaded.app;

    let session = app.session().state();
    assert_eq!(session.appearance.opacity, 55);
    assert!(session.appearance.snapshot_update);
    assert!(!session.is_pinned);
    assert!(!session.blurred);
    assert!(!session.visible);
    assert!(!session.context_menu_visible);

    let shortcuts = app.shortcuts().state();
    assert_eq!(shortcuts.modifier_key(), ModifierKey::Alt);
    assert!(!shortcuts.modifier_key_pressed);
    assert!(!shortcuts.open_popover);

    let updates = app.updates().state();
    assert_eq!(updates.skip_version(), Some("1.2.0"));
    assert!(updates.config.last_update_check.is_some());
    assert!(!updates.visible);
    assert!(updates.update_info.is_none());
}

#[tokio::test]
async fn test_state_files_are_written() {
    let desk = TestDesk::new();
    desk.app.persist().unwrap();
    for name in ["appearance.yaml", "shortcuts.yaml", "updates.yaml"] {
        assert!(desk.dir.path().join(name).exists(), "{name} missing");
    }
}

#[tokio::test]
async fn test_legacy_fixed_window_letter_migrated_on_load() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("shortcuts.yaml"), "fixed_window: F\n").unwrap();

    let desk = TestDesk::in_dir(dir);
    let config = desk.app.shortcuts().state().config;
    assert_eq!(config.fixed_window, "P");
    assert!(config.reset_fixed_window);
}

#[tokio::test]
async fn test_malformed_file_falls_back_to_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("appearance.yaml"), "opacity: [1, 2\n").unwrap();

    let desk = TestDesk::in_dir(dir);
    assert_eq!(desk.app.session().state().appearance.opacity, 30);
}
