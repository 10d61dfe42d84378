use super::{APPEARANCE_STORE_EVENT, OPEN_SETTINGS_EVENT};
use crate::events::{EventBus, EventKind, NativeEvent, Subscription};
use crate::platform::{PlatformAdapter, ViewLayer, ViewMarker, spawn_logged};
use crate::state::SessionState;
use crate::store::{StoreReader, StoreWriter};
use coco_desk_keybindings::parser::Modifiers;
use coco_desk_keybindings::{KeyCombo, KeyEvent, KeybindingMatcher, ParsedKey};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// What a blur event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurDecision {
    /// Pinned or held visible: the window stays up, marked blurred
    KeptBlurred,
    /// Hide was requested from the shell
    Hidden,
}

/// The single thing an escape press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeOutcome {
    BlurredInput,
    ClosedContextMenu,
    ClosedHistoryPanel,
    HidWindow,
}

/// Owns [`SessionState`]: window hide/blur decisions, pinning, escape
/// handling and appearance updates from other windows.
pub struct SessionCoordinator {
    store: StoreWriter<SessionState>,
    adapter: Arc<dyn PlatformAdapter>,
    view: Arc<dyn ViewLayer>,
    settings_combo: KeyCombo,
    visibility_holds: AtomicUsize,
}

impl SessionCoordinator {
    pub fn new(
        store: StoreWriter<SessionState>,
        adapter: Arc<dyn PlatformAdapter>,
        view: Arc<dyn ViewLayer>,
    ) -> Arc<Self> {
        if adapter.is_native() {
            store.update(SessionState::mark_native);
        }
        Arc::new(Self {
            store,
            adapter,
            view,
            settings_combo: KeyCombo {
                modifiers: Modifiers {
                    cmd_or_ctrl: true,
                    ..Modifiers::default()
                },
                key: ParsedKey::Character(','),
            },
            visibility_holds: AtomicUsize::new(0),
        })
    }

    pub fn reader(&self) -> StoreReader<SessionState> {
        self.store.reader()
    }

    pub fn state(&self) -> SessionState {
        self.store.get()
    }

    /// Register listeners for everything this coordinator reacts to.
    pub fn attach(self: &Arc<Self>, bus: &EventBus) -> Vec<Subscription> {
        let blur = {
            let this = Arc::clone(self);
            bus.subscribe(EventKind::Blur, move |_| {
                this.handle_blur();
                Ok(())
            })
        };
        let focus = {
            let this = Arc::clone(self);
            bus.subscribe(EventKind::Focus, move |_| {
                this.handle_focus();
                Ok(())
            })
        };
        let shortcut = {
            let this = Arc::clone(self);
            bus.subscribe(EventKind::ShortcutTriggered, move |event| {
                if let NativeEvent::ShortcutTriggered(name) = event {
                    log::debug!("global shortcut '{}' triggered", name);
                }
                this.handle_focus();
                Ok(())
            })
        };
        let key_down = {
            let this = Arc::clone(self);
            bus.subscribe(EventKind::KeyDown, move |event| {
                if let NativeEvent::KeyDown(key) = event {
                    this.handle_key_down(key);
                }
                Ok(())
            })
        };
        let emitted = {
            let this = Arc::clone(self);
            bus.subscribe(EventKind::Emitted, move |event| {
                if let NativeEvent::Emitted { name, payload } = event
                    && name == APPEARANCE_STORE_EVENT
                {
                    this.apply_appearance_payload(payload);
                }
                Ok(())
            })
        };

        vec![blur, focus, shortcut, key_down, emitted]
    }

    /// Decide between keeping the window up and hiding it, using the flags
    /// as they are right now.
    pub fn handle_blur(&self) -> BlurDecision {
        let keep = self.store.read(SessionState::keeps_window_on_blur);
        if keep {
            self.store.update(|s| s.set_blurred(true));
            log::debug!("blur: window kept on screen");
            BlurDecision::KeptBlurred
        } else {
            log::debug!("blur: hiding window");
            spawn_logged("hide window", self.adapter.hide_window());
            BlurDecision::Hidden
        }
    }

    pub fn handle_focus(&self) {
        self.store.update(|s| s.set_blurred(false));
    }

    /// Escape and the settings shortcut; other keys are ignored.
    pub fn handle_key_down(&self, event: &KeyEvent) -> Option<EscapeOutcome> {
        if event.is_escape() {
            return Some(self.handle_escape());
        }
        if !event.repeat && KeybindingMatcher::from_event(event).matches(&self.settings_combo) {
            self.open_settings(None);
        }
        None
    }

    /// First match wins: focused input, context menu, history panel, window.
    pub fn handle_escape(&self) -> EscapeOutcome {
        let outcome = if self.view.has_focused_input() {
            self.view.blur_focused_input();
            EscapeOutcome::BlurredInput
        } else if self.store.read(|s| s.context_menu_visible) {
            self.store.update(|s| s.set_context_menu_visible(false));
            EscapeOutcome::ClosedContextMenu
        } else if self.view.is_present(ViewMarker::HistoryPanel) {
            self.view.close_history_panel();
            EscapeOutcome::ClosedHistoryPanel
        } else {
            spawn_logged("hide window", self.adapter.hide_window());
            EscapeOutcome::HidWindow
        };
        log::debug!("escape: {:?}", outcome);
        outcome
    }

    pub fn set_pinned(&self, is_pinned: bool) -> bool {
        let changed = self.store.update(|s| s.set_pinned(is_pinned));
        if changed {
            spawn_logged("set always on top", self.adapter.set_always_on_top(is_pinned));
        }
        changed
    }

    pub fn toggle_pinned(&self) -> bool {
        let is_pinned = !self.store.read(|s| s.is_pinned);
        self.set_pinned(is_pinned);
        is_pinned
    }

    pub fn set_context_menu_visible(&self, visible: bool) -> bool {
        self.store.update(|s| s.set_context_menu_visible(visible))
    }

    pub fn show_window(&self) {
        spawn_logged("show window", self.adapter.show_window());
    }

    /// Keep the window up while the returned guard lives.
    ///
    /// Holds nest; `visible` drops back to false when the last one goes.
    pub fn hold_visible(&self) -> VisibilityGuard<'_> {
        if self.visibility_holds.fetch_add(1, Ordering::SeqCst) == 0 {
            self.store.update(|s| s.set_visible(true));
        }
        VisibilityGuard { coordinator: self }
    }

    /// Run `operation` with the window held visible, e.g. a file picker that
    /// steals focus. `visible` is reset however the operation ends.
    pub async fn with_visibility<F>(&self, operation: F) -> F::Output
    where
        F: Future,
    {
        let _hold = self.hold_visible();
        operation.await
    }

    /// Ask the shell to open the settings window, optionally on `tab`.
    pub fn open_settings(&self, tab: Option<&str>) {
        log::info!("opening settings (tab: {})", tab.unwrap_or("default"));
        spawn_logged(
            "open settings",
            self.adapter
                .emit_event(OPEN_SETTINGS_EVENT, Value::from(tab.unwrap_or(""))),
        );
    }

    pub fn set_opacity(&self, opacity: Option<u8>) -> bool {
        self.store.update(|s| s.appearance.set_opacity(opacity))
    }

    pub fn set_snapshot_update(&self, snapshot_update: bool) -> bool {
        self.store
            .update(|s| s.appearance.set_snapshot_update(snapshot_update))
    }

    /// Apply appearance settings changed in another window.
    ///
    /// `opacity` is only taken when it is a number. Both `snapshot_update`
    /// and `snapshotUpdate` spellings are accepted.
    pub fn apply_appearance_payload(&self, payload: &Value) -> bool {
        let opacity = payload
            .get("opacity")
            .and_then(Value::as_f64)
            .map(|v| v.round().clamp(0.0, f64::from(u8::MAX)) as u8);
        let snapshot_update = payload
            .get("snapshot_update")
            .or_else(|| payload.get("snapshotUpdate"))
            .and_then(Value::as_bool);

        self.store.update(|s| {
            let mut changed = false;
            if let Some(opacity) = opacity {
                changed |= s.appearance.set_opacity(Some(opacity));
            }
            if let Some(snapshot_update) = snapshot_update {
                changed |= s.appearance.set_snapshot_update(snapshot_update);
            }
            changed
        })
    }
}

/// Releases one visibility hold on drop.
#[must_use = "the window is only held visible while the guard lives"]
pub struct VisibilityGuard<'a> {
    coordinator: &'a SessionCoordinator,
}

impl Drop for VisibilityGuard<'_> {
    fn drop(&mut self) {
        if self
            .coordinator
            .visibility_holds
            .fetch_sub(1, Ordering::SeqCst)
            == 1
        {
            self.coordinator.store.update(|s| s.set_visible(false));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{AdapterCall, AdapterOp, HeadlessView, RecordingAdapter};
    use crate::store::new_store;
    use coco_desk_keybindings::NamedKey;
    use serde_json::json;

    fn coordinator() -> (Arc<SessionCoordinator>, Arc<RecordingAdapter>, Arc<HeadlessView>) {
        let adapter = Arc::new(RecordingAdapter::new());
        let view = Arc::new(HeadlessView::new());
        let session = SessionCoordinator::new(
            new_store("session", SessionState::default()),
            adapter.clone(),
            view.clone(),
        );
        (session, adapter, view)
    }

    #[tokio::test]
    async fn test_blur_hides_when_not_held() {
        let (session, adapter, _) = coordinator();
        assert_eq!(session.handle_blur(), BlurDecision::Hidden);
        assert_eq!(adapter.count(AdapterOp::HideWindow), 1);
        assert!(!session.state().blurred);
    }

    #[tokio::test]
    async fn test_blur_reads_current_pin() {
        let (session, adapter, _) = coordinator();
        session.set_pinned(true);
        assert_eq!(session.handle_blur(), BlurDecision::KeptBlurred);
        session.set_pinned(false);
        assert_eq!(session.handle_blur(), BlurDecision::Hidden);
        assert_eq!(adapter.count(AdapterOp::HideWindow), 1);
    }

    #[tokio::test]
    async fn test_focus_clears_blurred() {
        let (session, _, _) = coordinator();
        session.set_pinned(true);
        session.handle_blur();
        assert!(session.state().blurred);
        session.handle_focus();
        assert!(!session.state().blurred);
    }

    #[tokio::test]
    async fn test_pin_sets_always_on_top() {
        let (session, adapter, _) = coordinator();
        assert!(session.toggle_pinned());
        assert!(!session.set_pinned(true));
        assert_eq!(adapter.calls(), vec![AdapterCall::SetAlwaysOnTop(true)]);
    }

    #[tokio::test]
    async fn test_with_visibility_resets_on_error() {
        let (session, _, _) = coordinator();
        let result: Result<(), &str> = session
            .with_visibility(async {
                assert!(session.state().visible);
                Err("picker failed")
            })
            .await;
        assert!(result.is_err());
        assert!(!session.state().visible);
    }

    #[tokio::test]
    async fn test_nested_visibility_holds() {
        let (session, _, _) = coordinator();
        let outer = session.hold_visible();
        {
            let _inner = session.hold_visible();
        }
        assert!(session.state().visible);
        drop(outer);
        assert!(!session.state().visible);
    }

    #[tokio::test]
    async fn test_settings_shortcut_emits_open_settings() {
        let (session, adapter, _) = coordinator();
        let mut modifiers = coco_desk_keybindings::ModifiersState::empty();
        if cfg!(target_os = "macos") {
            modifiers.insert(coco_desk_keybindings::ModifiersState::SUPER);
        } else {
            modifiers.insert(coco_desk_keybindings::ModifiersState::CONTROL);
        }
        let event = KeyEvent::character(",").with_modifiers(modifiers);
        assert_eq!(session.handle_key_down(&event), None);
        assert_eq!(
            adapter.calls(),
            vec![AdapterCall::EmitEvent {
                name: OPEN_SETTINGS_EVENT.to_string(),
                payload: json!(""),
            }]
        );
    }

    #[tokio::test]
    async fn test_escape_on_empty_view_hides() {
        let (session, adapter, _) = coordinator();
        let outcome = session.handle_key_down(&KeyEvent::named(NamedKey::Escape));
        assert_eq!(outcome, Some(EscapeOutcome::HidWindow));
        assert_eq!(adapter.count(AdapterOp::HideWindow), 1);
    }

    #[tokio::test]
    async fn test_appearance_payload_ignores_non_numeric_opacity() {
        let (session, _, _) = coordinator();
        assert!(session.apply_appearance_payload(&json!({ "opacity": 80, "snapshotUpdate": true })));
        assert_eq!(session.state().appearance.opacity, 80);
        assert!(session.state().appearance.snapshot_update);

        assert!(!session.apply_appearance_payload(&json!({ "opacity": "90" })));
        assert_eq!(session.state().appearance.opacity, 80);
    }

    #[test]
    fn test_native_adapter_marks_session() {
        let session = SessionCoordinator::new(
            new_store("session", SessionState::default()),
            Arc::new(RecordingAdapter::native()),
            Arc::new(HeadlessView::new()),
        );
        assert!(session.state().is_tauri());
    }
}
