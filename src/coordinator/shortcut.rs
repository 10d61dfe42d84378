use super::SHORTCUTS_STORE_EVENT;
use crate::events::{EventBus, EventKind, NativeEvent, Subscription};
use crate::platform::{ViewLayer, ViewMarker};
use crate::state::ShortcutState;
use crate::store::{StoreReader, StoreWriter};
use anyhow::Context;
use coco_desk_config::{ModifierKey, ShortcutConfig};
use coco_desk_keybindings::{
    KeyEvent, ShortcutAction, ShortcutRegistry, is_modifier_event, is_modifier_held,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::broadcast;

const ACTION_CHANNEL_CAPACITY: usize = 16;

/// Owns [`ShortcutState`]: tracks the modifier key and resolves action
/// letters pressed while it is held.
///
/// The modifier is read from the store on every event, so changing it takes
/// effect on the very next key event without re-subscribing.
pub struct ShortcutCoordinator {
    store: StoreWriter<ShortcutState>,
    view: Arc<dyn ViewLayer>,
    registry: Mutex<ShortcutRegistry>,
    actions: broadcast::Sender<ShortcutAction>,
    use_physical_keys: bool,
}

impl ShortcutCoordinator {
    pub fn new(store: StoreWriter<ShortcutState>, view: Arc<dyn ViewLayer>) -> Arc<Self> {
        if store.update(|s| s.config.migrate_fixed_window()) {
            log::info!("Migrated fixed window shortcut to the new default");
        }
        let registry = store.read(|s| ShortcutRegistry::from_config(&s.config));
        let (actions, _) = broadcast::channel(ACTION_CHANNEL_CAPACITY);
        Arc::new(Self {
            store,
            view,
            registry: Mutex::new(registry),
            actions,
            use_physical_keys: true,
        })
    }

    pub fn reader(&self) -> StoreReader<ShortcutState> {
        self.store.reader()
    }

    pub fn state(&self) -> ShortcutState {
        self.store.get()
    }

    /// Actions resolved from now on.
    pub fn actions(&self) -> broadcast::Receiver<ShortcutAction> {
        self.actions.subscribe()
    }

    pub fn attach(self: &Arc<Self>, bus: &EventBus) -> Vec<Subscription> {
        let key_down = {
            let this = Arc::clone(self);
            bus.subscribe(EventKind::KeyDown, move |event| {
                if let NativeEvent::KeyDown(key) = event {
                    this.handle_key_down(key);
                }
                Ok(())
            })
        };
        let key_up = {
            let this = Arc::clone(self);
            bus.subscribe(EventKind::KeyUp, move |event| {
                if let NativeEvent::KeyUp(key) = event {
                    this.handle_key_up(key);
                }
                Ok(())
            })
        };
        let blur = {
            let this = Arc::clone(self);
            bus.subscribe(EventKind::Blur, move |_| {
                this.handle_blur();
                Ok(())
            })
        };
        let emitted = {
            let this = Arc::clone(self);
            bus.subscribe(EventKind::Emitted, move |event| match event {
                NativeEvent::Emitted { name, payload } if name == SHORTCUTS_STORE_EVENT => {
                    this.apply_shortcuts_payload(payload).map(|_| ())
                }
                _ => Ok(()),
            })
        };

        vec![key_down, key_up, blur, emitted]
    }

    /// A key went down.
    ///
    /// The configured modifier marks itself pressed and re-queries whether a
    /// popover is open. Any other key, while the modifier is held, is looked
    /// up as an action letter; the resolved action is broadcast and returned.
    pub fn handle_key_down(&self, event: &KeyEvent) -> Option<ShortcutAction> {
        let (modifier, pressed) = self
            .store
            .read(|s| (s.modifier_key(), s.modifier_key_pressed));

        if is_modifier_event(modifier, event) {
            let popover_present = self.view.is_present(ViewMarker::PopoverPanel);
            self.store.update(|s| s.press_modifier(popover_present));
            return None;
        }

        if event.repeat || !(pressed || is_modifier_held(modifier, event.modifiers)) {
            return None;
        }

        let action = self.registry.lock().lookup(event, self.use_physical_keys)?;
        log::debug!("shortcut action {} triggered", action);
        // No receivers is fine
        let _ = self.actions.send(action);
        Some(action)
    }

    pub fn handle_key_up(&self, event: &KeyEvent) -> bool {
        let modifier = self.store.read(|s| s.modifier_key());
        if !is_modifier_event(modifier, event) {
            return false;
        }
        self.store.update(|s| s.release_modifier())
    }

    /// The window lost focus, so the matching key-up may never arrive.
    pub fn handle_blur(&self) -> bool {
        self.store.update(|s| s.release_modifier())
    }

    /// Switch the modifier key. Events for the old key stop matching at once.
    pub fn set_modifier_key(&self, modifier_key: ModifierKey) -> bool {
        let changed = self.store.update(|s| s.set_modifier_key(modifier_key));
        if changed {
            log::info!("Shortcut modifier key set to {}", modifier_key);
        }
        changed
    }

    /// Replace the shortcut settings and rebuild the action letters.
    pub fn apply_config(&self, mut config: ShortcutConfig) -> bool {
        config.migrate_fixed_window();
        let registry = ShortcutRegistry::from_config(&config);
        let changed = self.store.update(|s| s.replace_config(config));
        if changed {
            *self.registry.lock() = registry;
        }
        changed
    }

    /// Apply shortcut settings changed in another window.
    ///
    /// Keys may be snake_case or camelCase. Fields the payload leaves out keep
    /// their current values; a payload with no known field is an error.
    pub fn apply_shortcuts_payload(&self, payload: &Value) -> anyhow::Result<bool> {
        let fields = payload
            .as_object()
            .with_context(|| format!("'{}' payload is not an object", SHORTCUTS_STORE_EVENT))?;

        let current = self.store.read(|s| s.config.clone());
        let mut merged = serde_json::to_value(current).context("encoding shortcut settings")?;
        let target = merged
            .as_object_mut()
            .context("shortcut settings did not encode as an object")?;

        let mut known = 0;
        for (key, value) in fields {
            let key = snake_case(key);
            match target.get_mut(&key) {
                Some(slot) => {
                    *slot = value.clone();
                    known += 1;
                }
                None => log::debug!("ignoring unknown shortcut setting '{}'", key),
            }
        }
        if known == 0 {
            anyhow::bail!("'{}' payload has no shortcut settings", SHORTCUTS_STORE_EVENT);
        }

        let config: ShortcutConfig = serde_json::from_value(merged)
            .with_context(|| format!("invalid '{}' payload", SHORTCUTS_STORE_EVENT))?;
        Ok(self.apply_config(config))
    }
}

/// `newSession` -> `new_session`. Already snake_case keys pass through.
fn snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HeadlessView;
    use crate::store::new_store;
    use coco_desk_keybindings::NamedKey;
    use serde_json::json;

    fn coordinator(modifier: ModifierKey) -> (Arc<ShortcutCoordinator>, Arc<HeadlessView>) {
        let view = Arc::new(HeadlessView::new());
        let mut state = ShortcutState::default();
        state.set_modifier_key(modifier);
        let coordinator = ShortcutCoordinator::new(new_store("shortcuts", state), view.clone());
        (coordinator, view)
    }

    #[test]
    fn test_other_keys_do_not_press_modifier() {
        let (shortcuts, _) = coordinator(ModifierKey::Alt);
        shortcuts.handle_key_down(&KeyEvent::named(NamedKey::Control));
        assert!(!shortcuts.state().modifier_key_pressed);
        shortcuts.handle_key_down(&KeyEvent::named(NamedKey::Alt));
        assert!(shortcuts.state().modifier_key_pressed);
    }

    #[test]
    fn test_action_letter_only_while_held() {
        let (shortcuts, _) = coordinator(ModifierKey::Alt);
        let mut actions = shortcuts.actions();

        assert_eq!(shortcuts.handle_key_down(&KeyEvent::character("n")), None);

        shortcuts.handle_key_down(&KeyEvent::named(NamedKey::Alt));
        assert_eq!(
            shortcuts.handle_key_down(&KeyEvent::character("n")),
            Some(ShortcutAction::NewSession)
        );
        assert_eq!(actions.try_recv().ok(), Some(ShortcutAction::NewSession));

        shortcuts.handle_key_up(&KeyEvent::named(NamedKey::Alt).released());
        assert_eq!(shortcuts.handle_key_down(&KeyEvent::character("n")), None);
    }

    #[test]
    fn test_blur_releases_modifier() {
        let (shortcuts, _) = coordinator(ModifierKey::Ctrl);
        shortcuts.handle_key_down(&KeyEvent::named(NamedKey::Control));
        assert!(shortcuts.handle_blur());
        assert!(!shortcuts.state().modifier_key_pressed);
    }

    #[test]
    fn test_payload_rebuilds_letters() {
        let (shortcuts, _) = coordinator(ModifierKey::Alt);
        let changed = shortcuts
            .apply_shortcuts_payload(&json!({ "modifier_key": "alt", "new_session": "X" }))
            .unwrap();
        assert!(changed);

        shortcuts.handle_key_down(&KeyEvent::named(NamedKey::Alt));
        assert_eq!(
            shortcuts.handle_key_down(&KeyEvent::character("x")),
            Some(ShortcutAction::NewSession)
        );
    }

    #[test]
    fn test_camel_case_payload_updates_settings() {
        let (shortcuts, _) = coordinator(ModifierKey::Alt);
        shortcuts
            .apply_shortcuts_payload(&json!({ "new_session": "X", "ai_assistant": "Q" }))
            .unwrap();

        let changed = shortcuts
            .apply_shortcuts_payload(&json!({ "modifierKey": "alt", "newSession": "Z" }))
            .unwrap();
        assert!(changed);

        let config = shortcuts.state().config;
        assert_eq!(config.modifier_key, ModifierKey::Alt);
        assert_eq!(config.new_session, "Z");
        // Left out of the payload, so kept
        assert_eq!(config.ai_assistant, "Q");
    }

    #[test]
    fn test_payload_without_known_fields_is_refused() {
        let (shortcuts, _) = coordinator(ModifierKey::Alt);
        shortcuts
            .apply_shortcuts_payload(&json!({ "new_session": "X" }))
            .unwrap();

        assert!(shortcuts.apply_shortcuts_payload(&json!({ "theme": "dark" })).is_err());
        assert!(shortcuts.apply_shortcuts_payload(&json!("alt")).is_err());

        let config = shortcuts.state().config;
        assert_eq!(config.modifier_key, ModifierKey::Alt);
        assert_eq!(config.new_session, "X");
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("modifierKey"), "modifier_key");
        assert_eq!(snake_case("internetSearchScope"), "internet_search_scope");
        assert_eq!(snake_case("new_session"), "new_session");
        assert_eq!(snake_case("external"), "external");
    }

    #[test]
    fn test_bad_payload_is_an_error() {
        let (shortcuts, _) = coordinator(ModifierKey::Alt);
        assert!(shortcuts.apply_shortcuts_payload(&json!({ "modifier_key": 5 })).is_err());
        assert_eq!(shortcuts.state().modifier_key(), ModifierKey::Alt);
    }
}
