use coco_desk_config::{ModifierKey, ShortcutConfig, StateFile};
use serde::{Deserialize, Serialize};

/// Shortcut settings plus live modifier-key state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutState {
    #[serde(flatten)]
    pub config: ShortcutConfig,

    /// The configured modifier is currently held down
    #[serde(skip)]
    pub modifier_key_pressed: bool,

    /// A popover panel was on screen at the last modifier press
    #[serde(skip)]
    pub open_popover: bool,
}

impl ShortcutState {
    pub fn modifier_key(&self) -> ModifierKey {
        self.config.modifier_key
    }

    /// Display label for the mode switch action.
    pub fn mode_switch(&self) -> &str {
        &self.config.mode_switch
    }

    pub fn set_modifier_key(&mut self, modifier_key: ModifierKey) -> bool {
        let changed = self.config.set_modifier_key(modifier_key);
        // A press of the old key can never be matched by a release of the new one.
        if changed {
            self.modifier_key_pressed = false;
        }
        changed
    }

    /// Modifier went down. `popover_present` is the view query result taken
    /// right now, not a cached value.
    pub fn press_modifier(&mut self, popover_present: bool) -> bool {
        let changed = self.open_popover != popover_present || !self.modifier_key_pressed;
        self.open_popover = popover_present;
        self.modifier_key_pressed = true;
        changed
    }

    /// Modifier went up. `open_popover` keeps its last value.
    pub fn release_modifier(&mut self) -> bool {
        if !self.modifier_key_pressed {
            return false;
        }
        self.modifier_key_pressed = false;
        true
    }

    /// Replace the persisted settings, keeping live key state.
    pub fn replace_config(&mut self, config: ShortcutConfig) -> bool {
        if self.config == config {
            return false;
        }
        if self.config.modifier_key != config.modifier_key {
            self.modifier_key_pressed = false;
        }
        self.config = config;
        true
    }
}

impl StateFile for ShortcutState {
    const FILE_NAME: &'static str = <ShortcutConfig as StateFile>::FILE_NAME;

    fn after_load(&mut self) {
        self.config.migrate_fixed_window();
    }
}
