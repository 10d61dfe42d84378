use coco_desk_config::{AppearanceConfig, StateFile};
use serde::{Deserialize, Serialize};

/// Window session flags plus the persisted appearance settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Running inside the native shell. Set once at startup.
    #[serde(skip)]
    is_tauri: bool,

    /// User pinned the window; blur must not hide it
    #[serde(skip)]
    pub is_pinned: bool,

    /// Something (a dialog, a file picker) needs the window kept up
    #[serde(skip)]
    pub visible: bool,

    /// Lost OS focus but was kept on screen
    #[serde(skip)]
    pub blurred: bool,

    #[serde(skip)]
    pub context_menu_visible: bool,

    #[serde(flatten)]
    pub appearance: AppearanceConfig,
}

impl SessionState {
    pub fn is_tauri(&self) -> bool {
        self.is_tauri
    }

    /// Record that the native shell is present. There is no way back.
    pub fn mark_native(&mut self) -> bool {
        if self.is_tauri {
            return false;
        }
        self.is_tauri = true;
        true
    }

    pub fn set_pinned(&mut self, is_pinned: bool) -> bool {
        replace(&mut self.is_pinned, is_pinned)
    }

    pub fn set_visible(&mut self, visible: bool) -> bool {
        replace(&mut self.visible, visible)
    }

    pub fn set_blurred(&mut self, blurred: bool) -> bool {
        replace(&mut self.blurred, blurred)
    }

    pub fn set_context_menu_visible(&mut self, visible: bool) -> bool {
        replace(&mut self.context_menu_visible, visible)
    }

    /// Whether a blur should leave the window on screen.
    pub fn keeps_window_on_blur(&self) -> bool {
        self.is_pinned || self.visible
    }
}

impl StateFile for SessionState {
    const FILE_NAME: &'static str = <AppearanceConfig as StateFile>::FILE_NAME;

    fn after_load(&mut self) {
        self.appearance.normalize();
    }
}

fn replace(slot: &mut bool, value: bool) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
