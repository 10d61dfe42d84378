use coco_desk_config::{StateFile, UpdateConfig};
use coco_desk_update::{UpdateInfo, is_skipped};
use serde::{Deserialize, Serialize};

/// Pending update prompt plus the persisted update settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateState {
    #[serde(flatten)]
    pub config: UpdateConfig,

    /// Show the update prompt
    #[serde(skip)]
    pub visible: bool,

    /// The prompt can be dismissed without updating
    #[serde(skip, default = "default_optional")]
    pub is_optional: bool,

    /// Metadata from the last successful check
    #[serde(skip)]
    pub update_info: Option<UpdateInfo>,
}

fn default_optional() -> bool {
    true
}

impl Default for UpdateState {
    fn default() -> Self {
        Self {
            config: UpdateConfig::default(),
            visible: false,
            is_optional: default_optional(),
            update_info: None,
        }
    }
}

impl UpdateState {
    pub fn skip_version(&self) -> Option<&str> {
        self.config.skipped_version.as_deref()
    }

    pub fn set_visible(&mut self, visible: bool) -> bool {
        if self.visible == visible {
            return false;
        }
        self.visible = visible;
        true
    }

    pub fn set_optional(&mut self, is_optional: bool) -> bool {
        if self.is_optional == is_optional {
            return false;
        }
        self.is_optional = is_optional;
        true
    }

    pub fn set_skip_version(&mut self, version: Option<String>) -> bool {
        self.config.set_skipped_version(version)
    }

    /// Apply a successful check that found `info`.
    ///
    /// `update_info` is replaced wholesale. The prompt is raised unless
    /// `info.version` is the skipped one; an already visible prompt stays up.
    pub fn apply_check(&mut self, info: UpdateInfo) -> bool {
        let suppressed = is_skipped(self.skip_version(), &info.version);
        if suppressed {
            log::info!("Update {} found but skipped by user", info.version);
        }
        let mut changed = self.update_info.as_ref() != Some(&info);
        self.update_info = Some(info);
        if !suppressed {
            changed |= self.set_visible(true);
        }
        changed
    }

    pub fn record_check_time(&mut self, timestamp: String) -> bool {
        if self.config.last_update_check.as_deref() == Some(timestamp.as_str()) {
            return false;
        }
        self.config.last_update_check = Some(timestamp);
        true
    }
}

impl StateFile for UpdateState {
    const FILE_NAME: &'static str = <UpdateConfig as StateFile>::FILE_NAME;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = UpdateState::default();
        assert!(!state.visible);
        assert!(state.is_optional);
        assert!(state.update_info.is_none());
    }

    #[test]
    fn test_apply_check_respects_skip_version() {
        let mut state = UpdateState::default();
        state.set_skip_version(Some("1.2.0".into()));

        state.apply_check(UpdateInfo::new("1.2.0").with_notes("first"));
        assert!(!state.visible);
        assert_eq!(
            state.update_info.as_ref().and_then(|i| i.notes.as_deref()),
            Some("first")
        );

        state.apply_check(UpdateInfo::new("1.3.0"));
        assert!(state.visible);
        assert_eq!(state.update_info.as_ref().map(|i| i.version.as_str()), Some("1.3.0"));
        // Replaced wholesale, not merged
        assert!(state.update_info.as_ref().unwrap().notes.is_none());
    }

    #[test]
    fn test_only_config_is_persisted() {
        let mut state = UpdateState::default();
        state.set_skip_version(Some("2.0.0".into()));
        state.apply_check(UpdateInfo::new("2.1.0"));
        state.set_optional(false);

        let back = UpdateState::from_yaml(&state.to_yaml().unwrap()).unwrap();
        assert_eq!(back.skip_version(), Some("2.0.0"));
        assert!(!back.visible);
        assert!(back.is_optional);
        assert!(back.update_info.is_none());
    }
}
