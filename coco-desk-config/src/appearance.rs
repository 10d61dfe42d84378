//! Appearance settings shared by the launcher and settings windows.

use crate::defaults;
use serde::{Deserialize, Serialize};

/// Persisted appearance subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppearanceConfig {
    /// Window background opacity in percent (1-100)
    #[serde(default = "crate::defaults::opacity")]
    pub opacity: u8,

    /// Follow the snapshot (pre-release) update channel
    #[serde(default = "crate::defaults::bool_false")]
    pub snapshot_update: bool,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            opacity: defaults::opacity(),
            snapshot_update: false,
        }
    }
}

impl AppearanceConfig {
    /// Set the opacity. `None` and `0` fall back to the default; values above
    /// 100 are clamped. Returns true if the stored value changed.
    pub fn set_opacity(&mut self, opacity: Option<u8>) -> bool {
        let next = match opacity {
            None | Some(0) => defaults::OPACITY,
            Some(v) => v.min(100),
        };
        if self.opacity == next {
            return false;
        }
        self.opacity = next;
        true
    }

    /// Switch the update channel. Returns true if the value changed.
    pub fn set_snapshot_update(&mut self, snapshot_update: bool) -> bool {
        if self.snapshot_update == snapshot_update {
            return false;
        }
        self.snapshot_update = snapshot_update;
        true
    }

    /// Clamp values that a hand-edited file may have pushed out of range.
    pub fn normalize(&mut self) {
        if self.opacity == 0 || self.opacity > 100 {
            log::warn!(
                "Appearance opacity {} out of range, using {}",
                self.opacity,
                if self.opacity == 0 { defaults::OPACITY } else { 100 }
            );
            self.set_opacity(Some(self.opacity));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppearanceConfig::default();
        assert_eq!(config.opacity, 30);
        assert!(!config.snapshot_update);
    }

    #[test]
    fn test_set_opacity_falls_back_to_default() {
        let mut config = AppearanceConfig::default();
        assert!(config.set_opacity(Some(55)));
        assert_eq!(config.opacity, 55);

        assert!(config.set_opacity(None));
        assert_eq!(config.opacity, 30);

        config.set_opacity(Some(80));
        config.set_opacity(Some(0));
        assert_eq!(config.opacity, 30);
    }

    #[test]
    fn test_set_opacity_clamps_and_reports_change() {
        let mut config = AppearanceConfig::default();
        assert!(config.set_opacity(Some(250)));
        assert_eq!(config.opacity, 100);
        assert!(!config.set_opacity(Some(100)));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: AppearanceConfig = serde_yaml_ng::from_str("snapshot_update: true").unwrap();
        assert_eq!(config.opacity, 30);
        assert!(config.snapshot_update);
    }

    #[test]
    fn test_normalize() {
        let mut config = AppearanceConfig {
            opacity: 0,
            snapshot_update: false,
        };
        config.normalize();
        assert_eq!(config.opacity, 30);

        config.opacity = 180;
        config.normalize();
        assert_eq!(config.opacity, 100);
    }
}
