use serde::{Deserialize, Serialize};
use std::fmt;

/// Modifier key that arms the shortcut overlay while held.
///
/// Stored by its lowercase name (`meta`, `ctrl`, `alt`) so the file stays
/// readable and matches what the settings window writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKey {
    /// Command on macOS, the Windows/Super key elsewhere
    Meta,
    /// Control
    Ctrl,
    /// Alt / Option
    Alt,
}

impl ModifierKey {
    /// Modifier keys offered on the current platform.
    pub fn choices() -> &'static [ModifierKey] {
        #[cfg(target_os = "macos")]
        {
            &[ModifierKey::Meta, ModifierKey::Ctrl]
        }
        #[cfg(not(target_os = "macos"))]
        {
            &[ModifierKey::Ctrl, ModifierKey::Alt]
        }
    }

    /// Parse the symbolic name used in settings payloads.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "meta" | "cmd" | "command" | "super" => Some(ModifierKey::Meta),
            "ctrl" | "control" => Some(ModifierKey::Ctrl),
            "alt" | "option" => Some(ModifierKey::Alt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModifierKey::Meta => "meta",
            ModifierKey::Ctrl => "ctrl",
            ModifierKey::Alt => "alt",
        }
    }
}

impl fmt::Display for ModifierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Update check frequency
///
/// Controls how often the background scheduler asks the native shell for a
/// new release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UpdateCheckFrequency {
    /// Never check automatically (manual checks still work)
    Never,
    /// Check once per day (default)
    #[default]
    Daily,
    /// Check once per week
    Weekly,
    /// Check once per month
    Monthly,
}

impl UpdateCheckFrequency {
    /// Get the duration in seconds for this frequency
    pub fn as_seconds(&self) -> Option<u64> {
        match self {
            UpdateCheckFrequency::Never => None,
            UpdateCheckFrequency::Daily => Some(24 * 60 * 60),
            UpdateCheckFrequency::Weekly => Some(7 * 24 * 60 * 60),
            UpdateCheckFrequency::Monthly => Some(30 * 24 * 60 * 60),
        }
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            UpdateCheckFrequency::Never => "Never",
            UpdateCheckFrequency::Daily => "Daily",
            UpdateCheckFrequency::Weekly => "Weekly",
            UpdateCheckFrequency::Monthly => "Monthly",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_key_names() {
        assert_eq!(ModifierKey::from_name("meta"), Some(ModifierKey::Meta));
        assert_eq!(ModifierKey::from_name("Cmd"), Some(ModifierKey::Meta));
        assert_eq!(ModifierKey::from_name(" ctrl "), Some(ModifierKey::Ctrl));
        assert_eq!(ModifierKey::from_name("option"), Some(ModifierKey::Alt));
        assert_eq!(ModifierKey::from_name("shift"), None);
        assert_eq!(ModifierKey::Alt.to_string(), "alt");
    }

    #[test]
    fn test_modifier_key_serde_lowercase() {
        let yaml = serde_yaml_ng::to_string(&ModifierKey::Ctrl).unwrap();
        assert_eq!(yaml.trim(), "ctrl");
        let parsed: ModifierKey = serde_yaml_ng::from_str("meta").unwrap();
        assert_eq!(parsed, ModifierKey::Meta);
    }

    #[test]
    fn test_update_check_frequency_seconds() {
        assert_eq!(UpdateCheckFrequency::Never.as_seconds(), None);
        assert_eq!(UpdateCheckFrequency::Daily.as_seconds(), Some(86400));
        assert_eq!(UpdateCheckFrequency::Weekly.as_seconds(), Some(604800));
        assert_eq!(UpdateCheckFrequency::Monthly.as_seconds(), Some(2592000));
    }
}
