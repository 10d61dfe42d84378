//! State-file persistence and path resolution.
//!
//! Covers:
//! - `config_dir` (XDG convention on Unix, `%APPDATA%` on Windows)
//! - `StateFile`: load/save of one persisted subset per YAML file, with
//!   atomic writes and default-on-missing semantics

use crate::error::ConfigError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name used under the platform config root.
const APP_DIR: &str = "coco-desk";

/// Get the configuration directory path (using XDG convention)
pub fn config_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join(APP_DIR)
        } else {
            PathBuf::from(".")
        }
    }
    #[cfg(not(target_os = "windows"))]
    {
        // Use XDG convention on all platforms: ~/.config/coco-desk/
        if let Some(home_dir) = dirs::home_dir() {
            home_dir.join(".config").join(APP_DIR)
        } else {
            PathBuf::from(".")
        }
    }
}

/// A persisted subset of application state stored in its own YAML file.
///
/// Implementors choose what is persisted through their serde attributes:
/// runtime-only fields are `#[serde(skip)]` and come back as `Default` on load.
pub trait StateFile: Serialize + DeserializeOwned + Default {
    /// File name inside the config directory, e.g. `appearance.yaml`.
    const FILE_NAME: &'static str;

    /// Hook run after a successful load (clamping, migrations).
    fn after_load(&mut self) {}

    /// Path of this state file inside `dir`.
    fn path_in(dir: &Path) -> PathBuf {
        dir.join(Self::FILE_NAME)
    }

    /// Serialize the persisted subset to a YAML document.
    fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml_ng::to_string(self).map_err(ConfigError::Serialize)
    }

    /// Parse a YAML document produced by [`StateFile::to_yaml`].
    fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let mut value: Self =
            serde_yaml_ng::from_str(yaml).map_err(|e| ConfigError::parse(PathBuf::new(), e))?;
        value.after_load();
        Ok(value)
    }

    /// Load from `dir`, returning defaults when the file does not exist.
    fn load_from(dir: &Path) -> Result<Self, ConfigError> {
        let path = Self::path_in(dir);
        if !path.exists() {
            log::info!("State file {:?} not found, using defaults", path);
            let mut value = Self::default();
            value.after_load();
            return Ok(value);
        }

        log::debug!("Loading state file {:?}", path);
        let contents = fs::read_to_string(&path).map_err(|e| ConfigError::io(&path, e))?;
        let mut value: Self =
            serde_yaml_ng::from_str(&contents).map_err(|e| ConfigError::parse(&path, e))?;
        value.after_load();
        Ok(value)
    }

    /// Load from `dir`, logging and falling back to defaults on any error.
    fn load_or_default(dir: &Path) -> Self {
        match Self::load_from(dir) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("{e}; falling back to defaults for {}", Self::FILE_NAME);
                let mut value = Self::default();
                value.after_load();
                value
            }
        }
    }

    /// Save to `dir`, creating it if needed.
    fn save_to(&self, dir: &Path) -> Result<(), ConfigError> {
        fs::create_dir_all(dir).map_err(|e| ConfigError::io(dir, e))?;

        let path = Self::path_in(dir);
        let yaml = self.to_yaml()?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml).map_err(|e| ConfigError::io(&temp_path, e))?;
        fs::rename(&temp_path, &path).map_err(|e| ConfigError::io(&path, e))?;

        log::debug!("Saved state file {:?}", path);
        Ok(())
    }
}

impl StateFile for crate::AppearanceConfig {
    const FILE_NAME: &'static str = "appearance.yaml";

    fn after_load(&mut self) {
        self.normalize();
    }
}

impl StateFile for crate::ShortcutConfig {
    const FILE_NAME: &'static str = "shortcuts.yaml";

    fn after_load(&mut self) {
        self.migrate_fixed_window();
    }
}

impl StateFile for crate::UpdateConfig {
    const FILE_NAME: &'static str = "updates.yaml";
}
