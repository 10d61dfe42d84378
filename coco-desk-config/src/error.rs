//! Typed error variants for the coco-desk-config crate.
//!
//! Callers that only need a message can use the `Display` impl; callers that
//! want to recover (for example falling back to defaults on a parse error)
//! can match on the variant.

use std::fmt;
use std::path::PathBuf;

/// Errors that can occur when loading or saving a state file.
#[derive(Debug)]
pub enum ConfigError {
    /// An I/O error occurred reading or writing the state file.
    Io {
        /// File that was being read or written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The state file contained YAML that could not be parsed.
    Parse {
        /// File that failed to parse (empty for in-memory documents).
        path: PathBuf,
        /// Underlying YAML error.
        source: serde_yaml_ng::Error,
    },

    /// The value could not be serialized to YAML.
    Serialize(serde_yaml_ng::Error),

    /// A field value failed semantic validation.
    Validation(String),
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, source: serde_yaml_ng::Error) -> Self {
        ConfigError::Parse {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "I/O error on state file {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "YAML parse error in {}: {source}", path.display())
            }
            ConfigError::Serialize(e) => write!(f, "Failed to serialize state: {e}"),
            ConfigError::Validation(msg) => write!(f, "Config validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Serialize(e) => Some(e),
            ConfigError::Validation(_) => None,
        }
    }
}
