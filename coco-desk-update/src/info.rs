//! Release metadata returned by an update check.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Information about an available update.
///
/// Only `version` is interpreted. Everything else the feed sends is kept in
/// `extra` and forwarded untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateInfo {
    /// The new version (feeds may also call this `number`)
    #[serde(alias = "number")]
    pub version: String,
    /// Release notes
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "body")]
    pub notes: Option<String>,
    /// When the release was published
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "date")]
    pub pub_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UpdateInfo {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            notes: None,
            pub_date: None,
            extra: Map::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// The version without a leading `v`.
    pub fn bare_version(&self) -> &str {
        self.version.strip_prefix('v').unwrap_or(&self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_alias_and_extra_fields() {
        let info: UpdateInfo = serde_json::from_str(
            r#"{"number":"1.2.0","notes":"Fixes","platforms":{"linux-x86_64":{"url":"u"}}}"#,
        )
        .unwrap();
        assert_eq!(info.version, "1.2.0");
        assert_eq!(info.notes.as_deref(), Some("Fixes"));
        assert!(info.extra.contains_key("platforms"));
    }

    #[test]
    fn test_bare_version() {
        assert_eq!(UpdateInfo::new("v0.9.1").bare_version(), "0.9.1");
        assert_eq!(UpdateInfo::new("0.9.1").bare_version(), "0.9.1");
    }
}
