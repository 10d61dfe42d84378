//! The release feed: a static `.latest.json` per channel.
//!
//! Endpoints are templates with `{{target}}`, `{{arch}}` and
//! `{{current_version}}` placeholders. Endpoints are tried in order and the
//! first one that answers wins. A successful answer is either empty (no
//! update) or release metadata whose `version` is compared against the
//! running version.

use crate::error::UpdateError;
use crate::http;
use crate::info::UpdateInfo;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

const STABLE_ENDPOINT: &str = "https://release.infinilabs.com/coco/app/.latest.json?target={{target}}&arch={{arch}}&current_version={{current_version}}";

const SNAPSHOT_ENDPOINT: &str = "https://release.infinilabs.com/coco/app/snapshot/.latest.json?target={{target}}&arch={{arch}}&current_version={{current_version}}";

/// Which releases to look at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateChannel {
    #[default]
    Stable,
    /// Pre-release builds; falls back to stable when the snapshot feed fails
    Snapshot,
}

impl UpdateChannel {
    pub fn from_snapshot_flag(snapshot_update: bool) -> Self {
        if snapshot_update {
            Self::Snapshot
        } else {
            Self::Stable
        }
    }
}

impl fmt::Display for UpdateChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stable => f.write_str("stable"),
            Self::Snapshot => f.write_str("snapshot"),
        }
    }
}

/// Feed target name for the current OS.
pub fn current_target() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

/// Fill in the endpoint placeholders.
pub fn render_endpoint(template: &str, target: &str, arch: &str, current_version: &str) -> String {
    template
        .replace("{{target}}", target)
        .replace("{{arch}}", arch)
        .replace("{{current_version}}", current_version)
}

/// Parse a feed response body.
///
/// Returns `None` when the body is empty or the advertised version is not
/// newer than `current`.
pub fn parse_feed_response(
    body: &str,
    current: &Version,
) -> Result<Option<UpdateInfo>, UpdateError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    let info: UpdateInfo =
        serde_json::from_str(body).map_err(|e| UpdateError::Malformed(e.to_string()))?;

    let latest = Version::parse(info.bare_version()).map_err(|e| UpdateError::Version {
        value: info.version.clone(),
        reason: e.to_string(),
    })?;

    if latest > *current {
        Ok(Some(info))
    } else {
        log::debug!("Feed version {} is not newer than {}", latest, current);
        Ok(None)
    }
}

/// Blocking client for the release feed.
#[derive(Debug, Clone)]
pub struct ReleaseFeed {
    current_version: String,
    target: String,
    arch: String,
}

impl ReleaseFeed {
    /// Pass `env!("CARGO_PKG_VERSION")` from the binary crate so the version
    /// resolves to the app version rather than this crate's.
    pub fn new(current_version: impl Into<String>) -> Self {
        Self {
            current_version: current_version.into(),
            target: current_target().to_string(),
            arch: std::env::consts::ARCH.to_string(),
        }
    }

    pub fn current_version(&self) -> &str {
        &self.current_version
    }

    /// Endpoints to try for `channel`, in order.
    pub fn endpoints(&self, channel: UpdateChannel) -> Vec<String> {
        let mut templates = vec![STABLE_ENDPOINT];
        if channel == UpdateChannel::Snapshot {
            templates.insert(0, SNAPSHOT_ENDPOINT);
        }
        templates
            .into_iter()
            .map(|t| render_endpoint(t, &self.target, &self.arch, &self.current_version))
            .collect()
    }

    /// Fetch the newest release for `channel` (blocking).
    ///
    /// Only network failures move on to the next endpoint; a feed that
    /// answers with garbage is reported as is.
    pub fn check(&self, channel: UpdateChannel) -> Result<Option<UpdateInfo>, UpdateError> {
        let current =
            Version::parse(&self.current_version).map_err(|e| UpdateError::Version {
                value: self.current_version.clone(),
                reason: e.to_string(),
            })?;
        let user_agent = format!("coco-desk/{}", self.current_version);

        let mut last_error = None;
        for url in self.endpoints(channel) {
            log::info!("Checking for updates: {}", url);
            match http::fetch_feed(&url, &user_agent) {
                Ok(Some(body)) => return parse_feed_response(&body, &current),
                Ok(None) => return Ok(None),
                Err(e) if e.is_transient() => {
                    log::warn!("Update endpoint failed, trying next: {}", e);
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_error.unwrap_or_else(|| UpdateError::Other("no update endpoints".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_render_endpoint() {
        let url = render_endpoint(STABLE_ENDPOINT, "darwin", "aarch64", "0.4.0");
        assert_eq!(
            url,
            "https://release.infinilabs.com/coco/app/.latest.json?target=darwin&arch=aarch64&current_version=0.4.0"
        );
    }

    #[test]
    fn test_snapshot_endpoint_comes_first() {
        let feed = ReleaseFeed::new("0.4.0");
        let stable = feed.endpoints(UpdateChannel::Stable);
        assert_eq!(stable.len(), 1);
        assert!(!stable[0].contains("/snapshot/"));

        let snapshot = feed.endpoints(UpdateChannel::Snapshot);
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot[0].contains("/snapshot/"));
        assert_eq!(snapshot[1], stable[0]);
    }

    #[test]
    fn test_endpoints_pass_validation() {
        let feed = ReleaseFeed::new("0.4.0");
        for url in feed.endpoints(UpdateChannel::Snapshot) {
            assert!(http::validate_update_url(&url).is_ok(), "{url}");
        }
    }

    #[test]
    fn test_parse_newer_version() {
        let info = parse_feed_response(
            r#"{"version":"v0.5.0","notes":"New","pub_date":"2026-01-01T00:00:00Z"}"#,
            &v("0.4.0"),
        )
        .unwrap()
        .unwrap();
        assert_eq!(info.version, "v0.5.0");
        assert_eq!(info.pub_date.as_deref(), Some("2026-01-01T00:00:00Z"));
    }

    #[test]
    fn test_parse_same_or_older_version() {
        assert_eq!(
            parse_feed_response(r#"{"version":"0.4.0"}"#, &v("0.4.0")).unwrap(),
            None
        );
        assert_eq!(
            parse_feed_response(r#"{"version":"0.3.9"}"#, &v("0.4.0")).unwrap(),
            None
        );
        assert_eq!(parse_feed_response("  \n", &v("0.4.0")).unwrap(), None);
    }

    #[test]
    fn test_parse_failures_are_distinguished() {
        assert!(matches!(
            parse_feed_response("<html>oops</html>", &v("0.4.0")),
            Err(UpdateError::Malformed(_))
        ));
        assert!(matches!(
            parse_feed_response(r#"{"notes":"no version"}"#, &v("0.4.0")),
            Err(UpdateError::Malformed(_))
        ));
        assert!(matches!(
            parse_feed_response(r#"{"version":"soon"}"#, &v("0.4.0")),
            Err(UpdateError::Version { .. })
        ));
    }

    #[test]
    fn test_bad_current_version() {
        let feed = ReleaseFeed::new("not-a-version");
        assert!(matches!(
            feed.check(UpdateChannel::Stable),
            Err(UpdateError::Version { .. })
        ));
    }

    #[test]
    fn test_channel_from_flag() {
        assert_eq!(UpdateChannel::from_snapshot_flag(true), UpdateChannel::Snapshot);
        assert_eq!(UpdateChannel::from_snapshot_flag(false), UpdateChannel::Stable);
        assert_eq!(UpdateChannel::Snapshot.to_string(), "snapshot");
    }
}
