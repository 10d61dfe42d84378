//! Typed errors for update checks.
//!
//! Callers match on the variant to tell a flaky connection apart from a
//! broken release feed. The `Display` text is what ends up after
//! "Update failed: " in the notification list.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateError {
    /// DNS, connection, TLS or non-2xx response from the feed.
    #[error("network error fetching '{url}': {reason}")]
    Network { url: String, reason: String },

    /// The feed answered, but not with usable release metadata.
    #[error("malformed release metadata: {0}")]
    Malformed(String),

    /// A version string could not be parsed as semver.
    #[error("invalid version '{value}': {reason}")]
    Version { value: String, reason: String },

    /// The endpoint is not HTTPS or not on the release host allowlist.
    #[error("{0}")]
    InsecureUrl(String),

    /// Anything reported by a shell that does not classify its failures.
    #[error("{0}")]
    Other(String),
}

impl UpdateError {
    pub fn network(url: &str, reason: impl ToString) -> Self {
        Self::Network {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether retrying later could succeed without a new release.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}
