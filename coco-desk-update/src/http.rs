//! HTTP client helper for the release feed.

use crate::error::UpdateError;
use std::time::Duration;
use ureq::Agent;
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};

/// Global timeout for all HTTP operations (30 seconds).
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum response body size for release metadata (1 MB).
pub const MAX_FEED_RESPONSE_SIZE: u64 = 1024 * 1024;

/// Hosts allowed to serve release metadata.
const ALLOWED_HOSTS: &[&str] = &["release.infinilabs.com"];

/// Validate that a URL is safe to use for update checks.
///
/// HTTPS only, and the host must be on the release allowlist.
pub fn validate_update_url(url: &str) -> Result<(), UpdateError> {
    let parsed = url::Url::parse(url)
        .map_err(|e| UpdateError::InsecureUrl(format!("Invalid URL '{}': {}", url, e)))?;

    if parsed.scheme() != "https" {
        return Err(UpdateError::InsecureUrl(format!(
            "Insecure URL scheme '{}' rejected; only HTTPS is allowed. URL: {}",
            parsed.scheme(),
            url
        )));
    }

    let host = parsed.host_str().unwrap_or("");
    if !ALLOWED_HOSTS.contains(&host) {
        return Err(UpdateError::InsecureUrl(format!(
            "URL host '{}' is not in the allowed list for update checks. \
             Allowed hosts: {}. URL: {}",
            host,
            ALLOWED_HOSTS.join(", "),
            url
        )));
    }

    Ok(())
}

/// Create a new HTTP agent configured with rustls and a global timeout.
pub fn agent() -> Agent {
    let tls_config = TlsConfig::builder()
        .provider(TlsProvider::Rustls)
        .root_certs(RootCerts::WebPki)
        .build();

    Agent::config_builder()
        .tls_config(tls_config)
        .timeout_global(Some(HTTP_TIMEOUT))
        .build()
        .into()
}

/// GET a release feed endpoint.
///
/// Returns `Ok(None)` for `204 No Content` or an empty body, which is how
/// the feed says "nothing newer".
pub fn fetch_feed(url: &str, user_agent: &str) -> Result<Option<String>, UpdateError> {
    validate_update_url(url)?;

    let response = agent()
        .get(url)
        .header("User-Agent", user_agent)
        .header("Accept", "application/json")
        .call()
        .map_err(|e| UpdateError::network(url, e))?;

    if response.status().as_u16() == 204 {
        return Ok(None);
    }

    let body = response
        .into_body()
        .with_config()
        .limit(MAX_FEED_RESPONSE_SIZE)
        .read_to_string()
        .map_err(|e| UpdateError::network(url, format!("failed to read response body: {}", e)))?;

    if body.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_release_host() {
        assert!(
            validate_update_url(
                "https://release.infinilabs.com/coco/app/.latest.json?target=linux&arch=x86_64"
            )
            .is_ok()
        );
    }

    #[test]
    fn test_rejected_http_scheme() {
        let err = validate_update_url("http://release.infinilabs.com/coco/app/.latest.json")
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("http"), "Error should mention the scheme: {msg}");
        assert!(msg.contains("HTTPS"), "Error should mention HTTPS: {msg}");
        assert!(matches!(err, UpdateError::InsecureUrl(_)));
    }

    #[test]
    fn test_rejected_unknown_host() {
        let msg = validate_update_url("https://evil.example.com/.latest.json")
            .unwrap_err()
            .to_string();
        assert!(msg.contains("evil.example.com"));
        assert!(msg.contains("allowed list"));
    }

    #[test]
    fn test_rejected_lookalike_host() {
        assert!(validate_update_url("https://release.infinilabs.com.evil.net/x").is_err());
        assert!(validate_update_url("https://cdn.release.infinilabs.com/x").is_err());
    }

    #[test]
    fn test_rejected_invalid_url() {
        let msg = validate_update_url("not a url at all")
            .unwrap_err()
            .to_string();
        assert!(msg.contains("Invalid URL"));
    }
}
