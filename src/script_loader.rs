//! One-shot loading of external script resources (the icon font bundle).
//!
//! Each URL is inserted at most once per loader. A failed remote load falls
//! back to the bundled copy once; a failed fallback is logged and returned.
//! A URL that failed keeps failing without being inserted again.

use crate::platform::{PlatformError, ResourceHost};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

const ICONFONT_PATH: &str = "/assets/fonts/icons/iconfont.js";

/// Where a script ended up coming from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    Remote(String),
    Fallback(String),
    /// The URL was already inserted earlier; nothing was done
    AlreadyLoaded(String),
}

/// Remote and bundled URLs of the icon font for a server `endpoint`.
pub fn iconfont_sources(endpoint: Option<&str>) -> (Option<String>, String) {
    let remote = endpoint
        .map(|e| e.trim().trim_end_matches('/'))
        .filter(|e| !e.is_empty())
        .map(|e| format!("{}{}", e, ICONFONT_PATH));
    (remote, ICONFONT_PATH.to_string())
}

/// Outcome of the one insertion a URL gets.
#[derive(Debug, Clone)]
enum Insertion {
    /// Claimed; either in flight or loaded
    Claimed,
    Failed(String),
}

pub struct ScriptLoader {
    host: Arc<dyn ResourceHost>,
    inserted: Mutex<HashMap<String, Insertion>>,
}

impl ScriptLoader {
    pub fn new(host: Arc<dyn ResourceHost>) -> Self {
        Self {
            host,
            inserted: Mutex::new(HashMap::new()),
        }
    }

    /// True once `url` has been claimed and has not failed.
    pub fn is_loaded(&self, url: &str) -> bool {
        matches!(self.inserted.lock().get(url), Some(Insertion::Claimed))
    }

    /// Load `remote`, or `fallback` when there is no remote or it fails.
    pub async fn load(
        &self,
        remote: Option<&str>,
        fallback: &str,
    ) -> Result<ScriptSource, PlatformError> {
        let remote = remote.map(str::trim).filter(|url| !url.is_empty());

        if let Some(url) = remote {
            match self.insert(url).await {
                Ok(true) => {
                    log::debug!("script loaded: {}", url);
                    return Ok(ScriptSource::Remote(url.to_string()));
                }
                Ok(false) => return Ok(ScriptSource::AlreadyLoaded(url.to_string())),
                Err(e) => log::warn!("script {} failed, using bundled copy: {}", url, e),
            }
        }

        match self.insert(fallback).await {
            Ok(true) => Ok(ScriptSource::Fallback(fallback.to_string())),
            Ok(false) => Ok(ScriptSource::AlreadyLoaded(fallback.to_string())),
            Err(e) => {
                log::error!("bundled script {} failed: {}", fallback, e);
                Err(e)
            }
        }
    }

    /// Insert `url` unless it was claimed before. `Ok(false)` means it already
    /// loaded; an earlier failure is returned again without touching the host.
    async fn insert(&self, url: &str) -> Result<bool, PlatformError> {
        {
            let mut inserted = self.inserted.lock();
            match inserted.get(url) {
                Some(Insertion::Claimed) => return Ok(false),
                Some(Insertion::Failed(reason)) => {
                    return Err(PlatformError::ResourceLoad {
                        url: url.to_string(),
                        reason: reason.clone(),
                    });
                }
                None => {
                    inserted.insert(url.to_string(), Insertion::Claimed);
                }
            }
        }

        self.host.insert_script(url).await.map(|()| true).inspect_err(|e| {
            self.inserted
                .lock()
                .insert(url.to_string(), Insertion::Failed(e.to_string()));
        })
    }
}
