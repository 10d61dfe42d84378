use super::{PlatformAdapter, PlatformError, PlatformFuture, ResourceHost};
use coco_desk_update::{ReleaseFeed, UpdateChannel, UpdateError, UpdateInfo};
use parking_lot::Mutex;

/// Adapter for running without a native shell.
///
/// Window operations are logged and tracked, update checks hit the real
/// release feed on a blocking thread, and relaunching is refused.
#[derive(Debug)]
pub struct HeadlessAdapter {
    feed: ReleaseFeed,
    window_visible: Mutex<bool>,
    always_on_top: Mutex<bool>,
}

impl HeadlessAdapter {
    pub fn new(current_version: &str) -> Self {
        Self {
            feed: ReleaseFeed::new(current_version),
            window_visible: Mutex::new(true),
            always_on_top: Mutex::new(false),
        }
    }

    pub fn window_visible(&self) -> bool {
        *self.window_visible.lock()
    }

    pub fn always_on_top(&self) -> bool {
        *self.always_on_top.lock()
    }
}

impl PlatformAdapter for HeadlessAdapter {
    fn hide_window(&self) -> PlatformFuture<()> {
        log::info!("window: hide");
        *self.window_visible.lock() = false;
        Box::pin(async { Ok(()) })
    }

    fn show_window(&self) -> PlatformFuture<()> {
        log::info!("window: show");
        *self.window_visible.lock() = true;
        Box::pin(async { Ok(()) })
    }

    fn set_always_on_top(&self, always_on_top: bool) -> PlatformFuture<()> {
        log::info!("window: always on top = {}", always_on_top);
        *self.always_on_top.lock() = always_on_top;
        Box::pin(async { Ok(()) })
    }

    fn check_update(&self, channel: UpdateChannel) -> PlatformFuture<Option<UpdateInfo>> {
        let feed = self.feed.clone();
        Box::pin(async move {
            match tokio::task::spawn_blocking(move || feed.check(channel)).await {
                Ok(result) => result.map_err(PlatformError::from),
                Err(e) => Err(PlatformError::Update(UpdateError::Other(format!(
                    "update task failed: {}",
                    e
                )))),
            }
        })
    }

    fn relaunch_app(&self) -> PlatformFuture<()> {
        Box::pin(async { Err(PlatformError::Unsupported("relaunch")) })
    }

    fn emit_event(&self, name: &str, payload: serde_json::Value) -> PlatformFuture<()> {
        log::info!("emit '{}': {}", name, payload);
        Box::pin(async { Ok(()) })
    }

    fn is_native(&self) -> bool {
        false
    }
}

impl ResourceHost for HeadlessAdapter {
    fn insert_script(&self, url: &str) -> PlatformFuture<()> {
        log::info!("script: {}", url);
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_window_ops_are_tracked() {
        let adapter = HeadlessAdapter::new("0.3.0");
        assert!(adapter.window_visible());
        adapter.hide_window().await.unwrap();
        assert!(!adapter.window_visible());
        adapter.set_always_on_top(true).await.unwrap();
        assert!(adapter.always_on_top());
    }

    #[tokio::test]
    async fn test_relaunch_unsupported() {
        let adapter = HeadlessAdapter::new("0.3.0");
        assert!(matches!(
            adapter.relaunch_app().await,
            Err(PlatformError::Unsupported(_))
        ));
        assert!(!adapter.is_native());
    }

    #[tokio::test]
    async fn test_bad_version_fails_without_network() {
        let adapter = HeadlessAdapter::new("dev");
        let err = adapter
            .check_update(UpdateChannel::Stable)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PlatformError::Update(UpdateError::Version { .. })
        ));
    }
}
