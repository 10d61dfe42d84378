//! Shared integration test helpers for coco-desk.
//!
//! Include with `mod common;` at the top of a test file. The
//! `#[allow(dead_code)]` suppresses warnings when a file uses only some of
//! the helpers.

#![allow(dead_code)]

use coco_desk::platform::{HeadlessView, RecordingAdapter, RecordingResources};
use coco_desk::{DeskApp, DeskOptions};
use std::sync::Arc;
use tempfile::TempDir;

/// A fully wired app over recording doubles and a temp state directory.
///
/// Background update checks are off so adapter call counts only reflect
/// what the test does. Keep the struct alive for the whole test; dropping
/// it removes the temp dir.
pub struct TestDesk {
    pub app: DeskApp,
    pub adapter: Arc<RecordingAdapter>,
    pub view: Arc<HeadlessView>,
    pub resources: Arc<RecordingResources>,
    pub dir: TempDir,
}

impl TestDesk {
    pub fn new() -> Self {
        Self::in_dir(TempDir::new().expect("Failed to create temp dir"))
    }

    /// Build over an existing state directory, e.g. to test reloading.
    pub fn in_dir(dir: TempDir) -> Self {
        Self::with_adapter(dir, RecordingAdapter::new())
    }

    pub fn with_adapter(dir: TempDir, adapter: RecordingAdapter) -> Self {
        let adapter = Arc::new(adapter);
        let view = Arc::new(HeadlessView::new());
        let resources = Arc::new(RecordingResources::new());
        let app = DeskApp::with_options(
            adapter.clone(),
            view.clone(),
            resources.clone(),
            dir.path(),
            DeskOptions {
                background_update_checks: false,
                ..DeskOptions::default()
            },
        );
        Self {
            app,
            adapter,
            view,
            resources,
            dir,
        }
    }

    /// Tear the app down but keep the state directory.
    pub fn into_dir(self) -> TempDir {
        drop(self.app);
        self.dir
    }
}

/// Give spawned fire-and-forget adapter calls a chance to finish.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
