//! The seam between the coordinators and the host environment.
//!
//! - [`PlatformAdapter`]: window control, update checks, relaunch and event
//!   emission, all asynchronous round-trips to the native shell.
//! - [`ViewLayer`]: synchronous questions about what the presentation layer
//!   shows right now.
//! - [`ResourceHost`]: inserting external script resources.
//!
//! Implementations: [`HeadlessAdapter`] for running without a shell, and the
//! recording doubles in [`recording`] used by tests and the scripted CLI.

mod headless;
pub mod recording;

pub use headless::HeadlessAdapter;
pub use recording::{AdapterCall, AdapterOp, HeadlessView, RecordingAdapter, RecordingResources};

use coco_desk_update::{UpdateChannel, UpdateError, UpdateInfo};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;
use tokio::task::JoinHandle;

/// Boxed future returned by every asynchronous platform call.
pub type PlatformFuture<T> = Pin<Box<dyn Future<Output = Result<T, PlatformError>> + Send + 'static>>;

/// Failure of a platform call.
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    #[error("window {op} failed: {reason}")]
    Window { op: &'static str, reason: String },

    #[error(transparent)]
    Update(#[from] UpdateError),

    #[error("relaunch failed: {0}")]
    Relaunch(String),

    #[error("emitting '{name}' failed: {reason}")]
    Emit { name: String, reason: String },

    #[error("loading '{url}' failed: {reason}")]
    ResourceLoad { url: String, reason: String },

    #[error("{0} is not supported here")]
    Unsupported(&'static str),
}

/// Operations the native shell performs on our behalf.
pub trait PlatformAdapter: Send + Sync {
    fn hide_window(&self) -> PlatformFuture<()>;

    fn show_window(&self) -> PlatformFuture<()>;

    fn set_always_on_top(&self, always_on_top: bool) -> PlatformFuture<()>;

    /// Ask for a newer release. `Ok(None)` means up to date.
    fn check_update(&self, channel: UpdateChannel) -> PlatformFuture<Option<UpdateInfo>>;

    /// Restart the app. On success the process is replaced and the future
    /// never meaningfully resolves.
    fn relaunch_app(&self) -> PlatformFuture<()>;

    /// Broadcast a named event to the other windows.
    fn emit_event(&self, name: &str, payload: serde_json::Value) -> PlatformFuture<()>;

    /// Whether this adapter talks to a real native shell.
    fn is_native(&self) -> bool;
}

/// Elements the coordinators look for in the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewMarker {
    /// Any popover panel; several may be open, any one counts
    PopoverPanel,
    HistoryPanel,
}

/// Live queries into the presentation layer.
///
/// Answers reflect the view at the moment of the call; callers must not
/// cache them.
pub trait ViewLayer: Send + Sync {
    fn is_present(&self, marker: ViewMarker) -> bool;

    /// A text input or text area holds keyboard focus.
    fn has_focused_input(&self) -> bool;

    fn blur_focused_input(&self);

    fn close_history_panel(&self);
}

/// Somewhere external scripts can be inserted.
pub trait ResourceHost: Send + Sync {
    /// Resolves once the script loaded, or with the load failure.
    fn insert_script(&self, url: &str) -> PlatformFuture<()>;
}

/// Run a platform call without waiting for it; log the outcome.
pub fn spawn_logged(op: &'static str, call: PlatformFuture<()>) -> JoinHandle<()> {
    tokio::spawn(async move {
        match call.await {
            Ok(()) => log::debug!("{} completed", op),
            Err(e) => log::warn!("{} failed: {}", op, e),
        }
    })
}
