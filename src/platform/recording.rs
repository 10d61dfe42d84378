//! Scriptable stand-ins for the native shell and the view layer.
//!
//! Every call is recorded synchronously, at the moment the method is
//! invoked, so a caller can assert on fire-and-forget calls right after the
//! triggering event without waiting on spawned tasks.

use super::{PlatformAdapter, PlatformError, PlatformFuture, ResourceHost, ViewLayer, ViewMarker};
use coco_desk_update::{UpdateChannel, UpdateError, UpdateInfo};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

/// One recorded adapter call.
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterCall {
    HideWindow,
    ShowWindow,
    SetAlwaysOnTop(bool),
    CheckUpdate(UpdateChannel),
    RelaunchApp,
    EmitEvent {
        name: String,
        payload: serde_json::Value,
    },
}

impl AdapterCall {
    pub fn op(&self) -> AdapterOp {
        match self {
            AdapterCall::HideWindow => AdapterOp::HideWindow,
            AdapterCall::ShowWindow => AdapterOp::ShowWindow,
            AdapterCall::SetAlwaysOnTop(_) => AdapterOp::SetAlwaysOnTop,
            AdapterCall::CheckUpdate(_) => AdapterOp::CheckUpdate,
            AdapterCall::RelaunchApp => AdapterOp::RelaunchApp,
            AdapterCall::EmitEvent { .. } => AdapterOp::EmitEvent,
        }
    }
}

/// Adapter operations, for counting and scripting failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterOp {
    HideWindow,
    ShowWindow,
    SetAlwaysOnTop,
    CheckUpdate,
    RelaunchApp,
    EmitEvent,
}

#[derive(Default)]
struct Script {
    failures: HashMap<AdapterOp, String>,
    update_responses: VecDeque<Result<Option<UpdateInfo>, UpdateError>>,
    check_delay: Option<Duration>,
}

/// Records calls; answers from a script.
#[derive(Default)]
pub struct RecordingAdapter {
    calls: Mutex<Vec<AdapterCall>>,
    script: Mutex<Script>,
    native: bool,
}

impl RecordingAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend to be a native shell.
    pub fn native() -> Self {
        Self {
            native: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<AdapterCall> {
        self.calls.lock().clone()
    }

    pub fn count(&self, op: AdapterOp) -> usize {
        self.calls.lock().iter().filter(|c| c.op() == op).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Make every call of `op` fail with `reason` until [`Self::succeed`].
    pub fn fail(&self, op: AdapterOp, reason: impl Into<String>) {
        self.script.lock().failures.insert(op, reason.into());
    }

    pub fn succeed(&self, op: AdapterOp) {
        self.script.lock().failures.remove(&op);
    }

    /// Queue the answer for the next `check_update`. With nothing queued the
    /// answer is "up to date".
    pub fn push_update(&self, response: Result<Option<UpdateInfo>, UpdateError>) {
        self.script.lock().update_responses.push_back(response);
    }

    /// Make `check_update` take this long before answering.
    pub fn set_check_delay(&self, delay: Option<Duration>) {
        self.script.lock().check_delay = delay;
    }

    fn record(&self, call: AdapterCall) -> Option<String> {
        let failure = self.script.lock().failures.get(&call.op()).cloned();
        log::debug!("recorded adapter call {:?}", call);
        self.calls.lock().push(call);
        failure
    }

    fn simple(&self, call: AdapterCall, op: &'static str) -> PlatformFuture<()> {
        let result = match self.record(call) {
            Some(reason) => Err(PlatformError::Window { op, reason }),
            None => Ok(()),
        };
        Box::pin(async move { result })
    }
}

impl PlatformAdapter for RecordingAdapter {
    fn hide_window(&self) -> PlatformFuture<()> {
        self.simple(AdapterCall::HideWindow, "hide")
    }

    fn show_window(&self) -> PlatformFuture<()> {
        self.simple(AdapterCall::ShowWindow, "show")
    }

    fn set_always_on_top(&self, always_on_top: bool) -> PlatformFuture<()> {
        self.simple(AdapterCall::SetAlwaysOnTop(always_on_top), "always-on-top")
    }

    fn check_update(&self, channel: UpdateChannel) -> PlatformFuture<Option<UpdateInfo>> {
        let failure = self.record(AdapterCall::CheckUpdate(channel));
        let (response, delay) = {
            let mut script = self.script.lock();
            let response = script.update_responses.pop_front().unwrap_or(Ok(None));
            (response, script.check_delay)
        };
        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if let Some(reason) = failure {
                return Err(PlatformError::Update(UpdateError::Other(reason)));
            }
            response.map_err(PlatformError::from)
        })
    }

    fn relaunch_app(&self) -> PlatformFuture<()> {
        let result = match self.record(AdapterCall::RelaunchApp) {
            Some(reason) => Err(PlatformError::Relaunch(reason)),
            None => Ok(()),
        };
        Box::pin(async move { result })
    }

    fn emit_event(&self, name: &str, payload: serde_json::Value) -> PlatformFuture<()> {
        let failure = self.record(AdapterCall::EmitEvent {
            name: name.to_string(),
            payload,
        });
        let name = name.to_string();
        Box::pin(async move {
            match failure {
                Some(reason) => Err(PlatformError::Emit { name, reason }),
                None => Ok(()),
            }
        })
    }

    fn is_native(&self) -> bool {
        self.native
    }
}

#[derive(Debug, Default)]
struct ViewInner {
    present: HashSet<ViewMarker>,
    focused_input: bool,
}

/// A view layer whose contents are set by hand.
#[derive(Debug, Default)]
pub struct HeadlessView {
    inner: Mutex<ViewInner>,
}

impl HeadlessView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_present(&self, marker: ViewMarker, present: bool) {
        let mut inner = self.inner.lock();
        if present {
            inner.present.insert(marker);
        } else {
            inner.present.remove(&marker);
        }
    }

    pub fn set_focused_input(&self, focused: bool) {
        self.inner.lock().focused_input = focused;
    }
}

impl ViewLayer for HeadlessView {
    fn is_present(&self, marker: ViewMarker) -> bool {
        self.inner.lock().present.contains(&marker)
    }

    fn has_focused_input(&self) -> bool {
        self.inner.lock().focused_input
    }

    fn blur_focused_input(&self) {
        log::debug!("view: input blurred");
        self.inner.lock().focused_input = false;
    }

    fn close_history_panel(&self) {
        log::debug!("view: history panel closed");
        self.inner.lock().present.remove(&ViewMarker::HistoryPanel);
    }
}

/// Records script insertions; URLs can be scripted to fail.
#[derive(Debug, Default)]
pub struct RecordingResources {
    inserted: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_url(&self, url: impl Into<String>) {
        self.failing.lock().insert(url.into());
    }

    pub fn inserted(&self) -> Vec<String> {
        self.inserted.lock().clone()
    }
}

impl ResourceHost for RecordingResources {
    fn insert_script(&self, url: &str) -> PlatformFuture<()> {
        self.inserted.lock().push(url.to_string());
        let result = if self.failing.lock().contains(url) {
            Err(PlatformError::ResourceLoad {
                url: url.to_string(),
                reason: "script error".to_string(),
            })
        } else {
            Ok(())
        };
        Box::pin(async move { result })
    }
}
