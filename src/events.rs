//! Native event bus.
//!
//! The shell delivers window and keyboard events one at a time; the bus hands
//! each one to every listener registered for its kind, in registration order.
//! A listener lives exactly as long as the [`Subscription`] returned for it.
//!
//! Listener failures stay inside the bus: an `Err` or a panic is logged and
//! the remaining listeners still run, as do all later events.

use coco_desk_keybindings::KeyEvent;
use parking_lot::Mutex;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Weak};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// An event from the native shell.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeEvent {
    Blur,
    Focus,
    KeyDown(KeyEvent),
    KeyUp(KeyEvent),
    /// A global shortcut registered with the OS fired
    ShortcutTriggered(String),
    /// A named event broadcast by another window
    Emitted {
        name: String,
        payload: serde_json::Value,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Blur,
    Focus,
    KeyDown,
    KeyUp,
    ShortcutTriggered,
    Emitted,
}

impl NativeEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            NativeEvent::Blur => EventKind::Blur,
            NativeEvent::Focus => EventKind::Focus,
            NativeEvent::KeyDown(_) => EventKind::KeyDown,
            NativeEvent::KeyUp(_) => EventKind::KeyUp,
            NativeEvent::ShortcutTriggered(_) => EventKind::ShortcutTriggered,
            NativeEvent::Emitted { .. } => EventKind::Emitted,
        }
    }

    pub fn emitted(name: impl Into<String>, payload: serde_json::Value) -> Self {
        NativeEvent::Emitted {
            name: name.into(),
            payload,
        }
    }
}

type Handler = Arc<dyn Fn(&NativeEvent) -> anyhow::Result<()> + Send + Sync>;

struct Listener {
    id: u64,
    kind: EventKind,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<Listener>,
}

impl Registry {
    fn contains(&self, id: u64) -> bool {
        self.listeners.iter().any(|l| l.id == id)
    }
}

/// Fan-out of native events to listeners.
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events of `kind`.
    ///
    /// Dropping the returned [`Subscription`] removes exactly this listener.
    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> Subscription
    where
        F: Fn(&NativeEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push(Listener {
            id,
            kind,
            handler: Arc::new(handler),
        });
        log::trace!("listener {} subscribed to {:?}", id, kind);

        Subscription {
            id,
            kind,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Deliver one event to every matching listener. Returns how many ran.
    ///
    /// Handlers run outside the registry lock, so they may subscribe or drop
    /// subscriptions. A listener removed mid-dispatch is skipped.
    pub fn dispatch(&self, event: &NativeEvent) -> usize {
        let kind = event.kind();
        let targets: Vec<(u64, Handler)> = self
            .registry
            .lock()
            .listeners
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| (l.id, Arc::clone(&l.handler)))
            .collect();

        let mut delivered = 0;
        for (id, handler) in targets {
            if !self.registry.lock().contains(id) {
                continue;
            }
            delivered += 1;
            match catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    log::error!("{:?} listener {} failed: {:#}", kind, id, e);
                }
                Err(panic) => {
                    log::error!(
                        "{:?} listener {} panicked: {}",
                        kind,
                        id,
                        panic_message(panic.as_ref())
                    );
                }
            }
        }
        delivered
    }

    /// Consume events from the shell in arrival order until the sender closes.
    pub async fn pump(&self, mut rx: mpsc::UnboundedReceiver<NativeEvent>) {
        while let Some(event) = rx.recv().await {
            log::trace!("dispatching {:?}", event.kind());
            self.dispatch(&event);
        }
        log::debug!("native event source closed");
    }

    /// Run [`EventBus::pump`] on a task tied to the returned guard.
    pub fn spawn_pump(&self, rx: mpsc::UnboundedReceiver<NativeEvent>) -> TaskGuard {
        let bus = self.clone();
        TaskGuard::new(tokio::spawn(async move { bus.pump(rx).await }))
    }

    pub fn listener_count(&self) -> usize {
        self.registry.lock().listeners.len()
    }

    pub fn listener_count_for(&self, kind: EventKind) -> usize {
        self.registry
            .lock()
            .listeners
            .iter()
            .filter(|l| l.kind == kind)
            .count()
    }
}

pub(crate) fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Handle for one registered listener.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    kind: EventKind,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.lock().contains(self.id))
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().listeners.retain(|l| l.id != self.id);
            log::trace!("listener {} unsubscribed from {:?}", self.id, self.kind);
        }
    }
}

/// Aborts its background task when dropped.
#[derive(Debug)]
pub struct TaskGuard(JoinHandle<()>);

impl TaskGuard {
    pub fn new(handle: JoinHandle<()>) -> Self {
        Self(handle)
    }

    pub fn is_finished(&self) -> bool {
        self.0.is_finished()
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}
