// Library exports for the binary, the integration tests and embedding shells
//
// # State Ownership Policy
//
// Every piece of shared state lives in a store (`store::new_store`) with a
// single writer owned by one coordinator:
//
//   - `SessionCoordinator`  — writes `SessionState` (pin, visible, blurred,
//                             context menu, appearance).
//   - `ShortcutCoordinator` — writes `ShortcutState` (modifier key, letters).
//   - `UpdateCoordinator`   — writes `UpdateState` (prompt, skip marker).
//
// Coordinators may hold `StoreReader`s of other stores but never their
// writers. Short-lived sync bookkeeping (listener registry, notification
// list, recorded calls) uses `parking_lot::Mutex`; nothing holds a lock
// across an `.await`.

/// Application version, used for update checks.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod debug;

pub mod app;
pub mod boundary;
pub mod cli;
pub mod coordinator;
pub mod events;
pub mod notifications;
pub mod platform;
pub mod script_loader;
pub mod state;
pub mod store;

pub use app::{DeskApp, DeskOptions};
pub use events::{EventBus, EventKind, NativeEvent, Subscription, TaskGuard};
pub use notifications::{Notification, NotificationLevel, Notifications};
