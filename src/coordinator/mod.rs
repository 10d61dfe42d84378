//! Coordinators turn native events into store mutations.
//!
//! Each coordinator owns the writer of exactly one store and may hold
//! readers of the others:
//!
//! | Coordinator | Owns | Reads |
//! |---|---|---|
//! | [`SessionCoordinator`] | `SessionState` | view layer |
//! | [`ShortcutCoordinator`] | `ShortcutState` | view layer |
//! | [`UpdateCoordinator`] | `UpdateState` | `SessionState` (update channel) |
//!
//! Coordinators are shared behind `Arc` so bus listeners and background
//! tasks can hold them; `attach` returns the subscriptions it created and
//! dropping them detaches the coordinator again.

mod session;
mod shortcut;
mod update;

pub use session::{BlurDecision, EscapeOutcome, SessionCoordinator, VisibilityGuard};
pub use shortcut::ShortcutCoordinator;
pub use update::{UpdateCoordinator, UpdateTrigger};

/// Event emitted to open the settings window.
pub const OPEN_SETTINGS_EVENT: &str = "open_settings";

/// Event carrying appearance changes made in another window.
pub const APPEARANCE_STORE_EVENT: &str = "change-appearance-store";

/// Event carrying shortcut changes made in another window.
pub const SHORTCUTS_STORE_EVENT: &str = "change-shortcuts-store";
