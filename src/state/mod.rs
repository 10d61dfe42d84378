//! The three stores' state types.
//!
//! Each type flattens the persisted subset from `coco-desk-config` and adds
//! runtime-only fields marked `#[serde(skip)]`, so a load always starts those
//! at their defaults. Setters are pure and return whether anything changed,
//! which is what [`crate::store::StoreWriter::update`] expects.

mod session;
mod shortcut;
mod update;

pub use session::SessionState;
pub use shortcut::ShortcutState;
pub use update::UpdateState;
