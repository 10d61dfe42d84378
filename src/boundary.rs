//! Containment for failures while rendering one part of the view.
//!
//! A [`RenderBoundary`] wraps the render step of a subtree. If that step
//! returns an error or panics, the boundary logs the failure with a
//! backtrace and hands back a fallback carrying the message, so the rest of
//! the view keeps rendering. Event handlers and async callbacks are not
//! wrapped here; their failures go through the event bus and the
//! notification list.

use crate::events::panic_message;
use std::backtrace::Backtrace;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Outcome of a guarded render.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered<T> {
    Ok(T),
    /// The subtree failed; show this message in its place
    Fallback { message: String },
}

impl<T> Rendered<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Rendered::Fallback { .. })
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Rendered::Ok(value) => Some(value),
            Rendered::Fallback { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderBoundary;

impl RenderBoundary {
    pub fn new() -> Self {
        Self
    }

    /// Run the render step for the subtree called `name`.
    pub fn render<T, F>(&self, name: &str, render: F) -> Rendered<T>
    where
        F: FnOnce() -> anyhow::Result<T>,
    {
        let message = match catch_unwind(AssertUnwindSafe(render)) {
            Ok(Ok(value)) => return Rendered::Ok(value),
            Ok(Err(e)) => format!("{:#}", e),
            Err(panic) => panic_message(panic.as_ref()),
        };

        log::error!(
            "render of '{}' failed: {}\n{}",
            name,
            message,
            Backtrace::force_capture()
        );
        Rendered::Fallback { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_passes_through() {
        let rendered = RenderBoundary::new().render("list", || Ok(3));
        assert_eq!(rendered, Rendered::Ok(3));
    }

    #[test]
    fn test_error_becomes_fallback() {
        let rendered: Rendered<()> =
            RenderBoundary::new().render("chat", || anyhow::bail!("no messages"));
        assert_eq!(
            rendered,
            Rendered::Fallback {
                message: "no messages".into()
            }
        );
    }

    #[test]
    fn test_panic_becomes_fallback() {
        let rendered: Rendered<u8> = RenderBoundary::new().render("settings", || panic!("bad tab"));
        assert!(rendered.is_fallback());
        assert_eq!(
            rendered,
            Rendered::Fallback {
                message: "bad tab".into()
            }
        );
    }
}
