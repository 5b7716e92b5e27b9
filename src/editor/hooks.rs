//! Host collaborators
//!
//! Rendering, persistence and lifecycle callbacks supplied by the embedding
//! application. Failures are returned to the caller of the editor operation
//! that invoked the hook and are never retried. The one exception is the
//! preview refresh that follows an edit, which logs a render failure and
//! leaves the preview stale.

use crate::error::HookError;

/// Outcome of a render call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// Markup available now
    Ready(String),
    /// The host renders asynchronously and completes the request later via
    /// `Editor::finish_preview_render`
    Deferred,
}

pub trait EditorHooks {
    /// Produce preview markup from raw content (identity by default)
    fn render(&self, text: &str) -> Result<Rendered, HookError> {
        Ok(Rendered::Ready(text.to_string()))
    }

    /// Previously saved content; `None` or empty means nothing was saved
    fn retrieve_saved(&self) -> Result<Option<String>, HookError> {
        Ok(None)
    }

    fn autosave(&self, _text: &str) -> Result<(), HookError> {
        Ok(())
    }

    fn on_done(&self, _text: &str) {}

    fn on_exit(&self, _text: &str) {}
}

/// Hooks that do nothing beyond the defaults
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl EditorHooks for NoopHooks {}
