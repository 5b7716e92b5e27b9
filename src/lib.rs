//! Markdown Editor WASM Module
//!
//! Core of an embeddable markdown editing widget: a text buffer with
//! multi-range selections, markdown insertion helpers, a reactive store for
//! UI state, a toolbar with toggle/modal buttons, and the editor facade that
//! ties them to host-supplied renderer and persistence hooks.
//!
//! The core is plain Rust and usable natively; [`api`] exposes it to
//! JavaScript as the `MarkdownEditor` class.

pub mod actions;
pub mod api;
pub mod editor;
pub mod error;
pub mod insert;
pub mod models;
pub mod store;
pub mod text;
pub mod toolbar;
pub mod undo;

// Re-export commonly used types
pub use editor::{Editor, EditorHooks, NoopHooks, Rendered};
pub use error::{EditError, EditorError, HookError, PositionError, StoreError};
pub use models::{ButtonDescriptor, EditorOptions, Snippet};
pub use text::{BufferSurface, Change, Document, EditingSurface, Range, Selection, Transaction};

#[cfg(feature = "console")]
use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[cfg(feature = "console")]
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::warn_1(&format!("logger already initialized: {}", e).into());
    }

    log::info!("Markdown editor WASM module initialized");
}
