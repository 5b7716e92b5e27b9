//! Markdown Editor WASM API
//!
//! JavaScript-facing surface of the editor core.
//!
//! # Module Structure
//!
//! - `helpers`: serialization and error conversion shared by all methods
//! - `hooks`: collaborator functions read from the host's `hooks` object
//! - `editor`: the `MarkdownEditor` class

pub mod editor;
pub mod helpers;
pub mod hooks;

pub use editor::MarkdownEditor;
pub use hooks::JsHooks;
