//! Models module for the markdown editor
//!
//! Plain data shared by the toolbar, snippet drawer and configuration.

pub mod button;
pub mod options;
pub mod snippet;

// Re-export commonly used types
pub use button::ButtonDescriptor;
pub use options::{EditorOptions, SnippetOptions, ToolbarOptions};
pub use snippet::{default_snippets, Snippet};
