//! Editor configuration
//!
//! Every recognised option is listed here with its default. Unknown keys are
//! rejected at deserialization time.

use super::button::ButtonDescriptor;
use super::snippet::{default_snippets, Snippet};
use serde::{Deserialize, Serialize};

/// Toolbar configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ToolbarOptions {
    /// Show the toolbar at all
    pub enabled: bool,
    /// Start from the built-in button table
    pub use_defaults: bool,
    /// Extra buttons appended after the defaults
    pub buttons: Vec<ButtonDescriptor>,
}

impl Default for ToolbarOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            use_defaults: true,
            buttons: Vec::new(),
        }
    }
}

/// Snippet drawer configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SnippetOptions {
    pub enabled: bool,
    pub list: Vec<Snippet>,
}

impl Default for SnippetOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            list: default_snippets(),
        }
    }
}

/// Options recognised at construction
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct EditorOptions {
    pub toolbar: ToolbarOptions,
    /// Register the built-in markdown actions
    pub default_actions: bool,
    /// Content used when nothing was restored from persistence
    pub default_content: String,
    pub snippets: SnippetOptions,
    pub font_family: String,
    pub height: String,
    pub width: String,
    pub placeholder: String,
    /// Quiet period before the autosave hook runs
    pub autosave_delay_ms: u32,
    /// Undo depth of the built-in editing surface
    pub history_limit: usize,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            toolbar: ToolbarOptions::default(),
            default_actions: true,
            default_content: String::new(),
            snippets: SnippetOptions::default(),
            font_family: "monospace".to_string(),
            height: "300px".to_string(),
            width: "100%".to_string(),
            placeholder: String::new(),
            autosave_delay_ms: 500,
            history_limit: 100,
        }
    }
}

impl EditorOptions {
    /// Parse options from JSON (missing keys take their defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let options = EditorOptions::from_json("{}").unwrap();
        assert_eq!(options, EditorOptions::default());
        assert_eq!(options.autosave_delay_ms, 500);
        assert!(options.toolbar.enabled);
    }

    #[test]
    fn test_partial_options() {
        let options = EditorOptions::from_json(
            r##"{"defaultContent":"# Notes","autosaveDelayMs":50,"toolbar":{"useDefaults":false}}"##,
        )
        .unwrap();
        assert_eq!(options.default_content, "# Notes");
        assert_eq!(options.autosave_delay_ms, 50);
        assert!(!options.toolbar.use_defaults);
        assert!(options.toolbar.enabled);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(EditorOptions::from_json(r#"{"fontSize":12}"#).is_err());
        assert!(EditorOptions::from_json(r#"{"toolbar":{"colour":"red"}}"#).is_err());
    }
}
