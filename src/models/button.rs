//! Toolbar button descriptor

use serde::{Deserialize, Serialize};

/// Toolbar button description
///
/// Descriptors are replaced wholesale through the button store, never
/// mutated in place.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ButtonDescriptor {
    /// Name of the action invoked on click
    pub action: String,

    pub icon_name: String,

    pub label: String,

    #[serde(default)]
    pub description: String,

    /// Button keeps an on/off state between clicks
    #[serde(default)]
    pub toggle: bool,

    /// When toggled on, every other button is disabled
    #[serde(default)]
    pub modal: bool,

    #[serde(default)]
    pub disabled: bool,
}

impl ButtonDescriptor {
    pub fn new(action: &str, icon_name: &str, label: &str, description: &str) -> Self {
        Self {
            action: action.to_string(),
            icon_name: icon_name.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            toggle: false,
            modal: false,
            disabled: false,
        }
    }

    pub fn toggle(mut self) -> Self {
        self.toggle = true;
        self
    }

    /// Modal buttons are always toggles
    pub fn modal(mut self) -> Self {
        self.toggle = true;
        self.modal = true;
        self
    }

    /// Copy with a different `disabled` flag
    pub fn with_disabled(&self, disabled: bool) -> Self {
        Self {
            disabled,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{"action":"bold","iconName":"format_bold","label":"Bold"}"#;
        let button: ButtonDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(button, ButtonDescriptor::new("bold", "format_bold", "Bold", ""));
    }

    #[test]
    fn test_modal_implies_toggle() {
        let button = ButtonDescriptor::new("preview", "visibility", "Preview", "").modal();
        assert!(button.toggle && button.modal);
        assert!(button.with_disabled(true).disabled);
    }
}
