//! Snippets offered in the snippet drawer

use serde::{Deserialize, Serialize};

/// Named block of markdown inserted on its own line
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Snippet {
    pub name: String,
    pub content: String,
}

impl Snippet {
    pub fn new(name: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            content: content.to_string(),
        }
    }
}

/// Built-in snippet list
pub fn default_snippets() -> Vec<Snippet> {
    vec![
        Snippet::new("Code block", "```\n\n```"),
        Snippet::new("Table", "| Column | Column |\n| ------ | ------ |\n| Cell   | Cell   |"),
        Snippet::new("Checklist", "- [ ] Task\n- [ ] Task"),
        Snippet::new("Horizontal rule", "---"),
        Snippet::new("Details", "<details>\n<summary>Summary</summary>\n\n</details>"),
    ]
}
