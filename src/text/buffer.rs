//! Document storage
//!
//! Line-based text storage addressed by linear character offsets. Offsets
//! count Unicode scalar values; the `\n` separating two lines occupies one
//! offset.

use super::position::{offset_to_position, position_to_offset};
use crate::error::EditError;
use serde::{Deserialize, Serialize};

/// Line-based document
///
/// Uses `Vec<String>` for line storage. There is always at least one line;
/// the empty document is a single empty line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
        }
    }

    /// Create a document from text
    ///
    /// Unlike `str::lines`, a trailing newline yields a trailing empty line so
    /// that `from_text(s).text() == s` for every `s`.
    pub fn from_text(s: &str) -> Self {
        Self {
            lines: s.split('\n').map(|l| l.to_string()).collect(),
        }
    }

    /// Full document text
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, line: usize) -> Option<&str> {
        self.lines.get(line).map(|s| s.as_str())
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Length of a line in characters (0 for a missing line)
    pub fn line_len(&self, line: usize) -> usize {
        self.lines
            .get(line)
            .map(|l| l.chars().count())
            .unwrap_or(0)
    }

    /// Total length in characters, separators included
    pub fn len_chars(&self) -> usize {
        let chars: usize = self.lines.iter().map(|l| l.chars().count()).sum();
        chars + self.lines.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// Text between two offsets (`from <= to`)
    pub fn slice(&self, from: usize, to: usize) -> Result<String, EditError> {
        self.check_span(from, to)?;
        Ok(self.text().chars().skip(from).take(to - from).collect())
    }

    /// Replace `[from, to)` with `insert`, returning the removed text
    pub fn replace(&mut self, from: usize, to: usize, insert: &str) -> Result<String, EditError> {
        self.check_span(from, to)?;

        let start = offset_to_position(self, from)?;
        let end = offset_to_position(self, to)?;

        let removed = self.slice(from, to)?;

        let head = &self.lines[start.line];
        let prefix = &head[..byte_index(head, start.col)];
        let tail = &self.lines[end.line];
        let suffix = &tail[byte_index(tail, end.col)..];

        let joined = format!("{}{}{}", prefix, insert, suffix);
        let replacement: Vec<String> = joined.split('\n').map(|l| l.to_string()).collect();

        self.lines.splice(start.line..=end.line, replacement);
        Ok(removed)
    }

    /// Offset of (line, col), see [`position_to_offset`]
    pub fn offset_of(&self, line: usize, col: usize) -> Result<usize, EditError> {
        Ok(position_to_offset(self, super::TextPos::new(line, col))?)
    }

    fn check_span(&self, from: usize, to: usize) -> Result<(), EditError> {
        let len = self.len_chars();
        if from > len {
            return Err(EditError::InvalidOffset { offset: from, len });
        }
        if to > len || to < from {
            return Err(EditError::InvalidOffset { offset: to, len });
        }
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Byte index of the `col`-th character of `s` (or `s.len()` past the end)
pub(crate) fn byte_index(s: &str, col: usize) -> usize {
    s.char_indices().nth(col).map(|(i, _)| i).unwrap_or(s.len())
}
