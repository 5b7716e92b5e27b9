//! Editing surface abstraction
//!
//! The editor facade never touches document storage directly: it builds a
//! [`Transaction`] and dispatches it to an [`EditingSurface`]. A transaction's
//! changes and its new selection are applied together, so nothing can observe
//! an edit without its selection update.

use super::buffer::Document;
use super::cursor::Selection;
use crate::error::EditError;
use crate::undo::{record_changes, History, HistoryEntry};
use serde::{Deserialize, Serialize};

/// Replace `[from, to)` with `insert` (pre-transaction coordinates)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub from: usize,
    pub to: usize,
    pub insert: String,
}

impl Change {
    pub fn new(from: usize, to: usize, insert: impl Into<String>) -> Self {
        Self {
            from,
            to,
            insert: insert.into(),
        }
    }

    /// Pure insertion at `at`
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::new(at, at, text)
    }

    fn inserted_len(&self) -> usize {
        self.insert.chars().count()
    }
}

/// A set of non-overlapping changes plus the selection to install afterwards
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transaction {
    pub changes: Vec<Change>,
    /// `None` maps the current selection through the changes
    pub selection: Option<Selection>,
}

impl Transaction {
    pub fn new(changes: Vec<Change>, selection: Selection) -> Self {
        Self {
            changes,
            selection: Some(selection),
        }
    }

    /// Selection-only transaction
    pub fn select(selection: Selection) -> Self {
        Self {
            changes: Vec::new(),
            selection: Some(selection),
        }
    }

    /// Check bounds and overlap against the document the changes apply to
    pub fn validate(&self, doc: &Document) -> Result<(), EditError> {
        let len = doc.len_chars();
        for change in &self.changes {
            if change.from > len {
                return Err(EditError::InvalidOffset {
                    offset: change.from,
                    len,
                });
            }
            if change.to > len || change.to < change.from {
                return Err(EditError::InvalidOffset {
                    offset: change.to,
                    len,
                });
            }
        }

        let mut sorted: Vec<&Change> = self.changes.iter().collect();
        sorted.sort_by_key(|c| (c.from, c.to));
        if sorted.windows(2).any(|w| w[0].to > w[1].from) {
            return Err(EditError::OverlappingChanges);
        }
        Ok(())
    }

    /// Document length once the changes are applied
    pub fn new_len(&self, old_len: usize) -> usize {
        let inserted: usize = self.changes.iter().map(Change::inserted_len).sum();
        let removed: usize = self.changes.iter().map(|c| c.to - c.from).sum();
        old_len + inserted - removed
    }

    /// Map a pre-transaction offset to its post-transaction position
    ///
    /// Offsets inside a replaced span move to the end of its insertion.
    pub fn map_offset(&self, offset: usize) -> usize {
        let mut sorted: Vec<&Change> = self.changes.iter().collect();
        sorted.sort_by_key(|c| c.from);

        let mut delta: isize = 0;
        for change in sorted {
            // An offset at the start of a replaced span stays before it
            if offset < change.from || (offset == change.from && change.from < change.to) {
                break;
            }
            if offset < change.to {
                return (change.from as isize + delta) as usize + change.inserted_len();
            }
            delta += change.inserted_len() as isize - (change.to - change.from) as isize;
        }
        (offset as isize + delta) as usize
    }
}

/// Host editing surface
pub trait EditingSurface {
    fn document(&self) -> &Document;

    fn selection(&self) -> &Selection;

    /// Apply a transaction atomically: on error nothing changes
    fn dispatch(&mut self, tx: Transaction) -> Result<(), EditError>;

    fn focus(&mut self);

    fn has_focus(&self) -> bool;

    /// Replace the whole document, e.g. with restored content
    fn load(&mut self, text: &str) -> Result<(), EditError> {
        let len = self.document().len_chars();
        self.dispatch(Transaction::new(
            vec![Change::new(0, len, text)],
            Selection::caret(0),
        ))
    }

    /// Undo the last transaction; `Ok(false)` when there is nothing to undo
    fn undo(&mut self) -> Result<bool, EditError> {
        Ok(false)
    }

    /// Redo the last undone transaction
    fn redo(&mut self) -> Result<bool, EditError> {
        Ok(false)
    }
}

/// In-crate editing surface backed by [`Document`]
#[derive(Debug, Clone)]
pub struct BufferSurface {
    document: Document,
    selection: Selection,
    history: History,
    focused: bool,
}

impl BufferSurface {
    pub fn new(text: &str) -> Self {
        Self::with_history_limit(text, 100)
    }

    pub fn with_history_limit(text: &str, history_limit: usize) -> Self {
        Self {
            document: Document::from_text(text),
            selection: Selection::caret(0),
            history: History::new(history_limit),
            focused: false,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }
}

impl Default for BufferSurface {
    fn default() -> Self {
        Self::new("")
    }
}

impl EditingSurface for BufferSurface {
    fn document(&self) -> &Document {
        &self.document
    }

    fn selection(&self) -> &Selection {
        &self.selection
    }

    fn dispatch(&mut self, tx: Transaction) -> Result<(), EditError> {
        tx.validate(&self.document)?;

        let new_len = tx.new_len(self.document.len_chars());
        let selection = match tx.selection.clone() {
            Some(sel) => sel,
            None => {
                let mut mapped: Vec<super::Range> = self
                    .selection
                    .ranges()
                    .iter()
                    .map(|r| super::Range::new(tx.map_offset(r.anchor), tx.map_offset(r.head)))
                    .collect();
                mapped.dedup();
                // Ranges merged by the edit collapse to the main caret
                Selection::new(mapped, 0).unwrap_or_else(|_| {
                    Selection::caret(tx.map_offset(self.selection.main().head))
                })
            }
        };
        if selection.max_offset() > new_len {
            return Err(EditError::InvalidOffset {
                offset: selection.max_offset(),
                len: new_len,
            });
        }

        if tx.changes.is_empty() {
            self.selection = selection;
            return Ok(());
        }

        let entry = HistoryEntry {
            changes: record_changes(&self.document, &tx.changes)?,
            selection_before: self.selection.clone(),
            selection_after: selection.clone(),
        };

        // Apply to a copy so a failure leaves the surface untouched
        let mut document = self.document.clone();
        entry.execute(&mut document)?;

        self.document = document;
        self.selection = selection;
        self.history.push(entry);
        Ok(())
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn has_focus(&self) -> bool {
        self.focused
    }

    /// Loading starts a fresh history
    fn load(&mut self, text: &str) -> Result<(), EditError> {
        self.document = Document::from_text(text);
        self.selection = Selection::caret(0);
        self.history.clear();
        Ok(())
    }

    fn undo(&mut self) -> Result<bool, EditError> {
        match self.history.undo(&mut self.document)? {
            Some(selection) => {
                self.selection = selection;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn redo(&mut self) -> Result<bool, EditError> {
        match self.history.redo(&mut self.document)? {
            Some(selection) => {
                self.selection = selection;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
