//! Undo/redo history for the built-in editing surface
//!
//! Every dispatched transaction is recorded with the text it removed and the
//! selection before it, so it can be inverted exactly.

use crate::text::{Change, Document, Selection};
use crate::error::EditError;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A change as applied, with enough information to reverse it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedChange {
    /// Start offset in the document *after* earlier changes of the same
    /// transaction were applied (ascending application order)
    pub from: usize,
    pub removed: String,
    pub inserted: String,
}

/// One undoable step
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Changes in ascending document order
    pub changes: Vec<AppliedChange>,
    pub selection_before: Selection,
    pub selection_after: Selection,
}

impl HistoryEntry {
    /// Re-apply the entry on a document
    pub fn execute(&self, doc: &mut Document) -> Result<(), EditError> {
        for change in &self.changes {
            let to = change.from + change.removed.chars().count();
            doc.replace(change.from, to, &change.inserted)?;
        }
        Ok(())
    }

    /// Reverse the entry (changes undone in reverse order)
    pub fn undo(&self, doc: &mut Document) -> Result<(), EditError> {
        for change in self.changes.iter().rev() {
            let to = change.from + change.inserted.chars().count();
            doc.replace(change.from, to, &change.removed)?;
        }
        Ok(())
    }
}

/// Convert a transaction's changes (pre-transaction coordinates) into the
/// ascending, shifted form stored in history
pub fn record_changes(doc: &Document, changes: &[Change]) -> Result<Vec<AppliedChange>, EditError> {
    let mut sorted: Vec<&Change> = changes.iter().collect();
    sorted.sort_by_key(|c| c.from);

    let mut delta: isize = 0;
    let mut applied = Vec::with_capacity(sorted.len());
    for change in sorted {
        let removed = doc.slice(change.from, change.to)?;
        let from = (change.from as isize + delta) as usize;
        delta += change.insert.chars().count() as isize - (change.to - change.from) as isize;
        applied.push(AppliedChange {
            from,
            removed,
            inserted: change.insert.clone(),
        });
    }
    Ok(applied)
}

/// Linear undo history with a redo tail
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    /// Number of entries currently applied
    current_index: usize,
    max_size: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(100)
    }
}

impl History {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            current_index: 0,
            max_size,
        }
    }

    /// Record a new entry, truncating any redo history
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.max_size == 0 {
            return;
        }

        self.entries.truncate(self.current_index);
        self.entries.push_back(entry);
        self.current_index = self.entries.len();

        if self.entries.len() > self.max_size {
            self.entries.pop_front();
            self.current_index = self.current_index.saturating_sub(1);
        }
    }

    /// Undo the last entry, returning the selection to restore
    pub fn undo(&mut self, doc: &mut Document) -> Result<Option<Selection>, EditError> {
        if !self.can_undo() {
            return Ok(None);
        }

        let entry = &self.entries[self.current_index - 1];
        entry.undo(doc)?;
        self.current_index -= 1;
        Ok(Some(entry.selection_before.clone()))
    }

    /// Redo the last undone entry, returning the selection to restore
    pub fn redo(&mut self, doc: &mut Document) -> Result<Option<Selection>, EditError> {
        if !self.can_redo() {
            return Ok(None);
        }

        let entry = &self.entries[self.current_index];
        entry.execute(doc)?;
        self.current_index += 1;
        Ok(Some(entry.selection_after.clone()))
    }

    pub fn can_undo(&self) -> bool {
        self.current_index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current_index < self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.current_index = 0;
    }

    pub fn undo_count(&self) -> usize {
        self.current_index
    }

    pub fn redo_count(&self) -> usize {
        self.entries.len() - self.current_index
    }
}
