//! Cursor and selection management for text editing
//!
//! Ranges are offset-based (anchor + head); [`TextPos`] is the (line, column)
//! form produced by the position mapper.

use crate::error::EditError;
use serde::{Deserialize, Serialize};

/// A position in text (line, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TextPos {
    pub line: usize,
    pub col: usize,
}

impl TextPos {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// Create a position at the start of a line
    pub fn line_start(line: usize) -> Self {
        Self { line, col: 0 }
    }
}

/// Selection range (anchor + head offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    /// Where the selection started
    pub anchor: usize,
    /// Current edge of the selection
    pub head: usize,
}

impl Range {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// Zero-width range (caret only)
    pub fn caret(offset: usize) -> Self {
        Self {
            anchor: offset,
            head: offset,
        }
    }

    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    /// Check if range is collapsed (anchor == head)
    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    pub fn len(&self) -> usize {
        self.to() - self.from()
    }

    fn overlaps(&self, other: &Range) -> bool {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => self.head == other.head,
            // A caret may touch either edge of a range but not sit inside it
            (true, false) => other.from() < self.head && self.head < other.to(),
            (false, true) => self.from() < other.head && other.head < self.to(),
            (false, false) => self.from() < other.to() && other.from() < self.to(),
        }
    }
}

/// Set of disjoint ranges, never empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SelectionParts")]
pub struct Selection {
    ranges: Vec<Range>,
    main: usize,
}

/// Unchecked wire form; deserialization goes through [`Selection::new`]
#[derive(Deserialize)]
struct SelectionParts {
    ranges: Vec<Range>,
    #[serde(default)]
    main: usize,
}

impl TryFrom<SelectionParts> for Selection {
    type Error = EditError;

    fn try_from(parts: SelectionParts) -> Result<Self, Self::Error> {
        Selection::new(parts.ranges, parts.main)
    }
}

impl Selection {
    /// Build a selection; ranges keep the order given
    pub fn new(ranges: Vec<Range>, main: usize) -> Result<Self, EditError> {
        if ranges.is_empty() {
            return Err(EditError::EmptySelection);
        }
        for (i, a) in ranges.iter().enumerate() {
            if ranges[i + 1..].iter().any(|b| a.overlaps(b)) {
                return Err(EditError::OverlappingRanges);
            }
        }
        let main = main.min(ranges.len() - 1);
        Ok(Self { ranges, main })
    }

    /// Single caret
    pub fn caret(offset: usize) -> Self {
        Self {
            ranges: vec![Range::caret(offset)],
            main: 0,
        }
    }

    pub fn single(anchor: usize, head: usize) -> Self {
        Self {
            ranges: vec![Range::new(anchor, head)],
            main: 0,
        }
    }

    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    /// First range in selection order (not necessarily the lowest offset)
    pub fn first(&self) -> Range {
        self.ranges[0]
    }

    pub fn main(&self) -> Range {
        self.ranges[self.main]
    }

    /// True when every range is a caret
    pub fn is_caret_only(&self) -> bool {
        self.ranges.iter().all(Range::is_empty)
    }

    /// Ranges ordered by position ascending
    pub fn sorted(&self) -> Vec<Range> {
        let mut ranges = self.ranges.clone();
        ranges.sort_by_key(|r| (r.from(), r.to()));
        ranges
    }

    /// Largest offset referenced by any range
    pub fn max_offset(&self) -> usize {
        self.ranges.iter().map(Range::to).max().unwrap_or(0)
    }
}
