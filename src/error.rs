//! Error types for the editor core
//!
//! Position arithmetic and edit dispatch fail fast on bad offsets rather than
//! clamping, so a caller defect never silently corrupts the selection.

use thiserror::Error;

/// Offset/position conversion failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    /// Offset is past the end of the document
    #[error("offset {offset} out of range (document length {len})")]
    OutOfRange { offset: usize, len: usize },

    /// Line does not exist, or column is past the end of the line
    #[error("invalid position {line}:{column}")]
    InvalidPosition { line: usize, column: usize },
}

/// Failures while building or applying an edit transaction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("invalid offset {offset} (document length {len})")]
    InvalidOffset { offset: usize, len: usize },

    #[error(transparent)]
    Position(#[from] PositionError),

    #[error("changes in a transaction must not overlap")]
    OverlappingChanges,

    #[error("selection must contain at least one range")]
    EmptySelection,

    #[error("selection ranges must not overlap")]
    OverlappingRanges,
}

/// List store index failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("index {index} out of bounds (store has {len} items)")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Failure reported by a host collaborator (renderer, persistence)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    #[error("collaborator failed: {0}")]
    Failed(String),
}

/// Top-level error for facade operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Hook(#[from] HookError),

    #[error("snippet index {index} out of bounds (have {len})")]
    UnknownSnippet { index: usize, len: usize },
}

impl From<PositionError> for EditorError {
    fn from(e: PositionError) -> Self {
        EditorError::Edit(EditError::Position(e))
    }
}
