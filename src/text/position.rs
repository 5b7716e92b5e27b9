//! Offset <-> (line, column) conversion
//!
//! Stateless helpers over a [`Document`] snapshot. Nothing here clamps: an
//! offset or column outside the document is reported as an error.

use super::buffer::Document;
use super::cursor::TextPos;
use crate::error::PositionError;

/// Convert a linear offset to a (line, column) position
pub fn offset_to_position(doc: &Document, offset: usize) -> Result<TextPos, PositionError> {
    let len = doc.len_chars();
    if offset > len {
        return Err(PositionError::OutOfRange { offset, len });
    }

    let mut line_start = 0;
    for (line, text) in doc.lines().iter().enumerate() {
        let line_len = text.chars().count();
        if offset <= line_start + line_len {
            return Ok(TextPos::new(line, offset - line_start));
        }
        // +1 for the separator
        line_start += line_len + 1;
    }

    Err(PositionError::OutOfRange { offset, len })
}

/// Convert a (line, column) position to a linear offset
pub fn position_to_offset(doc: &Document, pos: TextPos) -> Result<usize, PositionError> {
    let invalid = PositionError::InvalidPosition {
        line: pos.line,
        column: pos.col,
    };

    let text = doc.line(pos.line).ok_or(invalid.clone())?;
    if pos.col > text.chars().count() {
        return Err(invalid);
    }

    let before: usize = doc.lines()[..pos.line]
        .iter()
        .map(|l| l.chars().count() + 1)
        .sum();
    Ok(before + pos.col)
}

/// Offset of column 0 on the line containing `offset`
pub fn line_start_offset(doc: &Document, offset: usize) -> Result<usize, PositionError> {
    let pos = offset_to_position(doc, offset)?;
    Ok(offset - pos.col)
}

/// Offset just past the last character of the line containing `offset`
pub fn line_end_offset(doc: &Document, offset: usize) -> Result<usize, PositionError> {
    let pos = offset_to_position(doc, offset)?;
    Ok(offset - pos.col + doc.line_len(pos.line))
}
