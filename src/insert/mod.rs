//! Selection-aware insertion
//!
//! Each function reads a document snapshot plus the current selection and
//! returns a single [`Transaction`]. Change offsets are expressed against the
//! snapshot, so multi-range edits never have to chase offsets shifted by
//! their own earlier insertions.
//!
//! Offsets beyond the document fail with [`EditError::InvalidOffset`]; nothing
//! is clamped.

use crate::error::EditError;
use crate::text::{line_end_offset, line_start_offset, Change, Document, Selection, Transaction};

fn check_offset(doc: &Document, offset: usize) -> Result<(), EditError> {
    let len = doc.len_chars();
    if offset > len {
        return Err(EditError::InvalidOffset { offset, len });
    }
    Ok(())
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Insert `text` at the start of the selected line(s)
///
/// With a caret-only selection the line holding the first range's head gets
/// the prefix. Otherwise every range, in ascending order, prefixes the line
/// its start sits on (a line shared by several ranges is prefixed once).
/// The result is a single caret at `line_start + caret_offset` of the
/// topmost line; `caret_offset` defaults to the length of `text`.
pub fn line_prefix(
    doc: &Document,
    selection: &Selection,
    text: &str,
    caret_offset: Option<usize>,
) -> Result<Transaction, EditError> {
    let caret_offset = caret_offset.unwrap_or_else(|| char_len(text));

    let line_starts: Vec<usize> = if selection.is_caret_only() {
        let head = selection.first().head;
        check_offset(doc, head)?;
        vec![line_start_offset(doc, head)?]
    } else {
        let mut starts = Vec::new();
        for range in selection.sorted() {
            check_offset(doc, range.to())?;
            let start = line_start_offset(doc, range.from())?;
            if starts.last() != Some(&start) {
                starts.push(start);
            }
        }
        starts
    };

    // Sorted input keeps the first start the topmost; nothing above it moves
    let first = line_starts[0];
    let changes = line_starts
        .iter()
        .map(|&start| Change::insert(start, text))
        .collect();

    let caret = first.checked_add(caret_offset).ok_or(EditError::InvalidOffset {
        offset: caret_offset,
        len: doc.len_chars(),
    })?;

    Ok(Transaction::new(changes, Selection::caret(caret)))
}

/// Surround the main range with `prefix` and `suffix`
///
/// A non-empty range becomes `prefix + selected + suffix` with the caret
/// after the suffix. A caret gets `prefix + suffix` inserted and lands
/// between the two markers.
pub fn wrap(
    doc: &Document,
    selection: &Selection,
    prefix: &str,
    suffix: &str,
) -> Result<Transaction, EditError> {
    let range = selection.main();
    check_offset(doc, range.to())?;

    if range.is_empty() {
        let at = range.head;
        let change = Change::insert(at, format!("{}{}", prefix, suffix));
        return Ok(Transaction::new(vec![change], Selection::caret(at + char_len(prefix))));
    }

    let selected = doc.slice(range.from(), range.to())?;
    let replacement = format!("{}{}{}", prefix, selected, suffix);
    let caret = range.from() + char_len(&replacement);

    Ok(Transaction::new(
        vec![Change::new(range.from(), range.to(), replacement)],
        Selection::caret(caret),
    ))
}

/// Insert `text` at `offset`; the caret ends after it
pub fn insert_at(doc: &Document, offset: usize, text: &str) -> Result<Transaction, EditError> {
    check_offset(doc, offset)?;
    Ok(Transaction::new(
        vec![Change::insert(offset, text)],
        Selection::caret(offset + char_len(text)),
    ))
}

/// Append `text` on a new line after the line containing `offset`
///
/// The current line is left intact; the caret ends after the inserted text.
pub fn insert_on_new_line(doc: &Document, offset: usize, text: &str) -> Result<Transaction, EditError> {
    check_offset(doc, offset)?;
    let eol = line_end_offset(doc, offset)?;
    let insert = format!("\n{}", text);
    let caret = eol + char_len(&insert);
    Ok(Transaction::new(vec![Change::insert(eol, insert)], Selection::caret(caret)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{BufferSurface, EditingSurface, Range};

    fn apply(text: &str, selection: Selection, build: impl Fn(&Document, &Selection) -> Result<Transaction, EditError>) -> (String, Selection) {
        let mut surface = BufferSurface::new(text);
        surface.dispatch(Transaction::select(selection)).unwrap();
        let tx = build(surface.document(), surface.selection()).unwrap();
        surface.dispatch(tx).unwrap();
        (surface.document().text(), surface.selection().clone())
    }

    #[test]
    fn test_line_prefix_caret_on_second_line() {
        for col in 0..=3 {
            let (text, sel) = apply("one\ntwo", Selection::caret(4 + col), |d, s| {
                line_prefix(d, s, "# ", None)
            });
            assert_eq!(text, "one\n# two");
            assert_eq!(sel, Selection::caret(6));
        }
    }

    #[test]
    fn test_line_prefix_custom_caret_offset() {
        let (text, sel) = apply("item", Selection::caret(2), |d, s| line_prefix(d, s, "1. ", Some(1)));
        assert_eq!(text, "1. item");
        assert_eq!(sel, Selection::caret(1));
    }

    #[test]
    fn test_line_prefix_multiple_ranges_any_order() {
        // Ranges given bottom-up: line 2 first, then line 0
        let selection = Selection::new(vec![Range::new(9, 11), Range::new(0, 2)], 0).unwrap();
        let (text, sel) = apply("aaa\nbbb\nccc", selection, |d, s| line_prefix(d, s, "> ", None));
        assert_eq!(text, "> aaa\nbbb\n> ccc");
        assert_eq!(sel, Selection::caret(2));
    }

    #[test]
    fn test_line_prefix_same_line_once() {
        let selection = Selection::new(vec![Range::new(0, 1), Range::new(2, 3)], 0).unwrap();
        let (text, _) = apply("abc\ndef", selection, |d, s| line_prefix(d, s, "- ", None));
        assert_eq!(text, "- abc\ndef");
    }

    #[test]
    fn test_line_prefix_multiple_carets_uses_first() {
        let selection = Selection::new(vec![Range::caret(5), Range::caret(1)], 1).unwrap();
        let (text, sel) = apply("aaa\nbbb", selection, |d, s| line_prefix(d, s, "# ", None));
        assert_eq!(text, "aaa\n# bbb");
        assert_eq!(sel, Selection::caret(6));
    }

    #[test]
    fn test_line_prefix_rejects_overflowing_caret_offset() {
        let doc = Document::from_text("one\ntwo");
        assert_eq!(
            line_prefix(&doc, &Selection::caret(5), "# ", Some(usize::MAX)),
            Err(EditError::InvalidOffset {
                offset: usize::MAX,
                len: 7
            })
        );
    }

    #[test]
    fn test_wrap_empty_selection() {
        let (text, sel) = apply("ab", Selection::caret(1), |d, s| wrap(d, s, "**", "**"));
        assert_eq!(text, "a****b");
        assert_eq!(sel, Selection::caret(3));
    }

    #[test]
    fn test_wrap_selected_text() {
        let (text, sel) = apply("say hello now", Selection::single(4, 9), |d, s| wrap(d, s, "_", "_"));
        assert_eq!(text, "say _hello_ now");
        assert_eq!(sel, Selection::caret(11));
    }

    #[test]
    fn test_wrap_backward_selection_with_suffix() {
        let (text, sel) = apply("link", Selection::single(4, 0), |d, s| wrap(d, s, "[", "](url)"));
        assert_eq!(text, "[link](url)");
        assert_eq!(sel, Selection::caret(11));
    }

    #[test]
    fn test_insert_at() {
        let doc = Document::from_text("ab");
        let tx = insert_at(&doc, 1, "XY").unwrap();
        assert_eq!(tx.changes, vec![Change::insert(1, "XY")]);
        assert_eq!(tx.selection, Some(Selection::caret(3)));
    }

    #[test]
    fn test_insert_on_new_line() {
        let (text, sel) = apply("first\nsecond", Selection::caret(2), |d, s| {
            insert_on_new_line(d, s.main().head, "```\ncode\n```")
        });
        assert_eq!(text, "first\n```\ncode\n```\nsecond");
        assert_eq!(sel, Selection::caret(18));
    }

    #[test]
    fn test_invalid_offsets_fail_fast() {
        let doc = Document::from_text("abc");
        assert_eq!(
            insert_at(&doc, 4, "x"),
            Err(EditError::InvalidOffset { offset: 4, len: 3 })
        );
        assert!(insert_on_new_line(&doc, 10, "x").is_err());
        assert!(wrap(&doc, &Selection::single(1, 7), "*", "*").is_err());
        assert!(line_prefix(&doc, &Selection::caret(8), "# ", None).is_err());
    }
}
