//! Edit descriptors and byte/point translation.
//!
//! The incremental parser ages its tree from [`TextEdit`] values that carry
//! a mutation's byte offsets and (row, column) points. Columns are byte
//! offsets within the row, matching `tree_sitter::Point`, so the two
//! coordinate systems never drift apart.

use lodestone_text::SourcePoint;

/// Describes one buffer mutation in both byte and point coordinates.
///
/// For an insert `old_end == start`; for a delete `new_end == start`; a
/// replace has both ends past the start. Edits must be applied to the
/// parser in the order they occurred in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEdit {
    /// Byte offset where the edit starts.
    pub start_byte: usize,
    /// Byte offset where the old content ended.
    pub old_end_byte: usize,
    /// Byte offset where the new content ends.
    pub new_end_byte: usize,
    /// Point of the edit start.
    pub start_point: SourcePoint,
    /// Point where the old content ended.
    pub old_end_point: SourcePoint,
    /// Point where the new content ends.
    pub new_end_point: SourcePoint,
}

impl TextEdit {
    /// Builds the edit for inserting `text` at `at` in `source`.
    ///
    /// `source` is the content *before* the edit.
    pub fn insert(source: &str, at: SourcePoint, text: &str) -> TextEdit {
        let start_byte = point_to_byte_offset(source, at);
        TextEdit {
            start_byte,
            old_end_byte: start_byte,
            new_end_byte: start_byte + text.len(),
            start_point: at,
            old_end_point: at,
            new_end_point: advance_point(at, text),
        }
    }

    /// Builds the edit for deleting `[start, end)` from `source`.
    pub fn delete(source: &str, start: SourcePoint, end: SourcePoint) -> TextEdit {
        let start_byte = point_to_byte_offset(source, start);
        let old_end_byte = point_to_byte_offset(source, end);
        TextEdit {
            start_byte,
            old_end_byte,
            new_end_byte: start_byte,
            start_point: start,
            old_end_point: end,
            new_end_point: start,
        }
    }

    /// Builds the edit for replacing `[start, end)` in `source` with `text`.
    pub fn replace(source: &str, start: SourcePoint, end: SourcePoint, text: &str) -> TextEdit {
        let start_byte = point_to_byte_offset(source, start);
        let old_end_byte = point_to_byte_offset(source, end);
        TextEdit {
            start_byte,
            old_end_byte,
            new_end_byte: start_byte + text.len(),
            start_point: start,
            old_end_point: end,
            new_end_point: advance_point(start, text),
        }
    }

    /// Converts this edit to a `tree_sitter::InputEdit`.
    pub fn to_input_edit(&self) -> tree_sitter::InputEdit {
        tree_sitter::InputEdit {
            start_byte: self.start_byte,
            old_end_byte: self.old_end_byte,
            new_end_byte: self.new_end_byte,
            start_position: to_ts_point(self.start_point),
            old_end_position: to_ts_point(self.old_end_point),
            new_end_position: to_ts_point(self.new_end_point),
        }
    }
}

pub(crate) fn to_ts_point(point: SourcePoint) -> tree_sitter::Point {
    tree_sitter::Point {
        row: point.row,
        column: point.column,
    }
}

/// The point reached by appending `text` at `start`.
fn advance_point(start: SourcePoint, text: &str) -> SourcePoint {
    let mut point = start;
    for byte in text.bytes() {
        if byte == b'\n' {
            point.row += 1;
            point.column = 0;
        } else {
            point.column += 1;
        }
    }
    point
}

/// The byte offset of `point` in `source`.
///
/// Columns past the end of the row clamp to the row's end; rows past the
/// end of the source clamp to the source length.
pub fn point_to_byte_offset(source: &str, point: SourcePoint) -> usize {
    let mut row_start = 0;
    let mut row = 0;
    while row < point.row {
        match source[row_start..].find('\n') {
            Some(newline) => {
                row_start += newline + 1;
                row += 1;
            }
            None => return source.len(),
        }
    }
    let row_end = source[row_start..]
        .find('\n')
        .map(|newline| row_start + newline)
        .unwrap_or(source.len());
    (row_start + point.column).min(row_end)
}

/// The point of byte offset `byte` in `source`, clamped to the end.
pub fn byte_offset_to_point(source: &str, byte: usize) -> SourcePoint {
    let byte = byte.min(source.len());
    let prefix = &source.as_bytes()[..byte];
    let row = prefix.iter().filter(|&&b| b == b'\n').count();
    let row_start = prefix
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|pos| pos + 1)
        .unwrap_or(0);
    SourcePoint::new(row, byte - row_start)
}
