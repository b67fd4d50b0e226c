//! Screen column ↔ byte offset mapping over plain (escape-free) lines.
//!
//! Columns count terminal cells: ASCII and accented Latin take one, CJK and
//! most emoji two, combining marks none. A column that lands inside a wide
//! glyph snaps to that glyph's first byte, so wide positions are stable but
//! always resolve to the left edge.

use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Byte offset of the grapheme covering screen column `col`.
///
/// Columns past the end of the line map to `line.len()`.
pub fn column_to_byte_offset(line: &str, col: usize) -> usize {
    let mut column = 0usize;
    for (offset, grapheme) in line.grapheme_indices(true) {
        let width = UnicodeWidthStr::width(grapheme);
        if col < column + width {
            return offset;
        }
        column += width;
    }
    line.len()
}

/// Screen column at which byte `offset` is drawn.
///
/// Offsets inside a multi-byte grapheme resolve to the grapheme's column;
/// offsets past the end resolve to the line width.
pub fn byte_offset_to_column(line: &str, offset: usize) -> usize {
    let mut column = 0usize;
    for (start, grapheme) in line.grapheme_indices(true) {
        if offset < start + grapheme.len() {
            return column;
        }
        column += UnicodeWidthStr::width(grapheme);
    }
    column
}

/// Column span `[start, end)` of the UAX #29 word segment under `col`.
pub fn word_bounds(line: &str, col: usize) -> Option<Range<usize>> {
    if col >= UnicodeWidthStr::width(line) {
        return None;
    }
    let offset = column_to_byte_offset(line, col);
    line.split_word_bound_indices()
        .find(|(start, word)| offset >= *start && offset < start + word.len())
        .map(|(start, word)| {
            let first = byte_offset_to_column(line, start);
            first..first + UnicodeWidthStr::width(word)
        })
}

/// Line span `[first, last]` of the non-blank run containing `line`.
pub fn paragraph_bounds<S: AsRef<str>>(lines: &[S], line: usize) -> Option<(usize, usize)> {
    let is_blank = |index: usize| lines[index].as_ref().trim().is_empty();
    if line >= lines.len() || is_blank(line) {
        return None;
    }
    let mut first = line;
    while first > 0 && !is_blank(first - 1) {
        first -= 1;
    }
    let mut last = line;
    while last + 1 < lines.len() && !is_blank(last + 1) {
        last += 1;
    }
    Some((first, last))
}

/// Slice of `line` covering columns `[from, to)`, empty when inverted.
pub fn slice_columns(line: &str, from: usize, to: usize) -> &str {
    let start = column_to_byte_offset(line, from);
    let end = column_to_byte_offset(line, to);
    if start >= end { "" } else { &line[start..end] }
}
