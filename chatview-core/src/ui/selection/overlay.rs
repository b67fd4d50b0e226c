use crate::utils::ansi::{AnsiToken, AnsiTokens, RESET, SgrState, is_sgr};
use anstyle::Style;
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Paint the cells in `columns` of a styled line with `style`.
///
/// Styling outside the span is kept: when the span ends, the SGR state the
/// line had at that point is restored. Escapes inside the span are passed
/// through and the overlay is re-applied after each one. A grapheme is
/// selected when its right edge falls in `(start, end]`, the same rule
/// [`slice_columns`](super::slice_columns) applies when copying.
pub(crate) fn overlay_columns(line: &str, columns: Range<usize>, style: Style) -> String {
    if columns.is_empty() {
        return line.to_string();
    }
    let open = style.render().to_string();
    let mut out = String::with_capacity(line.len() + open.len() * 2 + RESET.len());
    let mut sgr = SgrState::default();
    let mut column = 0usize;
    let mut inside = false;

    for token in AnsiTokens::new(line) {
        match token {
            AnsiToken::Escape(escape) => {
                out.push_str(escape);
                sgr.observe(escape);
                if inside && is_sgr(escape) {
                    out.push_str(&open);
                }
            }
            AnsiToken::Text(text) => {
                for grapheme in text.graphemes(true) {
                    let width = UnicodeWidthStr::width(grapheme);
                    let right = column + width;
                    let selected = right > columns.start && right <= columns.end;
                    if selected && !inside {
                        out.push_str(&open);
                        inside = true;
                    } else if !selected && inside {
                        out.push_str(RESET);
                        out.push_str(&sgr.reopen());
                        inside = false;
                    }
                    out.push_str(grapheme);
                    column = right;
                }
            }
        }
    }

    if inside {
        out.push_str(RESET);
        out.push_str(&sgr.reopen());
    }
    out
}
