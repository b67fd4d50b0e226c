//! Width-bounded layout: ANSI-aware word wrap and pipe-table drawing.
//!
//! Every function here measures text with [`visual_width`], so escape
//! sequences are zero columns, wide glyphs two and combining marks zero.

use crate::config::constants::{glyphs::table as border, layout::MIN_COLUMN_WIDTH};
use crate::ui::theme::ThemeStyles;
use crate::utils::ansi::{AnsiToken, AnsiTokens, RESET, SgrState, paint};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub use crate::utils::ansi::{strip_ansi, visual_width};

/// A run of the input that wraps as a unit.
struct Piece {
    raw: String,
    width: usize,
    is_space: bool,
}

fn split_pieces(line: &str) -> Vec<Piece> {
    let mut pieces: Vec<Piece> = Vec::new();
    for token in AnsiTokens::new(line) {
        match token {
            // Escapes stick to the following word so a dropped space never takes them along.
            AnsiToken::Escape(escape) => match pieces.last_mut() {
                Some(last) if !last.is_space => last.raw.push_str(escape),
                _ => pieces.push(Piece {
                    raw: escape.to_string(),
                    width: 0,
                    is_space: false,
                }),
            },
            AnsiToken::Text(text) => {
                for ch in text.chars() {
                    let is_space = ch.is_whitespace();
                    let width = UnicodeWidthChar::width(ch).unwrap_or(0);
                    match pieces.last_mut() {
                        Some(last) if last.is_space == is_space => {
                            last.raw.push(ch);
                            last.width += width;
                        }
                        _ => pieces.push(Piece {
                            raw: ch.to_string(),
                            width,
                            is_space,
                        }),
                    }
                }
            }
        }
    }
    pieces
}

/// Greedy word wrap at whitespace.
///
/// Explicit newlines are kept. `width == 0` returns the lines untouched. A
/// single token wider than `width` gets a line of its own and is never split.
/// SGR state open at a wrap point is reset at the end of the line and
/// reopened at the start of the next one.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for line in text.split('\n') {
        if width == 0 {
            out.push(line.to_string());
        } else {
            wrap_line(line, width, &mut out);
        }
    }
    out
}

fn wrap_line(line: &str, width: usize, out: &mut Vec<String>) {
    let mut sgr = SgrState::default();
    let mut current = String::new();
    let mut current_width = 0usize;
    let mut pending = String::new();
    let mut pending_width = 0usize;
    let mut first_row = true;

    for piece in split_pieces(line) {
        if piece.is_space {
            if current_width > 0 || first_row {
                pending.push_str(&piece.raw);
                pending_width += piece.width;
            }
            continue;
        }
        if piece.width == 0 && strip_ansi(&piece.raw).is_empty() {
            current.push_str(&piece.raw);
            sgr.observe_all(&piece.raw);
            continue;
        }

        let fits = current_width + pending_width + piece.width <= width;
        if current_width > 0 && !fits {
            if sgr.is_open() {
                current.push_str(RESET);
            }
            out.push(std::mem::take(&mut current));
            current.push_str(&sgr.reopen());
            current_width = 0;
            first_row = false;
        } else if !fits {
            // Indentation that would push the first token past the width is dropped.
            first_row = false;
        } else {
            current.push_str(&pending);
            current_width += pending_width;
        }
        pending.clear();
        pending_width = 0;

        current.push_str(&piece.raw);
        current_width += piece.width;
        sgr.observe_all(&piece.raw);
    }

    out.push(current);
}

/// Split `line` at grapheme boundaries so no piece exceeds `width` columns.
///
/// Used for table cells, where an unbreakable token would otherwise push the
/// border out of alignment.
pub fn hard_split(line: &str, width: usize) -> Vec<String> {
    if width == 0 || visual_width(line) <= width {
        return vec![line.to_string()];
    }

    let mut out = Vec::new();
    let mut sgr = SgrState::default();
    let mut current = String::new();
    let mut current_width = 0usize;

    for token in AnsiTokens::new(line) {
        match token {
            AnsiToken::Escape(escape) => {
                current.push_str(escape);
                sgr.observe(escape);
            }
            AnsiToken::Text(text) => {
                for grapheme in text.graphemes(true) {
                    let grapheme_width = UnicodeWidthStr::width(grapheme);
                    if current_width > 0 && current_width + grapheme_width > width {
                        if sgr.is_open() {
                            current.push_str(RESET);
                        }
                        out.push(std::mem::take(&mut current));
                        current.push_str(&sgr.reopen());
                        current_width = 0;
                    }
                    current.push_str(grapheme);
                    current_width += grapheme_width;
                }
            }
        }
    }
    out.push(current);
    out
}

/// Shrink natural column widths to fit `available` columns.
pub fn distribute_table_columns(natural: &[usize], available: usize) -> Vec<usize> {
    distribute_table_columns_with_min(natural, available, MIN_COLUMN_WIDTH)
}

/// [`distribute_table_columns`] with an explicit column floor.
///
/// When the natural widths fit they are returned as is. Otherwise columns no
/// wider than the average share keep their width and the wider ones split
/// what is left evenly. No column ends up narrower than `min_width`.
pub fn distribute_table_columns_with_min(
    natural: &[usize],
    available: usize,
    min_width: usize,
) -> Vec<usize> {
    if natural.is_empty() {
        return Vec::new();
    }
    let total: usize = natural.iter().sum();
    if total <= available {
        return natural.to_vec();
    }

    let columns = natural.len();
    let average = min_width.max(available / columns);
    let mut widths = natural.to_vec();
    let mut remaining = available;
    let mut wide = Vec::new();

    for (index, &width) in natural.iter().enumerate() {
        if width <= average {
            remaining = remaining.saturating_sub(width.max(min_width));
        } else {
            wide.push(index);
        }
    }

    if !wide.is_empty() {
        let share = min_width.max(remaining / wide.len());
        for index in wide {
            widths[index] = share;
        }
    }

    widths.iter().map(|&width| width.max(min_width)).collect()
}

/// Rows of a pipe table awaiting layout.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableSpec {
    pub rows: Vec<Vec<String>>,
    pub has_header: bool,
    pub min_column_width: usize,
}

impl TableSpec {
    pub fn new(rows: Vec<Vec<String>>, has_header: bool) -> Self {
        Self {
            rows,
            has_header,
            min_column_width: MIN_COLUMN_WIDTH,
        }
    }

    pub fn with_min_column_width(mut self, min_column_width: usize) -> Self {
        self.min_column_width = min_column_width;
        self
    }

    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Widest cell per column, floored at the minimum column width.
    pub fn natural_widths(&self) -> Vec<usize> {
        let mut widths = vec![self.min_column_width; self.column_count()];
        for row in &self.rows {
            for (index, cell) in row.iter().enumerate() {
                widths[index] = widths[index].max(visual_width(cell));
            }
        }
        widths
    }

    /// Column widths after fitting into a table drawn `width` columns wide.
    ///
    /// `width == 0` means unbounded and keeps the natural widths.
    pub fn final_widths(&self, width: usize) -> Vec<usize> {
        let natural = self.natural_widths();
        if width == 0 {
            return natural;
        }
        let chrome = 3 * natural.len() + 1;
        let available = width.saturating_sub(chrome);
        distribute_table_columns_with_min(&natural, available, self.min_column_width)
    }
}

/// Draw `spec` as a box-drawn table no wider than `width` where possible.
pub fn render_table(spec: &TableSpec, width: usize, styles: &ThemeStyles) -> Vec<String> {
    let columns = spec.column_count();
    if columns == 0 {
        return Vec::new();
    }
    let widths = spec.final_widths(width);
    let mut lines = Vec::new();

    lines.push(border_line(
        &widths,
        border::TOP_LEFT,
        border::TOP_MID,
        border::TOP_RIGHT,
        styles,
    ));

    for (row_index, row) in spec.rows.iter().enumerate() {
        let is_header = spec.has_header && row_index == 0;
        let cells: Vec<Vec<String>> = (0..columns)
            .map(|column| {
                let cell = row.get(column).map(String::as_str).unwrap_or("");
                wrap(cell, widths[column])
                    .iter()
                    .flat_map(|line| hard_split(line, widths[column]))
                    .collect()
            })
            .collect();
        let height = cells.iter().map(Vec::len).max().unwrap_or(1);

        for line_index in 0..height {
            let mut line = paint(styles.table_border, border::VERTICAL);
            for (column, cell_lines) in cells.iter().enumerate() {
                let content = cell_lines.get(line_index).map(String::as_str).unwrap_or("");
                let padding = widths[column].saturating_sub(visual_width(content));
                let content = if is_header {
                    paint(styles.table_header, content)
                } else {
                    content.to_string()
                };
                line.push(' ');
                line.push_str(&content);
                line.push_str(&" ".repeat(padding));
                line.push(' ');
                line.push_str(&paint(styles.table_border, border::VERTICAL));
            }
            lines.push(line);
        }

        if is_header && spec.rows.len() > 1 {
            lines.push(border_line(
                &widths,
                border::MID_LEFT,
                border::MID_MID,
                border::MID_RIGHT,
                styles,
            ));
        }
    }

    lines.push(border_line(
        &widths,
        border::BOTTOM_LEFT,
        border::BOTTOM_MID,
        border::BOTTOM_RIGHT,
        styles,
    ));
    lines
}

fn border_line(
    widths: &[usize],
    left: &str,
    middle: &str,
    right: &str,
    styles: &ThemeStyles,
) -> String {
    let segments: Vec<String> = widths
        .iter()
        .map(|width| border::HORIZONTAL.repeat(width + 2))
        .collect();
    let line = format!("{left}{}{right}", segments.join(middle));
    paint(styles.table_border, &line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::Theme;

    #[test]
    fn test_wrap_zero_width_passthrough() {
        assert_eq!(wrap("a b\nc", 0), vec!["a b", "c"]);
    }

    #[test]
    fn test_wrap_greedy() {
        assert_eq!(
            wrap("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
    }

    #[test]
    fn test_wrap_preserves_newlines_and_empty_lines() {
        assert_eq!(wrap("one\n\ntwo", 20), vec!["one", "", "two"]);
    }

    #[test]
    fn test_wrap_long_token_on_own_line() {
        assert_eq!(
            wrap("a supercalifragilistic b", 5),
            vec!["a", "supercalifragilistic", "b"]
        );
    }

    #[test]
    fn test_wrap_keeps_leading_indent() {
        assert_eq!(wrap("  indented text", 40), vec!["  indented text"]);
    }

    #[test]
    fn test_wrap_drops_indent_that_overflows() {
        assert_eq!(wrap("      x", 2), vec!["x"]);
        assert_eq!(wrap("  ab cd", 3), vec!["ab", "cd"]);
        assert_eq!(wrap("  ab", 4), vec!["  ab"]);
    }

    #[test]
    fn test_wrap_counts_wide_glyphs() {
        assert_eq!(wrap("世界 世界", 4), vec!["世界", "世界"]);
    }

    #[test]
    fn test_wrap_closes_and_reopens_sgr() {
        let lines = wrap("\x1b[1mbold words here\x1b[0m", 10);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(RESET));
        assert!(lines[1].starts_with("\x1b[1m"));
        assert_eq!(strip_ansi(&lines[0]), "bold words");
        assert_eq!(strip_ansi(&lines[1]), "here");
    }

    #[test]
    fn test_wrap_ignores_escape_width() {
        let text = "\x1b[31mred\x1b[0m \x1b[32mgreen\x1b[0m";
        assert_eq!(wrap(text, 9), vec![text.to_string()]);
    }

    #[test]
    fn test_hard_split_by_graphemes() {
        assert_eq!(hard_split("abcdefg", 3), vec!["abc", "def", "g"]);
        assert_eq!(hard_split("世界世", 3), vec!["世", "界", "世"]);
        assert_eq!(hard_split("ab", 3), vec!["ab"]);
    }

    #[test]
    fn test_distribute_identity_when_fits() {
        assert_eq!(distribute_table_columns(&[5, 10, 3], 30), vec![5, 10, 3]);
    }

    #[test]
    fn test_distribute_shrinks_wide_columns() {
        let widths = distribute_table_columns(&[4, 40, 40], 30);
        assert_eq!(widths, vec![4, 13, 13]);
        assert!(widths.iter().sum::<usize>() <= 30);
    }

    #[test]
    fn test_distribute_floors_at_minimum() {
        assert_eq!(distribute_table_columns(&[10, 10], 2), vec![3, 3]);
        assert!(distribute_table_columns(&[], 10).is_empty());
    }

    #[test]
    fn test_table_spec_natural_widths() {
        let spec = TableSpec::new(
            vec![
                vec!["a".into(), "longer".into()],
                vec!["世界".into()],
            ],
            true,
        );
        assert_eq!(spec.column_count(), 2);
        assert_eq!(spec.natural_widths(), vec![4, 6]);
    }

    #[test]
    fn test_render_table_layout() {
        let theme = Theme::default();
        let spec = TableSpec::new(
            vec![
                vec!["Name".into(), "Value".into()],
                vec!["a".into(), "1".into()],
            ],
            true,
        );
        let lines: Vec<String> = render_table(&spec, 40, theme.styles())
            .iter()
            .map(|line| strip_ansi(line))
            .collect();
        assert_eq!(
            lines,
            vec![
                "┌──────┬───────┐",
                "│ Name │ Value │",
                "├──────┼───────┤",
                "│ a    │ 1     │",
                "└──────┴───────┘",
            ]
        );
    }

    #[test]
    fn test_render_table_single_row_has_no_separator() {
        let theme = Theme::default();
        let spec = TableSpec::new(vec![vec!["only".into(), "row".into()]], true);
        let lines = render_table(&spec, 40, theme.styles());
        assert_eq!(lines.len(), 3);
        assert!(!lines.iter().any(|line| strip_ansi(line).contains('┼')));
    }

    #[test]
    fn test_render_table_wraps_cells_within_width() {
        let theme = Theme::default();
        let spec = TableSpec::new(
            vec![vec![
                "short".into(),
                "a much longer cell that has to wrap across lines".into(),
            ]],
            false,
        );
        let lines = render_table(&spec, 30, theme.styles());
        assert!(lines.len() > 3);
        for line in &lines {
            assert!(visual_width(line) <= 30, "{line:?} too wide");
        }
    }
}
