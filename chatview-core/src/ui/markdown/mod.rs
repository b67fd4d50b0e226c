//! Markdown rendering for the chat panel.
//!
//! [`MarkdownRenderer`] classifies each source line (fences, pipe tables,
//! headings, rules, quotes, lists, paragraphs), applies inline markup and
//! hands the result to the layout engine. The output is a
//! [`StyledDocument`]: terminal lines that never exceed the requested width,
//! apart from code blocks and single unbreakable words.
//!
//! Rendering never fails. Anything the classifier cannot make sense of is
//! printed as a plain paragraph.

mod cache;
mod inline;

pub use cache::RenderCache;

use crate::config::ChatViewConfig;
use crate::config::constants::glyphs::{BLOCKQUOTE_BAR, BULLET, RULE};
use crate::config::constants::layout::{
    BLOCKQUOTE_PREFIX_WIDTH, LIST_NESTING_INDENT, MAX_HEADING_LEVEL, UNBOUNDED_RULE_WIDTH,
};
use crate::ui::highlight::SyntaxHighlighter;
use crate::ui::layout::{TableSpec, render_table, strip_ansi, visual_width, wrap};
use crate::ui::theme::{Theme, ThemeStyles};
use crate::utils::ansi::paint;
use inline::InlineFormatter;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use tracing::debug;

static SEPARATOR_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^\|[-:\s|]+\|$").ok());
static HEADING_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").ok());
static BULLET_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^(\s*)[-*]\s+(.*)$").ok());
static NUMBERED_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^(\s*)(\d+)\.\s+(.*)$").ok());

const FENCE: &str = "```";

/// Rendered terminal lines, each possibly carrying ANSI escapes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyledDocument {
    lines: Vec<String>,
}

impl StyledDocument {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines with every escape sequence removed.
    pub fn plain_lines(&self) -> Vec<String> {
        self.lines.iter().map(|line| strip_ansi(line)).collect()
    }

    /// Widest line in terminal columns.
    pub fn max_width(&self) -> usize {
        self.lines
            .iter()
            .map(|line| visual_width(line))
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for StyledDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

/// Raw text between two fences.
struct CodeBlockSpan {
    language: Option<String>,
    lines: Vec<String>,
}

impl CodeBlockSpan {
    fn open(fence_line: &str) -> Self {
        let language = fence_line
            .trim_start_matches('`')
            .split_whitespace()
            .next()
            .map(str::to_string);
        Self {
            language,
            lines: Vec::new(),
        }
    }
}

/// Buffered pipe-table rows, flushed as one table.
#[derive(Default)]
struct TableBuffer {
    rows: Vec<Vec<String>>,
    has_header: bool,
    seen_rows: usize,
}

impl TableBuffer {
    fn push(&mut self, row: &str, formatter: &InlineFormatter<'_>) {
        self.seen_rows += 1;
        if is_separator_row(row) {
            if self.seen_rows == 2 && self.rows.len() == 1 {
                self.has_header = true;
            }
            return;
        }
        self.rows.push(
            split_cells(row)
                .into_iter()
                .map(|cell| formatter.format(&cell))
                .collect(),
        );
    }

    fn is_empty(&self) -> bool {
        self.seen_rows == 0
    }
}

/// Converts message text into a [`StyledDocument`].
#[derive(Clone, Debug)]
pub struct MarkdownRenderer {
    theme_id: &'static str,
    styles: ThemeStyles,
    highlighter: SyntaxHighlighter,
    min_column_width: usize,
}

impl MarkdownRenderer {
    pub fn new(theme: &Theme, config: &ChatViewConfig) -> Self {
        Self {
            theme_id: theme.id(),
            styles: theme.styles().clone(),
            highlighter: SyntaxHighlighter::new(theme, &config.syntax_highlighting),
            min_column_width: config.markdown.min_column_width,
        }
    }

    /// Renderer with default configuration.
    pub fn with_theme(theme: &Theme) -> Self {
        Self::new(theme, &ChatViewConfig::default())
    }

    pub fn theme_id(&self) -> &'static str {
        self.theme_id
    }

    /// Render `content` into lines at most `width` columns wide.
    ///
    /// `width == 0` disables wrapping.
    pub fn render(&self, content: &str, width: usize) -> StyledDocument {
        let formatter = InlineFormatter::new(&self.styles);
        let mut out = Vec::new();
        let mut code: Option<CodeBlockSpan> = None;
        let mut table = TableBuffer::default();

        for line in content.lines() {
            let trimmed = line.trim();

            if code.is_some() {
                if trimmed.starts_with(FENCE) {
                    if let Some(span) = code.take() {
                        self.flush_code(span, &mut out);
                    }
                } else if let Some(span) = code.as_mut() {
                    span.lines.push(line.to_string());
                }
                continue;
            }

            if trimmed.starts_with(FENCE) {
                self.flush_table(&mut table, width, &mut out);
                code = Some(CodeBlockSpan::open(trimmed));
                continue;
            }

            if is_table_row(trimmed) {
                table.push(trimmed, &formatter);
                continue;
            }

            self.flush_table(&mut table, width, &mut out);
            self.render_line(line, width, &formatter, &mut out);
        }

        self.flush_table(&mut table, width, &mut out);
        if let Some(span) = code {
            debug!(language = ?span.language, "unterminated code fence, flushing as code");
            self.flush_code(span, &mut out);
        }

        StyledDocument::new(out)
    }

    fn render_line(
        &self,
        line: &str,
        width: usize,
        formatter: &InlineFormatter<'_>,
        out: &mut Vec<String>,
    ) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            out.push(String::new());
            return;
        }

        if let Some((level, text)) = parse_heading(trimmed) {
            out.push(paint(self.styles.heading(level), text));
            return;
        }

        if is_horizontal_rule(trimmed) {
            let rule_width = if width == 0 {
                UNBOUNDED_RULE_WIDTH
            } else {
                width
            };
            out.push(paint(self.styles.rule, &RULE.repeat(rule_width)));
            return;
        }

        if let Some(quoted) = parse_blockquote(line) {
            let inner_width = narrow(width, BLOCKQUOTE_PREFIX_WIDTH);
            let bar = paint(self.styles.blockquote, &format!("{BLOCKQUOTE_BAR} "));
            let mut inner = Vec::new();
            self.render_line(quoted, inner_width, formatter, &mut inner);
            out.extend(inner.into_iter().map(|line| format!("{bar}{line}")));
            return;
        }

        if let Some(item) = parse_list_item(line) {
            let marker = match &item.kind {
                ListMarker::Bullet => paint(self.styles.list_bullet, BULLET),
                ListMarker::Number(number) => paint(self.styles.list_bullet, &format!("{number}.")),
            };
            let indent = " ".repeat(item.level * LIST_NESTING_INDENT + 2);
            let prefix = format!("{indent}{marker} ");
            let prefix_width = visual_width(&prefix);
            let content_width = narrow(width, prefix_width);
            let continuation = " ".repeat(prefix_width);

            let body = formatter.format(item.text);
            for (index, wrapped) in wrap(&body, content_width).into_iter().enumerate() {
                let lead = if index == 0 { &prefix } else { &continuation };
                out.push(format!("{lead}{wrapped}"));
            }
            return;
        }

        out.extend(wrap(&formatter.format(line), width));
    }

    fn flush_table(&self, table: &mut TableBuffer, width: usize, out: &mut Vec<String>) {
        if table.is_empty() {
            return;
        }
        let buffer = std::mem::take(table);
        if buffer.rows.is_empty() {
            return;
        }
        let spec = TableSpec::new(buffer.rows, buffer.has_header)
            .with_min_column_width(self.min_column_width.max(1));
        out.extend(render_table(&spec, width, &self.styles));
    }

    fn flush_code(&self, span: CodeBlockSpan, out: &mut Vec<String>) {
        out.push(String::new());
        if !span.lines.is_empty() {
            let code = span.lines.join("\n");
            let highlighted = self.highlighter.highlight(&code, span.language.as_deref());
            out.extend(highlighted.split('\n').map(str::to_string));
        }
        out.push(String::new());
    }
}

/// Width left after a prefix; `0` stays unbounded and never shrinks to it.
fn narrow(width: usize, prefix: usize) -> usize {
    if width == 0 {
        0
    } else {
        width.saturating_sub(prefix).max(1)
    }
}

fn is_table_row(trimmed: &str) -> bool {
    trimmed.len() > 1
        && trimmed.starts_with('|')
        && trimmed.ends_with('|')
        && trimmed.matches('|').count() >= 3
}

fn is_separator_row(row: &str) -> bool {
    row.contains('-')
        && SEPARATOR_RE
            .as_ref()
            .is_some_and(|re| re.is_match(row))
}

fn split_cells(row: &str) -> Vec<String> {
    let inner = row
        .strip_prefix('|')
        .and_then(|rest| rest.strip_suffix('|'))
        .unwrap_or(row);
    inner.split('|').map(|cell| cell.trim().to_string()).collect()
}

fn parse_heading(trimmed: &str) -> Option<(usize, &str)> {
    let caps = HEADING_RE.as_ref()?.captures(trimmed)?;
    let level = caps.get(1)?.as_str().len();
    if level > MAX_HEADING_LEVEL {
        return None;
    }
    Some((level, caps.get(2)?.as_str().trim()))
}

fn is_horizontal_rule(trimmed: &str) -> bool {
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first @ ('-' | '*' | '_')) => trimmed.len() >= 3 && chars.all(|ch| ch == first),
        _ => false,
    }
}

fn parse_blockquote(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix('>')?;
    if rest.is_empty() {
        return Some(rest);
    }
    rest.strip_prefix(' ')
}

enum ListMarker {
    Bullet,
    Number(u64),
}

struct ListItem<'a> {
    kind: ListMarker,
    level: usize,
    text: &'a str,
}

fn indent_level(indent: &str) -> usize {
    let columns: usize = indent
        .chars()
        .map(|ch| if ch == '\t' { LIST_NESTING_INDENT } else { 1 })
        .sum();
    columns / LIST_NESTING_INDENT
}

fn parse_list_item(line: &str) -> Option<ListItem<'_>> {
    if let Some(caps) = BULLET_RE.as_ref().and_then(|re| re.captures(line)) {
        return Some(ListItem {
            kind: ListMarker::Bullet,
            level: indent_level(caps.get(1)?.as_str()),
            text: caps.get(2)?.as_str(),
        });
    }
    let caps = NUMBERED_RE.as_ref()?.captures(line)?;
    let number = caps.get(2)?.as_str().parse().ok()?;
    Some(ListItem {
        kind: ListMarker::Number(number),
        level: indent_level(caps.get(1)?.as_str()),
        text: caps.get(3)?.as_str(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::constants::layout::LIST_PREFIX_WIDTH;

    fn render(content: &str, width: usize) -> Vec<String> {
        MarkdownRenderer::with_theme(&Theme::default())
            .render(content, width)
            .plain_lines()
    }

    #[test]
    fn test_heading_drops_hashes_and_is_not_wrapped() {
        assert_eq!(render("## A fairly long heading", 5), vec!["A fairly long heading"]);
        assert_eq!(render("##### five", 40), vec!["##### five"]);
    }

    #[test]
    fn test_horizontal_rule() {
        assert_eq!(render("---", 10), vec!["─".repeat(10)]);
        assert_eq!(render("***", 0), vec!["─".repeat(32)]);
    }

    #[test]
    fn test_bullet_list_wraps_under_content() {
        assert_eq!(
            render("- alpha beta gamma", 14),
            vec!["  • alpha beta", "    gamma"]
        );
    }

    #[test]
    fn test_top_level_bullet_prefix_width() {
        let line = &render("- x", 40)[0];
        assert_eq!(visual_width(line) - 1, LIST_PREFIX_WIDTH);
    }

    #[test]
    fn test_nested_bullet_indents() {
        assert_eq!(render("  * nested", 40), vec!["    • nested"]);
    }

    #[test]
    fn test_numbered_prefix_width_tracks_digits() {
        assert_eq!(render("3. three", 40), vec!["  3. three"]);
        assert_eq!(
            render("12. one two three", 12),
            vec!["  12. one", "      two", "      three"]
        );
    }

    #[test]
    fn test_blockquote_nests_bars() {
        assert_eq!(render("> > deep", 40), vec!["│ │ deep"]);
        assert_eq!(
            render("> one two three", 9),
            vec!["│ one two", "│ three"]
        );
    }

    #[test]
    fn test_paragraph_inline_formatting() {
        assert_eq!(
            render("**bold** and [link](http://x.y)", 80),
            vec!["bold and link (http://x.y)"]
        );
    }

    #[test]
    fn test_code_block_surrounded_by_blank_lines() {
        let lines = render("before\n```rust\nlet x = 1;\n```\nafter", 80);
        assert_eq!(lines, vec!["before", "", "let x = 1;", "", "after"]);
    }

    #[test]
    fn test_unterminated_fence_is_flushed() {
        let lines = render("```\nstill code", 80);
        assert_eq!(lines, vec!["", "still code", ""]);
    }

    #[test]
    fn test_code_block_content_is_verbatim() {
        let lines = render("```\n**not bold** - not a list\n```", 80);
        assert_eq!(lines[1], "**not bold** - not a list");
    }

    #[test]
    fn test_table_with_header() {
        let lines = render("| a | b |\n|---|---|\n| 1 | 2 |", 40);
        assert_eq!(
            lines,
            vec![
                "┌─────┬─────┐",
                "│ a   │ b   │",
                "├─────┼─────┤",
                "│ 1   │ 2   │",
                "└─────┴─────┘",
            ]
        );
    }

    #[test]
    fn test_table_without_separator_has_no_header_rule() {
        let lines = render("| a | b |\n| 1 | 2 |", 40);
        assert_eq!(lines.len(), 4);
        assert!(!lines.iter().any(|line| line.contains('┼')));
    }

    #[test]
    fn test_empty_lines_preserved() {
        assert_eq!(render("a\n\nb", 10), vec!["a", "", "b"]);
    }

    #[test]
    fn test_width_bound_holds_for_prose() {
        let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod";
        let doc = MarkdownRenderer::with_theme(&Theme::default()).render(text, 20);
        assert!(doc.max_width() <= 20);
        assert!(doc.len() > 1);
    }
}
