//! Inline span formatting: code, bold, italic, links and tool markers.

use crate::config::constants::glyphs::{TOOL_CALL_MARKER, TOOL_RESULT_MARKER};
use crate::ui::theme::ThemeStyles;
use crate::utils::ansi::{AnsiToken, AnsiTokens, paint};
use anstyle::Style;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// Private-use code points never produced by the other passes.
const PLACEHOLDER_OPEN: char = '\u{E000}';
const PLACEHOLDER_CLOSE: char = '\u{E001}';

static BOLD_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\*\*([^*\n]+?)\*\*").ok());
static LINK_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"\[([^\]\n]+)\]\(([^)\s]+)\)").ok());
static PLACEHOLDER_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new("\u{E000}(\\d+)\u{E001}").ok());

/// Runs `replacer` over every match; a pattern that failed to compile leaves the text as is.
fn replace_all(
    pattern: &Lazy<Option<Regex>>,
    text: String,
    replacer: impl FnMut(&Captures) -> String,
) -> String {
    match pattern.as_ref() {
        Some(re) => re.replace_all(&text, replacer).into_owned(),
        None => text,
    }
}

/// Applies inline markup to a single line of text.
pub(crate) struct InlineFormatter<'a> {
    styles: &'a ThemeStyles,
}

impl<'a> InlineFormatter<'a> {
    pub(crate) fn new(styles: &'a ThemeStyles) -> Self {
        Self { styles }
    }

    /// Format `text`. Code span contents are never touched by the other
    /// passes, and unmatched delimiters stay literal.
    pub(crate) fn format(&self, text: &str) -> String {
        let mut code_spans = Vec::new();
        let text = extract_code_spans(text, self.styles.inline_code, &mut code_spans);

        let text = replace_all(&BOLD_RE, text, |caps| paint(self.styles.bold, &caps[1]));
        let text = apply_italic(&text, self.styles.italic);
        let text = replace_all(&LINK_RE, text, |caps| {
            format!(
                "{} ({})",
                paint(self.styles.link_text, &caps[1]),
                paint(self.styles.link_url, &caps[2])
            )
        });
        let text = self.recolor_markers(&text);

        if code_spans.is_empty() {
            return text;
        }
        replace_all(&PLACEHOLDER_RE, text, |caps| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| code_spans.get(index).cloned())
                .unwrap_or_else(|| caps[0].to_string())
        })
    }

    fn recolor_markers(&self, text: &str) -> String {
        if !text.contains([TOOL_CALL_MARKER, TOOL_RESULT_MARKER]) {
            return text.to_string();
        }
        let mut out = String::with_capacity(text.len() + 32);
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            let style = match ch {
                TOOL_CALL_MARKER => self.styles.tool_marker,
                TOOL_RESULT_MARKER => self.styles.tool_result,
                _ => {
                    out.push(ch);
                    continue;
                }
            };
            out.push_str(&paint(style, ch.encode_utf8(&mut buf)));
        }
        out
    }
}

/// Replace backtick spans with numbered placeholders, collecting the styled
/// spans in `spans`.
fn extract_code_spans(text: &str, style: Style, spans: &mut Vec<String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('`') {
        let ticks = rest[start..].bytes().take_while(|&b| b == b'`').count();
        let fence = &rest[start..start + ticks];
        let body_start = start + ticks;
        match rest[body_start..].find(fence) {
            Some(len) if len > 0 => {
                out.push_str(&rest[..start]);
                out.push(PLACEHOLDER_OPEN);
                out.push_str(&spans.len().to_string());
                out.push(PLACEHOLDER_CLOSE);
                spans.push(paint(style, &rest[body_start..body_start + len]));
                rest = &rest[body_start + len + ticks..];
            }
            _ => {
                out.push_str(&rest[..body_start]);
                rest = &rest[body_start..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// `_text_` only where both underscores sit on identifier boundaries, so
/// `snake_case_names` survive untouched.
fn apply_italic(text: &str, style: Style) -> String {
    if !text.contains('_') {
        return text.to_string();
    }
    let chars = boundary_chars(text);
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut index = 0;

    while index < chars.len() {
        let (pos, ch) = chars[index];
        if ch == '_' && opens_italic(&chars, index) {
            if let Some(close) = find_italic_close(&chars, index) {
                let close_pos = chars[close].0;
                out.push_str(&text[copied..pos]);
                out.push_str(&paint(style, &text[pos + 1..close_pos]));
                copied = close_pos + 1;
                index = close + 1;
                continue;
            }
        }
        index += 1;
    }
    out.push_str(&text[copied..]);
    out
}

/// Characters with their byte offsets. Each escape left by an earlier pass
/// collapses to a single `ESC`, so the edge of a styled span reads as a word
/// boundary rather than as the sequence's final letter.
fn boundary_chars(text: &str) -> Vec<(usize, char)> {
    let mut chars = Vec::with_capacity(text.len());
    let mut offset = 0;
    for token in AnsiTokens::new(text) {
        match token {
            AnsiToken::Escape(escape) => {
                chars.push((offset, '\x1b'));
                offset += escape.len();
            }
            AnsiToken::Text(run) => {
                chars.extend(run.char_indices().map(|(index, ch)| (offset + index, ch)));
                offset += run.len();
            }
        }
    }
    chars
}

fn opens_italic(chars: &[(usize, char)], index: usize) -> bool {
    let before = index == 0 || !is_word_char(chars[index - 1].1);
    let after = chars
        .get(index + 1)
        .is_some_and(|&(_, ch)| !ch.is_whitespace() && ch != '_');
    before && after
}

fn find_italic_close(chars: &[(usize, char)], open: usize) -> Option<usize> {
    (open + 2..chars.len()).find(|&index| {
        chars[index].1 == '_'
            && !chars[index - 1].1.is_whitespace()
            && chars
                .get(index + 1)
                .is_none_or(|&(_, ch)| !is_word_char(ch))
    })
}
