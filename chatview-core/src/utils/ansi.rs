//! ANSI escape handling shared by the layout and selection code.
//!
//! Rendered lines carry SGR sequences produced by `anstyle`. Everything that
//! measures or slices those lines goes through [`AnsiTokens`] so escape bytes
//! never count toward the visual width.

use anstyle::{Reset, Style};
use unicode_width::UnicodeWidthStr;

const ESC: char = '\x1b';
const BEL: char = '\x07';

/// The SGR reset sequence.
pub const RESET: &str = "\x1b[0m";

/// A piece of a line: either an escape sequence or printable text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnsiToken<'a> {
    Escape(&'a str),
    Text(&'a str),
}

/// Splits a string into escape sequences and text runs.
///
/// Understands CSI (`ESC [ ... final`), OSC (`ESC ] ... BEL` or `ESC ] ... ESC \`)
/// and two-byte `ESC x` sequences. An unterminated sequence swallows the rest
/// of the input.
pub struct AnsiTokens<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> AnsiTokens<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }
}

impl<'a> Iterator for AnsiTokens<'a> {
    type Item = AnsiToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.source[self.pos..];
        if rest.is_empty() {
            return None;
        }

        if rest.starts_with(ESC) {
            let len = escape_len(rest);
            self.pos += len;
            return Some(AnsiToken::Escape(&rest[..len]));
        }

        let len = rest.find(ESC).unwrap_or(rest.len());
        self.pos += len;
        Some(AnsiToken::Text(&rest[..len]))
    }
}

/// Byte length of the escape sequence at the start of `rest`.
fn escape_len(rest: &str) -> usize {
    let mut chars = rest.char_indices().skip(1);
    match chars.next() {
        None => rest.len(),
        Some((_, '[')) => {
            for (idx, ch) in chars {
                if ('\x40'..='\x7e').contains(&ch) {
                    return idx + ch.len_utf8();
                }
            }
            rest.len()
        }
        Some((_, ']')) => {
            let mut prev_esc = false;
            for (idx, ch) in chars {
                if ch == BEL || (prev_esc && ch == '\\') {
                    return idx + ch.len_utf8();
                }
                prev_esc = ch == ESC;
            }
            rest.len()
        }
        Some((idx, ch)) => idx + ch.len_utf8(),
    }
}

/// Returns true for `ESC [ ... m` sequences.
pub fn is_sgr(escape: &str) -> bool {
    escape.starts_with("\x1b[") && escape.ends_with('m')
}

fn is_sgr_reset(escape: &str) -> bool {
    matches!(escape, "\x1b[0m" | "\x1b[m")
}

/// Removes every escape sequence from `text`.
pub fn strip_ansi(text: &str) -> String {
    let mut plain = String::with_capacity(text.len());
    for token in AnsiTokens::new(text) {
        if let AnsiToken::Text(part) = token {
            plain.push_str(part);
        }
    }
    plain
}

/// Terminal column width of `text`, ignoring escape sequences.
pub fn visual_width(text: &str) -> usize {
    AnsiTokens::new(text)
        .map(|token| match token {
            AnsiToken::Text(part) => UnicodeWidthStr::width(part),
            AnsiToken::Escape(_) => 0,
        })
        .sum()
}

/// Wraps `text` in `style` and a trailing reset.
///
/// Plain styles produce no escapes at all.
pub fn paint(style: Style, text: &str) -> String {
    if style == Style::new() || text.is_empty() {
        return text.to_string();
    }
    format!("{}{text}{Reset}", style.render())
}

/// Tracks which SGR sequences are in effect at a point in a line.
#[derive(Clone, Debug, Default)]
pub struct SgrState {
    active: Vec<String>,
}

impl SgrState {
    /// Feed every escape found in `text` into the tracker.
    pub fn observe_all(&mut self, text: &str) {
        for token in AnsiTokens::new(text) {
            if let AnsiToken::Escape(escape) = token {
                self.observe(escape);
            }
        }
    }

    pub fn observe(&mut self, escape: &str) {
        if !is_sgr(escape) {
            return;
        }
        if is_sgr_reset(escape) {
            self.active.clear();
        } else {
            self.active.push(escape.to_string());
        }
    }

    pub fn is_open(&self) -> bool {
        !self.active.is_empty()
    }

    /// Escapes that restore the tracked state on a fresh line.
    pub fn reopen(&self) -> String {
        self.active.concat()
    }
}
