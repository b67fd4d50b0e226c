//! Syntax highlighting for fenced code blocks.
//!
//! Wraps syntect behind a single infallible call. Anything that goes wrong
//! (unknown language, missing theme, tokenizer error) degrades to the
//! original text.

use crate::config::constants::syntax::FALLBACK_THEME;
use crate::config::loader::SyntaxHighlightingConfig;
use crate::ui::theme::Theme;
use crate::utils::ansi::paint;
use anstyle_syntect::to_anstyle;
use once_cell::sync::Lazy;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme as SyntectTheme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use tracing::{debug, warn};

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

/// Turns code into ANSI-styled text using the palette the [`Theme`] selects.
#[derive(Clone, Debug)]
pub struct SyntaxHighlighter {
    config: SyntaxHighlightingConfig,
    palette: Option<&'static SyntectTheme>,
}

impl SyntaxHighlighter {
    pub fn new(theme: &Theme, config: &SyntaxHighlightingConfig) -> Self {
        let name = config
            .theme
            .as_deref()
            .unwrap_or_else(|| theme.syntax_theme());
        Self {
            config: config.clone(),
            palette: load_theme(name),
        }
    }

    /// Highlight `code`, returning it untouched whenever highlighting is
    /// skipped or fails. Line structure is preserved exactly.
    pub fn highlight(&self, code: &str, language: Option<&str>) -> String {
        if !self.should_highlight(code, language) {
            return code.to_string();
        }
        let Some(palette) = self.palette else {
            return code.to_string();
        };

        match try_highlight(code, language, palette) {
            Ok(highlighted) => highlighted,
            Err(err) => {
                debug!(error = %err, language = ?language, "syntax highlighting failed, using plain text");
                code.to_string()
            }
        }
    }

    fn should_highlight(&self, code: &str, language: Option<&str>) -> bool {
        if !self.config.enabled || code.is_empty() {
            return false;
        }
        if let Some(max_bytes) = self.config.max_bytes() {
            if code.len() > max_bytes {
                return false;
            }
        }
        match language {
            Some(lang) => self.config.is_language_enabled(lang),
            None => true,
        }
    }
}

fn try_highlight(
    code: &str,
    language: Option<&str>,
    palette: &SyntectTheme,
) -> Result<String, syntect::Error> {
    let syntax = select_syntax(language);
    let mut highlighter = HighlightLines::new(syntax, palette);
    let mut rendered = String::with_capacity(code.len() * 2);

    for line in LinesWithEndings::from(code) {
        let ranges = highlighter.highlight_line(line, &SYNTAX_SET)?;
        for (style, part) in ranges {
            let part = part.trim_end_matches(['\n', '\r']);
            if part.is_empty() {
                continue;
            }
            // Code sits on the panel background, not the palette's.
            let style = to_anstyle(style).bg_color(None);
            rendered.push_str(&paint(style, part));
        }
        if line.ends_with('\n') {
            rendered.push('\n');
        }
    }

    Ok(rendered)
}

fn select_syntax(language: Option<&str>) -> &'static SyntaxReference {
    language
        .and_then(|lang| SYNTAX_SET.find_syntax_by_token(lang))
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text())
}

fn load_theme(name: &str) -> Option<&'static SyntectTheme> {
    if let Some(theme) = THEME_SET.themes.get(name) {
        return Some(theme);
    }
    warn!(
        "theme" = name,
        "Falling back to default syntax highlighting theme"
    );
    if let Some(theme) = THEME_SET.themes.get(FALLBACK_THEME) {
        return Some(theme);
    }
    let fallback = THEME_SET.themes.values().next();
    if fallback.is_none() {
        warn!("No bundled syntax highlighting themes, code blocks stay plain");
    }
    fallback
}
