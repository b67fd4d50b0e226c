use crate::config::constants::diff::{HEADER_PREFIXES, HUNK_PREFIX};
use crate::ui::theme::ThemeStyles;
use crate::utils::ansi::paint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLineType {
    Header,
    Hunk,
    Added,
    Removed,
    Context,
}

impl DiffLineType {
    /// Classify a unified-diff line by its prefix.
    ///
    /// Header checks come first so `--- a/file` and `+++ b/file` are not
    /// mistaken for removals and additions.
    pub fn classify(line: &str) -> Self {
        if HEADER_PREFIXES.iter().any(|prefix| line.starts_with(prefix)) {
            Self::Header
        } else if line.starts_with(HUNK_PREFIX) {
            Self::Hunk
        } else if line.starts_with('+') {
            Self::Added
        } else if line.starts_with('-') {
            Self::Removed
        } else {
            Self::Context
        }
    }
}

/// Colour each line of a unified diff. Context lines pass through unchanged.
pub fn colorize_diff(diff: &str, styles: &ThemeStyles) -> String {
    let mut out = String::with_capacity(diff.len() + diff.len() / 4);
    for (index, line) in diff.split('\n').enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let style = match DiffLineType::classify(line) {
            DiffLineType::Header => styles.diff_header,
            DiffLineType::Hunk => styles.diff_hunk,
            DiffLineType::Added => styles.diff_added,
            DiffLineType::Removed => styles.diff_removed,
            DiffLineType::Context => {
                out.push_str(line);
                continue;
            }
        };
        out.push_str(&paint(style, line));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::Theme;
    use crate::utils::ansi::strip_ansi;

    #[test]
    fn test_header_precedes_add_remove() {
        assert_eq!(DiffLineType::classify("--- a/src/lib.rs"), DiffLineType::Header);
        assert_eq!(DiffLineType::classify("+++ b/src/lib.rs"), DiffLineType::Header);
        assert_eq!(DiffLineType::classify("diff --git a b"), DiffLineType::Header);
        assert_eq!(DiffLineType::classify("index 1234..5678"), DiffLineType::Header);
        assert_eq!(DiffLineType::classify("@@ -1,2 +1,2 @@"), DiffLineType::Hunk);
        assert_eq!(DiffLineType::classify("+added"), DiffLineType::Added);
        assert_eq!(DiffLineType::classify("-removed"), DiffLineType::Removed);
        assert_eq!(DiffLineType::classify("---removed dashes"), DiffLineType::Removed);
        assert_eq!(DiffLineType::classify(" context"), DiffLineType::Context);
    }

    #[test]
    fn test_colorize_keeps_text_and_context() {
        let theme = Theme::default();
        let diff = "--- a/x\n+++ b/x\n@@ -1 +1 @@\n-old\n+new\n same\n";
        let out = colorize_diff(diff, theme.styles());
        assert_eq!(strip_ansi(&out), diff);
        assert!(out.contains(&paint(theme.styles().diff_added, "+new")));
        assert!(out.contains(&paint(theme.styles().diff_removed, "-old")));
        assert!(out.contains("\n same\n"));
    }
}
