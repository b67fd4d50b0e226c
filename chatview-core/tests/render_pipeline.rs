use chatview_core::ui::layout::strip_ansi;
use chatview_core::ui::theme::Theme;
use chatview_core::{
    ChatViewConfig, MarkdownRenderer, RenderCache, SelectionEngine, colorize_diff,
};
use std::sync::Arc;
use unicode_width::UnicodeWidthStr;

fn renderer() -> MarkdownRenderer {
    MarkdownRenderer::new(&Theme::default(), &ChatViewConfig::default())
}

fn plain(content: &str, width: usize) -> Vec<String> {
    renderer().render(content, width).plain_lines()
}

#[test]
fn inline_markup_renders_to_plain_words() {
    let document = renderer().render("Use **bold**, _italic_ and `code` here", 80);
    assert_eq!(document.len(), 1);
    assert_eq!(
        strip_ansi(&document.lines()[0]),
        "Use bold, italic and code here"
    );
    assert!(document.lines()[0].contains('\x1b'));
}

#[test]
fn links_show_their_target() {
    assert_eq!(
        plain("See [the docs](https://example.com) first", 80),
        vec!["See the docs (https://example.com) first"]
    );
}

#[test]
fn table_with_header_draws_box() {
    let lines = plain("| Name | Value |\n|---|---|\n| a | 1 |", 40);
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
fn narrow_table_stays_within_width() {
    let content = "| Key | Description |\n|-----|-------------|\n| id | a rather long description that must wrap inside its cell |";
    for line in plain(content, 20) {
        assert!(
            UnicodeWidthStr::width(line.as_str()) <= 20,
            "line too wide: {line:?}"
        );
    }
}

#[test]
fn mixed_document_layout() {
    let content = "# Title\n\n- first item\n- second item\n\n> quoted text\n\n---";
    let lines = plain(content, 12);
    assert_eq!(lines[0], "Title");
    assert_eq!(lines[1], "");
    assert_eq!(lines[2], "  • first");
    assert_eq!(lines[3], "    item");
    assert_eq!(lines[4], "  • second");
    assert_eq!(lines[5], "    item");
    assert_eq!(lines[6], "");
    assert_eq!(lines[7], "│ quoted");
    assert_eq!(lines[8], "│ text");
    assert_eq!(lines[9], "");
    assert_eq!(lines[10], "─".repeat(12));
}

#[test]
fn fenced_code_keeps_text_and_is_padded() {
    let content = "before\n```rust\nfn main() {\n    let x = 1;\n}\n```\nafter";
    let lines = plain(content, 10);
    assert_eq!(
        lines,
        vec![
            "before",
            "",
            "fn main() {",
            "    let x = 1;",
            "}",
            "",
            "after"
        ]
    );
}

#[test]
fn diff_colors_only_changed_lines() {
    let theme = Theme::default();
    let diff = "--- a/file\n+++ b/file\n@@ -1 +1 @@\n-old\n+new\n same";
    let colored = colorize_diff(diff, theme.styles());
    assert_eq!(strip_ansi(&colored), diff);
    let lines: Vec<&str> = colored.split('\n').collect();
    assert_eq!(lines[5], " same");
    assert!(lines[4].starts_with(&theme.styles().diff_added.render().to_string()));
}

#[test]
fn cache_reuses_rendered_document() {
    let renderer = renderer();
    let cache = RenderCache::new(4);
    let first = cache.get_or_render(&renderer, "hello **world**", 40);
    let second = cache.get_or_render(&renderer, "hello **world**", 40);
    assert!(Arc::ptr_eq(&first, &second));
    let _ = cache.get_or_render(&renderer, "hello **world**", 20);
    assert_eq!(cache.len(), 2);
}

#[test]
fn selection_over_rendered_output() {
    let theme = Theme::default();
    let config = ChatViewConfig::default();
    let document = MarkdownRenderer::new(&theme, &config).render("Hello 世界 world\n\nnext **para**", 80);

    let mut engine = SelectionEngine::new(&theme, &config.selection);
    engine.set_content(document.lines());
    engine.select_word(6, 0);
    assert_eq!(engine.selected_text(), "世");
    engine.select_word(13, 0);
    assert_eq!(engine.selected_text(), "world");

    engine.select_paragraph(0, 2);
    let copy = engine.copy_selected_text().expect("paragraph selected");
    assert_eq!(copy.text(), "next para");

    let view = engine.selection_view(&document.to_string(), 80, 3);
    assert_eq!(strip_ansi(&view), strip_ansi(&document.to_string()));
    assert!(engine.on_flash_tick());
    assert!(!engine.has_text_selection());
}

#[test]
fn inline_syntax_never_leaks() {
    let line = plain("**bold** text and `code` and [label](http://x)", 80).join("\n");
    for word in ["bold", "code", "label"] {
        assert!(line.contains(word), "missing {word} in {line:?}");
    }
    for syntax in ["**", "`", "[", "]("] {
        assert!(!line.contains(syntax), "raw {syntax} in {line:?}");
    }
}

#[test]
fn minimal_table_has_all_corners() {
    let rendered = plain("| A | B |\n|---|---|\n| 1 | 2 |", 80).join("\n");
    for text in ["A", "B", "1", "2", "┌", "┐", "└", "┘"] {
        assert!(rendered.contains(text), "missing {text} in {rendered:?}");
    }
}
