use chatview_core::ui::layout::{distribute_table_columns, wrap};
use chatview_core::{ChatViewConfig, MarkdownRenderer, RenderCache, SelectionEngine, Theme};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

const MESSAGE: &str = r#"# Release notes

The renderer now handles **bold**, _italic_, `inline code` and [links](https://example.com).

- Wrapping is ANSI aware and keeps styles across breaks
- Tables shrink their widest columns first
  - nested items indent by two columns

| Component | Status | Notes |
|-----------|--------|-------|
| layout | done | greedy wrap with hard split for table cells |
| selection | done | word and paragraph selection over 世界 text |

```rust
fn main() {
    println!("hello");
}
```

> Quoted text wraps inside the bar as well.
"#;

/// Benchmark a full markdown render at common terminal widths
fn benchmark_render(c: &mut Criterion) {
    let theme = Theme::default();
    let config = ChatViewConfig::default();
    let renderer = MarkdownRenderer::new(&theme, &config);

    let mut group = c.benchmark_group("render");
    for width in [40usize, 80, 120] {
        group.bench_function(format!("markdown_{width}"), |b| {
            b.iter(|| renderer.render(black_box(MESSAGE), width))
        });
    }

    let cache = RenderCache::new(16);
    group.bench_function("markdown_cached", |b| {
        b.iter(|| cache.get_or_render(&renderer, black_box(MESSAGE), 80))
    });
    group.finish();
}

/// Benchmark the layout primitives on their own
fn benchmark_layout(c: &mut Criterion) {
    let paragraph = "\x1b[1mlorem ipsum\x1b[0m dolor sit amet ".repeat(40);
    let mut group = c.benchmark_group("layout");
    group.bench_function("wrap_styled_paragraph", |b| {
        b.iter(|| wrap(black_box(&paragraph), 72))
    });
    group.bench_function("distribute_columns", |b| {
        b.iter(|| distribute_table_columns(black_box(&[12usize, 48, 7, 90, 3][..]), 60))
    });
    group.finish();
}

/// Benchmark selection extraction over a rendered document
fn benchmark_selection(c: &mut Criterion) {
    let theme = Theme::default();
    let config = ChatViewConfig::default();
    let document = MarkdownRenderer::new(&theme, &config).render(MESSAGE, 80);
    let view = document.to_string();
    let mut engine = SelectionEngine::new(&theme, &config.selection);
    engine.set_content(document.lines());
    engine.start_selection(2, 2);
    engine.end_selection(10, 12);
    engine.selection_stop();

    let mut group = c.benchmark_group("selection");
    group.bench_function("selected_text", |b| b.iter(|| engine.selected_text()));
    group.bench_function("selection_view", |b| {
        b.iter(|| engine.selection_view(black_box(&view), 80, 40))
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_render,
    benchmark_layout,
    benchmark_selection
);
criterion_main!(benches);
