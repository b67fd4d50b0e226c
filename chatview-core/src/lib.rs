//! # chatview-core - Rendering core for terminal chat panels
//!
//! `chatview-core` turns chat message text into width-bounded, ANSI-styled
//! terminal lines and lets the user select and copy them with the mouse.
//!
//! ## Highlights
//!
//! - **Markdown Rendering**: headings, lists, blockquotes, rules, tables,
//!   inline emphasis, links and fenced code, rendered line by line for a
//!   fixed terminal width.
//! - **Layout**: ANSI-aware word wrap that reopens styles across line breaks,
//!   and table column distribution that never exceeds the viewport.
//! - **Syntax Highlighting**: fenced code through `syntect`, with a silent
//!   plain-text fallback.
//! - **Selection**: drag, double-click word and triple-click paragraph
//!   selection over wide and combining characters, with a copy flash.
//! - **Configuration-First**: themes, layout tuning and highlighting limits
//!   are driven by `chatview.toml`, with constants centralized in
//!   `config::constants`.
//!
//! ## Quickstart
//!
//! ```rust,no_run
//! use chatview_core::{ChatViewConfig, MarkdownRenderer, Theme};
//!
//! let config = ChatViewConfig::default();
//! let theme = Theme::from_id(&config.ui.theme)?;
//! let renderer = MarkdownRenderer::new(&theme, &config);
//! let document = renderer.render("# Hello\n\nSome **bold** text.", 60);
//! for line in document.lines() {
//!     println!("{line}");
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod ui;
pub mod utils;

// Re-exports for convenience
pub use config::{ChatViewConfig, ConfigManager, SyntaxHighlightingConfig};
pub use ui::animation::{FrameCounter, TickOutcome};
pub use ui::clipboard::{ClipboardCopy, ClipboardError, ClipboardSink, SystemClipboard};
pub use ui::diff::colorize_diff;
pub use ui::highlight::SyntaxHighlighter;
pub use ui::layout::{TableSpec, distribute_table_columns, wrap};
pub use ui::markdown::{MarkdownRenderer, RenderCache, StyledDocument};
pub use ui::selection::{GridPos, SelectionArea, SelectionEngine, SelectionState};
pub use ui::theme::Theme;
pub use ui::viewport::{LayoutState, SharedLayout};
