//! Terminal rendering for the chat panel.
//!
//! Markdown is rendered to width-bounded ANSI lines by [`markdown`], which
//! leans on [`layout`] for wrapping and tables and on [`highlight`] for fenced
//! code. [`selection`] maps mouse input onto the rendered lines and produces
//! clipboard text.

pub mod animation;
pub mod clipboard;
pub mod diff;
pub mod highlight;
pub mod layout;
pub mod markdown;
pub mod selection;
pub mod theme;
pub mod viewport;

pub use diff::colorize_diff;
pub use markdown::{MarkdownRenderer, RenderCache, StyledDocument};
pub use selection::SelectionEngine;
pub use theme::Theme;
