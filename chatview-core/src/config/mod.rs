//! Chatview Configuration Module
//!
//! Loads `chatview.toml` and exposes the tuning knobs used by the renderer,
//! the syntax highlighter and the selection engine. Every field has a
//! default so a partial file (or no file at all) is valid.

pub mod constants;
pub mod loader;

pub use loader::{ChatViewConfig, ConfigManager, SyntaxHighlightingConfig};

use constants::{layout, selection};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// UI configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    /// Theme identifier, see `chatview themes`
    #[serde(default = "default_theme")]
    pub theme: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
        }
    }
}

fn default_theme() -> String {
    crate::ui::theme::DEFAULT_THEME_ID.to_string()
}

/// Markdown layout configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarkdownConfig {
    /// Narrowest width a table column may shrink to
    #[serde(default = "default_min_column_width")]
    pub min_column_width: usize,

    /// Number of rendered documents kept in the render cache
    #[serde(default = "default_render_cache_capacity")]
    pub render_cache_capacity: usize,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            min_column_width: default_min_column_width(),
            render_cache_capacity: default_render_cache_capacity(),
        }
    }
}

fn default_min_column_width() -> usize {
    layout::MIN_COLUMN_WIDTH
}
fn default_render_cache_capacity() -> usize {
    layout::DEFAULT_RENDER_CACHE_CAPACITY
}

/// Mouse selection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SelectionConfig {
    /// Cells a repeated click may drift on either axis
    #[serde(default = "default_click_tolerance")]
    pub click_tolerance: u16,

    /// Window for double and triple clicks, in milliseconds
    #[serde(default = "default_multi_click_window_ms")]
    pub multi_click_window_ms: u64,

    /// Interval between copy-flash animation ticks, in milliseconds
    #[serde(default = "default_flash_tick_ms")]
    pub flash_tick_ms: u64,
}

impl SelectionConfig {
    pub fn multi_click_window(&self) -> Duration {
        Duration::from_millis(self.multi_click_window_ms)
    }

    pub fn flash_tick(&self) -> Duration {
        Duration::from_millis(self.flash_tick_ms)
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            click_tolerance: default_click_tolerance(),
            multi_click_window_ms: default_multi_click_window_ms(),
            flash_tick_ms: default_flash_tick_ms(),
        }
    }
}

fn default_click_tolerance() -> u16 {
    selection::CLICK_TOLERANCE
}
fn default_multi_click_window_ms() -> u64 {
    selection::MULTI_CLICK_WINDOW_MS
}
fn default_flash_tick_ms() -> u64 {
    selection::FLASH_TICK_MS
}
