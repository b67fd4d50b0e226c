//! Mouse selection over the rendered chat panel.
//!
//! The [`SelectionEngine`] owns the plain-text copy of the visible lines and
//! a small state machine:
//!
//! ```text
//! Cleared --start--> Dragging --stop--> Stopped --copy--> Flashing --tick--> Cleared
//! ```
//!
//! Coordinates are grid cells relative to the panel origin. They are either
//! all `-1` (cleared) or all non-negative; bad geometry never panics, it just
//! means "no selection".

mod mapping;
mod overlay;

pub use mapping::{
    byte_offset_to_column, column_to_byte_offset, paragraph_bounds, slice_columns, word_bounds,
};

use crate::config::SelectionConfig;
use crate::config::constants::selection::FLASH_VISIBLE_FRAMES;
use crate::ui::animation::{FrameCounter, TickOutcome};
use crate::ui::clipboard::ClipboardCopy;
use crate::ui::theme::Theme;
use crate::utils::ansi::strip_ansi;
use anstyle::Style;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use overlay::overlay_columns;
use std::ops::Range;
use std::time::{Duration, Instant};
use tracing::trace;
use unicode_width::UnicodeWidthStr;

/// A cell on the panel grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub col: i32,
    pub line: i32,
}

impl GridPos {
    pub const CLEARED: GridPos = GridPos { col: -1, line: -1 };

    pub const fn new(col: i32, line: i32) -> Self {
        Self { col, line }
    }

    pub fn is_valid(&self) -> bool {
        self.col >= 0 && self.line >= 0
    }

    fn clamped(col: i32, line: i32) -> Self {
        Self {
            col: col.max(0),
            line: line.max(0),
        }
    }

    fn order_key(&self) -> (i32, i32) {
        (self.line, self.col)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionState {
    pub start: GridPos,
    pub end: GridPos,
    pub active: bool,
    pub last_click_time: Option<Instant>,
    pub last_click_x: i32,
    pub last_click_y: i32,
    pub click_count: u8,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            start: GridPos::CLEARED,
            end: GridPos::CLEARED,
            active: false,
            last_click_time: None,
            last_click_x: -1,
            last_click_y: -1,
            click_count: 0,
        }
    }
}

impl SelectionState {
    pub fn has_text_selection(&self) -> bool {
        self.start.is_valid() && self.end.is_valid() && self.start != self.end
    }
}

/// Selection endpoints ordered so `start` comes first in reading order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionArea {
    pub start: GridPos,
    pub end: GridPos,
}

impl SelectionArea {
    /// Columns selected on `line`; the range is open-ended (`usize::MAX`)
    /// when the selection runs past the end of the line.
    pub fn columns_on_line(&self, line: usize) -> Option<Range<usize>> {
        let (first, last) = (self.start.line as usize, self.end.line as usize);
        let (start_col, end_col) = (self.start.col as usize, self.end.col as usize);
        if !self.start.is_valid() || line < first || line > last {
            return None;
        }
        Some(match (line == first, line == last) {
            (true, true) => start_col..end_col,
            (true, false) => start_col..usize::MAX,
            (false, true) => 0..end_col,
            (false, false) => 0..usize::MAX,
        })
    }
}

/// Drag, click and copy handling for one chat panel.
#[derive(Debug, Clone)]
pub struct SelectionEngine {
    state: SelectionState,
    flash: FrameCounter,
    content: Vec<String>,
    selection_style: Style,
    flash_style: Style,
    click_tolerance: u32,
    multi_click_window: Duration,
}

impl SelectionEngine {
    pub fn new(theme: &Theme, config: &SelectionConfig) -> Self {
        Self {
            state: SelectionState::default(),
            flash: FrameCounter::new(FLASH_VISIBLE_FRAMES, config.flash_tick()),
            content: Vec::new(),
            selection_style: theme.styles().selection,
            flash_style: theme.styles().selection_flash,
            click_tolerance: u32::from(config.click_tolerance),
            multi_click_window: config.multi_click_window(),
        }
    }

    /// Replace the visible lines. Escapes are stripped; coordinates address
    /// the plain text.
    pub fn set_content<S: AsRef<str>>(&mut self, lines: &[S]) {
        self.content = lines.iter().map(|line| strip_ansi(line.as_ref())).collect();
    }

    pub fn content(&self) -> &[String] {
        &self.content
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn is_flashing(&self) -> bool {
        self.flash.is_running()
    }

    pub fn flash_frame(&self) -> Option<u32> {
        self.flash.frame()
    }

    pub fn has_text_selection(&self) -> bool {
        self.state.has_text_selection()
    }

    /// Back to a cleared state, forgetting click history and content.
    pub fn reset(&mut self) {
        self.state = SelectionState::default();
        self.flash.cancel();
        self.content.clear();
    }

    pub fn start_selection(&mut self, col: i32, line: i32) {
        let pos = GridPos::clamped(col, line);
        self.flash.cancel();
        self.state.start = pos;
        self.state.end = pos;
        self.state.active = true;
    }

    pub fn end_selection(&mut self, col: i32, line: i32) {
        if !self.state.active {
            return;
        }
        self.state.end = GridPos::clamped(col, line);
    }

    pub fn selection_stop(&mut self) {
        self.state.active = false;
    }

    pub fn selection_clear(&mut self) {
        self.state.start = GridPos::CLEARED;
        self.state.end = GridPos::CLEARED;
        self.state.active = false;
        self.flash.cancel();
    }

    /// Normalized endpoints.
    pub fn selection_area(&self) -> SelectionArea {
        let (start, end) = (self.state.start, self.state.end);
        if end.order_key() < start.order_key() {
            SelectionArea {
                start: end,
                end: start,
            }
        } else {
            SelectionArea { start, end }
        }
    }

    /// Register a left click at `(x, y)` and apply the matching gesture.
    ///
    /// Returns the click count after this click: 1 starts a point
    /// selection, 2 selects a word, 3 selects a paragraph and resets the
    /// count to 0.
    pub fn handle_mouse_click(&mut self, x: i32, y: i32, now: Instant) -> u8 {
        let repeated = self.state.last_click_time.is_some_and(|last| {
            now.saturating_duration_since(last) <= self.multi_click_window
                && x.abs_diff(self.state.last_click_x) <= self.click_tolerance
                && y.abs_diff(self.state.last_click_y) <= self.click_tolerance
        });
        self.state.click_count = if repeated {
            self.state.click_count.saturating_add(1)
        } else {
            1
        };
        self.state.last_click_time = Some(now);
        self.state.last_click_x = x;
        self.state.last_click_y = y;

        trace!(x, y, count = self.state.click_count, "selection click");
        match self.state.click_count {
            2 => self.select_word(x, y),
            3 => {
                self.select_paragraph(x, y);
                self.state.click_count = 0;
            }
            _ => {
                self.state.click_count = 1;
                self.start_selection(x, y);
            }
        }
        self.state.click_count
    }

    /// Route a crossterm mouse event; `origin` is the panel's top-left cell.
    ///
    /// Returns whether the event was consumed.
    pub fn handle_mouse_event(&mut self, event: &MouseEvent, origin: (u16, u16), now: Instant) -> bool {
        let col = i32::from(event.column) - i32::from(origin.0);
        let line = i32::from(event.row) - i32::from(origin.1);
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.handle_mouse_click(col, line, now);
                true
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.end_selection(col, line);
                true
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.selection_stop();
                true
            }
            _ => false,
        }
    }

    /// Select the word under `(col, line)`. Out-of-range positions are ignored.
    pub fn select_word(&mut self, col: i32, line: i32) {
        let Some(text) = self.line_at(col, line) else {
            return;
        };
        if let Some(bounds) = word_bounds(text, col as usize) {
            self.set_span(
                GridPos::new(bounds.start as i32, line),
                GridPos::new(bounds.end as i32, line),
            );
        }
    }

    /// Select the run of non-blank lines around `line`. Blank lines are ignored.
    pub fn select_paragraph(&mut self, col: i32, line: i32) {
        if self.line_at(col, line).is_none() {
            return;
        }
        if let Some((first, last)) = paragraph_bounds(&self.content, line as usize) {
            let last_width = UnicodeWidthStr::width(self.content[last].as_str());
            self.set_span(
                GridPos::new(0, first as i32),
                GridPos::new(last_width as i32, last as i32),
            );
        }
    }

    fn line_at(&self, col: i32, line: i32) -> Option<&str> {
        if col < 0 || line < 0 {
            return None;
        }
        self.content.get(line as usize).map(String::as_str)
    }

    fn set_span(&mut self, start: GridPos, end: GridPos) {
        self.flash.cancel();
        self.state.start = start;
        self.state.end = end;
        self.state.active = false;
    }

    /// Plain text under the selection, lines joined with `\n`.
    pub fn selected_text(&self) -> String {
        if !self.has_text_selection() {
            return String::new();
        }
        let area = self.selection_area();
        let first = area.start.line as usize;
        let Some(last_index) = self.content.len().checked_sub(1) else {
            return String::new();
        };
        if first > last_index {
            return String::new();
        }
        let last = (area.end.line as usize).min(last_index);

        let mut parts = Vec::with_capacity(last - first + 1);
        for index in first..=last {
            let Some(columns) = area.columns_on_line(index) else {
                continue;
            };
            parts.push(slice_columns(&self.content[index], columns.start, columns.end));
        }
        parts.join("\n")
    }

    /// Produce the pending clipboard write for the current selection and
    /// start the copy flash. `None` when nothing is selected.
    ///
    /// A drag still in progress is stopped first; later drag events no
    /// longer move the copied selection.
    pub fn copy_selected_text(&mut self) -> Option<ClipboardCopy> {
        if !self.has_text_selection() {
            return None;
        }
        self.selection_stop();
        let text = self.selected_text();
        if text.is_empty() {
            return None;
        }
        self.flash.start();
        Some(ClipboardCopy::new(text))
    }

    /// Advance the copy flash. Returns true when the panel needs a redraw.
    pub fn on_flash_tick(&mut self) -> bool {
        match self.flash.tick() {
            TickOutcome::Idle => false,
            TickOutcome::Running(_) => true,
            TickOutcome::Completed => {
                self.selection_clear();
                true
            }
        }
    }

    pub fn needs_tick(&self) -> bool {
        self.flash.is_running()
    }

    pub fn tick_interval(&self) -> Duration {
        self.flash.interval()
    }

    /// Overlay the selection on a rendered viewport (`\n`-separated lines).
    ///
    /// Returns the view unchanged when nothing is selected or the viewport
    /// is empty.
    pub fn selection_view(&self, rendered_view: &str, width: u16, height: u16) -> String {
        if !self.has_text_selection() || width == 0 || height == 0 {
            return rendered_view.to_string();
        }
        let area = self.selection_area();
        let style = if self.is_flashing() {
            self.flash_style
        } else {
            self.selection_style
        };
        let width = usize::from(width);

        rendered_view
            .split('\n')
            .enumerate()
            .map(|(index, line)| {
                match area.columns_on_line(index).filter(|_| index < usize::from(height)) {
                    Some(columns) => {
                        let end = columns.end.min(width);
                        overlay_columns(line, columns.start.min(end)..end, style)
                    }
                    None => line.to_string(),
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
