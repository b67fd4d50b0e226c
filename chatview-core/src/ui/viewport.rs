//! Viewport geometry shared between the renderer and input handling.

use parking_lot::Mutex;
use std::ops::Range;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutState {
    pub width: u16,
    pub height: u16,
    pub scroll_offset: usize,
    pub content_height: usize,
}

impl LayoutState {
    pub fn max_offset(&self) -> usize {
        self.content_height
            .saturating_sub(usize::from(self.height))
    }

    pub fn is_at_bottom(&self) -> bool {
        self.scroll_offset >= self.max_offset()
    }

    /// Document lines currently on screen.
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.scroll_offset.min(self.content_height);
        let end = (start + usize::from(self.height)).min(self.content_height);
        start..end
    }

    fn clamp(&mut self) {
        let max_offset = self.max_offset();
        if self.scroll_offset > max_offset {
            self.scroll_offset = max_offset;
        }
    }
}

/// Cloneable handle to one panel's [`LayoutState`].
///
/// Every mutation is a single locked read-modify-write that re-clamps the
/// scroll offset.
#[derive(Clone, Debug, Default)]
pub struct SharedLayout {
    inner: Arc<Mutex<LayoutState>>,
}

impl SharedLayout {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LayoutState {
                width,
                height,
                ..LayoutState::default()
            })),
        }
    }

    pub fn snapshot(&self) -> LayoutState {
        *self.inner.lock()
    }

    /// Apply an arbitrary update, then clamp.
    pub fn update<F>(&self, apply: F) -> LayoutState
    where
        F: FnOnce(&mut LayoutState),
    {
        let mut guard = self.inner.lock();
        apply(&mut guard);
        guard.clamp();
        *guard
    }

    pub fn resize(&self, width: u16, height: u16) -> LayoutState {
        self.update(|state| {
            state.width = width;
            state.height = height;
        })
    }

    /// Scroll by `delta` lines (negative scrolls up), clamped to the content.
    pub fn scroll_by(&self, delta: isize) -> LayoutState {
        self.update(|state| {
            state.scroll_offset = state.scroll_offset.saturating_add_signed(delta);
        })
    }

    pub fn scroll_to_bottom(&self) -> LayoutState {
        self.update(|state| state.scroll_offset = state.max_offset())
    }

    /// Record a new document height. A view pinned to the bottom stays there.
    pub fn set_content_height(&self, content_height: usize) -> LayoutState {
        self.update(|state| {
            let follow = state.height == 0 || state.is_at_bottom();
            state.content_height = content_height;
            if follow {
                state.scroll_offset = state.max_offset();
            }
        })
    }

    pub fn width(&self) -> u16 {
        self.inner.lock().width
    }
}
