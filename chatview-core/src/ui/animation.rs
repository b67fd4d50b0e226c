//! Tick-driven frame counters for short UI animations.
//!
//! The panel has no timers of its own. Whoever owns the event loop asks
//! [`FrameCounter::is_running`] and, while it is, calls [`FrameCounter::tick`]
//! every [`FrameCounter::interval`].

use std::time::{Duration, Instant};

/// Result of advancing a [`FrameCounter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing was running.
    Idle,
    /// Still animating, now on this frame.
    Running(u32),
    /// The last visible frame has passed; the counter is idle again.
    Completed,
}

#[derive(Debug, Clone)]
pub struct FrameCounter {
    frame: Option<u32>,
    visible_frames: u32,
    interval: Duration,
}

impl FrameCounter {
    pub fn new(visible_frames: u32, interval: Duration) -> Self {
        Self {
            frame: None,
            visible_frames: visible_frames.max(1),
            interval,
        }
    }

    /// Restart at frame 0.
    pub fn start(&mut self) {
        self.frame = Some(0);
    }

    pub fn cancel(&mut self) {
        self.frame = None;
    }

    pub fn is_running(&self) -> bool {
        self.frame.is_some()
    }

    pub fn frame(&self) -> Option<u32> {
        self.frame
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the next tick is due, if anything is running.
    pub fn next_deadline(&self, now: Instant) -> Option<Instant> {
        self.frame.map(|_| now + self.interval)
    }

    pub fn tick(&mut self) -> TickOutcome {
        let Some(frame) = self.frame else {
            return TickOutcome::Idle;
        };
        let next = frame.saturating_add(1);
        if next >= self.visible_frames {
            self.frame = None;
            TickOutcome::Completed
        } else {
            self.frame = Some(next);
            TickOutcome::Running(next)
        }
    }
}
