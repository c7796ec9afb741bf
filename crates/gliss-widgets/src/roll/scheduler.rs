//! Frame scheduling: throttled redraws with a guaranteed trailing render
//!
//! Redraw requests are throttled to a target interval. A request arriving
//! before the interval has elapsed is deferred, not dropped — it replaces
//! any previously deferred request (cancel-and-reschedule) and is drained
//! by `poll` on the next tick, so the final state after a burst of rapid
//! updates is always drawn. Time is passed in explicitly so scheduling is
//! deterministic under test.

use std::time::{Duration, Instant};

/// Target minimum interval between renders (~60 fps)
pub const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Render-request throttle for one engine
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    min_interval: Duration,
    last_render: Option<Instant>,
    pending: bool,
}

impl FrameScheduler {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_render: None,
            pending: false,
        }
    }

    /// Request a redraw at `now`
    ///
    /// Returns true when the frame budget allows rendering immediately;
    /// otherwise the request is deferred (superseding any earlier deferred
    /// request) and false is returned.
    pub fn request(&mut self, now: Instant) -> bool {
        if self.budget_open(now) {
            self.last_render = Some(now);
            self.pending = false;
            true
        } else {
            self.pending = true;
            false
        }
    }

    /// Drain a deferred request once the budget reopens
    ///
    /// Called from the host's tick; returns true exactly once per deferred
    /// request, when it is time to draw the trailing frame.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.pending && self.budget_open(now) {
            self.last_render = Some(now);
            self.pending = false;
            true
        } else {
            false
        }
    }

    /// A deferred render is waiting
    pub fn has_pending(&self) -> bool {
        self.pending
    }

    fn budget_open(&self, now: Instant) -> bool {
        match self.last_render {
            Some(last) => now.duration_since(last) >= self.min_interval,
            None => true,
        }
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(MIN_FRAME_INTERVAL)
    }
}
