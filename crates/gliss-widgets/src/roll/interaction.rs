//! Pointer, wheel, and touch interaction handling
//!
//! Raw input events are folded into semantic [`RollCommand`]s here; the
//! engine is the only thing that mutates viewport state in response. The
//! trickiest parts are gesture disambiguation: wheel input flickers
//! between pan-ish and zoom-ish deltas on trackpads (handled with a short
//! mode latch), and touch pinch distances are noisy (handled with a dead
//! zone and a per-step clamp).

use std::time::{Duration, Instant};

use iced::keyboard::Modifiers;
use iced::mouse::ScrollDelta;
use iced::touch::Finger;
use iced::Point;

// =============================================================================
// Tunable Gesture Constants
// =============================================================================

/// Vertical drag wins only when |dy| exceeds |dx| by this ratio
pub const VERTICAL_DOMINANCE_RATIO: f32 = 1.5;

/// Pointer movement below this (in px, per axis total) is a click, not a
/// drag — releasing without real movement must not commit a seek
pub const DRAG_COMMIT_THRESHOLD: f32 = 2.0;

/// Wheel gesture mode latch: a mode chosen by the dominance heuristic
/// stays active this long, so alternating trackpad deltas don't flicker
/// between pan and zoom. Empirical feel constant.
pub const WHEEL_MODE_LATCH: Duration = Duration::from_millis(110);

/// Horizontal wheel delta at or above this fraction of the vertical delta
/// means "pan"
pub const WHEEL_PAN_DOMINANCE: f32 = 0.8;

/// Pixels per wheel line for `ScrollDelta::Lines` input
pub const WHEEL_LINE_PIXELS: f32 = 40.0;

/// Zoom factor per wheel pixel (applied exponentially)
pub const WHEEL_ZOOM_SENSITIVITY: f32 = 0.002;

/// Pinch distance ratios within this of 1.0 are sensor jitter. Empirical
/// feel constant.
pub const PINCH_DEAD_ZONE: f32 = 0.01;

/// Per-step pinch factor clamp, against noisy distance jumps
pub const PINCH_MIN_STEP: f32 = 0.8;
pub const PINCH_MAX_STEP: f32 = 1.25;

// =============================================================================
// Commands
// =============================================================================

/// Semantic viewport command produced by the interaction layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RollCommand {
    /// Pointer drag started; the viewport enters panning mode
    BeginPan { position: (f32, f32) },
    /// Pan by a pixel delta (already axis-resolved for drags)
    PanBy { dx: f32, dy: f32 },
    /// Drag released; `moved` is false for a plain click
    EndPan { moved: bool },
    /// Zoom the time axis around an anchor screen x
    ZoomX { factor: f32, anchor: Option<f32> },
    /// Zoom the pitch axis
    ZoomY { factor: f32 },
}

/// Which way the wheel heuristic resolved last
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WheelMode {
    Pan,
    Zoom,
}

// =============================================================================
// Interaction State
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct DragState {
    last: Point,
    /// Accumulated absolute movement, for the click-vs-drag decision
    travel: f32,
}

#[derive(Debug, Clone, Copy)]
struct TouchPoint {
    id: Finger,
    position: Point,
}

/// Per-canvas interaction state (the canvas `Program::State`)
#[derive(Debug, Default)]
pub struct Interaction {
    drag: Option<DragState>,
    modifiers: Modifiers,
    wheel_latch: Option<(WheelMode, Instant)>,
    touches: Vec<TouchPoint>,
    pinch_distance: Option<f32>,
}

impl Interaction {
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    // -------------------------------------------------------------------------
    // Pointer drag
    // -------------------------------------------------------------------------

    pub fn on_button_pressed(&mut self, position: Point) -> Option<RollCommand> {
        self.drag = Some(DragState { last: position, travel: 0.0 });
        Some(RollCommand::BeginPan { position: (position.x, position.y) })
    }

    /// Resolve a drag move into a single-axis pan
    ///
    /// Vertical panning wins only when its delta dominates by
    /// `VERTICAL_DOMINANCE_RATIO`; Shift forces vertical-only.
    pub fn on_cursor_moved(&mut self, position: Point) -> Option<RollCommand> {
        let drag = self.drag.as_mut()?;
        let dx = position.x - drag.last.x;
        let dy = position.y - drag.last.y;
        drag.last = position;
        drag.travel += dx.abs() + dy.abs();
        if dx == 0.0 && dy == 0.0 {
            return None;
        }

        let vertical = self.modifiers.shift() || dy.abs() > dx.abs() * VERTICAL_DOMINANCE_RATIO;
        if vertical {
            Some(RollCommand::PanBy { dx: 0.0, dy })
        } else {
            Some(RollCommand::PanBy { dx, dy: 0.0 })
        }
    }

    pub fn on_button_released(&mut self) -> Option<RollCommand> {
        let drag = self.drag.take()?;
        Some(RollCommand::EndPan {
            moved: drag.travel >= DRAG_COMMIT_THRESHOLD,
        })
    }

    // -------------------------------------------------------------------------
    // Wheel
    // -------------------------------------------------------------------------

    /// Resolve a wheel event into pan or zoom
    ///
    /// Precedence: Alt ⇒ pitch zoom, Shift ⇒ horizontal pan, Ctrl/Cmd ⇒
    /// time zoom, then the dominance heuristic under the mode latch. The
    /// zoom anchor is the cursor, clamped into the content area so a
    /// cursor over the key gutter zooms around the content edge.
    pub fn on_wheel(
        &mut self,
        delta: ScrollDelta,
        cursor_x: f32,
        content_left: f32,
        content_right: f32,
        now: Instant,
    ) -> Option<RollCommand> {
        let (dx, dy) = scroll_delta_pixels(delta);
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        let anchor = cursor_x.clamp(content_left, content_right);

        if self.modifiers.alt() {
            return Some(RollCommand::ZoomY { factor: wheel_zoom_factor(dy) });
        }
        if self.modifiers.shift() {
            // Scroll right (or down, on a plain wheel) moves later in time
            let pan = if dx.abs() > dy.abs() { dx } else { dy };
            self.wheel_latch = Some((WheelMode::Pan, now));
            return Some(RollCommand::PanBy { dx: -pan, dy: 0.0 });
        }
        if self.modifiers.command() {
            self.wheel_latch = Some((WheelMode::Zoom, now));
            return Some(RollCommand::ZoomX {
                factor: wheel_zoom_factor(dy),
                anchor: Some(anchor),
            });
        }

        let mode = match self.wheel_latch {
            Some((mode, at)) if now.duration_since(at) < WHEEL_MODE_LATCH => mode,
            _ => {
                if dx.abs() >= dy.abs() * WHEEL_PAN_DOMINANCE {
                    WheelMode::Pan
                } else {
                    WheelMode::Zoom
                }
            }
        };
        self.wheel_latch = Some((mode, now));

        match mode {
            WheelMode::Pan => {
                let pan = if dx.abs() >= dy.abs() { dx } else { dy };
                Some(RollCommand::PanBy { dx: -pan, dy: 0.0 })
            }
            WheelMode::Zoom => Some(RollCommand::ZoomX {
                factor: wheel_zoom_factor(dy),
                anchor: Some(anchor),
            }),
        }
    }

    // -------------------------------------------------------------------------
    // Touch pinch
    // -------------------------------------------------------------------------

    pub fn on_finger_pressed(&mut self, id: Finger, position: Point) {
        if let Some(touch) = self.touches.iter_mut().find(|t| t.id == id) {
            touch.position = position;
        } else {
            self.touches.push(TouchPoint { id, position });
        }
        // Distance baseline restarts whenever the finger set changes
        self.pinch_distance = self.current_distance();
    }

    /// Track a finger move; with two fingers down this drives pinch zoom
    pub fn on_finger_moved(
        &mut self,
        id: Finger,
        position: Point,
        content_left: f32,
        content_right: f32,
    ) -> Option<RollCommand> {
        let touch = self.touches.iter_mut().find(|t| t.id == id)?;
        touch.position = position;
        if self.touches.len() != 2 {
            return None;
        }

        let distance = self.current_distance()?;
        let Some(previous) = self.pinch_distance else {
            self.pinch_distance = Some(distance);
            return None;
        };
        if previous <= 0.0 {
            self.pinch_distance = Some(distance);
            return None;
        }

        let ratio = distance / previous;
        // Sub-1% wobble: hold the baseline so slow pinches still accumulate
        if (ratio - 1.0).abs() < PINCH_DEAD_ZONE {
            return None;
        }
        let factor = ratio.clamp(PINCH_MIN_STEP, PINCH_MAX_STEP);
        self.pinch_distance = Some(distance);

        let midpoint_x = (self.touches[0].position.x + self.touches[1].position.x) / 2.0;
        Some(RollCommand::ZoomX {
            factor,
            anchor: Some(midpoint_x.clamp(content_left, content_right)),
        })
    }

    pub fn on_finger_lifted(&mut self, id: Finger) {
        self.touches.retain(|t| t.id != id);
        self.pinch_distance = self.current_distance();
    }

    fn current_distance(&self) -> Option<f32> {
        if self.touches.len() == 2 {
            let a = self.touches[0].position;
            let b = self.touches[1].position;
            Some(a.distance(b))
        } else {
            None
        }
    }
}

/// Normalize a scroll delta to pixels
fn scroll_delta_pixels(delta: ScrollDelta) -> (f32, f32) {
    match delta {
        ScrollDelta::Lines { x, y } => (x * WHEEL_LINE_PIXELS, y * WHEEL_LINE_PIXELS),
        ScrollDelta::Pixels { x, y } => (x, y),
    }
}

/// Exponential zoom factor from a wheel pixel delta; scroll up zooms in
fn wheel_zoom_factor(dy: f32) -> f32 {
    (dy * WHEEL_ZOOM_SENSITIVITY).exp()
}
