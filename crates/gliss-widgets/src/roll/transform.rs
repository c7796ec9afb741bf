//! Pixel ↔ musical-coordinate conversions
//!
//! A stateless snapshot of the current scales plus zoom/pan, usable in
//! both directions. Renderers take one per frame instead of reaching into
//! the viewport, so a frame sees a single consistent set of numbers.

use super::scale::{PitchScale, ScaleSet, TimeScale};
use super::viewport::Viewport;

/// Value-type coordinate converter for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    time: TimeScale,
    pitch: PitchScale,
    zoom_x: f32,
    zoom_y: f32,
    pan_x: f32,
    pan_y: f32,
    gutter: f32,
}

impl Transform {
    pub fn new(scales: &ScaleSet, viewport: &Viewport, gutter: f32) -> Self {
        Self {
            time: scales.time,
            pitch: scales.pitch,
            zoom_x: viewport.zoom_x,
            zoom_y: viewport.zoom_y,
            pan_x: viewport.pan_x,
            pan_y: viewport.pan_y,
            gutter,
        }
    }

    /// Screen x for a time in seconds
    pub fn time_to_pixel(&self, time: f64) -> f32 {
        (self.time.apply(time) * self.zoom_x as f64) as f32 + self.pan_x + self.gutter
    }

    /// Time in seconds under a screen x
    pub fn pixel_to_time(&self, x: f32) -> f64 {
        let zoomed_pps = self.time.px_per_second * self.zoom_x as f64;
        if zoomed_pps <= 0.0 {
            return 0.0;
        }
        (x - self.gutter - self.pan_x) as f64 / zoomed_pps
    }

    /// Screen y for the top of a pitch's row
    ///
    /// Vertical zoom scales around the pitch band's midpoint, not its top,
    /// so zooming never shoves content entirely off-screen.
    pub fn pitch_to_pixel(&self, pitch: i32) -> f32 {
        let content_y = self.pitch.apply(pitch);
        (content_y - self.pitch.mid()) * self.zoom_y + self.pitch.mid() + self.pan_y
    }

    /// Fractional pitch under a screen y
    pub fn pixel_to_pitch(&self, y: f32) -> f64 {
        let content_y = (y - self.pan_y - self.pitch.mid()) / self.zoom_y + self.pitch.mid();
        self.pitch.invert(content_y)
    }

    /// Current zoomed pixels-per-second ratio
    ///
    /// The local derivative of `time_to_pixel`; renderers use it for
    /// widths instead of differencing absolute positions.
    pub fn pixels_per_second(&self) -> f64 {
        self.time.px_per_second * self.zoom_x as f64
    }

    /// Zoomed height of one semitone row
    pub fn row_height(&self) -> f32 {
        self.pitch.row_height() * self.zoom_y
    }

    /// Left edge of the content area (right edge of the gutter)
    pub fn content_left(&self) -> f32 {
        self.gutter
    }
}
