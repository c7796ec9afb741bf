//! Time and pitch scale computation
//!
//! Derives the linear time→pixel and pitch→pixel mappings from the current
//! note set and canvas size. The time scale's pixels-per-second ratio is
//! cached by the engine and passed back in on every recompute so that
//! replacing the note set (which may extend the maximum time) does not
//! rescale content already on screen; only a canvas resize invalidates it.

use gliss_core::{content_end_time, Note};

// =============================================================================
// Geometry Constants
// =============================================================================

/// Seconds of content visible across the drawable width at zoom 1
///
/// Sets the baseline pixels-per-second ratio on first computation.
pub const TARGET_VISIBLE_SECONDS: f64 = 8.0;

/// Time domain extent when no notes exist
pub const FALLBACK_MAX_TIME: f64 = 60.0;

/// Width of the piano-key label gutter, when reserved
pub const GUTTER_WIDTH: f32 = 60.0;

/// Pixel band at the bottom of the canvas reserved for the auxiliary
/// waveform strip; pitch rows never enter it
pub const WAVEFORM_BAND_HEIGHT: f32 = 56.0;

/// Semitones of padding above and below the occupied pitch range
pub const PITCH_PADDING: i32 = 2;

/// Pitch domain when no notes exist (88-key piano, A0..C8)
pub const FALLBACK_PITCH_LOW: i32 = 21;
pub const FALLBACK_PITCH_HIGH: i32 = 108;

// =============================================================================
// Scales
// =============================================================================

/// Linear seconds→pixels mapping at zoom 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    /// Pixels per second at zoom 1 (the cached ratio)
    pub px_per_second: f64,
    /// Domain extent in seconds
    pub max_time: f64,
}

impl TimeScale {
    /// Content x (un-panned, zoom 1) for a time in seconds
    pub fn apply(&self, time: f64) -> f64 {
        time * self.px_per_second
    }

    /// Inverse of `apply`
    pub fn invert(&self, x: f64) -> f64 {
        if self.px_per_second > 0.0 {
            x / self.px_per_second
        } else {
            0.0
        }
    }

    /// Full-domain pixel width at zoom 1
    pub fn content_width(&self) -> f64 {
        self.apply(self.max_time)
    }
}

/// Linear pitch→pixels mapping at zoom 1, inverted so low pitch sits low
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchScale {
    /// Lowest pitch in the (padded) domain
    pub low: i32,
    /// Highest pitch in the (padded) domain
    pub high: i32,
    /// Pixel height of the band the domain maps into
    pub band_height: f32,
}

impl PitchScale {
    /// Number of semitone rows in the domain
    pub fn rows(&self) -> i32 {
        (self.high - self.low + 1).max(1)
    }

    /// Pixel height of one semitone row at zoom 1
    pub fn row_height(&self) -> f32 {
        self.band_height / self.rows() as f32
    }

    /// Top edge of a pitch's row in content space (zoom 1, un-panned)
    pub fn apply(&self, pitch: i32) -> f32 {
        (self.high - pitch) as f32 * self.row_height()
    }

    /// Fractional pitch for a content-space y
    pub fn invert(&self, y: f32) -> f64 {
        self.high as f64 - (y / self.row_height()) as f64
    }

    /// Vertical midpoint of the band; vertical zoom scales around it
    pub fn mid(&self) -> f32 {
        self.band_height / 2.0
    }
}

/// The two scales, computed together
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleSet {
    pub time: TimeScale,
    pub pitch: PitchScale,
}

/// Derived numbers the viewport clamping functions need
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewMetrics {
    pub px_per_second: f64,
    pub max_time: f64,
    /// Full time-domain width in pixels at zoom 1
    pub content_width: f64,
    pub gutter_width: f32,
    /// Height of the pitch band (canvas height minus waveform strip)
    pub pitch_band_height: f32,
}

impl ScaleSet {
    pub fn metrics(&self, gutter_width: f32) -> ViewMetrics {
        ViewMetrics {
            px_per_second: self.time.px_per_second,
            max_time: self.time.max_time,
            content_width: self.time.content_width(),
            gutter_width,
            pitch_band_height: self.pitch.band_height,
        }
    }
}

/// Compute both scales from the current note set and canvas size
///
/// `prev_px_per_second` is the engine's cached ratio; pass `None` to
/// re-derive it from the new width (done on resize). The drawable width
/// excludes the gutter when one is reserved.
pub fn compute_scales(
    notes: &[Note],
    width: f32,
    height: f32,
    gutter: bool,
    prev_px_per_second: Option<f64>,
) -> ScaleSet {
    let gutter_width = if gutter { GUTTER_WIDTH } else { 0.0 };
    // Degenerate canvas sizes floor at 1px so ratios stay finite
    let drawable_width = (width - gutter_width).max(1.0);
    let band_height = (height - WAVEFORM_BAND_HEIGHT).max(1.0);

    let max_time = content_end_time(notes).unwrap_or(FALLBACK_MAX_TIME);
    let px_per_second = prev_px_per_second
        .unwrap_or(drawable_width as f64 / TARGET_VISIBLE_SECONDS);

    let (low, high) = pitch_domain(notes);

    ScaleSet {
        time: TimeScale {
            px_per_second,
            max_time,
        },
        pitch: PitchScale {
            low,
            high,
            band_height,
        },
    }
}

/// Padded pitch domain, with the 88-key fallback for empty note sets
fn pitch_domain(notes: &[Note]) -> (i32, i32) {
    let mut bounds: Option<(i32, i32)> = None;
    for note in notes {
        bounds = Some(match bounds {
            Some((lo, hi)) => (lo.min(note.pitch), hi.max(note.pitch)),
            None => (note.pitch, note.pitch),
        });
    }
    match bounds {
        Some((lo, hi)) => (lo - PITCH_PADDING, hi + PITCH_PADDING),
        None => (FALLBACK_PITCH_LOW, FALLBACK_PITCH_HIGH),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_px_per_second() {
        // Spec scenario A: width=800, gutter=60 -> (800-60)/8 = 92.5
        let notes = vec![Note::new(0.0, 1.0, 60, 0.5, 0)];
        let scales = compute_scales(&notes, 800.0, 600.0, true, None);
        assert!((scales.time.px_per_second - 92.5).abs() < 1e-9);
    }

    #[test]
    fn test_cached_ratio_survives_data_update() {
        let notes = vec![Note::new(0.0, 1.0, 60, 0.5, 0)];
        let scales = compute_scales(&notes, 800.0, 600.0, true, None);
        // Longer content arrives; cached ratio passed back in
        let longer = vec![Note::new(0.0, 120.0, 60, 0.5, 0)];
        let rescaled = compute_scales(&longer, 800.0, 600.0, true, Some(scales.time.px_per_second));
        assert_eq!(rescaled.time.px_per_second, scales.time.px_per_second);
        assert_eq!(rescaled.time.max_time, 120.0);
    }

    #[test]
    fn test_resize_rederives_ratio() {
        let notes = vec![Note::new(0.0, 1.0, 60, 0.5, 0)];
        let scales = compute_scales(&notes, 1480.0, 600.0, true, None);
        assert!((scales.time.px_per_second - (1480.0 - 60.0) / 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_notes_fall_back() {
        let scales = compute_scales(&[], 800.0, 600.0, false, None);
        assert_eq!(scales.time.max_time, FALLBACK_MAX_TIME);
        assert_eq!(scales.pitch.low, FALLBACK_PITCH_LOW);
        assert_eq!(scales.pitch.high, FALLBACK_PITCH_HIGH);
    }

    #[test]
    fn test_pitch_band_reserves_waveform_strip() {
        let scales = compute_scales(&[], 800.0, 600.0, false, None);
        assert_eq!(scales.pitch.band_height, 600.0 - WAVEFORM_BAND_HEIGHT);
    }

    #[test]
    fn test_pitch_inversion_low_is_visually_lower() {
        let notes = vec![
            Note::new(0.0, 1.0, 48, 0.5, 0),
            Note::new(0.0, 1.0, 72, 0.5, 0),
        ];
        let scales = compute_scales(&notes, 800.0, 600.0, false, None);
        // Higher pitch maps to a smaller y (toward the top)
        assert!(scales.pitch.apply(72) < scales.pitch.apply(48));
    }

    #[test]
    fn test_pitch_round_trip() {
        let notes = vec![
            Note::new(0.0, 1.0, 48, 0.5, 0),
            Note::new(0.0, 1.0, 72, 0.5, 0),
        ];
        let scales = compute_scales(&notes, 800.0, 600.0, false, None);
        let y = scales.pitch.apply(60);
        assert!((scales.pitch.invert(y) - 60.0).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_canvas_floors_at_one_pixel() {
        let scales = compute_scales(&[], 0.0, 10.0, true, None);
        assert!(scales.time.px_per_second > 0.0);
        assert!(scales.pitch.band_height >= 1.0);
    }
}
