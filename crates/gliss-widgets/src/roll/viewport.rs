//! Viewport state: zoom, pan, current time, and bounds clamping
//!
//! All mutation goes through the methods here (via the engine facade);
//! renderers only read. Every mutating method re-clamps, so pan offsets
//! are always inside the bounds derived from the current scale, zoom, and
//! viewport size — callers never observe a half-updated viewport.

use iced::Point;

use super::scale::ViewMetrics;

/// Horizontal zoom bounds
pub const MIN_ZOOM_X: f32 = 0.1;
pub const MAX_ZOOM_X: f32 = 10.0;

/// Vertical zoom bounds
pub const MIN_ZOOM_Y: f32 = 0.2;
pub const MAX_ZOOM_Y: f32 = 5.0;

/// Zoom/pan/time state for one roll view
///
/// `pan_x`/`pan_y` are the pixel translation applied to the content
/// container; note shapes themselves are positioned in zoomed content
/// space and never move during a pan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom_x: f32,
    pub zoom_y: f32,
    pub pan_x: f32,
    pub pan_y: f32,
    /// Playback position in seconds
    pub current_time: f64,
    /// True while a pointer drag owns the pan
    pub panning: bool,
    /// Pointer position at the last drag event
    pub last_pointer: Option<Point>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom_x: 1.0,
            zoom_y: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            current_time: 0.0,
            panning: false,
            last_pointer: None,
        }
    }
}

impl Viewport {
    /// Screen x of the fixed playhead: just past the gutter
    pub fn playhead_x(metrics: &ViewMetrics) -> f32 {
        metrics.gutter_width
    }

    /// Musical time under a screen x
    pub fn time_at_pixel(&self, x: f32, metrics: &ViewMetrics) -> f64 {
        let pps = metrics.px_per_second * self.zoom_x as f64;
        if pps <= 0.0 {
            return 0.0;
        }
        (x - metrics.gutter_width - self.pan_x) as f64 / pps
    }

    /// Time under the fixed playhead, clamped to the content domain
    ///
    /// Inverse of the playhead-anchoring formula in `set_time`; the host
    /// uses this to re-sync playback after the user scrolls or zooms.
    pub fn time_at_playhead(&self, metrics: &ViewMetrics) -> f64 {
        self.time_at_pixel(Self::playhead_x(metrics), metrics)
            .clamp(0.0, metrics.max_time)
    }

    /// Set the playback time, keeping the playhead over it
    ///
    /// While a drag-pan is in progress the pan offset belongs to the user,
    /// so only the time field updates; otherwise the pan is recomputed so
    /// the playhead stays aligned with `time`.
    pub fn set_time(&mut self, time: f64, metrics: &ViewMetrics) {
        self.current_time = time;
        if !self.panning {
            self.pan_x = -(time * metrics.px_per_second * self.zoom_x as f64) as f32;
            self.clamp_pan(metrics);
        }
    }

    /// Zoom the time axis by `factor` around `anchor` (screen x)
    ///
    /// The musical time under the anchor pixel before the zoom remains
    /// under it afterwards. Default anchor is the playhead. Returns false
    /// for the factor-1 no-op (including a factor swallowed entirely by
    /// the zoom bounds).
    pub fn zoom_x_by(&mut self, factor: f32, anchor: Option<f32>, metrics: &ViewMetrics) -> bool {
        if factor == 1.0 || !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let anchor = anchor.unwrap_or_else(|| Self::playhead_x(metrics));
        let anchor_time = self.time_at_pixel(anchor, metrics);

        let new_zoom = (self.zoom_x * factor).clamp(MIN_ZOOM_X, MAX_ZOOM_X);
        if new_zoom == self.zoom_x {
            return false;
        }
        self.zoom_x = new_zoom;

        // Re-solve pan so anchor_time lands back under the anchor pixel
        let pps = metrics.px_per_second * self.zoom_x as f64;
        self.pan_x = (anchor as f64 - metrics.gutter_width as f64 - anchor_time * pps) as f32;
        self.clamp_pan(metrics);
        true
    }

    /// Zoom the pitch axis by `factor` around the band midpoint
    pub fn zoom_y_by(&mut self, factor: f32, metrics: &ViewMetrics) -> bool {
        if factor == 1.0 || !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let new_zoom = (self.zoom_y * factor).clamp(MIN_ZOOM_Y, MAX_ZOOM_Y);
        if new_zoom == self.zoom_y {
            return false;
        }
        self.zoom_y = new_zoom;
        self.clamp_pan(metrics);
        true
    }

    /// Additive pan on both axes
    pub fn pan_by(&mut self, dx: f32, dy: f32, metrics: &ViewMetrics) {
        self.pan_x += dx;
        self.pan_y += dy;
        self.clamp_pan(metrics);
    }

    /// Zoom back to 1/1 with the current time under the playhead
    pub fn reset_view(&mut self, metrics: &ViewMetrics) {
        self.zoom_x = 1.0;
        self.zoom_y = 1.0;
        self.pan_y = 0.0;
        self.pan_x = -(self.current_time * metrics.px_per_second) as f32;
        self.clamp_pan(metrics);
    }

    /// Clamp both pan offsets into their valid ranges
    ///
    /// Horizontal: the content container may slide left at most its own
    /// zoomed width, and never right of the origin. Vertical: bounds come
    /// from the midpoint-scaling transform — when the scaled band fits the
    /// viewport, the pan locks to zero.
    pub fn clamp_pan(&mut self, metrics: &ViewMetrics) {
        let min_x = -(metrics.content_width * self.zoom_x as f64) as f32;
        self.pan_x = self.pan_x.clamp(min_x.min(0.0), 0.0);

        let (min_y, max_y) = self.pan_y_bounds(metrics);
        self.pan_y = self.pan_y.clamp(min_y, max_y);
    }

    /// Valid `pan_y` range under the current vertical zoom
    ///
    /// The pitch band scales around its midpoint, so spill is symmetric:
    /// the excess height splits evenly above and below.
    pub fn pan_y_bounds(&self, metrics: &ViewMetrics) -> (f32, f32) {
        let band = metrics.pitch_band_height;
        let scaled = band * self.zoom_y;
        if scaled <= band {
            (0.0, 0.0)
        } else {
            let spill = (scaled - band) / 2.0;
            (-spill, spill)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> ViewMetrics {
        ViewMetrics {
            px_per_second: 100.0,
            max_time: 60.0,
            content_width: 6000.0,
            gutter_width: 60.0,
            pitch_band_height: 500.0,
        }
    }

    const EPS: f64 = 1e-3;

    #[test]
    fn test_set_time_recomputes_pan() {
        // Spec scenario B: setTime(5) at pps=100, zoom 1 -> panX = -500
        let mut vp = Viewport::default();
        vp.set_time(5.0, &metrics());
        assert_eq!(vp.pan_x, -500.0);
    }

    #[test]
    fn test_set_time_clamps_pan() {
        let mut vp = Viewport::default();
        vp.set_time(1000.0, &metrics());
        // panX bounded below by -contentWidth * zoomX
        assert_eq!(vp.pan_x, -6000.0);
    }

    #[test]
    fn test_set_time_while_panning_leaves_pan_alone() {
        let mut vp = Viewport::default();
        vp.set_time(2.0, &metrics());
        let pan = vp.pan_x;
        vp.panning = true;
        vp.set_time(30.0, &metrics());
        assert_eq!(vp.pan_x, pan);
        assert_eq!(vp.current_time, 30.0);
    }

    #[test]
    fn test_playhead_round_trip() {
        let m = metrics();
        let mut vp = Viewport::default();
        for &t in &[0.0, 5.0, 17.25, 59.0] {
            vp.set_time(t, &m);
            assert!((vp.time_at_playhead(&m) - t).abs() < EPS, "t={t}");
        }
    }

    #[test]
    fn test_anchor_preserving_zoom() {
        let m = metrics();
        let mut vp = Viewport::default();
        vp.set_time(10.0, &m);
        for &(factor, anchor) in &[(2.0, 100.0), (0.5, 400.0), (1.3, 61.0), (3.0, 700.0)] {
            let before = vp.time_at_pixel(anchor, &m);
            vp.zoom_x_by(factor, Some(anchor), &m);
            let after = vp.time_at_pixel(anchor, &m);
            assert!(
                (after - before).abs() < EPS,
                "factor={factor} anchor={anchor}: {before} -> {after}"
            );
        }
    }

    #[test]
    fn test_zoom_factor_one_is_noop() {
        let m = metrics();
        let mut vp = Viewport::default();
        vp.set_time(10.0, &m);
        let snapshot = vp;
        assert!(!vp.zoom_x_by(1.0, Some(200.0), &m));
        assert_eq!(vp, snapshot);
    }

    #[test]
    fn test_zoom_bounds() {
        let m = metrics();
        let mut vp = Viewport::default();
        vp.zoom_x_by(100.0, None, &m);
        assert_eq!(vp.zoom_x, MAX_ZOOM_X);
        vp.zoom_x_by(1e-6, None, &m);
        assert_eq!(vp.zoom_x, MIN_ZOOM_X);
        vp.zoom_y_by(100.0, &m);
        assert_eq!(vp.zoom_y, MAX_ZOOM_Y);
        vp.zoom_y_by(1e-6, &m);
        assert_eq!(vp.zoom_y, MIN_ZOOM_Y);
    }

    #[test]
    fn test_clamp_closure_over_mixed_sequence() {
        let m = metrics();
        let mut vp = Viewport::default();
        let moves: [(f32, f32); 6] = [
            (-10_000.0, -900.0),
            (20_000.0, 900.0),
            (-3.5, 12.0),
            (0.0, -10_000.0),
            (500.0, 0.0),
            (-123.0, 45.0),
        ];
        for (i, &(dx, dy)) in moves.iter().enumerate() {
            vp.pan_by(dx, dy, &m);
            vp.zoom_x_by(if i % 2 == 0 { 1.7 } else { 0.4 }, Some(dx.abs() % 800.0), &m);
            vp.zoom_y_by(if i % 2 == 0 { 2.1 } else { 0.3 }, &m);
            vp.set_time(i as f64 * 7.0, &m);

            let min_x = -(m.content_width * vp.zoom_x as f64) as f32;
            assert!(vp.pan_x <= 0.0 && vp.pan_x >= min_x, "step {i}: pan_x={}", vp.pan_x);
            let (min_y, max_y) = vp.pan_y_bounds(&m);
            assert!(vp.pan_y >= min_y && vp.pan_y <= max_y, "step {i}: pan_y={}", vp.pan_y);
        }
    }

    #[test]
    fn test_pan_y_locked_when_content_fits() {
        let m = metrics();
        let mut vp = Viewport::default();
        // zoom_y <= 1: scaled band fits, pan locks to 0
        vp.zoom_y_by(0.5, &m);
        vp.pan_by(0.0, 300.0, &m);
        assert_eq!(vp.pan_y, 0.0);
    }

    #[test]
    fn test_pan_y_bounds_symmetric_when_zoomed_in() {
        let m = metrics();
        let mut vp = Viewport::default();
        vp.zoom_y_by(2.0, &m);
        let (min_y, max_y) = vp.pan_y_bounds(&m);
        assert_eq!(min_y, -max_y);
        assert!((max_y - 250.0).abs() < 1e-3); // 500 * (2 - 1) / 2
    }

    #[test]
    fn test_reset_view_recenters_current_time() {
        let m = metrics();
        let mut vp = Viewport::default();
        vp.set_time(12.0, &m);
        vp.zoom_x_by(3.0, Some(400.0), &m);
        vp.zoom_y_by(2.0, &m);
        vp.reset_view(&m);
        assert_eq!(vp.zoom_x, 1.0);
        assert_eq!(vp.zoom_y, 1.0);
        assert_eq!(vp.pan_y, 0.0);
        assert!((vp.time_at_playhead(&m) - 12.0).abs() < EPS);
    }
}
