//! Overlay layers: overlap bands, sustain pedal, loop window, waveform strip
//!
//! Each overlay is independently fault-tolerant — a failure or a missing
//! data source leaves a gap, never a broken frame. The waveform strip in
//! particular samples an external collaborator that may error; those
//! errors are logged and swallowed at this boundary.

use iced::widget::canvas::{Frame, Path, Stroke};
use iced::{Point, Rectangle, Size};

use gliss_core::{LoopWindow, OverlapInterval, SustainSegment, WaveformSampler};

use crate::theme;

use super::transform::Transform;

/// Loop edge marker line width
const LOOP_MARKER_WIDTH: f32 = 2.0;

/// Horizontal step between waveform strip columns, in pixels
const WAVEFORM_COLUMN_STEP: f32 = 2.0;

/// What the loop overlay renders this frame
///
/// Band iff both endpoints are set; a lone endpoint renders as a marker
/// line. Split out of the draw call so the policy is testable without a
/// renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoopShape {
    None,
    /// Single marker at screen x
    Marker(f32),
    /// Band from x0 to x1 with markers on both edges
    Band(f32, f32),
}

/// Resolve the loop window to its drawable shape
pub fn loop_shape(window: &LoopWindow, transform: &Transform) -> LoopShape {
    match (window.start(), window.end()) {
        (Some(start), Some(end)) => LoopShape::Band(
            transform.time_to_pixel(start),
            transform.time_to_pixel(end),
        ),
        (Some(t), None) | (None, Some(t)) => LoopShape::Marker(transform.time_to_pixel(t)),
        (None, None) => LoopShape::None,
    }
}

/// Draw the loop window overlay
pub fn draw_loop_overlay(
    frame: &mut Frame,
    window: &LoopWindow,
    transform: &Transform,
    area: Rectangle,
) {
    match loop_shape(window, transform) {
        LoopShape::None => {}
        LoopShape::Marker(x) => draw_loop_marker(frame, x, area),
        LoopShape::Band(x0, x1) => {
            let left = x0.max(area.x);
            let right = x1.min(area.x + area.width);
            if right > left {
                frame.fill_rectangle(
                    Point::new(left, area.y),
                    Size::new(right - left, area.height),
                    theme::LOOP_BAND_COLOR,
                );
            }
            draw_loop_marker(frame, x0, area);
            draw_loop_marker(frame, x1, area);
        }
    }
}

fn draw_loop_marker(frame: &mut Frame, x: f32, area: Rectangle) {
    if x < area.x || x > area.x + area.width {
        return;
    }
    frame.stroke(
        &Path::line(Point::new(x, area.y), Point::new(x, area.y + area.height)),
        Stroke::default()
            .with_color(theme::LOOP_MARKER_COLOR)
            .with_width(LOOP_MARKER_WIDTH),
    );
}

/// Draw sustain pedal segments as translucent bands under the notes
pub fn draw_sustain_overlay(
    frame: &mut Frame,
    segments: &[SustainSegment],
    transform: &Transform,
    area: Rectangle,
) {
    let right_edge = area.x + area.width;
    for segment in segments {
        let x0 = transform.time_to_pixel(segment.start).max(area.x);
        let x1 = transform.time_to_pixel(segment.end).min(right_edge);
        if x1 <= x0 {
            continue;
        }
        frame.fill_rectangle(
            Point::new(x0, area.y),
            Size::new(x1 - x0, area.height),
            theme::SUSTAIN_COLOR,
        );
    }
}

/// Draw overlap-interval bands (comparison mode)
pub fn draw_overlap_bands(
    frame: &mut Frame,
    intervals: &[OverlapInterval],
    transform: &Transform,
    area: Rectangle,
) {
    let right_edge = area.x + area.width;
    for interval in intervals {
        let x0 = transform.time_to_pixel(interval.start).max(area.x);
        let x1 = transform.time_to_pixel(interval.end).min(right_edge);
        if x1 <= x0 {
            continue;
        }
        frame.fill_rectangle(
            Point::new(x0, area.y),
            Size::new(x1 - x0, area.height),
            theme::OVERLAP_COLOR,
        );
    }
}

/// Draw the auxiliary waveform strip along the bottom of the canvas
///
/// Samples the collaborator once per column across the strip. Sampler
/// errors are counted and reported once per frame at debug level; the
/// strip is cosmetic and must never take the frame down with it.
pub fn draw_waveform_strip(
    frame: &mut Frame,
    sampler: &dyn WaveformSampler,
    transform: &Transform,
    strip: Rectangle,
) {
    let center_y = strip.y + strip.height / 2.0;
    let half_height = strip.height / 2.0;
    let mut errors = 0usize;

    let mut x = strip.x;
    while x < strip.x + strip.width {
        let time = transform.pixel_to_time(x);
        if time >= 0.0 {
            match sampler.sample_at(time) {
                Ok(sample) => {
                    let min = sample.min.clamp(-1.0, 0.0);
                    let max = sample.max.clamp(0.0, 1.0);
                    let top = center_y - max * half_height;
                    let bottom = center_y - min * half_height;
                    let [r, g, b] = sample.color;
                    frame.fill_rectangle(
                        Point::new(x, top),
                        Size::new(WAVEFORM_COLUMN_STEP, (bottom - top).max(1.0)),
                        iced::Color::from_rgb(r, g, b),
                    );
                }
                Err(_) => errors += 1,
            }
        }
        x += WAVEFORM_COLUMN_STEP;
    }

    if errors > 0 {
        log::debug!("waveform strip: {errors} column(s) failed to sample");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::scale::compute_scales;
    use super::super::viewport::Viewport;
    use gliss_core::Note;

    fn transform() -> Transform {
        let notes = vec![Note::new(0.0, 10.0, 60, 0.5, 0)];
        let scales = compute_scales(&notes, 800.0, 600.0, true, None);
        Transform::new(&scales, &Viewport::default(), 60.0)
    }

    #[test]
    fn test_band_only_when_both_endpoints_set() {
        let transform = transform();
        let both = LoopWindow::new(Some(2.0), Some(6.0));
        assert!(matches!(loop_shape(&both, &transform), LoopShape::Band(_, _)));

        let start_only = LoopWindow::new(Some(2.0), None);
        assert!(matches!(loop_shape(&start_only, &transform), LoopShape::Marker(_)));

        let end_only = LoopWindow::new(None, Some(6.0));
        assert!(matches!(loop_shape(&end_only, &transform), LoopShape::Marker(_)));

        assert_eq!(loop_shape(&LoopWindow::clear(), &transform), LoopShape::None);
    }

    #[test]
    fn test_reversed_window_renders_normalized_band() {
        // Scenario D with the engine-side swap: band spans 3..7
        let transform = transform();
        let window = LoopWindow::new(Some(7.0), Some(3.0));
        match loop_shape(&window, &transform) {
            LoopShape::Band(x0, x1) => {
                assert!(x0 < x1);
                assert!((transform.pixel_to_time(x0) - 3.0).abs() < 1e-6);
                assert!((transform.pixel_to_time(x1) - 7.0).abs() < 1e-6);
            }
            other => panic!("expected band, got {other:?}"),
        }
    }

    #[test]
    fn test_band_edges_map_to_window_times() {
        let transform = transform();
        let window = LoopWindow::new(Some(1.0), Some(4.0));
        let LoopShape::Band(x0, x1) = loop_shape(&window, &transform) else {
            panic!("expected band");
        };
        assert!((transform.pixel_to_time(x0) - 1.0).abs() < 1e-6);
        assert!((transform.pixel_to_time(x1) - 4.0).abs() < 1e-6);
    }
}
