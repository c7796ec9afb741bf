//! Background time-grid generation
//!
//! Builds the gridline list for the visible time range: major lines every
//! `time_step` seconds carrying labels, minor subdivisions drawn fainter
//! and unlabeled. Label crowding is handled here, not in the draw code —
//! a label is emitted only when it sits far enough from the previous one,
//! and a minor line is dropped when it coincides with a major line.

use crate::theme::RollConfig;

use super::transform::Transform;

/// Tolerance (in seconds) for "this minor line coincides with a major"
const COINCIDENCE_EPS: f64 = 1e-6;

/// One vertical gridline ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct GridLine {
    /// Screen x
    pub x: f32,
    /// True for a `time_step` line, false for a subdivision
    pub major: bool,
    /// Label text; only ever present on major lines
    pub label: Option<String>,
}

/// Generate the gridlines covering `[left, right]` in screen x
///
/// Lines left of the content area (inside the gutter) are culled. Labels
/// are suppressed within `label_min_spacing` pixels of the previously
/// emitted label; the lines themselves always draw.
pub fn build_time_grid(
    transform: &Transform,
    config: &RollConfig,
    left: f32,
    right: f32,
) -> Vec<GridLine> {
    let mut lines = Vec::new();
    if right <= left {
        return lines;
    }
    let major_step = config.time_step.max(1e-3);
    let minor_step = config.minor_time_step.max(1e-3);

    let t_start = transform.pixel_to_time(left).max(0.0);
    let t_end = transform.pixel_to_time(right).max(t_start);

    // Major lines with spaced labels
    let mut last_label_x = f32::NEG_INFINITY;
    let mut k = (t_start / major_step).floor() as i64;
    loop {
        let t = k as f64 * major_step;
        if t > t_end {
            break;
        }
        k += 1;
        if t < 0.0 {
            continue;
        }
        let x = transform.time_to_pixel(t);
        if x < transform.content_left() {
            continue;
        }
        let label = if x - last_label_x >= config.label_min_spacing {
            last_label_x = x;
            Some(format_time_label(t))
        } else {
            None
        };
        lines.push(GridLine { x, major: true, label });
    }

    // Minor subdivisions, skipping positions already covered by a major
    let mut k = (t_start / minor_step).floor() as i64;
    loop {
        let t = k as f64 * minor_step;
        if t > t_end {
            break;
        }
        k += 1;
        if t < 0.0 {
            continue;
        }
        let offset = (t / major_step).round() * major_step - t;
        if offset.abs() < COINCIDENCE_EPS {
            continue;
        }
        let x = transform.time_to_pixel(t);
        if x < transform.content_left() {
            continue;
        }
        lines.push(GridLine { x, major: false, label: None });
    }

    lines
}

/// Format seconds as m:ss, with a decimal when the grid is sub-second
pub fn format_time_label(t: f64) -> String {
    let total = t.max(0.0);
    let minutes = (total / 60.0).floor() as u64;
    let seconds = total - minutes as f64 * 60.0;
    if (seconds - seconds.round()).abs() < 1e-9 {
        format!("{}:{:02}", minutes, seconds.round() as u64)
    } else {
        format!("{}:{:04.1}", minutes, seconds)
    }
}
