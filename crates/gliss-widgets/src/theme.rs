//! Shared theme constants for the piano-roll widgets
//!
//! Color schemes and display constants used by the roll canvas, overlays,
//! and grid. Geometry constants that shape the coordinate system live in
//! `roll::scale`; everything here is purely visual.

use iced::Color;

/// Per-file note colors, assigned round-robin by file index
///
/// Comparison modes typically load two files; the remaining entries cover
/// multi-file sessions.
pub const FILE_COLORS: [Color; 8] = [
    Color::from_rgb(0.2, 0.8, 0.4),  // Green
    Color::from_rgb(0.3, 0.55, 1.0), // Blue
    Color::from_rgb(1.0, 0.6, 0.0),  // Orange
    Color::from_rgb(0.8, 0.3, 0.8),  // Purple
    Color::from_rgb(0.0, 0.8, 0.8),  // Cyan
    Color::from_rgb(1.0, 0.3, 0.3),  // Red
    Color::from_rgb(1.0, 1.0, 0.0),  // Yellow
    Color::from_rgb(1.0, 0.5, 0.8),  // Pink
];

/// Colors for evaluation-segment tags (intersection, exclusive, ambiguous)
///
/// Matched notes read green, unmatched red, ambiguous amber — the usual
/// transcription-evaluation coding.
pub const SEGMENT_INTERSECTION_COLOR: Color = Color::from_rgb(0.25, 0.8, 0.45);
pub const SEGMENT_EXCLUSIVE_COLOR: Color = Color::from_rgb(0.9, 0.3, 0.25);
pub const SEGMENT_AMBIGUOUS_COLOR: Color = Color::from_rgb(0.95, 0.75, 0.2);

/// Canvas background
pub const BACKGROUND_COLOR: Color = Color::from_rgb(0.08, 0.08, 0.1);

/// Gutter (piano-key label strip) background
pub const GUTTER_COLOR: Color = Color::from_rgb(0.11, 0.11, 0.13);

/// Major gridline color
pub const GRID_MAJOR_COLOR: Color = Color::from_rgba(0.5, 0.5, 0.55, 0.5);

/// Minor gridline color (fainter, no labels)
pub const GRID_MINOR_COLOR: Color = Color::from_rgba(0.35, 0.35, 0.4, 0.3);

/// Grid label text color
pub const GRID_LABEL_COLOR: Color = Color::from_rgb(0.55, 0.55, 0.6);

/// Playhead line color
pub const PLAYHEAD_COLOR: Color = Color::from_rgb(1.0, 1.0, 1.0);

/// Sustain pedal overlay band
pub const SUSTAIN_COLOR: Color = Color::from_rgba(0.4, 0.6, 1.0, 0.12);

/// Loop window band and edge markers
pub const LOOP_BAND_COLOR: Color = Color::from_rgba(0.2, 0.8, 0.2, 0.18);
pub const LOOP_MARKER_COLOR: Color = Color::from_rgba(0.2, 0.9, 0.2, 0.85);

/// Overlap-interval band (comparison mode)
pub const OVERLAP_COLOR: Color = Color::from_rgba(0.9, 0.9, 1.0, 0.06);

/// Waveform strip fallback color (samplers usually supply their own)
pub const WAVEFORM_STRIP_COLOR: Color = Color::from_rgb(0.35, 0.4, 0.5);

/// Piano-roll display configuration
///
/// Visual knobs a host may want to vary per deployment. Geometry
/// invariants (zoom bounds, gutter width) are constants in `roll::scale`
/// and `roll::viewport`, not configuration.
#[derive(Debug, Clone)]
pub struct RollConfig {
    /// Global note color, used when no per-note override applies
    pub note_color: Color,
    /// Notes resolved to this color are de-emphasized (reduced opacity)
    pub neutral_color: Color,
    /// Opacity multiplier applied to neutral-colored notes
    pub neutral_opacity: f32,
    /// Velocity 0.0 maps to this alpha...
    pub min_note_alpha: f32,
    /// ...and velocity 1.0 to this
    pub max_note_alpha: f32,
    /// Major gridline spacing in seconds
    pub time_step: f64,
    /// Minor gridline spacing in seconds
    pub minor_time_step: f64,
    /// Minimum pixel distance between consecutive grid labels
    pub label_min_spacing: f32,
}

impl Default for RollConfig {
    fn default() -> Self {
        Self {
            note_color: Color::from_rgb(0.35, 0.65, 1.0),
            neutral_color: Color::from_rgb(0.55, 0.55, 0.55),
            neutral_opacity: 0.45,
            min_note_alpha: 0.25,
            max_note_alpha: 1.0,
            time_step: 1.0,
            minor_time_step: 0.25,
            label_min_spacing: 50.0,
        }
    }
}

/// Color for a file index, cycling through the palette
pub fn file_color(index: usize) -> Color {
    FILE_COLORS[index % FILE_COLORS.len()]
}
