//! Note and control-change event types
//!
//! These are the immutable inputs to the rendering engine. The host replaces
//! them wholesale (`set_notes`, `set_control_changes`); the engine never
//! mutates individual events.

use serde::{Deserialize, Serialize};

/// MIDI controller number for the sustain pedal (CC64)
///
/// The only controller the overlay logic interprets; all other controller
/// numbers are carried through untouched.
pub const SUSTAIN_CONTROLLER: u8 = 64;

/// Identifier of the file/track an event originated from
///
/// Sustain pairing and comparison coloring are both per-file, so every
/// event carries its owner.
pub type FileId = u32;

/// Evaluation-segment classification for comparison display modes
///
/// Assigned by an external evaluation step; used only for color selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    /// Present in both compared files
    Intersection,
    /// Present in exactly one file
    Exclusive,
    /// Overlapping but not cleanly matched
    Ambiguous,
}

/// A single note event
///
/// Times are in seconds. `duration` is expected to be positive, but the
/// engine tolerates zero/negative values defensively (such notes render
/// with a 1px minimum width rather than failing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Onset time in seconds (>= 0)
    pub time: f64,
    /// Duration in seconds (> 0 expected)
    pub duration: f64,
    /// Semitone number (MIDI pitch)
    pub pitch: i32,
    /// Normalized velocity (0.0 to 1.0)
    pub velocity: f32,
    /// Owning file
    pub file: FileId,
    /// Optional evaluation tag, for comparison coloring
    pub segment: Option<SegmentKind>,
}

impl Note {
    /// Create a note with no evaluation tag
    pub fn new(time: f64, duration: f64, pitch: i32, velocity: f32, file: FileId) -> Self {
        Self {
            time,
            duration,
            pitch,
            velocity: velocity.clamp(0.0, 1.0),
            file,
            segment: None,
        }
    }

    /// End time in seconds
    ///
    /// Degenerate durations are floored at the onset so the end never
    /// precedes the start.
    pub fn end_time(&self) -> f64 {
        self.time + self.duration.max(0.0)
    }
}

/// A control-change event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlChangeEvent {
    /// Event time in seconds
    pub time: f64,
    /// MIDI controller number
    pub controller: u8,
    /// Normalized value (0.0 to 1.0)
    pub value: f32,
    /// Owning file
    pub file: FileId,
}

impl ControlChangeEvent {
    pub fn new(time: f64, controller: u8, value: f32, file: FileId) -> Self {
        Self {
            time,
            controller,
            value: value.clamp(0.0, 1.0),
            file,
        }
    }
}

/// A time range where notes from different files overlap
///
/// Produced by an external comparison step; rendered as a faint band
/// behind the notes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlapInterval {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
}

impl OverlapInterval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

/// What role a file plays in a comparison display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FileKind {
    /// Ordinary playback file
    #[default]
    Standard,
    /// Ground-truth side of a comparison
    Reference,
    /// Estimated/transcribed side of a comparison
    Estimated,
}

/// Per-file display metadata supplied by the host's track manager
///
/// Consumed only for coloring; the engine has no notion of files beyond
/// this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    pub id: FileId,
    /// Display name (tooltips in the host UI)
    pub name: String,
    /// Base note color as linear RGB components (0.0 to 1.0)
    pub color: [f32; 3],
    pub kind: FileKind,
}

/// Latest end time over all notes, or `None` when the slice is empty
///
/// Used as the content extent for scale computation and as the implicit
/// release time of an unterminated sustain pedal.
pub fn content_end_time(notes: &[Note]) -> Option<f64> {
    notes
        .iter()
        .map(Note::end_time)
        .fold(None, |acc, end| match acc {
            Some(max) if max >= end => Some(max),
            _ => Some(end),
        })
}
