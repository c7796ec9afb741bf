//! Domain data model for the Gliss MIDI performance visualizer
//!
//! This crate holds the data that the rendering engine (gliss-widgets)
//! consumes, with no UI dependencies:
//!
//! - **Notes and control changes**: the event types pushed into the engine
//! - **Sustain segments**: CC64 pedal events paired into time ranges
//! - **Loop window**: the A/B repeat range, normalized at assignment
//! - **Playback collaborators**: interfaces the host wires to its clock
//!   and optional waveform sampler
//!
//! Everything here is plain data plus a few derivation functions; state
//! ownership and mutation discipline live in the engine crate.

pub mod loop_window;
pub mod note;
pub mod playback;
pub mod sustain;

pub use loop_window::LoopWindow;
pub use note::{
    content_end_time, ControlChangeEvent, FileId, FileInfo, FileKind, Note, OverlapInterval,
    SegmentKind, SUSTAIN_CONTROLLER,
};
pub use playback::{PlaybackControl, PlaybackSnapshot, SampleError, WaveformSample, WaveformSampler};
pub use sustain::{derive_sustain_segments, SustainSegment};
