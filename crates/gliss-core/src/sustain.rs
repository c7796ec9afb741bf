//! Sustain pedal segment derivation
//!
//! Pairs consecutive CC64 "pedal down"/"pedal up" events into time
//! segments, independently per originating file. The engine renders the
//! segments as translucent bands under the notes.

use crate::note::{ControlChangeEvent, FileId, SUSTAIN_CONTROLLER};

/// Pedal values at or above this count as "down"
///
/// Control values are normalized 0–1; hardware half-pedaling lands mid
/// range, so the midpoint is the threshold.
pub const PEDAL_DOWN_THRESHOLD: f32 = 0.5;

/// A continuous pedal-held time range for one file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SustainSegment {
    /// Pedal-down time in seconds
    pub start: f64,
    /// Pedal-up time in seconds
    pub end: f64,
    /// File the pedal events came from
    pub file: FileId,
}

/// Derive sustain segments from a control-change stream
///
/// Only controller 64 is interpreted; other controllers pass through
/// unused. Events are processed in time order per file. A pedal that is
/// still down when the stream ends produces an implicit segment running to
/// `content_end` (the last note's release), matching what a listener
/// hears.
///
/// Repeated "down" events while already down are ignored (hardware sends
/// continuous pressure values); an "up" without a preceding "down" is
/// ignored too.
pub fn derive_sustain_segments(
    events: &[ControlChangeEvent],
    content_end: f64,
) -> Vec<SustainSegment> {
    let mut pedal_events: Vec<&ControlChangeEvent> = events
        .iter()
        .filter(|e| e.controller == SUSTAIN_CONTROLLER)
        .collect();
    // Stable sort: same-time events keep stream order within a file
    pedal_events.sort_by(|a, b| {
        a.file
            .cmp(&b.file)
            .then(a.time.partial_cmp(&b.time).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut segments = Vec::new();
    let mut current_file: Option<FileId> = None;
    let mut down_since: Option<f64> = None;

    for event in pedal_events {
        if current_file != Some(event.file) {
            // File boundary: close out any pedal left down in the previous file
            if let Some(start) = down_since.take() {
                push_segment(&mut segments, start, content_end, current_file);
            }
            current_file = Some(event.file);
        }

        let is_down = event.value >= PEDAL_DOWN_THRESHOLD;
        match (down_since, is_down) {
            (None, true) => down_since = Some(event.time),
            (Some(start), false) => {
                down_since = None;
                push_segment(&mut segments, start, event.time, current_file);
            }
            // Pressure wiggle on the held side of the threshold
            _ => {}
        }
    }

    // Pedal never released: implicit segment to the end of the content
    if let Some(start) = down_since {
        push_segment(&mut segments, start, content_end, current_file);
    }

    segments
}

fn push_segment(segments: &mut Vec<SustainSegment>, start: f64, end: f64, file: Option<FileId>) {
    let Some(file) = file else { return };
    if end <= start {
        log::debug!(
            "dropping degenerate sustain segment [{start:.3}, {end:.3}] for file {file}"
        );
        return;
    }
    segments.push(SustainSegment { start, end, file });
}
