//! Built-in demo content
//!
//! A deterministic two-file sequence (file import is out of scope for the
//! viewer) exercising everything the roll renders: overlapping note runs,
//! sustain pedal events, overlap intervals, and a synthetic waveform
//! sampler for the bottom strip.

use gliss_core::{
    ControlChangeEvent, FileId, FileInfo, FileKind, Note, OverlapInterval, SampleError,
    WaveformSample, WaveformSampler, SUSTAIN_CONTROLLER,
};

/// Total demo duration in seconds
pub const DEMO_DURATION: f64 = 32.0;

const REFERENCE: FileId = 0;
const ESTIMATED: FileId = 1;

/// A C-major-ish arpeggio line for the reference file plus a slightly
/// shifted echo for the estimated file
pub fn demo_notes() -> Vec<Note> {
    let pattern: [i32; 8] = [48, 52, 55, 60, 64, 67, 72, 67];
    let mut notes = Vec::new();

    for bar in 0..16 {
        let bar_start = bar as f64 * 2.0;
        for (step, &pitch) in pattern.iter().enumerate() {
            let time = bar_start + step as f64 * 0.25;
            let velocity = 0.45 + 0.5 * ((step % 4) as f32 / 4.0);
            notes.push(Note::new(time, 0.22, pitch + (bar % 3), velocity, REFERENCE));

            // The "transcription" lags a touch and drops every 7th note
            if (bar * 8 + step as i32) % 7 != 0 {
                notes.push(Note::new(
                    time + 0.04,
                    0.20,
                    pitch + (bar % 3),
                    velocity * 0.9,
                    ESTIMATED,
                ));
            }
        }
        // A held bass note under each bar
        notes.push(Note::new(bar_start, 1.8, 36 + (bar % 3), 0.7, REFERENCE));
    }
    notes
}

/// Pedal down on every even bar, released mid-bar
pub fn demo_control_changes() -> Vec<ControlChangeEvent> {
    let mut events = Vec::new();
    for bar in (0..16).step_by(2) {
        let bar_start = bar as f64 * 2.0;
        events.push(ControlChangeEvent::new(bar_start, SUSTAIN_CONTROLLER, 1.0, REFERENCE));
        events.push(ControlChangeEvent::new(bar_start + 1.5, SUSTAIN_CONTROLLER, 0.0, REFERENCE));
    }
    // Leave the last pedal hanging: exercises the held-to-end segment
    events.push(ControlChangeEvent::new(30.0, SUSTAIN_CONTROLLER, 1.0, REFERENCE));
    events
}

/// Regions where both files sound together
pub fn demo_overlaps() -> Vec<OverlapInterval> {
    (0..8)
        .map(|i| OverlapInterval::new(i as f64 * 4.0 + 0.5, i as f64 * 4.0 + 1.5))
        .collect()
}

pub fn demo_files() -> Vec<FileInfo> {
    vec![
        FileInfo {
            id: REFERENCE,
            name: "demo-performance.mid".to_string(),
            color: [0.2, 0.8, 0.4],
            kind: FileKind::Reference,
        },
        FileInfo {
            id: ESTIMATED,
            name: "demo-transcription.mid".to_string(),
            color: [0.3, 0.55, 1.0],
            kind: FileKind::Estimated,
        },
    ]
}

/// Synthetic amplitude source for the waveform strip
///
/// Pulses once per beat with a slow swell across the piece; out-of-range
/// times error like a real decoder would.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoSampler;

impl WaveformSampler for DemoSampler {
    fn sample_at(&self, time: f64) -> Result<WaveformSample, SampleError> {
        if !(0.0..=DEMO_DURATION).contains(&time) {
            return Err(SampleError::OutOfRange(time));
        }
        let beat_phase = (time * 2.0).fract();
        let pulse = (1.0 - beat_phase) as f32;
        let swell = (0.4 + 0.3 * (time / DEMO_DURATION)) as f32;
        let amplitude = (swell * (0.35 + 0.65 * pulse)).min(1.0);
        Ok(WaveformSample {
            min: -amplitude,
            max: amplitude,
            color: [0.35, 0.4, 0.5],
        })
    }
}
