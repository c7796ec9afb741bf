//! Playback and waveform collaborator interfaces
//!
//! The engine renders against an external playback clock; these are the
//! interfaces the host wires up. The engine never drives playback itself —
//! it reports user scrubbing through its time-change subscribers and the
//! host closes the loop by seeking.

use thiserror::Error;

/// Read-only snapshot of the playback engine's state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSnapshot {
    /// Current position in seconds
    pub current_time: f64,
    /// Total duration in seconds
    pub duration: f64,
    pub is_playing: bool,
    /// 1.0 = normal speed
    pub playback_rate: f64,
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self {
            current_time: 0.0,
            duration: 0.0,
            is_playing: false,
            playback_rate: 1.0,
        }
    }
}

/// Commands the host's playback engine accepts
pub trait PlaybackControl {
    fn snapshot(&self) -> PlaybackSnapshot;
    fn play(&mut self);
    fn pause(&mut self);
    /// Jump to an absolute position in seconds
    fn seek(&mut self, time: f64);
}

/// One column of the auxiliary waveform strip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformSample {
    /// Minimum amplitude in the sampled window (-1.0 to 0.0)
    pub min: f32,
    /// Maximum amplitude in the sampled window (0.0 to 1.0)
    pub max: f32,
    /// Strip color as linear RGB components
    pub color: [f32; 3],
}

/// Failure while sampling the auxiliary waveform
///
/// The strip is cosmetic: the render boundary logs these and draws
/// nothing, it never aborts the frame.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("sample time {0} outside the decoded range")]
    OutOfRange(f64),
    #[error("waveform source is not ready")]
    NotReady,
    #[error("waveform source failed: {0}")]
    Source(String),
}

/// Optional amplitude sampler backing the bottom waveform strip
pub trait WaveformSampler {
    fn sample_at(&self, time: f64) -> Result<WaveformSample, SampleError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_default_is_stopped_at_zero() {
        let snap = PlaybackSnapshot::default();
        assert!(!snap.is_playing);
        assert_eq!(snap.current_time, 0.0);
        assert_eq!(snap.playback_rate, 1.0);
    }

    #[test]
    fn test_sample_error_messages() {
        let err = SampleError::OutOfRange(12.5);
        assert!(err.to_string().contains("12.5"));
    }
}
