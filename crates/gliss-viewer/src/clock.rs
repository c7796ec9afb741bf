//! Demo playback clock
//!
//! A deterministic stand-in for a real audio engine: advances wall-clock
//! time scaled by the playback rate, clamps at the duration, and honors
//! the loop window when one is active. Implements the same
//! `PlaybackControl` surface a real engine would.

use std::time::Instant;

use gliss_core::{PlaybackControl, PlaybackSnapshot};

/// Clock-driven mock playback engine
#[derive(Debug)]
pub struct DemoPlayer {
    current_time: f64,
    duration: f64,
    playing: bool,
    rate: f64,
    /// Loop range applied on wrap, if any
    loop_range: Option<(f64, f64)>,
    last_advance: Option<Instant>,
}

impl DemoPlayer {
    pub fn new(duration: f64) -> Self {
        Self {
            current_time: 0.0,
            duration,
            playing: false,
            rate: 1.0,
            loop_range: None,
            last_advance: None,
        }
    }

    /// Advance the clock to `now`
    ///
    /// Called from the host's tick. While paused this only re-bases the
    /// internal timestamp so resuming doesn't jump.
    pub fn advance(&mut self, now: Instant) {
        let elapsed = self
            .last_advance
            .map(|last| now.duration_since(last).as_secs_f64())
            .unwrap_or(0.0);
        self.last_advance = Some(now);

        if !self.playing {
            return;
        }
        self.current_time += elapsed * self.rate;

        if let Some((start, end)) = self.loop_range {
            if end > start && self.current_time >= end {
                self.current_time = start + (self.current_time - end) % (end - start);
            }
        }
        if self.current_time >= self.duration {
            self.current_time = self.duration;
            self.playing = false;
        }
    }

    pub fn set_loop_range(&mut self, range: Option<(f64, f64)>) {
        self.loop_range = range;
    }

    pub fn set_rate(&mut self, rate: f64) {
        self.rate = rate.clamp(0.25, 4.0);
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }
}

impl PlaybackControl for DemoPlayer {
    fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_time: self.current_time,
            duration: self.duration,
            is_playing: self.playing,
            playback_rate: self.rate,
        }
    }

    fn play(&mut self) {
        if self.current_time >= self.duration {
            self.current_time = 0.0;
        }
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, time: f64) {
        self.current_time = time.clamp(0.0, self.duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_advance_scales_with_rate() {
        let start = Instant::now();
        let mut player = DemoPlayer::new(100.0);
        player.advance(start);
        player.play();
        player.set_rate(2.0);
        player.advance(start + Duration::from_secs(3));
        assert!((player.snapshot().current_time - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_paused_clock_does_not_move() {
        let start = Instant::now();
        let mut player = DemoPlayer::new(100.0);
        player.advance(start);
        player.advance(start + Duration::from_secs(5));
        assert_eq!(player.snapshot().current_time, 0.0);
    }

    #[test]
    fn test_loop_wraps() {
        let start = Instant::now();
        let mut player = DemoPlayer::new(100.0);
        player.set_loop_range(Some((2.0, 4.0)));
        player.advance(start);
        player.play();
        player.seek(3.5);
        player.advance(start + Duration::from_secs(1));
        let t = player.snapshot().current_time;
        assert!((2.0..4.0).contains(&t), "t={t}");
    }

    #[test]
    fn test_stops_at_duration() {
        let start = Instant::now();
        let mut player = DemoPlayer::new(2.0);
        player.advance(start);
        player.play();
        player.advance(start + Duration::from_secs(10));
        let snap = player.snapshot();
        assert_eq!(snap.current_time, 2.0);
        assert!(!snap.is_playing);
    }

    #[test]
    fn test_seek_clamps() {
        let mut player = DemoPlayer::new(10.0);
        player.seek(-5.0);
        assert_eq!(player.snapshot().current_time, 0.0);
        player.seek(50.0);
        assert_eq!(player.snapshot().current_time, 10.0);
    }
}
