//! Loop (A/B) window
//!
//! A user-defined start/end time range used to repeat playback. The window
//! is normalized here, at assignment time: a reversed pair is swapped so
//! downstream rendering can rely on `start <= end` without re-checking.
//! Loop-point controls hand values straight through.

use serde::{Deserialize, Serialize};

/// Optional loop range in seconds
///
/// Either endpoint may be unset; a single endpoint renders as a marker
/// line, a complete pair as a translucent band.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LoopWindow {
    start: Option<f64>,
    end: Option<f64>,
}

impl LoopWindow {
    /// Build a window, swapping reversed endpoints
    ///
    /// `new(Some(7.0), Some(3.0))` yields start=3, end=7. The engine owns
    /// this normalization so every caller gets the same contract.
    pub fn new(start: Option<f64>, end: Option<f64>) -> Self {
        match (start, end) {
            (Some(a), Some(b)) if b < a => Self {
                start: Some(b),
                end: Some(a),
            },
            _ => Self { start, end },
        }
    }

    /// Clear both endpoints
    pub fn clear() -> Self {
        Self::default()
    }

    pub fn start(&self) -> Option<f64> {
        self.start
    }

    pub fn end(&self) -> Option<f64> {
        self.end
    }

    /// Both endpoints set — the band form
    pub fn range(&self) -> Option<(f64, f64)> {
        match (self.start, self.end) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        }
    }

    /// True when neither endpoint is set
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reversed_endpoints_are_swapped() {
        // Spec scenario D, resolved engine-side
        let window = LoopWindow::new(Some(7.0), Some(3.0));
        assert_eq!(window.range(), Some((3.0, 7.0)));
    }

    #[test]
    fn test_ordered_endpoints_untouched() {
        let window = LoopWindow::new(Some(3.0), Some(7.0));
        assert_eq!(window.start(), Some(3.0));
        assert_eq!(window.end(), Some(7.0));
    }

    #[test]
    fn test_single_endpoint_has_no_range() {
        let window = LoopWindow::new(Some(5.0), None);
        assert_eq!(window.range(), None);
        assert_eq!(window.start(), Some(5.0));
        assert!(!window.is_empty());
    }

    #[test]
    fn test_clear() {
        assert!(LoopWindow::clear().is_empty());
    }
}
