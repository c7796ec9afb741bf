//! Application messages

use gliss_widgets::RollCommand;

/// Messages that can be sent to the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Tick for the playback clock and deferred renders
    Tick,
    /// Interaction command from the roll canvas
    Roll(RollCommand),
    /// Play/pause toggle
    TogglePlayback,
    /// Zoom in on the time axis around the playhead
    ZoomIn,
    /// Zoom out on the time axis around the playhead
    ZoomOut,
    /// Back to zoom 1/1
    ResetView,
    /// Set the loop start to the current time
    SetLoopStart,
    /// Set the loop end to the current time
    SetLoopEnd,
    /// Clear the loop window
    ClearLoop,
    /// The window was resized
    WindowResized(iced::Size),
}
