//! Piano-roll widgets for the Gliss MIDI performance visualizer
//!
//! This crate provides the viewport/rendering engine: coordinate
//! transforms between musical time/pitch and pixel space, the pan/zoom
//! state machine with anchor-preserving zoom, the dirty-flag-driven
//! incremental render pipeline, and the pointer/wheel/pinch interaction
//! handling that drives it.
//!
//! ## Architecture (iced patterns)
//!
//! - **Engine facade** ([`PianoRoll`]): single owner of viewport state,
//!   scale cache, and pooled note geometry; hosts mutate it only through
//!   its methods
//! - **View function** ([`piano_roll`]): takes the engine reference plus a
//!   command callback, returns an `Element`
//! - **Canvas Program** ([`RollCanvas`]): renders frame layers and folds
//!   raw events into [`RollCommand`]s
//!
//! ## Usage
//!
//! ```ignore
//! // view():
//! piano_roll(&self.roll, Message::Roll)
//!
//! // update():
//! Message::Roll(command) => self.roll.apply(command),
//! Message::Tick => {
//!     self.roll.set_time(self.player.current_time());
//!     if self.roll.poll_render(Instant::now()) || self.roll.request_render(Instant::now()) {
//!         self.roll.prepare_frame();
//!     }
//! }
//! ```

pub mod roll;
pub mod theme;

pub use roll::{
    piano_roll, FrameScheduler, Interaction, NoteColorFn, NotePool, NoteQuad, PianoRoll,
    RollCanvas, RollCommand, RollState, SubscriptionId, Transform, ViewMetrics, Viewport,
};
pub use theme::{file_color, RollConfig, FILE_COLORS};
