//! Piano-roll view function
//!
//! The iced-idiomatic entry point: a plain function taking the engine
//! reference plus a command callback, returning an `Element`.

use iced::widget::Canvas;
use iced::{Element, Length};

use super::canvas::RollCanvas;
use super::engine::PianoRoll;
use super::interaction::RollCommand;

/// Create a piano-roll element
///
/// # Arguments
///
/// * `roll` - The engine owning viewport state and pooled geometry
/// * `on_command` - Callback wrapping interaction commands into the host's
///   message type; the host routes them back into [`PianoRoll::apply`]
///
/// # Example
///
/// ```ignore
/// // In your application's view function:
/// let roll_view = piano_roll(&self.roll, Message::Roll);
///
/// // ...and in update():
/// Message::Roll(command) => {
///     self.roll.apply(command);
/// }
/// ```
pub fn piano_roll<'a, Message>(
    roll: &'a PianoRoll,
    on_command: impl Fn(RollCommand) -> Message + 'a,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    Canvas::new(RollCanvas { roll, on_command })
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
