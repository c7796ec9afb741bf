//! Canvas Program for piano-roll rendering
//!
//! Implements the iced canvas `Program` trait: `update` feeds raw
//! pointer/wheel/touch events through the interaction state machine and
//! publishes the resulting [`RollCommand`]s via a callback closure
//! (idiomatic iced pattern); `draw` renders the frame layers from the
//! engine's read surface.
//!
//! Per-frame layer order: background, overlap bands, time grid, note
//! quads, sustain overlay, loop overlay, gutter, waveform strip, playhead.
//! Note quads come out of the pool already positioned in zoomed content
//! space — the only per-quad work here is adding the pan translation, so
//! a continuous-scroll pan never recomputes geometry.

use std::time::Instant;

use iced::alignment::{Horizontal, Vertical};
use iced::widget::canvas::{self, Event, Frame, Geometry, Path, Program, Stroke, Text};
use iced::{keyboard, mouse, touch, Color, Point, Rectangle, Size, Theme};

use super::engine::PianoRoll;
use super::grid::build_time_grid;
use super::interaction::{Interaction, RollCommand};
use super::overlays::{
    draw_loop_overlay, draw_overlap_bands, draw_sustain_overlay, draw_waveform_strip,
};
use super::scale::WAVEFORM_BAND_HEIGHT;
use crate::theme;

/// Playhead line width
const PLAYHEAD_WIDTH: f32 = 2.0;

/// Grid label font size
const GRID_LABEL_SIZE: f32 = 12.0;

/// Gutter key-label font size
const KEY_LABEL_SIZE: f32 = 11.0;

/// Canvas program for the piano roll
///
/// Takes a callback closure that wraps interaction commands into the
/// host's message type; the host routes them back into
/// [`PianoRoll::apply`].
pub struct RollCanvas<'a, Message, F>
where
    F: Fn(RollCommand) -> Message,
{
    pub roll: &'a PianoRoll,
    pub on_command: F,
}

impl<'a, Message, F> Program<Message> for RollCanvas<'a, Message, F>
where
    Message: Clone,
    F: Fn(RollCommand) -> Message,
{
    type State = Interaction;

    fn update(
        &self,
        interaction: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        let content_left = self.roll.gutter_width();
        let content_right = bounds.width;

        let command = match event {
            Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
                interaction.set_modifiers(*modifiers);
                None
            }
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => cursor
                .position_in(bounds)
                .and_then(|position| interaction.on_button_pressed(position)),
            Event::Mouse(mouse::Event::CursorMoved { .. }) => cursor
                .position_in(bounds)
                .and_then(|position| interaction.on_cursor_moved(position)),
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                // Release anywhere ends the drag, including outside bounds
                interaction.on_button_released()
            }
            Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                cursor.position_in(bounds).and_then(|position| {
                    interaction.on_wheel(
                        *delta,
                        position.x,
                        content_left,
                        content_right,
                        Instant::now(),
                    )
                })
            }
            Event::Touch(touch::Event::FingerPressed { id, position }) => {
                if bounds.contains(*position) {
                    interaction.on_finger_pressed(*id, local_point(*position, bounds));
                }
                None
            }
            Event::Touch(touch::Event::FingerMoved { id, position }) => interaction
                .on_finger_moved(*id, local_point(*position, bounds), content_left, content_right),
            Event::Touch(touch::Event::FingerLifted { id, .. })
            | Event::Touch(touch::Event::FingerLost { id, .. }) => {
                interaction.on_finger_lifted(*id);
                None
            }
            _ => None,
        };

        command.map(|cmd| canvas::Action::publish((self.on_command)(cmd)))
    }

    fn mouse_interaction(
        &self,
        interaction: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if interaction.is_dragging() {
            mouse::Interaction::Grabbing
        } else if cursor.is_over(bounds) {
            mouse::Interaction::Grab
        } else {
            mouse::Interaction::default()
        }
    }

    fn draw(
        &self,
        _interaction: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let width = bounds.width;
        let height = bounds.height;
        let gutter = self.roll.gutter_width();
        let transform = self.roll.transform();

        // Background
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), theme::BACKGROUND_COLOR);

        let band_height = (height - WAVEFORM_BAND_HEIGHT).max(1.0);
        let content = Rectangle {
            x: gutter,
            y: 0.0,
            width: (width - gutter).max(0.0),
            height: band_height,
        };

        // Overlap bands sit behind everything
        draw_overlap_bands(&mut frame, self.roll.overlap_regions(), &transform, content);

        // Time grid with spaced labels
        let grid = build_time_grid(&transform, self.roll.config(), gutter, width);
        for line in &grid {
            let (color, line_width) = if line.major {
                (theme::GRID_MAJOR_COLOR, 1.0)
            } else {
                (theme::GRID_MINOR_COLOR, 1.0)
            };
            frame.stroke(
                &Path::line(Point::new(line.x, 0.0), Point::new(line.x, band_height)),
                Stroke::default().with_color(color).with_width(line_width),
            );
            if let Some(label) = &line.label {
                frame.fill_text(Text {
                    content: label.clone(),
                    position: Point::new(line.x + 3.0, 2.0),
                    size: GRID_LABEL_SIZE.into(),
                    color: theme::GRID_LABEL_COLOR,
                    align_x: Horizontal::Left.into(),
                    align_y: Vertical::Top.into(),
                    ..Text::default()
                });
            }
        }

        // Note quads: pooled geometry plus the pan translation, nothing else
        let viewport = self.roll.viewport();
        let pan_x = viewport.pan_x + gutter;
        let pan_y = viewport.pan_y;
        for quad in self.roll.quads() {
            let x = quad.x + pan_x;
            let y = quad.y + pan_y;
            if x + quad.width < gutter || x > width || y + quad.height < 0.0 || y > band_height {
                continue;
            }
            frame.fill_rectangle(
                Point::new(x, y),
                Size::new(quad.width, quad.height),
                quad.color,
            );
        }

        draw_sustain_overlay(&mut frame, self.roll.sustain_segments(), &transform, content);
        draw_loop_overlay(&mut frame, self.roll.loop_window(), &transform, content);

        // Gutter covers anything scrolled under it, then gets its key labels
        if gutter > 0.0 {
            frame.fill_rectangle(
                Point::ORIGIN,
                Size::new(gutter, height),
                theme::GUTTER_COLOR,
            );
            draw_key_labels(&mut frame, self.roll, gutter, band_height);
        }

        // Waveform strip along the bottom, sampler permitting
        if let Some(sampler) = self.roll.waveform_sampler() {
            let strip = Rectangle {
                x: gutter,
                y: band_height,
                width: (width - gutter).max(0.0),
                height: WAVEFORM_BAND_HEIGHT,
            };
            draw_waveform_strip(&mut frame, sampler, &transform, strip);
        }

        // Playhead: fixed pixel position, every frame, on top
        let playhead_x = self.roll.playhead_x();
        frame.stroke(
            &Path::line(Point::new(playhead_x, 0.0), Point::new(playhead_x, height)),
            Stroke::default()
                .with_color(theme::PLAYHEAD_COLOR)
                .with_width(PLAYHEAD_WIDTH),
        );

        vec![frame.into_geometry()]
    }
}

/// Octave labels (C2, C3, ...) down the key gutter
fn draw_key_labels(frame: &mut Frame, roll: &PianoRoll, gutter: f32, band_height: f32) {
    let transform = roll.transform();
    let row_height = transform.row_height();
    // At very small rows the labels would overlap; C labels only
    for pitch in (0..=127).filter(|p| p % 12 == 0) {
        let y = transform.pitch_to_pixel(pitch) + row_height / 2.0;
        if y < 0.0 || y > band_height {
            continue;
        }
        frame.fill_text(Text {
            content: format!("C{}", pitch / 12 - 1),
            position: Point::new(gutter - 6.0, y),
            size: KEY_LABEL_SIZE.into(),
            color: theme::GRID_LABEL_COLOR,
            align_x: Horizontal::Right.into(),
            align_y: Vertical::Center.into(),
            ..Text::default()
        });
        // Faint row separator at each octave
        frame.stroke(
            &Path::line(Point::new(0.0, y), Point::new(gutter - 26.0, y)),
            Stroke::default()
                .with_color(Color::from_rgba(0.4, 0.4, 0.45, 0.25))
                .with_width(1.0),
        );
    }
}

fn local_point(position: Point, bounds: Rectangle) -> Point {
    Point::new(position.x - bounds.x, position.y - bounds.y)
}
