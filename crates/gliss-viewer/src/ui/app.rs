//! Main iced application for the Gliss viewer
//!
//! Wires the piano-roll engine to the demo playback clock:
//! - The tick advances the clock and pushes `set_time` into the engine
//! - Canvas interaction commands route through `PianoRoll::apply`
//! - The engine's time-change subscription feeds seeks back to the clock,
//!   closing the scrub-to-playback loop
//! - The frame scheduler gates geometry rebuilds; deferred renders drain
//!   on the next tick

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use iced::widget::{button, column, container, row, text, Space};
use iced::{time, Element, Fill, Length, Subscription, Task, Theme};

use gliss_core::PlaybackControl;
use gliss_widgets::{piano_roll, PianoRoll};

use crate::clock::DemoPlayer;
use crate::config::ViewerConfig;
use crate::demo;
use super::message::Message;

/// Height of the transport row above the roll canvas
const TRANSPORT_HEIGHT: f32 = 48.0;

/// Zoom step for the transport buttons
const BUTTON_ZOOM_STEP: f32 = 1.25;

/// Application state
pub struct GlissApp {
    /// The piano-roll engine (sole owner of viewport state)
    roll: PianoRoll,
    /// Demo playback clock standing in for a real audio engine
    player: DemoPlayer,
    /// Seek committed by user scrubbing, drained on the next tick
    seek_request: Rc<RefCell<Option<f64>>>,
    /// Loop endpoints as the user set them (engine normalizes its copy)
    loop_start: Option<f64>,
    loop_end: Option<f64>,
}

impl GlissApp {
    /// Create the application, seeding the engine with the demo content
    pub fn new(config: &ViewerConfig) -> Self {
        let mut roll = PianoRoll::with_config(
            config.window.width,
            (config.window.height - TRANSPORT_HEIGHT).max(1.0),
            config.display.gutter,
            config.display.roll_config(),
        );
        roll.set_files(demo::demo_files());
        roll.set_notes(demo::demo_notes());
        roll.set_control_changes(demo::demo_control_changes());
        roll.set_overlap_regions(demo::demo_overlaps());
        roll.set_waveform_sampler(Some(Box::new(demo::DemoSampler)));
        roll.prepare_frame();

        // Scrub commits land here; the tick forwards them to the clock
        let seek_request: Rc<RefCell<Option<f64>>> = Rc::new(RefCell::new(None));
        let sink = seek_request.clone();
        roll.on_time_change(move |t| {
            *sink.borrow_mut() = Some(t);
        });

        Self {
            roll,
            player: DemoPlayer::new(demo::DEMO_DURATION),
            seek_request,
            loop_start: None,
            loop_end: None,
        }
    }

    /// Update application state
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => {
                let now = Instant::now();
                self.player.advance(now);

                // Forward a committed scrub before reading the clock back
                if let Some(t) = self.seek_request.borrow_mut().take() {
                    self.player.seek(t);
                    log::debug!("scrub committed: seek to {t:.3}s");
                }
                self.roll.set_time(self.player.snapshot().current_time);

                // Trailing render first, fresh budget second
                if self.roll.poll_render(now) || self.roll.request_render(now) {
                    self.roll.prepare_frame();
                }
                Task::none()
            }

            Message::Roll(command) => {
                self.roll.apply(command);
                self.schedule_redraw();
                Task::none()
            }

            Message::TogglePlayback => {
                self.player.toggle();
                Task::none()
            }

            Message::ZoomIn => {
                self.roll.zoom_x(BUTTON_ZOOM_STEP, None);
                self.schedule_redraw();
                Task::none()
            }

            Message::ZoomOut => {
                self.roll.zoom_x(1.0 / BUTTON_ZOOM_STEP, None);
                self.schedule_redraw();
                Task::none()
            }

            Message::ResetView => {
                self.roll.reset_view();
                self.schedule_redraw();
                Task::none()
            }

            Message::SetLoopStart => {
                self.loop_start = Some(self.player.snapshot().current_time);
                self.apply_loop();
                Task::none()
            }

            Message::SetLoopEnd => {
                self.loop_end = Some(self.player.snapshot().current_time);
                self.apply_loop();
                Task::none()
            }

            Message::ClearLoop => {
                self.loop_start = None;
                self.loop_end = None;
                self.apply_loop();
                Task::none()
            }

            Message::WindowResized(size) => {
                self.roll
                    .resize(size.width, Some((size.height - TRANSPORT_HEIGHT).max(1.0)));
                self.schedule_redraw();
                Task::none()
            }
        }
    }

    /// Build the view
    pub fn view(&self) -> Element<'_, Message> {
        let snapshot = self.player.snapshot();
        let play_label = if snapshot.is_playing { "Pause" } else { "Play" };

        let transport = row![
            button(text(play_label)).on_press(Message::TogglePlayback),
            text(format!(
                "{} / {}",
                format_clock(snapshot.current_time),
                format_clock(snapshot.duration)
            )),
            Space::with_width(Fill),
            button(text("A")).on_press(Message::SetLoopStart),
            button(text("B")).on_press(Message::SetLoopEnd),
            button(text("Clear")).on_press(Message::ClearLoop),
            Space::with_width(16),
            button(text("-")).on_press(Message::ZoomOut),
            button(text("+")).on_press(Message::ZoomIn),
            button(text("Reset")).on_press(Message::ResetView),
        ]
        .spacing(8)
        .padding(8)
        .height(Length::Fixed(TRANSPORT_HEIGHT));

        let roll_view = container(piano_roll(&self.roll, Message::Roll))
            .width(Fill)
            .height(Fill);

        column![transport, roll_view].into()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            // ~60fps tick: clock advance, deferred render drain
            time::every(Duration::from_millis(16)).map(|_| Message::Tick),
            iced::event::listen_with(|event, _status, _window| match event {
                iced::Event::Window(iced::window::Event::Resized(size)) => {
                    Some(Message::WindowResized(size))
                }
                _ => None,
            }),
        ])
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// Push the user-set loop into the engine and the clock
    ///
    /// The engine normalizes reversed endpoints; the clock reads the
    /// normalized range back so both agree.
    fn apply_loop(&mut self) {
        self.roll.set_loop_window(self.loop_start, self.loop_end);
        self.player.set_loop_range(self.roll.loop_window().range());
    }

    fn schedule_redraw(&mut self) {
        if self.roll.request_render(Instant::now()) {
            self.roll.prepare_frame();
        }
    }
}

/// Format seconds as m:ss for the transport clock
fn format_clock(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock(75.4), "1:15");
    }

    #[test]
    fn test_scrub_commit_reaches_player() {
        let config = ViewerConfig::default();
        let mut app = GlissApp::new(&config);
        // Drag pan then release: the engine commits a seek request
        app.update(Message::Roll(gliss_widgets::RollCommand::BeginPan {
            position: (200.0, 200.0),
        }));
        app.update(Message::Roll(gliss_widgets::RollCommand::PanBy {
            dx: -120.0,
            dy: 0.0,
        }));
        app.update(Message::Roll(gliss_widgets::RollCommand::EndPan { moved: true }));
        assert!(app.seek_request.borrow().is_some());

        // The next tick forwards it to the clock
        app.update(Message::Tick);
        assert!(app.seek_request.borrow().is_none());
        assert!(app.player.snapshot().current_time > 0.0);
    }

    #[test]
    fn test_reversed_loop_buttons_agree_with_engine() {
        let config = ViewerConfig::default();
        let mut app = GlissApp::new(&config);
        app.player.seek(7.0);
        app.update(Message::SetLoopStart);
        app.player.seek(3.0);
        app.update(Message::SetLoopEnd);
        // Engine normalized the reversed pair; the clock uses the same range
        assert_eq!(app.roll.loop_window().range(), Some((3.0, 7.0)));
    }
}
