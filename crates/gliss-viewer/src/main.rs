//! Gliss viewer - scrolling piano-roll MIDI performance visualizer
//!
//! This is the main entry point for the GUI application. It:
//! 1. Loads the viewer configuration
//! 2. Seeds the piano-roll engine with the built-in demo content
//! 3. Launches the iced application with a 60fps playback/render tick

mod clock;
mod config;
mod demo;
mod ui;

use iced::Size;

use ui::{GlissApp, Message};

fn main() -> iced::Result {
    // Initialize logger - set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("gliss-viewer starting up");

    let config_path = config::default_config_path();
    let viewer_config = config::load_config(&config_path);
    let window_size = Size::new(viewer_config.window.width, viewer_config.window.height);

    iced::application(
        move || {
            let app = GlissApp::new(&viewer_config);
            (app, iced::Task::none())
        },
        update,
        view,
    )
    .subscription(subscription)
    .theme(theme)
    .title("Gliss")
    .window_size(window_size)
    .run()
}

/// Update function for iced
fn update(app: &mut GlissApp, message: Message) -> iced::Task<Message> {
    app.update(message)
}

/// View function for iced
fn view(app: &GlissApp) -> iced::Element<'_, Message> {
    app.view()
}

/// Subscription function for iced
fn subscription(app: &GlissApp) -> iced::Subscription<Message> {
    app.subscription()
}

/// Theme function for iced
fn theme(app: &GlissApp) -> iced::Theme {
    app.theme()
}
