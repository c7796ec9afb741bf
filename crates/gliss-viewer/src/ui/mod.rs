//! Viewer UI: application state, messages, and the transport row

pub mod app;
pub mod message;

pub use app::GlissApp;
pub use message::Message;
