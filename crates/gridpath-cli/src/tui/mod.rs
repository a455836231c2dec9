//! Minimal terminal runtime shared by the interactive views.
//!
//! An [`App`] receives three kinds of calls from [`Runtime::run`]:
//!
//! - `update` on every tick, when a tick rate is set
//! - `handle_event` for key presses, resizes and other terminal events
//! - `draw` when the screen needs repainting

pub use self::{app::App, event_loop::RenderMode, runtime::Runtime};

mod app;
mod event;
mod event_loop;
mod runtime;
