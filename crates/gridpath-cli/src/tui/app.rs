use crossterm::event::Event;
use ratatui::Frame;

use super::Runtime;

/// An interactive view driven by [`Runtime::run`].
pub trait App {
    /// Called once before the first event. Use this to set the tick rate and render mode.
    fn init(&mut self, runtime: &mut Runtime);

    fn should_exit(&self) -> bool;

    fn handle_event(&mut self, runtime: &mut Runtime, event: Event);

    fn draw(&self, frame: &mut Frame);

    /// Advances the view state (called on each tick).
    fn update(&mut self, runtime: &mut Runtime);
}
