use std::io;

use super::{
    App,
    event::TuiEvent,
    event_loop::{self, EventLoop, RenderMode},
};

#[derive(Debug, Default)]
pub struct Runtime {
    events: EventLoop,
}

impl Runtime {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tick rate in ticks per second.
    ///
    /// `None` disables ticks, and so does a rate with no representable period.
    pub fn set_tick_rate(&mut self, rate: Option<f64>) {
        let interval = rate.and_then(event_loop::interval_from_rate);
        if let Some(rate) = rate
            && interval.is_none()
        {
            tracing::warn!(rate, "tick rate out of range, ticks disabled");
        }
        self.events.set_tick_interval(interval);
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.events.set_render_mode(mode);
    }

    /// Takes over the terminal and runs `app` until it asks to exit.
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick => app.update(&mut self),
                    TuiEvent::Render => {
                        terminal.draw(|f| app.draw(f))?;
                    }
                    TuiEvent::Crossterm(event) => app.handle_event(&mut self, event),
                }
            }
            Ok(())
        })
    }
}
