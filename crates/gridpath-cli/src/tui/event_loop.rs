use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use super::event::TuiEvent;

/// When the screen is repainted.
#[derive(Debug, Clone, Copy, Default)]
pub enum RenderMode {
    /// After every tick or terminal event.
    #[default]
    OnDirty,
    /// After a tick or terminal event, at most once per interval.
    Throttled(Duration),
}

impl RenderMode {
    /// Throttles to `rate` frames per second. Rates without a representable interval
    /// fall back to [`RenderMode::OnDirty`].
    #[must_use]
    pub fn throttled_from_rate(rate: f64) -> Self {
        interval_from_rate(rate).map_or(Self::OnDirty, Self::Throttled)
    }
}

/// Period of an event happening `rate` times per second.
///
/// `None` for rates that are not positive or whose period overflows a [`Duration`].
pub(super) fn interval_from_rate(rate: f64) -> Option<Duration> {
    if rate > 0.0 {
        Duration::try_from_secs_f64(rate.recip()).ok()
    } else {
        None
    }
}

/// Schedules ticks and renders between terminal events.
///
/// Ticks take precedence over renders, and both over terminal input that is already
/// queued.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    render_mode: RenderMode,
    last_tick: Option<Instant>,
    last_render: Option<Instant>,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self {
            tick_interval: None,
            render_mode: RenderMode::default(),
            last_tick: None,
            last_render: None,
            dirty: true,
        }
    }
}

impl EventLoop {
    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
    }

    pub(super) fn set_render_mode(&mut self, render_mode: RenderMode) {
        self.render_mode = render_mode;
    }

    /// Blocks until the next tick, render or terminal event.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(event) = self.due(now) {
                return Ok(event);
            }
            let deadline = self.tick_at(now).into_iter().chain(self.render_at(now)).min();
            let ready = match deadline {
                Some(at) => event::poll(at.saturating_duration_since(now))?,
                None => true,
            };
            if ready {
                self.dirty = true;
                return Ok(event::read()?.into());
            }
        }
    }

    /// Returns the tick or render that is due at `now`, if any, and records it.
    fn due(&mut self, now: Instant) -> Option<TuiEvent> {
        if self.tick_at(now).is_some_and(|at| at <= now) {
            self.last_tick = Some(now);
            self.dirty = true;
            return Some(TuiEvent::Tick);
        }
        if self.render_at(now).is_some_and(|at| at <= now) {
            self.last_render = Some(now);
            self.dirty = false;
            return Some(TuiEvent::Render);
        }
        None
    }

    fn tick_at(&self, now: Instant) -> Option<Instant> {
        let interval = self.tick_interval?;
        match self.last_tick {
            Some(last) => last.checked_add(interval),
            None => Some(now),
        }
    }

    fn render_at(&self, now: Instant) -> Option<Instant> {
        if !self.dirty {
            return None;
        }
        match (self.render_mode, self.last_render) {
            (RenderMode::Throttled(interval), Some(last)) => last.checked_add(interval),
            _ => Some(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_first_frame_without_ticks() {
        let mut events = EventLoop::default();
        let now = Instant::now();
        assert!(matches!(events.due(now), Some(TuiEvent::Render)));
        assert!(events.due(now).is_none());
        assert!(events.tick_at(now).is_none());
        assert!(events.render_at(now).is_none());
    }

    #[test]
    fn test_render_follows_each_tick() {
        let mut events = EventLoop::default();
        events.set_tick_interval(Some(10 * MS));
        let t0 = Instant::now();
        assert!(matches!(events.due(t0), Some(TuiEvent::Tick)));
        assert!(matches!(events.due(t0), Some(TuiEvent::Render)));
        assert!(events.due(t0 + 5 * MS).is_none());
        assert_eq!(events.tick_at(t0 + 5 * MS), Some(t0 + 10 * MS));
        assert!(matches!(events.due(t0 + 10 * MS), Some(TuiEvent::Tick)));
        assert!(matches!(events.due(t0 + 10 * MS), Some(TuiEvent::Render)));
    }

    #[test]
    fn test_throttled_render_waits_for_interval() {
        let mut events = EventLoop::default();
        events.set_tick_interval(Some(10 * MS));
        events.set_render_mode(RenderMode::Throttled(100 * MS));
        let t0 = Instant::now();
        assert!(matches!(events.due(t0), Some(TuiEvent::Tick)));
        assert!(matches!(events.due(t0), Some(TuiEvent::Render)));

        let t1 = t0 + 10 * MS;
        assert!(matches!(events.due(t1), Some(TuiEvent::Tick)));
        assert!(events.due(t1).is_none());
        assert_eq!(events.render_at(t1), Some(t0 + 100 * MS));

        let t2 = t0 + 100 * MS;
        assert!(matches!(events.due(t2), Some(TuiEvent::Tick)));
        assert!(matches!(events.due(t2), Some(TuiEvent::Render)));
    }

    #[test]
    fn test_interval_from_rate() {
        assert_eq!(interval_from_rate(4.0), Some(Duration::from_millis(250)));
        for rate in [0.0, -1.0, 1e-30, f64::NAN] {
            assert_eq!(interval_from_rate(rate), None, "{rate}");
        }
        assert!(matches!(
            RenderMode::throttled_from_rate(0.0),
            RenderMode::OnDirty
        ));
    }
}
