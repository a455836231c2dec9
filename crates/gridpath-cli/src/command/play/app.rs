use crossterm::event::{Event, KeyCode, KeyEventKind};
use gridpath_engine::{Cell, Direction, Episode, GridState, Position, SolveOutcome, SolveSession};
use gridpath_training::network::FeedForwardNetwork;
use rand::Rng as _;
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    style::{Color, Style},
    text::{Line, Text},
    widgets::Block as BlockWidget,
};

use crate::{
    model::NavigatorModel,
    tui::{App, RenderMode, Runtime},
    ui::widgets::{CellDisplay, GridDisplay, StatusDisplay, style},
};

/// Interactive replay: the user places start and goal, the model walks.
#[derive(Debug)]
pub(super) struct PlayApp {
    model: NavigatorModel,
    speed: f64,
    cursor: Position,
    start: Option<Position>,
    goal: Option<Position>,
    session: Option<SolveSession<FeedForwardNetwork>>,
    running: bool,
    message: Option<String>,
    is_exiting: bool,
}

impl PlayApp {
    pub(super) fn new(model: NavigatorModel, speed: f64) -> Self {
        Self {
            model,
            speed,
            cursor: Position::default(),
            start: None,
            goal: None,
            session: None,
            running: false,
            message: None,
            is_exiting: false,
        }
    }

    fn grid_size(&self) -> u16 {
        self.model.config.grid_size()
    }

    fn move_cursor(&mut self, direction: Direction) {
        if let Some(next) = self.cursor.neighbor(direction, self.grid_size()) {
            self.cursor = next;
        }
    }

    /// Drops the running session and returns to placing markers.
    fn reset(&mut self) {
        self.session = None;
        self.running = false;
        self.message = None;
    }

    fn place_start(&mut self) {
        self.reset();
        if self.goal == Some(self.cursor) {
            self.goal = None;
        }
        self.start = Some(self.cursor);
    }

    fn place_goal(&mut self) {
        self.reset();
        if self.start == Some(self.cursor) {
            self.start = None;
        }
        self.goal = Some(self.cursor);
    }

    fn clear_marker(&mut self) {
        self.reset();
        if self.start == Some(self.cursor) {
            self.start = None;
        }
        if self.goal == Some(self.cursor) {
            self.goal = None;
        }
    }

    fn place_random(&mut self) {
        self.reset();
        let size = self.grid_size();
        let mut rng = rand::rng();
        let start = Position::new(rng.random_range(0..size), rng.random_range(0..size));
        let goal = loop {
            let goal = Position::new(rng.random_range(0..size), rng.random_range(0..size));
            if goal != start {
                break goal;
            }
        };
        self.start = Some(start);
        self.goal = Some(goal);
    }

    /// Creates a session from the placed markers if there is none yet.
    fn ensure_session(&mut self) -> bool {
        if self.session.is_some() {
            return true;
        }
        let (Some(start), Some(goal)) = (self.start, self.goal) else {
            self.message = Some("Place both start (s) and goal (g) first".to_owned());
            return false;
        };
        match Episode::new(start, goal, self.grid_size()) {
            Ok(episode) => {
                self.session = Some(SolveSession::new(
                    self.model.network.clone(),
                    episode,
                    self.grid_size(),
                ));
                self.message = None;
                true
            }
            Err(err) => {
                self.message = Some(err.to_string());
                false
            }
        }
    }

    fn toggle_run(&mut self) {
        if self.is_finished() {
            // run the same markers again
            self.session = None;
        }
        if self.ensure_session() {
            self.running = !self.running;
        }
    }

    fn step_once(&mut self) {
        if self.is_finished() {
            return;
        }
        self.running = false;
        if self.ensure_session() {
            self.advance();
        }
    }

    fn advance(&mut self) {
        let Some(session) = &mut self.session else {
            return;
        };
        if let Some(outcome) = session.step() {
            self.running = false;
            self.message = Some(match outcome {
                SolveOutcome::Reached { steps } => format!("Path completed in {steps} steps"),
                SolveOutcome::Failed { steps, reason } => {
                    format!("Failed after {steps} steps: {reason}")
                }
            });
        }
    }

    fn is_finished(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.outcome().is_some())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(Direction::Up),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(Direction::Down),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(Direction::Left),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(Direction::Right),
            KeyCode::Char('s') => self.place_start(),
            KeyCode::Char('g') => self.place_goal(),
            KeyCode::Char('x') | KeyCode::Delete => self.clear_marker(),
            KeyCode::Char('r') => self.place_random(),
            KeyCode::Char(' ') => self.toggle_run(),
            KeyCode::Enter => self.step_once(),
            KeyCode::Esc => self.reset(),
            KeyCode::Char('q') => self.is_exiting = true,
            _ => {}
        }
    }

    fn state_label(&self) -> &'static str {
        match (&self.session, self.running) {
            (None, _) => "Editing",
            (Some(_), true) => "Running",
            (Some(session), false) => match session.outcome() {
                None => "Paused",
                Some(SolveOutcome::Reached { .. }) => "Reached",
                Some(SolveOutcome::Failed { .. }) => "Failed",
            },
        }
    }

    fn status(&self) -> StatusDisplay<'_> {
        let show = |position: Option<Position>| {
            position.map_or_else(|| "-".to_owned(), |p| p.to_string())
        };
        StatusDisplay::new()
            .row("Model", &self.model.name)
            .row("Fitness", format!("{:.3}", self.model.final_fitness))
            .gap()
            .row("Cursor", self.cursor)
            .row("Start", show(self.start))
            .row("Goal", show(self.goal))
            .gap()
            .row("State", self.state_label())
            .row("Steps", self.session.as_ref().map_or(0, SolveSession::steps))
            .block(BlockWidget::bordered().title("Navigator"))
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(Some(self.speed));
        runtime.set_render_mode(RenderMode::OnDirty);
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: Event) {
        if let Some(key) = event.as_key_event()
            && key.kind == KeyEventKind::Press
        {
            self.handle_key(key.code);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let editing_grid;
        let grid = match &self.session {
            Some(session) => GridDisplay::new(session.grid().rows())
                .overlay(session.position(), CellDisplay::AGENT),
            None => {
                editing_grid = GridState::new(self.grid_size());
                let mut grid = GridDisplay::new(editing_grid.rows());
                if let Some(start) = self.start {
                    grid = grid.overlay(start, CellDisplay::from_cell(Cell::Start));
                }
                if let Some(goal) = self.goal {
                    grid = grid.overlay(goal, CellDisplay::from_cell(Cell::Goal));
                }
                grid.overlay(self.cursor, CellDisplay::CURSOR)
            }
        };
        let grid = grid.block(BlockWidget::bordered().title("Grid"));
        let status = self.status();

        let [main_area, message_area, help_area] = Layout::vertical([
            Constraint::Length(grid.height().max(status.height())),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        let [grid_area, status_area] = Layout::horizontal([
            Constraint::Length(grid.width()),
            Constraint::Length(status.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(main_area);

        frame.render_widget(&grid, grid_area);
        frame.render_widget(status, status_area);

        if let Some(message) = &self.message {
            let message_style = match self.session.as_ref().and_then(SolveSession::outcome) {
                Some(SolveOutcome::Reached { .. }) => style::SUCCESS,
                Some(SolveOutcome::Failed { .. }) | None => style::FAILURE,
            };
            frame.render_widget(
                Line::styled(message.as_str(), message_style).centered(),
                message_area,
            );
        }

        let help = if self.session.is_some() {
            "Space (Run/Pause) | Enter (Step) | Esc (Edit) | q (Quit)"
        } else {
            "Arrows (Move) | s (Start) | g (Goal) | x (Clear) | r (Random) | Space (Run) | q (Quit)"
        };
        let help = Text::from(help)
            .style(Style::default().fg(Color::DarkGray))
            .centered();
        frame.render_widget(help, help_area);
    }

    fn update(&mut self, _runtime: &mut Runtime) {
        if self.running {
            self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use gridpath_engine::SimulationConfig;

    use super::*;

    fn app(grid_size: u16) -> PlayApp {
        let model = NavigatorModel {
            name: "test".to_owned(),
            trained_at: Utc::now(),
            final_fitness: 0.0,
            config: SimulationConfig::builder()
                .grid_size(grid_size)
                .build()
                .unwrap(),
            network: FeedForwardNetwork::random(3, 2.0, &mut rand::rng()),
        };
        PlayApp::new(model, 10.0)
    }

    #[test]
    fn test_cursor_stays_on_grid() {
        let mut app = app(3);
        app.handle_key(KeyCode::Up);
        app.handle_key(KeyCode::Left);
        assert_eq!(app.cursor, Position::new(0, 0));
        for _ in 0..5 {
            app.handle_key(KeyCode::Right);
            app.handle_key(KeyCode::Down);
        }
        assert_eq!(app.cursor, Position::new(2, 2));
    }

    #[test]
    fn test_markers_never_share_a_cell() {
        let mut app = app(4);
        app.handle_key(KeyCode::Char('s'));
        app.handle_key(KeyCode::Char('g'));
        assert_eq!(app.start, None);
        assert_eq!(app.goal, Some(Position::new(0, 0)));

        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Char('s'));
        assert_eq!(app.start, Some(Position::new(1, 0)));
        app.handle_key(KeyCode::Char('x'));
        assert_eq!(app.start, None);
        assert_eq!(app.goal, Some(Position::new(0, 0)));
    }

    #[test]
    fn test_run_requires_both_markers() {
        let mut app = app(4);
        app.handle_key(KeyCode::Char('s'));
        app.handle_key(KeyCode::Char(' '));
        assert!(app.session.is_none());
        assert!(!app.running);
        assert!(app.message.is_some());
    }

    #[test]
    fn test_running_session_finishes() {
        let mut app = app(5);
        app.handle_key(KeyCode::Char('r'));
        app.handle_key(KeyCode::Char(' '));
        assert!(app.running);

        let mut runtime = Runtime::new();
        for _ in 0..100 {
            app.update(&mut runtime);
        }
        assert!(!app.running);
        assert!(app.is_finished());
        assert!(matches!(app.state_label(), "Reached" | "Failed"));
        assert!(app.message.is_some());

        app.handle_key(KeyCode::Esc);
        assert!(app.session.is_none());
        assert!(app.start.is_some() && app.goal.is_some());
    }

    #[test]
    fn test_enter_steps_one_move() {
        let mut app = app(5);
        app.handle_key(KeyCode::Char('r'));
        app.handle_key(KeyCode::Enter);
        let session = app.session.as_ref().unwrap();
        assert!(!app.running);
        assert!(session.steps() == 1 || session.outcome().is_some());
    }
}
