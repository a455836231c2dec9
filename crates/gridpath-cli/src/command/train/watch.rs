//! Live view of a training run.
//!
//! Training runs on a worker thread. A sampling observer sends cohort snapshots over a
//! bounded channel and drops them when the view is behind, so drawing never slows the
//! simulation down. Quitting the view stops training after the running generation.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, SyncSender, TryRecvError, TrySendError},
    },
    thread,
    time::{Duration, Instant},
};

use crossterm::event::{Event, KeyCode, KeyEventKind};
use gridpath_engine::{CohortObserver, CombinedGrid, TickView};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    style::{Color, Style},
    text::Text,
    widgets::Block as BlockWidget,
};

use super::{GenerationSummary, Trainer};
use crate::{
    tui::{App, RenderMode, Runtime},
    ui::widgets::{GridDisplay, StatusDisplay},
};

const SNAPSHOT_INTERVAL: Duration = Duration::from_millis(50);
const FRAME_RATE: f64 = 30.0;

pub(super) fn run<R>(trainer: Trainer, rng: &mut R) -> anyhow::Result<Trainer>
where
    R: rand::Rng + Send + ?Sized,
{
    let stop = AtomicBool::new(false);
    let generations = trainer.generations();
    let (tx, rx) = mpsc::sync_channel(1);

    thread::scope(|s| {
        let stop = &stop;
        let worker = s.spawn(move || {
            let mut trainer = trainer;
            let mut observer = SnapshotObserver::new(tx.clone());
            while !trainer.is_finished() && !stop.load(Ordering::Relaxed) {
                observer.generation = trainer.generation();
                let summary = trainer.run_generation(rng, &mut observer);
                if tx.send(Message::Generation(summary)).is_err() {
                    break;
                }
            }
            trainer
        });

        let mut app = WatchApp::new(rx, generations);
        let result = Runtime::new().run(&mut app);
        stop.store(true, Ordering::Relaxed);
        // unblocks a worker waiting in `send`
        drop(app);

        let trainer = worker
            .join()
            .map_err(|_| anyhow::anyhow!("training thread panicked"))?;
        result?;
        Ok(trainer)
    })
}

#[derive(Debug)]
struct Snapshot {
    generation: usize,
    episode_number: usize,
    tick: usize,
    active: usize,
    best_fitness: Option<f64>,
    grid: CombinedGrid,
}

#[derive(Debug)]
enum Message {
    Snapshot(Snapshot),
    Generation(GenerationSummary),
}

/// Sends at most one snapshot per [`SNAPSHOT_INTERVAL`], and only if the view has taken
/// the previous one.
#[derive(Debug)]
struct SnapshotObserver {
    tx: SyncSender<Message>,
    generation: usize,
    last_sent: Option<Instant>,
}

impl SnapshotObserver {
    fn new(tx: SyncSender<Message>) -> Self {
        Self {
            tx,
            generation: 0,
            last_sent: None,
        }
    }

    fn offer(&mut self, view: &TickView<'_>) {
        let now = Instant::now();
        if self
            .last_sent
            .is_some_and(|last| now.duration_since(last) < SNAPSHOT_INTERVAL)
        {
            return;
        }
        let Some(grid) = view.combined_grid() else {
            return;
        };
        let snapshot = Snapshot {
            generation: self.generation,
            episode_number: view.episode_number,
            tick: view.tick,
            active: view.active_count(),
            best_fitness: view.best_fitness(),
            grid,
        };
        match self.tx.try_send(Message::Snapshot(snapshot)) {
            Ok(()) => self.last_sent = Some(now),
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => {}
        }
    }
}

impl CohortObserver for SnapshotObserver {
    fn on_episode_start(&mut self, view: &TickView<'_>) {
        self.offer(view);
    }

    fn on_tick(&mut self, view: &TickView<'_>) {
        self.offer(view);
    }
}

#[derive(Debug)]
struct WatchApp {
    rx: mpsc::Receiver<Message>,
    generations: usize,
    snapshot: Option<Snapshot>,
    last_generation: Option<GenerationSummary>,
    finished: bool,
    is_exiting: bool,
}

impl WatchApp {
    fn new(rx: mpsc::Receiver<Message>, generations: usize) -> Self {
        Self {
            rx,
            generations,
            snapshot: None,
            last_generation: None,
            finished: false,
            is_exiting: false,
        }
    }

    fn status(&self) -> StatusDisplay<'_> {
        let mut status = StatusDisplay::new();
        if let Some(snapshot) = &self.snapshot {
            status = status
                .row(
                    "Generation",
                    format!("{}/{}", snapshot.generation + 1, self.generations),
                )
                .row("Episode", snapshot.episode_number)
                .row("Tick", snapshot.tick)
                .row("Active", snapshot.active)
                .row(
                    "Best now",
                    snapshot
                        .best_fitness
                        .map_or_else(|| "-".to_owned(), |f| format!("{f:.2}")),
                );
        }
        if let Some(summary) = &self.last_generation {
            status = status
                .gap()
                .row("Last generation", summary.generation + 1)
                .row("Phase", summary.phase)
                .row("Episodes", summary.episodes)
                .row("Goals", summary.goals_reached);
            if let Some(stats) = &summary.fitness {
                status = status
                    .row("Max fitness", format!("{:.2}", stats.max))
                    .row("Mean fitness", format!("{:.2}", stats.mean));
            }
            status = status.row("Diversity", format!("{:.4}", summary.diversity));
        }
        status.block(BlockWidget::bordered().title("Training"))
    }
}

impl App for WatchApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(Some(FRAME_RATE));
        runtime.set_render_mode(RenderMode::throttled_from_rate(FRAME_RATE));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: Event) {
        if let Some(key) = event.as_key_event()
            && key.kind == KeyEventKind::Press
            && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
        {
            self.is_exiting = true;
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let grid = self.snapshot.as_ref().map(|snapshot| {
            GridDisplay::new(snapshot.grid.rows()).block(BlockWidget::bordered().title("Cohort"))
        });
        let status = self.status();

        let grid_width = grid.as_ref().map_or(0, GridDisplay::width);
        let grid_height = grid.as_ref().map_or(0, GridDisplay::height);
        let [main_area, help_area] = Layout::vertical([
            Constraint::Length(grid_height.max(status.height())),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        let [grid_area, status_area] = Layout::horizontal([
            Constraint::Length(grid_width),
            Constraint::Length(status.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(main_area);

        if let Some(grid) = grid {
            frame.render_widget(grid, grid_area);
        }
        frame.render_widget(status, status_area);

        let help = if self.finished {
            "Training finished | q (Save and quit)"
        } else {
            "q (Stop after this generation and save)"
        };
        let help = Text::from(help)
            .style(Style::default().fg(Color::DarkGray))
            .centered();
        frame.render_widget(help, help_area);
    }

    fn update(&mut self, _runtime: &mut Runtime) {
        loop {
            match self.rx.try_recv() {
                Ok(Message::Snapshot(snapshot)) => self.snapshot = Some(snapshot),
                Ok(Message::Generation(summary)) => self.last_generation = Some(summary),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.finished = true;
                    break;
                }
            }
        }
    }
}
