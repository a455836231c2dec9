//! The episode/tick state machine over a whole cohort.
//!
//! ```text
//! Running
//!   episode head: counter += 1
//!     counter >= cap        -> every agent Lost, Done
//!     survival bonus, draw start/goal, reset every non-lost agent
//!   tick loop: each Active agent takes one turn (cohort order), observer.on_tick
//!     until no agent is Active
//!   all agents Lost         -> Done
//! ```

use rayon::prelude::*;

use crate::{Agent, CombinedGrid, Controller, Episode, EpisodePlanner, SimulationConfig};

/// Receives a read-only view of the cohort while it runs.
///
/// Observers cannot influence the simulation. They are called synchronously, so a slow
/// observer should hand the view off (for example through a bounded channel) instead of
/// doing heavy work inline.
pub trait CohortObserver {
    /// Called once per episode after every eligible agent has been reset.
    fn on_episode_start(&mut self, view: &TickView<'_>) {
        let _ = view;
    }

    /// Called after every tick.
    fn on_tick(&mut self, view: &TickView<'_>);
}

impl<T> CohortObserver for &mut T
where
    T: CohortObserver + ?Sized,
{
    fn on_episode_start(&mut self, view: &TickView<'_>) {
        (**self).on_episode_start(view);
    }

    fn on_tick(&mut self, view: &TickView<'_>) {
        (**self).on_tick(view);
    }
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CohortObserver for NoopObserver {
    fn on_tick(&mut self, _view: &TickView<'_>) {}
}

/// Snapshot of the cohort handed to observers.
#[derive(Debug, Clone, Copy)]
pub struct TickView<'a> {
    /// 1-based number of the running episode.
    pub episode_number: usize,
    /// Ticks taken so far in this episode.
    pub tick: usize,
    pub episode: &'a Episode,
    pub agents: &'a [Agent],
}

impl TickView<'_> {
    /// Tiles all agent grids together, or `None` if the cohort is not square.
    #[must_use]
    pub fn combined_grid(&self) -> Option<CombinedGrid> {
        CombinedGrid::compose(self.agents.iter().map(Agent::grid))
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.agents.iter().filter(|a| a.is_active()).count()
    }

    #[must_use]
    pub fn best_fitness(&self) -> Option<f64> {
        self.agents.iter().map(Agent::fitness).max_by(f64::total_cmp)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum CohortState {
    Running,
    Done,
}

/// Final result of one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortReport {
    /// One value per controller, in cohort order.
    pub fitness: Vec<f64>,
    /// Episodes actually run.
    pub episodes: usize,
    /// Goals reached per controller, in cohort order.
    pub goals_reached: Vec<usize>,
}

/// One invocation in progress: a cohort of agents paired with their controllers.
#[derive(Debug)]
pub struct Cohort<'a, C> {
    config: &'a SimulationConfig,
    controllers: &'a [C],
    agents: Vec<Agent>,
    episode: Option<Episode>,
    episode_counter: usize,
    episodes_run: usize,
    tick: usize,
    state: CohortState,
}

impl<'a, C> Cohort<'a, C>
where
    C: Controller,
{
    /// # Panics
    ///
    /// Panics if the number of controllers differs from the configured population.
    #[must_use]
    pub fn new(config: &'a SimulationConfig, controllers: &'a [C]) -> Self {
        assert_eq!(
            controllers.len(),
            config.population(),
            "cohort needs one controller per agent"
        );
        let agents = (0..controllers.len())
            .map(|_| Agent::new(config.grid_size()))
            .collect();
        Self {
            config,
            controllers,
            agents,
            episode: None,
            episode_counter: 0,
            episodes_run: 0,
            tick: 0,
            state: CohortState::Running,
        }
    }

    #[must_use]
    pub fn state(&self) -> CohortState {
        self.state
    }

    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    #[must_use]
    pub fn episodes_run(&self) -> usize {
        self.episodes_run
    }

    /// View of the current episode, if one has started.
    #[must_use]
    pub fn view(&self) -> Option<TickView<'_>> {
        let episode = self.episode.as_ref()?;
        Some(TickView {
            episode_number: self.episodes_run,
            tick: self.tick,
            episode,
            agents: &self.agents,
        })
    }

    /// Runs the episode head.
    ///
    /// Returns the new episode, or `None` once the invocation is done (every agent lost or
    /// the episode cap reached).
    pub fn begin_episode<P>(&mut self, planner: &mut P) -> Option<Episode>
    where
        P: EpisodePlanner + ?Sized,
    {
        if self.state.is_done() {
            return None;
        }
        if self.agents.iter().all(Agent::is_lost) {
            self.state = CohortState::Done;
            return None;
        }

        self.episode_counter += 1;
        if self.episode_counter >= self.config.episode_cap() {
            tracing::debug!(
                cap = self.config.episode_cap(),
                survivors = self.agents.iter().filter(|a| !a.is_lost()).count(),
                "episode cap reached"
            );
            for agent in &mut self.agents {
                agent.mark_lost();
            }
            self.state = CohortState::Done;
            return None;
        }

        let episode = planner.next_episode(self.config.grid_size());
        let shaping = self.config.shaping();
        for agent in &mut self.agents {
            agent.begin_episode(&episode, shaping);
        }
        self.episode = Some(episode);
        self.episodes_run += 1;
        self.tick = 0;
        Some(episode)
    }

    /// Advances every active agent by one tick.
    ///
    /// Returns whether any agent is still active in the current episode.
    pub fn step(&mut self) -> bool {
        let shaping = self.config.shaping();
        if self.config.parallel() {
            self.agents
                .par_iter_mut()
                .zip(self.controllers.par_iter())
                .for_each(|(agent, controller)| {
                    agent.take_turn(controller, shaping);
                });
        } else {
            for (agent, controller) in self.agents.iter_mut().zip(self.controllers) {
                agent.take_turn(controller, shaping);
            }
        }
        self.tick += 1;
        self.agents.iter().any(Agent::is_active)
    }

    /// Runs one full episode.
    ///
    /// Returns `false` without running anything once the invocation is done.
    pub fn run_episode<P, O>(&mut self, planner: &mut P, observer: &mut O) -> bool
    where
        P: EpisodePlanner + ?Sized,
        O: CohortObserver + ?Sized,
    {
        let Some(episode) = self.begin_episode(planner) else {
            return false;
        };
        if let Some(view) = self.view() {
            observer.on_episode_start(&view);
        }

        loop {
            let running = self.step();
            if let Some(view) = self.view() {
                observer.on_tick(&view);
            }
            if !running {
                break;
            }
        }

        tracing::debug!(
            episode = self.episodes_run,
            start = %episode.start(),
            goal = %episode.goal(),
            ticks = self.tick,
            finished = self.agents.iter().filter(|a| a.status().is_finished()).count(),
            lost = self.agents.iter().filter(|a| a.is_lost()).count(),
            "episode done"
        );
        true
    }

    /// Runs episodes until the invocation is done.
    pub fn run<P, O>(mut self, planner: &mut P, observer: &mut O) -> CohortReport
    where
        P: EpisodePlanner + ?Sized,
        O: CohortObserver + ?Sized,
    {
        while self.run_episode(planner, observer) {}
        self.into_report()
    }

    #[must_use]
    pub fn into_report(self) -> CohortReport {
        CohortReport {
            fitness: self.agents.iter().map(Agent::fitness).collect(),
            episodes: self.episodes_run,
            goals_reached: self.agents.iter().map(Agent::goals_reached).collect(),
        }
    }
}

/// Fitness function handed to the optimizer: one call per generation.
#[derive(Debug, Clone)]
pub struct CohortEvaluator {
    config: SimulationConfig,
}

impl CohortEvaluator {
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Runs one invocation over `controllers` and returns their fitness in the same order.
    ///
    /// # Panics
    ///
    /// Panics if the number of controllers differs from the configured population.
    pub fn evaluate<C, P, O>(
        &self,
        controllers: &[C],
        planner: &mut P,
        observer: &mut O,
    ) -> CohortReport
    where
        C: Controller,
        P: EpisodePlanner + ?Sized,
        O: CohortObserver + ?Sized,
    {
        Cohort::new(&self.config, controllers).run(planner, observer)
    }
}
