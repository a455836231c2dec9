use gridpath_engine::{
    CohortEvaluator, CohortObserver, Controller, Direction, Episode, FixedDirection,
    FnController, GreedyController, NoopObserver, Position, RandomEpisodes, ScriptedEpisodes,
    SensorInputs, SimulationConfig, TickView,
};

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn single_agent(grid_size: u16, cap: usize) -> CohortEvaluator {
    CohortEvaluator::new(
        SimulationConfig::builder()
            .grid_size(grid_size)
            .population(1)
            .episode_cap(cap)
            .build()
            .unwrap(),
    )
}

fn scripted(start: (u16, u16), goal: (u16, u16), grid_size: u16) -> ScriptedEpisodes {
    ScriptedEpisodes::repeat(
        Episode::new(
            Position::new(start.0, start.1),
            Position::new(goal.0, goal.1),
            grid_size,
        )
        .unwrap(),
    )
}

#[test]
fn test_reference_trace_straight_to_goal() {
    // Cap 2 leaves room for exactly one episode.
    let evaluator = single_agent(4, 2);
    let report = evaluator.evaluate(
        &[FixedDirection(Direction::Right)],
        &mut scripted((0, 0), (3, 0), 4),
        &mut NoopObserver,
    );
    assert_eq!(report.episodes, 1);
    assert!(approx_eq(report.fitness[0], 15.9), "{}", report.fitness[0]);
    assert_eq!(report.goals_reached, vec![1]);
}

#[test]
fn test_off_grid_first_move_ends_after_one_episode() {
    let evaluator = single_agent(4, 500);
    let report = evaluator.evaluate(
        &[FixedDirection(Direction::Up)],
        &mut scripted((0, 0), (2, 2), 4),
        &mut NoopObserver,
    );
    assert_eq!(report.episodes, 1);
    assert_eq!(report.fitness, vec![-1.0]);
}

#[test]
fn test_fitness_accumulates_until_cap() {
    let evaluator = single_agent(4, 5);
    let report = evaluator.evaluate(
        &[FixedDirection(Direction::Right)],
        &mut scripted((0, 0), (1, 0), 4),
        &mut NoopObserver,
    );
    // Counter values 1..=4 run, the fifth episode head hits the cap.
    assert_eq!(report.episodes, 4);
    assert!(approx_eq(report.fitness[0], 4.0 * 15.3), "{}", report.fitness[0]);
    assert_eq!(report.goals_reached, vec![4]);
}

#[test]
fn test_blocked_agent_does_not_stop_others() {
    let config = SimulationConfig::builder()
        .grid_size(4)
        .population(2)
        .episode_cap(2)
        .build()
        .unwrap();
    let controllers = [
        FixedDirection(Direction::Up),
        FixedDirection(Direction::Right),
    ];
    let report = CohortEvaluator::new(config).evaluate(
        &controllers,
        &mut scripted((0, 0), (3, 0), 4),
        &mut NoopObserver,
    );
    assert_eq!(report.fitness[0], -1.0);
    assert!(approx_eq(report.fitness[1], 15.9));
}

#[test]
fn test_malformed_controllers_are_isolated() {
    let config = SimulationConfig::builder()
        .grid_size(6)
        .population(3)
        .episode_cap(20)
        .build()
        .unwrap();
    let controllers: Vec<Box<dyn Controller>> = vec![
        Box::new(GreedyController),
        Box::new(FnController(|_: &SensorInputs| vec![f64::NAN; 4])),
        Box::new(FnController(|_: &SensorInputs| vec![0.0; 3])),
    ];
    let report = CohortEvaluator::new(config).evaluate(
        &controllers,
        &mut RandomEpisodes::from_seed(3),
        &mut NoopObserver,
    );
    assert_eq!(report.episodes, 19);
    assert!(report.fitness[0] > 0.0);
    assert_eq!(report.goals_reached[0], 19);
    assert_eq!(report.fitness[1], -1.0);
    assert_eq!(report.fitness[2], -1.0);
}

fn mixed_cohort() -> Vec<Box<dyn Controller>> {
    let mut controllers: Vec<Box<dyn Controller>> = Vec::new();
    for i in 0..9 {
        if i % 3 == 0 {
            controllers.push(Box::new(GreedyController));
        } else {
            controllers.push(Box::new(FixedDirection(Direction::ALL[i % 4])));
        }
    }
    controllers
}

fn mixed_config(parallel: bool) -> SimulationConfig {
    SimulationConfig::builder()
        .grid_size(8)
        .population(9)
        .episode_cap(40)
        .parallel(parallel)
        .build()
        .unwrap()
}

#[test]
fn test_seeded_runs_are_bit_identical() {
    let controllers = mixed_cohort();
    let evaluator = CohortEvaluator::new(mixed_config(false));
    let a = evaluator.evaluate(
        &controllers,
        &mut RandomEpisodes::from_seed(11),
        &mut NoopObserver,
    );
    let b = evaluator.evaluate(
        &controllers,
        &mut RandomEpisodes::from_seed(11),
        &mut NoopObserver,
    );
    let bits = |fitness: &[f64]| fitness.iter().map(|f| f.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&a.fitness), bits(&b.fitness));
    assert_eq!(a.episodes, b.episodes);
}

#[test]
fn test_parallel_stepping_matches_sequential() {
    let controllers = mixed_cohort();
    let sequential = CohortEvaluator::new(mixed_config(false)).evaluate(
        &controllers,
        &mut RandomEpisodes::from_seed(5),
        &mut NoopObserver,
    );
    let parallel = CohortEvaluator::new(mixed_config(true)).evaluate(
        &controllers,
        &mut RandomEpisodes::from_seed(5),
        &mut NoopObserver,
    );
    assert_eq!(sequential, parallel);
}

#[derive(Default)]
struct Recorder {
    episode_starts: Vec<Episode>,
    ticks_per_episode: Vec<usize>,
    last_combined: Option<String>,
}

impl CohortObserver for Recorder {
    fn on_episode_start(&mut self, view: &TickView<'_>) {
        assert_eq!(view.tick, 0);
        self.episode_starts.push(*view.episode);
        self.ticks_per_episode.push(0);
    }

    fn on_tick(&mut self, view: &TickView<'_>) {
        assert_eq!(view.episode_number, self.episode_starts.len());
        if let Some(ticks) = self.ticks_per_episode.last_mut() {
            *ticks = view.tick;
        }
        self.last_combined = view.combined_grid().map(|grid| grid.to_string());
    }
}

#[test]
fn test_observer_sees_every_episode_and_tick() {
    let config = SimulationConfig::builder()
        .grid_size(4)
        .population(4)
        .episode_cap(3)
        .combined_view(true)
        .build()
        .unwrap();
    let controllers = [FixedDirection(Direction::Right); 4];
    let mut recorder = Recorder::default();
    let report = CohortEvaluator::new(config).evaluate(
        &controllers,
        &mut scripted((0, 0), (3, 0), 4),
        &mut recorder,
    );

    assert_eq!(report.episodes, 2);
    assert_eq!(recorder.episode_starts.len(), 2);
    assert_eq!(recorder.ticks_per_episode, vec![3, 3]);
    let combined = recorder.last_combined.unwrap();
    assert_eq!(combined.lines().count(), 8);
    assert_eq!(combined.lines().next(), Some("S**GS**G"));
}

#[test]
fn test_observer_does_not_change_results() {
    let controllers = mixed_cohort();
    let evaluator = CohortEvaluator::new(mixed_config(false));
    let quiet = evaluator.evaluate(
        &controllers,
        &mut RandomEpisodes::from_seed(8),
        &mut NoopObserver,
    );
    let watched = evaluator.evaluate(
        &controllers,
        &mut RandomEpisodes::from_seed(8),
        &mut Recorder::default(),
    );
    assert_eq!(quiet, watched);
}
