use crate::{
    Controller, Direction, Episode, FitnessShaping, GridState, MalformedOutput, MoveResult,
    Position, choose_direction,
};

/// Per-episode status of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant)]
pub enum AgentStatus {
    /// Still moving in the current episode.
    #[default]
    Active,
    /// Reached the goal this episode; re-enters at the next episode.
    Finished,
    /// Made an invalid move or produced malformed output. Sticky for the whole invocation.
    Lost,
}

/// What happened to an agent on one tick.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::IsVariant)]
pub enum TurnOutcome {
    Moved(Position),
    ReachedGoal(Position),
    Blocked(Direction),
    Malformed(MalformedOutput),
}

/// Simulation state of one cohort member.
///
/// The controller is not stored here; the cohort pairs agent `i` with controller `i`.
#[derive(Debug, Clone)]
pub struct Agent {
    grid: GridState,
    episode: Option<Episode>,
    position: Position,
    fitness: f64,
    status: AgentStatus,
    steps: usize,
    goals_reached: usize,
}

impl Agent {
    /// Creates an agent with zero fitness and an empty grid.
    #[must_use]
    pub fn new(grid_size: u16) -> Self {
        Self {
            grid: GridState::new(grid_size),
            episode: None,
            position: Position::default(),
            fitness: 0.0,
            status: AgentStatus::Active,
            steps: 0,
            goals_reached: 0,
        }
    }

    #[must_use]
    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    #[must_use]
    pub fn episode(&self) -> Option<&Episode> {
        self.episode.as_ref()
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Running fitness across the whole invocation.
    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    #[must_use]
    pub fn status(&self) -> AgentStatus {
        self.status
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    #[must_use]
    pub fn is_lost(&self) -> bool {
        self.status.is_lost()
    }

    /// Ticks taken in the current episode.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Episodes in which the agent reached the goal.
    #[must_use]
    pub fn goals_reached(&self) -> usize {
        self.goals_reached
    }

    /// Prepares the agent for `episode` and grants the survival bonus.
    ///
    /// Lost agents are left untouched.
    pub fn begin_episode(&mut self, episode: &Episode, shaping: &FitnessShaping) {
        if self.is_lost() {
            return;
        }
        shaping.reward_survival(&mut self.fitness);
        self.grid.reset(episode);
        self.episode = Some(*episode);
        self.position = episode.start();
        self.status = AgentStatus::Active;
        self.steps = 0;
    }

    /// Runs one tick: step cost, sense, decide, move, then shaping.
    ///
    /// Returns `None` if the agent is not active in an episode.
    pub fn take_turn<C>(&mut self, controller: &C, shaping: &FitnessShaping) -> Option<TurnOutcome>
    where
        C: Controller + ?Sized,
    {
        let episode = self.episode.filter(|_| self.is_active())?;
        let goal = episode.goal();

        self.steps += 1;
        shaping.charge_step(&mut self.fitness);

        let direction = match choose_direction(controller, self.position, goal) {
            Ok(direction) => direction,
            Err(err) => {
                tracing::warn!(
                    %err,
                    position = %self.position,
                    "discarding malformed controller"
                );
                self.lose(shaping);
                return Some(TurnOutcome::Malformed(err));
            }
        };

        match self.grid.try_move(self.position, direction) {
            MoveResult::Blocked => {
                tracing::trace!(
                    position = %self.position,
                    %direction,
                    steps = self.steps,
                    "agent blocked"
                );
                self.lose(shaping);
                Some(TurnOutcome::Blocked(direction))
            }
            MoveResult::Applied(next) => {
                let before = self.position.distance_to(goal);
                let after = next.distance_to(goal);
                shaping.reward_progress(&mut self.fitness, before, after);
                self.position = next;
                if next == goal {
                    shaping.reward_goal(&mut self.fitness);
                    self.status = AgentStatus::Finished;
                    self.goals_reached += 1;
                    Some(TurnOutcome::ReachedGoal(next))
                } else {
                    Some(TurnOutcome::Moved(next))
                }
            }
        }
    }

    /// Marks the agent lost without touching its fitness.
    pub fn mark_lost(&mut self) {
        self.status = AgentStatus::Lost;
    }

    fn lose(&mut self, shaping: &FitnessShaping) {
        shaping.fail(&mut self.fitness);
        self.status = AgentStatus::Lost;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixedDirection, FnController};

    fn episode(start: (u16, u16), goal: (u16, u16), size: u16) -> Episode {
        Episode::new(
            Position::new(start.0, start.1),
            Position::new(goal.0, goal.1),
            size,
        )
        .unwrap()
    }

    #[test]
    fn test_idle_agent_does_not_move() {
        let mut agent = Agent::new(4);
        let shaping = FitnessShaping::default();
        assert_eq!(agent.take_turn(&FixedDirection(Direction::Right), &shaping), None);
        assert_eq!(agent.fitness(), 0.0);
    }

    #[test]
    fn test_reaches_goal_with_reference_fitness() {
        let shaping = FitnessShaping::default();
        let controller = FixedDirection(Direction::Right);
        let mut agent = Agent::new(4);
        agent.begin_episode(&episode((0, 0), (3, 0), 4), &shaping);

        assert_eq!(
            agent.take_turn(&controller, &shaping),
            Some(TurnOutcome::Moved(Position::new(1, 0)))
        );
        assert_eq!(
            agent.take_turn(&controller, &shaping),
            Some(TurnOutcome::Moved(Position::new(2, 0)))
        );
        assert_eq!(
            agent.take_turn(&controller, &shaping),
            Some(TurnOutcome::ReachedGoal(Position::new(3, 0)))
        );
        assert!((agent.fitness() - 15.9).abs() < 1e-9);
        assert_eq!(agent.status(), AgentStatus::Finished);
        assert_eq!(agent.steps(), 3);
        assert_eq!(agent.goals_reached(), 1);

        // Finished agents sit out the rest of the episode.
        assert_eq!(agent.take_turn(&controller, &shaping), None);
    }

    #[test]
    fn test_first_move_blocked_overwrites_fitness() {
        let shaping = FitnessShaping::default();
        let mut agent = Agent::new(4);
        agent.begin_episode(&episode((0, 0), (3, 3), 4), &shaping);
        assert_eq!(agent.fitness(), 5.0);

        let outcome = agent.take_turn(&FixedDirection(Direction::Up), &shaping);
        assert_eq!(outcome, Some(TurnOutcome::Blocked(Direction::Up)));
        assert_eq!(agent.fitness(), -1.0);
        assert!(agent.is_lost());

        // Lost is sticky: later episodes neither reset nor reward it.
        agent.begin_episode(&episode((1, 1), (2, 2), 4), &shaping);
        assert!(agent.is_lost());
        assert_eq!(agent.fitness(), -1.0);
    }

    #[test]
    fn test_moving_away_costs_fitness() {
        let shaping = FitnessShaping::default();
        let mut agent = Agent::new(5);
        agent.begin_episode(&episode((2, 2), (4, 2), 5), &shaping);
        agent.take_turn(&FixedDirection(Direction::Left), &shaping);
        // 5 survival, -0.2 step, -0.5 for one cell away from the goal.
        assert!((agent.fitness() - 4.3).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_output_loses_agent() {
        let shaping = FitnessShaping::default();
        let mut agent = Agent::new(4);
        agent.begin_episode(&episode((1, 1), (3, 3), 4), &shaping);
        let short = FnController(|_: &crate::SensorInputs| vec![0.0, 1.0]);
        let outcome = agent.take_turn(&short, &shaping);
        assert_eq!(
            outcome,
            Some(TurnOutcome::Malformed(MalformedOutput::WrongArity { len: 2 }))
        );
        assert_eq!(agent.fitness(), -1.0);
        assert!(agent.is_lost());
    }

    #[test]
    fn test_mark_lost_keeps_fitness() {
        let shaping = FitnessShaping::default();
        let mut agent = Agent::new(4);
        agent.begin_episode(&episode((0, 0), (3, 3), 4), &shaping);
        agent.mark_lost();
        assert!(agent.is_lost());
        assert_eq!(agent.fitness(), 5.0);
    }
}
