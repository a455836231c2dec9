use crate::{
    Controller, Direction, Episode, GridState, MalformedOutput, MoveResult, Position,
    choose_direction,
};

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display)]
pub enum FailureReason {
    #[display("blocked moving {direction}")]
    Blocked { direction: Direction },
    #[display("malformed controller output: {_0}")]
    MalformedOutput(MalformedOutput),
}

#[derive(Debug, Clone, Copy, PartialEq, derive_more::IsVariant)]
pub enum SolveOutcome {
    Reached { steps: usize },
    Failed { steps: usize, reason: FailureReason },
}

impl SolveOutcome {
    #[must_use]
    pub fn steps(&self) -> usize {
        match self {
            SolveOutcome::Reached { steps } | SolveOutcome::Failed { steps, .. } => *steps,
        }
    }
}

/// Replays a single controller on a single episode.
///
/// Uses the same sensing, selection and movement rules as training. The session can be
/// advanced one step at a time for animation or driven to the end with
/// [`run_to_end`](Self::run_to_end). It always terminates: every applied move either
/// consumes an unvisited cell or re-enters the start cell, which can only happen from a
/// freshly visited neighbour.
#[derive(Debug, Clone)]
pub struct SolveSession<C> {
    controller: C,
    episode: Episode,
    grid: GridState,
    position: Position,
    path: Vec<Position>,
    outcome: Option<SolveOutcome>,
}

impl<C> SolveSession<C>
where
    C: Controller,
{
    /// # Panics
    ///
    /// Panics if `episode` does not fit a `grid_size` grid.
    #[must_use]
    pub fn new(controller: C, episode: Episode, grid_size: u16) -> Self {
        Self {
            controller,
            grid: GridState::with_episode(grid_size, &episode),
            position: episode.start(),
            path: vec![episode.start()],
            episode,
            outcome: None,
        }
    }

    #[must_use]
    pub fn episode(&self) -> &Episode {
        &self.episode
    }

    #[must_use]
    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Visited positions, starting with the start cell.
    #[must_use]
    pub fn path(&self) -> &[Position] {
        &self.path
    }

    #[must_use]
    pub fn steps(&self) -> usize {
        self.path.len() - 1
    }

    #[must_use]
    pub fn outcome(&self) -> Option<SolveOutcome> {
        self.outcome
    }

    /// Takes one step. Returns the outcome once the session has ended.
    pub fn step(&mut self) -> Option<SolveOutcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }

        let goal = self.episode.goal();
        let outcome = match choose_direction(&self.controller, self.position, goal) {
            Err(err) => Some(SolveOutcome::Failed {
                steps: self.steps(),
                reason: FailureReason::MalformedOutput(err),
            }),
            Ok(direction) => match self.grid.try_move(self.position, direction) {
                MoveResult::Blocked => Some(SolveOutcome::Failed {
                    steps: self.steps(),
                    reason: FailureReason::Blocked { direction },
                }),
                MoveResult::Applied(next) => {
                    self.position = next;
                    self.path.push(next);
                    (next == goal).then(|| SolveOutcome::Reached {
                        steps: self.steps(),
                    })
                }
            },
        };
        self.outcome = outcome;
        outcome
    }

    pub fn run_to_end(&mut self) -> SolveOutcome {
        loop {
            if let Some(outcome) = self.step() {
                return outcome;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixedDirection, FnController, GreedyController, SensorInputs};

    fn episode(start: (u16, u16), goal: (u16, u16), size: u16) -> Episode {
        Episode::new(
            Position::new(start.0, start.1),
            Position::new(goal.0, goal.1),
            size,
        )
        .unwrap()
    }

    #[test]
    fn test_greedy_reaches_goal() {
        let mut session = SolveSession::new(GreedyController, episode((0, 0), (4, 3), 6), 6);
        let outcome = session.run_to_end();
        assert_eq!(outcome, SolveOutcome::Reached { steps: 7 });
        assert_eq!(session.position(), Position::new(4, 3));
        assert_eq!(session.path().len(), 8);
        assert_eq!(session.grid().path_len(), 6);
    }

    #[test]
    fn test_blocked_at_edge() {
        let mut session =
            SolveSession::new(FixedDirection(Direction::Left), episode((1, 0), (3, 3), 4), 4);
        assert_eq!(session.step(), None);
        assert_eq!(
            session.step(),
            Some(SolveOutcome::Failed {
                steps: 1,
                reason: FailureReason::Blocked {
                    direction: Direction::Left
                },
            })
        );
        // Finished sessions keep reporting the same outcome.
        assert_eq!(session.step().map(|o| o.steps()), Some(1));
    }

    #[test]
    fn test_start_cell_can_be_reentered_once() {
        // Steps right whenever that gets closer to the goal, left otherwise.
        let shuttle = FnController(|inputs: &SensorInputs| {
            if inputs[Direction::Right.index()] > 0.0 {
                vec![1.0, 1.0, 1.0, 0.0]
            } else {
                vec![1.0, 1.0, 0.0, 1.0]
            }
        });
        let mut session = SolveSession::new(shuttle, episode((1, 0), (1, 2), 4), 4);
        let outcome = session.run_to_end();
        assert_eq!(
            outcome,
            SolveOutcome::Failed {
                steps: 2,
                reason: FailureReason::Blocked {
                    direction: Direction::Left
                },
            }
        );
        assert_eq!(
            session.path(),
            [Position::new(1, 0), Position::new(0, 0), Position::new(1, 0)]
        );
    }

    #[test]
    fn test_malformed_output_fails_session() {
        let broken = FnController(|_: &SensorInputs| vec![f64::NAN; 4]);
        let mut session = SolveSession::new(broken, episode((0, 0), (1, 1), 3), 3);
        let outcome = session.run_to_end();
        assert!(matches!(
            outcome,
            SolveOutcome::Failed {
                steps: 0,
                reason: FailureReason::MalformedOutput(MalformedOutput::NonFinite { index: 0, .. }),
            }
        ));
    }
}
