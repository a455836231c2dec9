use std::path::PathBuf;

use anyhow::Context as _;
use gridpath_engine::{Episode, EpisodeError, Position, SolveOutcome, SolveSession};
use rand::{Rng, SeedableRng as _, rngs::StdRng};

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SolveArg {
    /// Trained model file
    model: PathBuf,
    /// Start cell as `x,y` (random if omitted)
    #[arg(long)]
    start: Option<Position>,
    /// Goal cell as `x,y` (random if omitted)
    #[arg(long)]
    goal: Option<Position>,
    /// Seed for the random start/goal cells
    #[arg(long)]
    seed: Option<u64>,
}

pub(crate) fn run(arg: &SolveArg) -> anyhow::Result<()> {
    let model = util::read_model_file(&arg.model)?;
    let grid_size = model.config.grid_size();

    let mut rng = match arg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let episode = resolve_episode(arg.start, arg.goal, grid_size, &mut rng)
        .context("Invalid start/goal cells")?;

    let mut session = SolveSession::new(&model.network, episode, grid_size);
    let outcome = session.run_to_end();

    println!("Model: {} (fitness {:.3})", model.name, model.final_fitness);
    println!("Start: {}  Goal: {}", episode.start(), episode.goal());
    println!();
    print!("{}", session.grid());
    println!();
    let path = session
        .path()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    println!("Path: {}", path.join(" -> "));
    match outcome {
        SolveOutcome::Reached { steps } => println!("Path completed in {steps} steps"),
        SolveOutcome::Failed { steps, reason } => {
            println!("Failed to solve after {steps} steps: {reason}");
        }
    }
    Ok(())
}

/// Uses the given cells and draws the missing ones uniformly.
///
/// Random draws are repeated until start and goal differ. Cells given explicitly are
/// validated as-is.
fn resolve_episode<R>(
    start: Option<Position>,
    goal: Option<Position>,
    grid_size: u16,
    rng: &mut R,
) -> Result<Episode, EpisodeError>
where
    R: Rng + ?Sized,
{
    loop {
        let s = start.unwrap_or_else(|| random_position(grid_size, rng));
        let g = goal.unwrap_or_else(|| random_position(grid_size, rng));
        match Episode::new(s, g, grid_size) {
            Err(EpisodeError::SameCell { .. }) if start.is_none() || goal.is_none() => {}
            result => return result,
        }
    }
}

fn random_position<R>(grid_size: u16, rng: &mut R) -> Position
where
    R: Rng + ?Sized,
{
    Position::new(
        rng.random_range(0..grid_size),
        rng.random_range(0..grid_size),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_cells_are_kept() {
        let mut rng = StdRng::seed_from_u64(0);
        let episode = resolve_episode(
            Some(Position::new(1, 2)),
            Some(Position::new(3, 0)),
            4,
            &mut rng,
        )
        .unwrap();
        assert_eq!(episode.start(), Position::new(1, 2));
        assert_eq!(episode.goal(), Position::new(3, 0));
    }

    #[test]
    fn test_explicit_errors_are_reported() {
        let mut rng = StdRng::seed_from_u64(0);
        let same = Position::new(1, 1);
        assert_eq!(
            resolve_episode(Some(same), Some(same), 4, &mut rng),
            Err(EpisodeError::SameCell { position: same })
        );

        let outside = Position::new(9, 0);
        assert!(matches!(
            resolve_episode(Some(outside), None, 4, &mut rng),
            Err(EpisodeError::OutOfBounds { position, grid_size: 4 }) if position == outside
        ));
    }

    #[test]
    fn test_missing_goal_avoids_start() {
        let mut rng = StdRng::seed_from_u64(3);
        let start = Position::new(0, 0);
        // a 2x2 grid makes collisions with the start likely
        for _ in 0..50 {
            let episode = resolve_episode(Some(start), None, 2, &mut rng).unwrap();
            assert_eq!(episode.start(), start);
            assert_ne!(episode.goal(), start);
        }
    }

    #[test]
    fn test_positions_parse_from_cli() {
        let position = "3, 4".parse::<Position>().unwrap();
        assert_eq!(position, Position::new(3, 4));
        assert!("3".parse::<Position>().is_err());
    }
}
