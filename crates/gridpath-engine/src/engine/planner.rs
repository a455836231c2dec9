use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{Episode, Position};

/// Source of the start/goal pair for each episode.
pub trait EpisodePlanner {
    /// Produces the next episode for a `grid_size` × `grid_size` grid.
    fn next_episode(&mut self, grid_size: u16) -> Episode;
}

impl<T> EpisodePlanner for &mut T
where
    T: EpisodePlanner + ?Sized,
{
    fn next_episode(&mut self, grid_size: u16) -> Episode {
        (**self).next_episode(grid_size)
    }
}

/// Uniformly random start and goal cells.
///
/// Draws start `x`, start `y`, goal `x`, goal `y` in that order and redraws the goal until
/// it differs from the start. With a fixed seed the sequence of episodes is reproducible.
#[derive(Debug, Clone)]
pub struct RandomEpisodes {
    rng: Pcg32,
}

impl RandomEpisodes {
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl EpisodePlanner for RandomEpisodes {
    fn next_episode(&mut self, grid_size: u16) -> Episode {
        assert!(grid_size >= 2, "a {grid_size}x{grid_size} grid has no two distinct cells");
        let start = Position::new(
            self.rng.random_range(0..grid_size),
            self.rng.random_range(0..grid_size),
        );
        loop {
            let goal = Position::new(
                self.rng.random_range(0..grid_size),
                self.rng.random_range(0..grid_size),
            );
            if let Ok(episode) = Episode::new(start, goal, grid_size) {
                return episode;
            }
        }
    }
}

/// Replays a fixed list of episodes, cycling back to the first one.
#[derive(Debug, Clone)]
pub struct ScriptedEpisodes {
    episodes: Vec<Episode>,
    next: usize,
}

impl ScriptedEpisodes {
    /// # Panics
    ///
    /// Panics if `episodes` is empty.
    #[must_use]
    pub fn new(episodes: Vec<Episode>) -> Self {
        assert!(!episodes.is_empty(), "scripted planner needs at least one episode");
        Self { episodes, next: 0 }
    }

    /// Repeats a single episode forever.
    #[must_use]
    pub fn repeat(episode: Episode) -> Self {
        Self::new(vec![episode])
    }
}

impl EpisodePlanner for ScriptedEpisodes {
    fn next_episode(&mut self, grid_size: u16) -> Episode {
        let episode = self.episodes[self.next];
        self.next = (self.next + 1) % self.episodes.len();
        assert!(
            episode.fits(grid_size),
            "scripted episode {episode:?} does not fit a {grid_size}x{grid_size} grid"
        );
        episode
    }
}
