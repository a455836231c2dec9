use std::fmt;

use super::{Direction, Episode, Position};

/// Tag of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty,
    Start,
    Goal,
    /// Visited by the agent during the current episode.
    Path,
}

impl Cell {
    /// Single-character symbol used by the text renderings.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Start => 'S',
            Cell::Goal => 'G',
            Cell::Path => '*',
        }
    }
}

/// Result of asking the resolver to move one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum MoveResult {
    /// The move happened; carries the new position.
    Applied(Position),
    /// The destination is off the grid or already on the path. Nothing changed.
    Blocked,
}

/// Per-agent occupancy grid.
///
/// Holds exactly one [`Cell::Start`] and one [`Cell::Goal`] after [`reset`](Self::reset).
/// Within an episode a [`Cell::Path`] never turns back into anything else and neither the
/// start nor the goal is ever tagged as path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridState {
    size: u16,
    cells: Vec<Cell>,
}

impl GridState {
    /// Creates an all-empty grid of `size` × `size` cells.
    #[must_use]
    pub fn new(size: u16) -> Self {
        let side = usize::from(size);
        Self {
            size,
            cells: vec![Cell::Empty; side * side],
        }
    }

    /// Creates a grid already prepared for `episode`.
    #[must_use]
    pub fn with_episode(size: u16, episode: &Episode) -> Self {
        let mut grid = Self::new(size);
        grid.reset(episode);
        grid
    }

    #[must_use]
    pub const fn size(&self) -> u16 {
        self.size
    }

    /// Wipes the grid and marks the start and goal of `episode`.
    pub fn reset(&mut self, episode: &Episode) {
        assert!(
            episode.fits(self.size),
            "episode does not fit a {0}x{0} grid",
            self.size
        );
        self.cells.fill(Cell::Empty);
        self.set(episode.start(), Cell::Start);
        self.set(episode.goal(), Cell::Goal);
    }

    /// Returns the tag at `position`, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, position: Position) -> Option<Cell> {
        position
            .is_within(self.size)
            .then(|| self.cells[self.index(position)])
    }

    /// Iterates rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(usize::from(self.size))
    }

    /// Number of cells currently tagged [`Cell::Path`].
    #[must_use]
    pub fn path_len(&self) -> usize {
        self.cells.iter().filter(|c| c.is_path()).count()
    }

    /// Moves one step from `from` in `direction`.
    ///
    /// The move is [`MoveResult::Blocked`] when the destination leaves the grid or is
    /// already tagged [`Cell::Path`]; the grid is left untouched in that case. Otherwise
    /// the destination is tagged as path (the start and goal keep their tags) and the new
    /// position is returned.
    pub fn try_move(&mut self, from: Position, direction: Direction) -> MoveResult {
        let Some(to) = from.neighbor(direction, self.size) else {
            return MoveResult::Blocked;
        };
        let index = self.index(to);
        match self.cells[index] {
            Cell::Path => MoveResult::Blocked,
            Cell::Empty => {
                self.cells[index] = Cell::Path;
                MoveResult::Applied(to)
            }
            Cell::Start | Cell::Goal => MoveResult::Applied(to),
        }
    }

    fn set(&mut self, position: Position, cell: Cell) {
        let index = self.index(position);
        self.cells[index] = cell;
    }

    fn index(&self, position: Position) -> usize {
        usize::from(position.y) * usize::from(self.size) + usize::from(position.x)
    }
}

impl fmt::Display for GridState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
