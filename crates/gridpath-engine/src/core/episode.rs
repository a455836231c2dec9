use super::Position;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum EpisodeError {
    #[display("{position} lies outside a {grid_size}x{grid_size} grid")]
    OutOfBounds { position: Position, grid_size: u16 },
    #[display("start and goal must be different cells, both are {position}")]
    SameCell { position: Position },
}

/// One start/goal trial shared by every eligible agent.
///
/// Constructed only through [`Episode::new`], so a value of this type always has two
/// distinct in-bounds cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Episode {
    start: Position,
    goal: Position,
}

impl Episode {
    pub fn new(start: Position, goal: Position, grid_size: u16) -> Result<Self, EpisodeError> {
        for position in [start, goal] {
            if !position.is_within(grid_size) {
                return Err(EpisodeError::OutOfBounds {
                    position,
                    grid_size,
                });
            }
        }
        if start == goal {
            return Err(EpisodeError::SameCell { position: start });
        }
        Ok(Self { start, goal })
    }

    #[must_use]
    pub const fn start(&self) -> Position {
        self.start
    }

    #[must_use]
    pub const fn goal(&self) -> Position {
        self.goal
    }

    /// Returns whether both cells fit in a grid of `grid_size`.
    #[must_use]
    pub const fn fits(&self, grid_size: u16) -> bool {
        self.start.is_within(grid_size) && self.goal.is_within(grid_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_distinct_cells() {
        let episode = Episode::new(Position::new(0, 0), Position::new(3, 0), 4).unwrap();
        assert_eq!(episode.start(), Position::new(0, 0));
        assert_eq!(episode.goal(), Position::new(3, 0));
    }

    #[test]
    fn test_new_rejects_same_cell() {
        let p = Position::new(2, 2);
        assert_eq!(
            Episode::new(p, p, 4),
            Err(EpisodeError::SameCell { position: p })
        );
    }

    #[test]
    fn test_new_rejects_out_of_bounds() {
        let err = Episode::new(Position::new(0, 0), Position::new(4, 1), 4).unwrap_err();
        assert!(matches!(err, EpisodeError::OutOfBounds { .. }));
    }
}
