use std::{fmt, str::FromStr};

/// A cell coordinate on the grid.
///
/// `x` grows to the right and `y` grows downward, so [`Direction::Up`] decreases `y`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Returns whether the position lies inside a `grid_size` × `grid_size` grid.
    #[must_use]
    pub const fn is_within(self, grid_size: u16) -> bool {
        self.x < grid_size && self.y < grid_size
    }

    /// Returns the neighbouring cell in `direction`, or `None` if it leaves the grid.
    #[must_use]
    pub fn neighbor(self, direction: Direction, grid_size: u16) -> Option<Self> {
        let (x, y) = match direction {
            Direction::Up => (Some(self.x), self.y.checked_sub(1)),
            Direction::Down => (Some(self.x), self.y.checked_add(1)),
            Direction::Left => (self.x.checked_sub(1), Some(self.y)),
            Direction::Right => (self.x.checked_add(1), Some(self.y)),
        };
        let next = Self::new(x?, y?);
        next.is_within(grid_size).then_some(next)
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        euclid(self.as_f64(), other.as_f64())
    }

    #[must_use]
    pub fn as_f64(self) -> (f64, f64) {
        (f64::from(self.x), f64::from(self.y))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid position {input:?}: expected `x,y` with non-negative integers")]
pub struct ParsePositionError {
    input: String,
}

impl FromStr for Position {
    type Err = ParsePositionError;

    /// Parses `x,y` (surrounding whitespace allowed).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePositionError {
            input: s.to_owned(),
        };
        let (x, y) = s.split_once(',').ok_or_else(err)?;
        let x = x.trim().parse().map_err(|_| err())?;
        let y = y.trim().parse().map_err(|_| err())?;
        Ok(Self::new(x, y))
    }
}

/// Plain 2D Euclidean distance.
///
/// Takes real coordinates because sensor probes may lie one cell outside the grid.
#[must_use]
pub fn euclid(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

/// One of the four moves an agent can make.
///
/// The discriminant is the action index used by controllers: the `i`-th controller output
/// scores direction `Direction::ALL[i]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Direction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Direction {
    pub const LEN: usize = 4;

    /// All directions in action-index order.
    pub const ALL: [Self; Self::LEN] = [Self::Up, Self::Down, Self::Left, Self::Right];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Coordinate delta `(dx, dy)` of a single step.
    #[must_use]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Applies the step to real coordinates without any bounds check.
    #[must_use]
    pub fn offset(self, (x, y): (f64, f64)) -> (f64, f64) {
        let (dx, dy) = self.delta();
        (x + f64::from(dx), y + f64::from(dy))
    }
}
