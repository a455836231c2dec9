//! Core data structures of the grid world.
//!
//! - [`Position`] / [`Direction`] - Cell coordinates and the four moves between them
//! - [`Episode`] - A validated start/goal pair
//! - [`GridState`] - One agent's occupancy grid and the movement rules applied to it
//! - [`CombinedGrid`] - All grids of a square cohort tiled into one for display
//!
//! Coordinates are `u16` so that every conversion into the `f64` distance math is lossless.

pub use self::{combined::*, episode::*, grid::*, position::*};

mod combined;
mod episode;
mod grid;
mod position;
