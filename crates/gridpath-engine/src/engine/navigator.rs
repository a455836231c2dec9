//! Sensor construction and action selection around an external controller.
//!
//! Each reading is the distance gain toward the goal that one step in that direction
//! would give:
//!
//! ```text
//! inputs[d] = euclid(position, goal) - euclid(position + delta(d), goal)
//! ```
//!
//! Probes are computed on plain coordinates, so a probe one cell outside the grid is still
//! a valid reading. The controller scores the four directions and the **lowest** score wins;
//! ties go to the lowest index.

use crate::{ACTION_COUNT, Controller, Direction, Position, SensorInputs, euclid};

/// A controller reply the simulation cannot act on.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum MalformedOutput {
    #[display("controller returned {len} outputs, expected {ACTION_COUNT}")]
    WrongArity { len: usize },
    #[display("controller output #{index} is not finite ({value})")]
    NonFinite { index: usize, value: f64 },
}

/// Builds the four distance-gain readings for an agent at `position`.
#[must_use]
pub fn sense(position: Position, goal: Position) -> SensorInputs {
    let here = position.as_f64();
    let goal = goal.as_f64();
    let current = euclid(here, goal);
    Direction::ALL.map(|dir| current - euclid(dir.offset(here), goal))
}

/// Picks the direction whose output is smallest.
///
/// Ties resolve to the first minimal index. Outputs must contain exactly
/// [`ACTION_COUNT`] finite values.
pub fn select_direction(outputs: &[f64]) -> Result<Direction, MalformedOutput> {
    if outputs.len() != ACTION_COUNT {
        return Err(MalformedOutput::WrongArity { len: outputs.len() });
    }
    if let Some((index, &value)) = outputs.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(MalformedOutput::NonFinite { index, value });
    }

    let mut best = 0;
    for (i, value) in outputs.iter().enumerate().skip(1) {
        if *value < outputs[best] {
            best = i;
        }
    }
    Ok(Direction::ALL[best])
}

/// Senses, asks `controller`, and selects a direction.
pub fn choose_direction<C>(
    controller: &C,
    position: Position,
    goal: Position,
) -> Result<Direction, MalformedOutput>
where
    C: Controller + ?Sized,
{
    let inputs = sense(position, goal);
    let outputs = controller.decide(&inputs);
    select_direction(&outputs)
}
