use std::fmt;

use crate::Direction;

/// Number of sensor inputs a controller receives (one per direction).
pub const SENSOR_COUNT: usize = Direction::LEN;

/// Number of outputs a controller must return (one score per direction).
pub const ACTION_COUNT: usize = Direction::LEN;

/// Distance-gain readings in [`Direction::ALL`] order.
pub type SensorInputs = [f64; SENSOR_COUNT];

/// The decision capability the simulation needs from a controller.
///
/// A controller maps four sensor inputs to four direction scores. The simulation picks the
/// direction with the **smallest** score (see [`select_direction`](crate::select_direction)).
/// Implementations must behave as pure functions of their parameters; the simulation never
/// mutates a controller.
pub trait Controller: Send + Sync {
    fn decide(&self, inputs: &SensorInputs) -> Vec<f64>;
}

impl<T> Controller for &T
where
    T: Controller + ?Sized,
{
    fn decide(&self, inputs: &SensorInputs) -> Vec<f64> {
        (**self).decide(inputs)
    }
}

impl<T> Controller for Box<T>
where
    T: Controller + ?Sized,
{
    fn decide(&self, inputs: &SensorInputs) -> Vec<f64> {
        (**self).decide(inputs)
    }
}

/// Always chooses the same direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDirection(pub Direction);

impl Controller for FixedDirection {
    fn decide(&self, _inputs: &SensorInputs) -> Vec<f64> {
        let mut outputs = vec![1.0; ACTION_COUNT];
        outputs[self.0.index()] = 0.0;
        outputs
    }
}

/// Hand-coded baseline: steps toward the neighbour that brings it closest to the goal.
///
/// It negates the sensor readings so that the largest distance gain becomes the smallest
/// score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GreedyController;

impl Controller for GreedyController {
    fn decide(&self, inputs: &SensorInputs) -> Vec<f64> {
        inputs.iter().map(|v| -v).collect()
    }
}

/// Adapts a closure into a [`Controller`].
pub struct FnController<F>(pub F);

impl<F> fmt::Debug for FnController<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnController").finish_non_exhaustive()
    }
}

impl<F> Controller for FnController<F>
where
    F: Fn(&SensorInputs) -> Vec<f64> + Send + Sync,
{
    fn decide(&self, inputs: &SensorInputs) -> Vec<f64> {
        (self.0)(inputs)
    }
}
