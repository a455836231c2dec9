//! Simulation core for training grid-navigating controllers.
//!
//! The crate is split the same way the simulation is layered:
//!
//! - [`core`] - Plain data: positions, directions, per-agent grids and the movement rules
//!   that act on them.
//! - [`engine`] - Everything that drives controllers through episodes: the sensor/selection
//!   adapter, fitness shaping, the cohort orchestrator, and single-controller replay.
//!
//! # Data Flow
//!
//! ```text
//! Optimizer (one call per generation)
//!     ↓ controllers
//! CohortEvaluator
//!     ↓ per episode: new start/goal, grids reset
//! Agent::take_turn (per tick, per live agent)
//!     ↓ sensor inputs → Controller::decide → argmin → try_move
//! FitnessShaper
//!     ↓ accumulated fitness
//! CohortReport (one fitness value per controller, cohort order)
//! ```
//!
//! # Example
//!
//! ```
//! use gridpath_engine::{
//!     CohortEvaluator, Controller, NoopObserver, RandomEpisodes, SensorInputs,
//!     SimulationConfig,
//! };
//!
//! /// Always walks up.
//! struct Upward;
//!
//! impl Controller for Upward {
//!     fn decide(&self, _inputs: &SensorInputs) -> Vec<f64> {
//!         vec![0.0, 1.0, 1.0, 1.0]
//!     }
//! }
//!
//! let config = SimulationConfig::builder().population(4).build().unwrap();
//! let evaluator = CohortEvaluator::new(config);
//! let controllers = [Upward, Upward, Upward, Upward];
//! let mut episodes = RandomEpisodes::from_seed(7);
//! let report = evaluator.evaluate(&controllers, &mut episodes, &mut NoopObserver);
//! assert_eq!(report.fitness.len(), 4);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
