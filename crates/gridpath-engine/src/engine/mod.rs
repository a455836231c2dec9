//! Simulation driving.
//!
//! - [`SimulationConfig`] - Validated settings shared by every invocation
//! - [`Controller`] - The `decide` capability the simulation consumes
//! - [`sense`] / [`select_direction`] - Sensor construction and argmin action selection
//! - [`FitnessShaping`] - Survival, step, progress and terminal fitness rules
//! - [`Agent`] - One controller's grid, position, status and running fitness
//! - [`EpisodePlanner`] - Source of start/goal pairs ([`RandomEpisodes`], [`ScriptedEpisodes`])
//! - [`Cohort`] / [`CohortEvaluator`] - The episode/tick state machine over a whole population
//! - [`SolveSession`] - Replaying one controller on one episode

pub use self::{
    agent::*, cohort::*, config::*, controller::*, fitness::*, navigator::*, planner::*,
    solve::*,
};

mod agent;
mod cohort;
mod config;
mod controller;
mod fitness;
mod navigator;
mod planner;
mod solve;
