//! Evolving neural navigators with a genetic algorithm.
//!
//! This crate is the optimizer side of training. Each generation the whole population is
//! turned into [`FeedForwardNetwork`] controllers and handed to the cohort simulation of
//! `gridpath-engine` in a single invocation; the fitness vector that comes back drives
//! selection and reproduction.
//!
//! # Architecture
//!
//! ```text
//! Population (weight vectors)
//!     ↓ one network per individual
//! CohortEvaluator::evaluate (gridpath-engine)
//!     ↓ fitness per controller, cohort order
//! Population::evaluate_fitness (sort best first)
//!     ↓
//! PopulationEvolver::evolve (elites, tournament, BLX-α, Gaussian mutation)
//!     ↓
//! next generation
//! ```
//!
//! # Modules
//!
//! - [`network`] - The feed-forward controller and its flat weight layout
//! - [`genetic`] - Individuals, populations and the evolver
//! - [`weights`] - Weight vector operators used by the evolver
//! - [`stats`] - Descriptive statistics for generation reports
//!
//! # Example
//!
//! ```
//! use gridpath_engine::{CohortEvaluator, NoopObserver, RandomEpisodes, SimulationConfig};
//! use gridpath_training::genetic::{Population, PopulationEvolver};
//! use rand::SeedableRng as _;
//!
//! let config = SimulationConfig::builder()
//!     .grid_size(6)
//!     .population(9)
//!     .episode_cap(20)
//!     .build()
//!     .unwrap();
//! let evaluator = CohortEvaluator::new(config);
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let evolver = PopulationEvolver::default();
//!
//! let mut population = Population::random(4, 9, evolver.max_weight, &mut rng);
//! for generation in 0..3 {
//!     let mut episodes = RandomEpisodes::from_seed(generation);
//!     population.evaluate_fitness(&evaluator, &mut episodes, &mut NoopObserver);
//!     population = evolver.evolve(&population, &mut rng);
//! }
//! assert_eq!(population.individuals().len(), 9);
//! ```

pub mod genetic;
pub mod network;
pub mod stats;
pub mod weights;
