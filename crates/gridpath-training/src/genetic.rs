//! Genetic algorithm over network weights.
//!
//! One generation:
//!
//! 1. **Evaluate** - The whole population runs as one cohort in the simulation
//! 2. **Sort** - Individuals are ordered by fitness, best first
//! 3. **Elites** - The top `elite_count` individuals are copied unchanged
//! 4. **Reproduce** - Tournament selection picks two parents, BLX-α blends them and
//!    Gaussian mutation perturbs the child
//!
//! Unlike a per-individual fitness function, the cohort evaluator scores all individuals
//! on the same sequence of episodes, so one planner seed per generation makes the
//! comparison fair.
//!
//! All randomness comes from the caller's RNG; a seeded RNG and seeded planners give a
//! reproducible run.

use gridpath_engine::{CohortEvaluator, CohortObserver, CohortReport, EpisodePlanner};
use rand::{Rng, seq::IndexedRandom as _};

use crate::{network::FeedForwardNetwork, stats::DescriptiveStats, weights};

/// A candidate network and its last fitness.
#[derive(Debug, Clone)]
pub struct Individual {
    network: FeedForwardNetwork,
    fitness: f64,
}

impl Individual {
    pub fn random<R>(hidden: usize, max_weight: f64, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::new(FeedForwardNetwork::random(hidden, max_weight, rng))
    }

    /// Wraps an existing network. Fitness starts at negative infinity until evaluated.
    #[must_use]
    pub fn new(network: FeedForwardNetwork) -> Self {
        Self {
            network,
            fitness: f64::NEG_INFINITY,
        }
    }

    #[must_use]
    pub fn network(&self) -> &FeedForwardNetwork {
        &self.network
    }

    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }
}

#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    #[must_use]
    pub fn random<R>(hidden: usize, count: usize, max_weight: f64, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let individuals = (0..count)
            .map(|_| Individual::random(hidden, max_weight, rng))
            .collect();
        Self { individuals }
    }

    #[must_use]
    pub fn from_individuals(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    /// Individuals, best first after [`evaluate_fitness`](Self::evaluate_fitness).
    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.first()
    }

    /// Runs the whole population as one cohort and records each fitness.
    ///
    /// Individuals are then sorted by fitness, best first. The sort is stable, so ties keep
    /// cohort order.
    ///
    /// # Panics
    ///
    /// Panics if the population size differs from the evaluator's configured population.
    pub fn evaluate_fitness<P, O>(
        &mut self,
        evaluator: &CohortEvaluator,
        planner: &mut P,
        observer: &mut O,
    ) -> CohortReport
    where
        P: EpisodePlanner + ?Sized,
        O: CohortObserver + ?Sized,
    {
        let controllers = self
            .individuals
            .iter()
            .map(Individual::network)
            .collect::<Vec<_>>();
        let report = evaluator.evaluate(&controllers, planner, observer);

        for (individual, fitness) in self.individuals.iter_mut().zip(&report.fitness) {
            individual.fitness = *fitness;
        }
        self.individuals
            .sort_by(|a, b| b.fitness.total_cmp(&a.fitness));

        tracing::debug!(
            episodes = report.episodes,
            best = self.best().map(Individual::fitness),
            "population evaluated"
        );
        report
    }

    #[must_use]
    pub fn fitness_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.individuals.iter().map(Individual::fitness))
    }

    /// Mean over weight positions of the per-position standard deviation.
    ///
    /// Drops toward zero as the population converges.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn weight_diversity(&self) -> f64 {
        let Some(first) = self.individuals.first() else {
            return 0.0;
        };
        let len = first.network.weights().len();
        let total = (0..len)
            .filter_map(|i| {
                DescriptiveStats::new(self.individuals.iter().map(|ind| ind.network.weights()[i]))
            })
            .map(|stats| stats.std_dev)
            .sum::<f64>();
        total / len as f64
    }
}

/// Evolution parameters for one generation.
#[derive(Debug, Clone)]
pub struct PopulationEvolver {
    /// Top individuals copied unchanged.
    pub elite_count: usize,
    /// Weights are clamped to `[-max_weight, max_weight]`.
    pub max_weight: f64,
    pub tournament_size: usize,
    pub mutation_sigma: f64,
    pub blx_alpha: f64,
    /// Per-weight mutation probability.
    pub mutation_rate: f64,
}

impl Default for PopulationEvolver {
    fn default() -> Self {
        Self {
            elite_count: 2,
            max_weight: 2.0,
            tournament_size: 3,
            mutation_sigma: 0.3,
            blx_alpha: 0.3,
            mutation_rate: 0.2,
        }
    }
}

impl PopulationEvolver {
    /// Builds the next generation from a population sorted best first.
    ///
    /// The result has the same size; only elites carry a fitness over, the rest start
    /// unevaluated.
    ///
    /// # Panics
    ///
    /// Panics if the population is not sorted by fitness or if `tournament_size` is zero.
    #[must_use]
    pub fn evolve<R>(&self, population: &Population, rng: &mut R) -> Population
    where
        R: Rng + ?Sized,
    {
        let individuals = &population.individuals;
        assert!(
            individuals.is_sorted_by(|a, b| a.fitness >= b.fitness),
            "population must be sorted best first"
        );

        let mut next = individuals
            .iter()
            .take(self.elite_count)
            .cloned()
            .collect::<Vec<_>>();

        while next.len() < individuals.len() {
            let p1 = tournament_select(individuals, self.tournament_size, rng);
            let p2 = tournament_select(individuals, self.tournament_size, rng);

            let mut child = weights::blx_alpha(
                p1.network.weights(),
                p2.network.weights(),
                self.blx_alpha,
                self.max_weight,
                rng,
            );
            weights::mutate(
                &mut child,
                self.mutation_sigma,
                self.max_weight,
                self.mutation_rate,
                rng,
            );
            next.push(Individual::new(p1.network.with_weights(child)));
        }

        Population { individuals: next }
    }
}

/// Picks `tournament_size` distinct individuals at random and returns the fittest.
fn tournament_select<'a, R>(
    population: &'a [Individual],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Individual
where
    R: Rng + ?Sized,
{
    assert!(tournament_size > 0);
    population
        .choose_multiple(rng, tournament_size)
        .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
        .expect("tournament draws from a non-empty population")
}
