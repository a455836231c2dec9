use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use gridpath_engine::{
    CohortEvaluator, CohortObserver, NoopObserver, RandomEpisodes, SimulationConfig,
};
use gridpath_training::{
    genetic::{Individual, Population, PopulationEvolver},
    stats::DescriptiveStats,
};
use rand::{Rng, SeedableRng as _, rngs::StdRng};

use crate::{model::NavigatorModel, util::Output};

mod watch;

const ELITE_COUNT: usize = 2;
const TOURNAMENT_SIZE: usize = 3;
const MUTATION_RATE: f64 = 0.2;
const BLX_ALPHA: f64 = 0.3;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
enum EvolutionPhase {
    #[default]
    Exploration,
    Transition,
    Convergence,
}

impl EvolutionPhase {
    /// First 30% of the run explores, the last 30% converges.
    fn from_progress(generation: usize, generations: usize) -> Self {
        let percent = generation * 100 / generations.max(1);
        match percent {
            0..30 => Self::Exploration,
            30..70 => Self::Transition,
            _ => Self::Convergence,
        }
    }
}

const fn max_weight_by_phase(phase: EvolutionPhase) -> f64 {
    match phase {
        EvolutionPhase::Exploration => 2.0,
        EvolutionPhase::Transition => 3.0,
        EvolutionPhase::Convergence => 4.0,
    }
}

const fn mutation_sigma_by_phase(phase: EvolutionPhase) -> f64 {
    match phase {
        EvolutionPhase::Exploration => 0.5,
        EvolutionPhase::Transition => 0.25,
        EvolutionPhase::Convergence => 0.1,
    }
}

const fn evolver_by_phase(phase: EvolutionPhase) -> PopulationEvolver {
    PopulationEvolver {
        elite_count: ELITE_COUNT,
        max_weight: max_weight_by_phase(phase),
        tournament_size: TOURNAMENT_SIZE,
        mutation_sigma: mutation_sigma_by_phase(phase),
        blx_alpha: BLX_ALPHA,
        mutation_rate: MUTATION_RATE,
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Side length of every agent's grid
    #[arg(long, default_value_t = 12)]
    grid_size: u16,
    /// Number of networks evaluated together
    #[arg(long, default_value_t = 25)]
    population: usize,
    #[arg(long, default_value_t = 100)]
    generations: usize,
    /// Episode counter value at which a cohort run stops
    #[arg(long, default_value_t = 500)]
    episode_cap: usize,
    /// Hidden units of each network
    #[arg(long, default_value_t = 8)]
    hidden: usize,
    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
    /// Step agents in parallel within a tick
    #[arg(long)]
    parallel: bool,
    /// Show the cohort live while training (population must be a perfect square)
    #[arg(long)]
    watch: bool,
    /// Name stored in the saved model
    #[arg(long, default_value = "navigator")]
    name: String,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    anyhow::ensure!(arg.hidden > 0, "--hidden must be at least 1");
    anyhow::ensure!(arg.generations > 0, "--generations must be at least 1");
    let config = SimulationConfig::builder()
        .grid_size(arg.grid_size)
        .population(arg.population)
        .episode_cap(arg.episode_cap)
        .combined_view(arg.watch)
        .parallel(arg.parallel)
        .build()
        .context("Invalid simulation settings")?;

    let mut rng = match arg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let trainer = Trainer::new(config.clone(), arg.hidden, arg.generations, &mut rng);
    let trainer = if arg.watch {
        watch::run(trainer, &mut rng)?
    } else {
        let mut trainer = trainer;
        while !trainer.is_finished() {
            let summary = trainer.run_generation(&mut rng, &mut NoopObserver);
            print_summary(&summary, trainer.population());
        }
        trainer
    };

    let champion = trainer
        .into_champion()
        .context("Training stopped before the first generation finished")?;
    eprintln!("Training completed.");

    let model = NavigatorModel {
        name: arg.name.clone(),
        trained_at: Utc::now(),
        final_fitness: champion.fitness(),
        config,
        network: champion.network().clone(),
    };
    Output::save_json(&model, arg.output.clone())?;

    eprintln!();
    eprintln!("Model saved successfully");
    if let Some(path) = &arg.output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Name: {}", model.name);
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!("  Final fitness: {:.3}", model.final_fitness);
    eprintln!("  Hidden units: {}", model.network.hidden());

    Ok(())
}

/// What one generation produced, as shown in reports and the watch view.
#[derive(Debug, Clone)]
struct GenerationSummary {
    generation: usize,
    phase: EvolutionPhase,
    episodes: usize,
    goals_reached: usize,
    fitness: Option<DescriptiveStats>,
    diversity: f64,
}

fn print_summary(summary: &GenerationSummary, population: &Population) {
    eprintln!("Generation #{} ({}):", summary.generation, summary.phase);
    eprintln!("  Episodes: {}", summary.episodes);
    eprintln!("  Goals reached: {}", summary.goals_reached);
    eprintln!("  Top individuals:");
    for (i, ind) in population.individuals().iter().take(5).enumerate() {
        eprintln!("  {i:2}: {:.3}", ind.fitness());
    }
    if let Some(stats) = &summary.fitness {
        eprintln!("  Fitness Stats:");
        eprintln!("    Min:    {:.3}", stats.min);
        eprintln!("    Max:    {:.3}", stats.max);
        eprintln!("    Mean:   {:.3}", stats.mean);
        eprintln!("    Median: {:.3}", stats.median);
    }
    eprintln!("  Weight diversity: {:.4}", summary.diversity);
}

/// Generation loop state.
///
/// After a generation is evaluated the population is evolved in place, so between calls it
/// holds the next, mostly unevaluated, generation. The best individual of the latest
/// evaluation is kept aside as the champion.
#[derive(Debug)]
struct Trainer {
    evaluator: CohortEvaluator,
    population: Population,
    champion: Option<Individual>,
    generation: usize,
    generations: usize,
}

impl Trainer {
    fn new<R>(config: SimulationConfig, hidden: usize, generations: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let population = Population::random(
            hidden,
            config.population(),
            max_weight_by_phase(EvolutionPhase::default()),
            rng,
        );
        Self {
            evaluator: CohortEvaluator::new(config),
            population,
            champion: None,
            generation: 0,
            generations,
        }
    }

    fn generation(&self) -> usize {
        self.generation
    }

    fn generations(&self) -> usize {
        self.generations
    }

    fn is_finished(&self) -> bool {
        self.generation >= self.generations
    }

    fn population(&self) -> &Population {
        &self.population
    }

    /// Evaluates the current generation on a fresh episode sequence, then evolves it unless
    /// it was the last one.
    fn run_generation<R, O>(&mut self, rng: &mut R, observer: &mut O) -> GenerationSummary
    where
        R: Rng + ?Sized,
        O: CohortObserver + ?Sized,
    {
        let phase = EvolutionPhase::from_progress(self.generation, self.generations);
        let mut planner = RandomEpisodes::from_seed(rng.random());
        let report = self
            .population
            .evaluate_fitness(&self.evaluator, &mut planner, observer);

        self.champion = self.population.best().cloned();
        let summary = GenerationSummary {
            generation: self.generation,
            phase,
            episodes: report.episodes,
            goals_reached: report.goals_reached.iter().sum(),
            fitness: self.population.fitness_stats(),
            diversity: self.population.weight_diversity(),
        };
        tracing::debug!(
            generation = self.generation,
            %phase,
            episodes = report.episodes,
            "generation evaluated"
        );

        self.generation += 1;
        if !self.is_finished() {
            self.population = evolver_by_phase(phase).evolve(&self.population, rng);
        }
        summary
    }

    fn into_champion(self) -> Option<Individual> {
        self.champion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_schedule() {
        assert_eq!(
            EvolutionPhase::from_progress(0, 100),
            EvolutionPhase::Exploration
        );
        assert_eq!(
            EvolutionPhase::from_progress(29, 100),
            EvolutionPhase::Exploration
        );
        assert_eq!(
            EvolutionPhase::from_progress(30, 100),
            EvolutionPhase::Transition
        );
        assert_eq!(
            EvolutionPhase::from_progress(70, 100),
            EvolutionPhase::Convergence
        );
        assert_eq!(
            EvolutionPhase::from_progress(0, 1),
            EvolutionPhase::Exploration
        );
    }

    #[test]
    fn test_schedule_tightens_mutation() {
        let phases = [
            EvolutionPhase::Exploration,
            EvolutionPhase::Transition,
            EvolutionPhase::Convergence,
        ];
        for pair in phases.windows(2) {
            assert!(mutation_sigma_by_phase(pair[0]) > mutation_sigma_by_phase(pair[1]));
            assert!(max_weight_by_phase(pair[0]) < max_weight_by_phase(pair[1]));
        }
    }

    #[test]
    fn test_trainer_runs_all_generations() {
        let config = SimulationConfig::builder()
            .grid_size(5)
            .population(4)
            .episode_cap(4)
            .build()
            .unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let mut trainer = Trainer::new(config, 2, 3, &mut rng);

        let mut generations = vec![];
        while !trainer.is_finished() {
            let summary = trainer.run_generation(&mut rng, &mut NoopObserver);
            assert!(summary.episodes <= 3);
            generations.push(summary.generation);
        }
        assert_eq!(generations, [0, 1, 2]);

        // last generation is left evaluated and sorted
        let best = trainer.population().best().unwrap().fitness();
        let champion = trainer.into_champion().unwrap();
        assert_eq!(champion.fitness(), best);
    }

    #[test]
    fn test_seeded_training_is_reproducible() {
        let config = SimulationConfig::builder()
            .grid_size(6)
            .population(4)
            .episode_cap(6)
            .build()
            .unwrap();
        let train = || {
            let mut rng = StdRng::seed_from_u64(5);
            let mut trainer = Trainer::new(config.clone(), 3, 2, &mut rng);
            while !trainer.is_finished() {
                trainer.run_generation(&mut rng, &mut NoopObserver);
            }
            trainer.into_champion().unwrap()
        };
        let a = train();
        let b = train();
        assert_eq!(a.fitness(), b.fitness());
        assert_eq!(a.network(), b.network());
    }
}
