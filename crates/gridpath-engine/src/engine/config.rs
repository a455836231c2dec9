use serde::{Deserialize, Serialize};

use crate::{FitnessShaping, exact_sqrt};

pub const DEFAULT_GRID_SIZE: u16 = 12;
pub const DEFAULT_POPULATION: usize = 25;
pub const DEFAULT_EPISODE_CAP: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("grid size must be at least 2, got {grid_size}")]
    GridTooSmall { grid_size: u16 },
    #[display("population must contain at least one agent")]
    EmptyPopulation,
    #[display("episode cap must be at least 1")]
    ZeroEpisodeCap,
    #[display("combined view needs a square population, {population} has no integer square root")]
    NonSquarePopulation { population: usize },
}

/// Unvalidated simulation settings.
///
/// This is the serialized form of [`SimulationConfig`]; call [`build`](Self::build) to
/// validate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfigBuilder {
    pub grid_size: u16,
    pub population: usize,
    pub episode_cap: usize,
    pub combined_view: bool,
    pub parallel: bool,
    pub shaping: FitnessShaping,
}

impl Default for SimulationConfigBuilder {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            population: DEFAULT_POPULATION,
            episode_cap: DEFAULT_EPISODE_CAP,
            combined_view: false,
            parallel: false,
            shaping: FitnessShaping::default(),
        }
    }
}

impl SimulationConfigBuilder {
    #[must_use]
    pub fn grid_size(self, grid_size: u16) -> Self {
        Self { grid_size, ..self }
    }

    #[must_use]
    pub fn population(self, population: usize) -> Self {
        Self { population, ..self }
    }

    #[must_use]
    pub fn episode_cap(self, episode_cap: usize) -> Self {
        Self {
            episode_cap,
            ..self
        }
    }

    #[must_use]
    pub fn combined_view(self, combined_view: bool) -> Self {
        Self {
            combined_view,
            ..self
        }
    }

    #[must_use]
    pub fn parallel(self, parallel: bool) -> Self {
        Self { parallel, ..self }
    }

    #[must_use]
    pub fn shaping(self, shaping: FitnessShaping) -> Self {
        Self { shaping, ..self }
    }

    /// Validates the settings.
    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        if self.grid_size <= 1 {
            return Err(ConfigError::GridTooSmall {
                grid_size: self.grid_size,
            });
        }
        if self.population == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.episode_cap == 0 {
            return Err(ConfigError::ZeroEpisodeCap);
        }
        if self.combined_view && exact_sqrt(self.population).is_none() {
            return Err(ConfigError::NonSquarePopulation {
                population: self.population,
            });
        }
        Ok(SimulationConfig { inner: self })
    }
}

/// Validated settings shared by every invocation of the cohort orchestrator.
///
/// Degenerate settings are rejected here, before any simulation starts. Deserializing goes
/// through the same validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "SimulationConfigBuilder",
    into = "SimulationConfigBuilder"
)]
pub struct SimulationConfig {
    inner: SimulationConfigBuilder,
}

impl TryFrom<SimulationConfigBuilder> for SimulationConfig {
    type Error = ConfigError;

    fn try_from(builder: SimulationConfigBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

impl From<SimulationConfig> for SimulationConfigBuilder {
    fn from(config: SimulationConfig) -> Self {
        config.inner
    }
}

impl SimulationConfig {
    #[must_use]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    #[must_use]
    pub const fn grid_size(&self) -> u16 {
        self.inner.grid_size
    }

    #[must_use]
    pub const fn population(&self) -> usize {
        self.inner.population
    }

    /// Value of the episode counter at which an invocation is cut off.
    #[must_use]
    pub const fn episode_cap(&self) -> usize {
        self.inner.episode_cap
    }

    #[must_use]
    pub const fn combined_view(&self) -> bool {
        self.inner.combined_view
    }

    #[must_use]
    pub const fn parallel(&self) -> bool {
        self.inner.parallel
    }

    #[must_use]
    pub const fn shaping(&self) -> &FitnessShaping {
        &self.inner.shaping
    }
}
