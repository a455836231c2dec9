use chrono::{DateTime, Utc};
use gridpath_engine::SimulationConfig;
use gridpath_training::network::FeedForwardNetwork;
use serde::{Deserialize, Serialize};

/// A trained navigator as stored on disk.
///
/// The simulation settings are stored with the network so that replays use the grid size
/// the network was trained on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigatorModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub final_fitness: f64,
    pub config: SimulationConfig,
    pub network: FeedForwardNetwork,
}
