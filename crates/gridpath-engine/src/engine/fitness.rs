use serde::{Deserialize, Serialize};

/// Constants of the per-agent fitness signal.
///
/// Fitness is one running total per agent across the whole invocation:
///
/// ```text
/// episode start        +survival_bonus
/// every tick           -step_cost
/// applied move         +(dist_before - dist_after) * progress_scale
/// goal reached         +goal_bonus
/// blocked / malformed  fitness := failure_fitness   (overwrite, agent is lost)
/// ```
///
/// The defaults are the values the trained models were evolved with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessShaping {
    pub survival_bonus: f64,
    pub step_cost: f64,
    pub progress_scale: f64,
    pub goal_bonus: f64,
    pub failure_fitness: f64,
}

impl Default for FitnessShaping {
    fn default() -> Self {
        Self {
            survival_bonus: 5.0,
            step_cost: 0.2,
            progress_scale: 0.5,
            goal_bonus: 10.0,
            failure_fitness: -1.0,
        }
    }
}

impl FitnessShaping {
    pub fn reward_survival(&self, fitness: &mut f64) {
        *fitness += self.survival_bonus;
    }

    pub fn charge_step(&self, fitness: &mut f64) {
        *fitness -= self.step_cost;
    }

    /// Rewards progress toward the goal; negative when the move went away from it.
    pub fn reward_progress(&self, fitness: &mut f64, distance_before: f64, distance_after: f64) {
        *fitness += (distance_before - distance_after) * self.progress_scale;
    }

    pub fn reward_goal(&self, fitness: &mut f64) {
        *fitness += self.goal_bonus;
    }

    /// Overwrites the total; earlier bonuses are discarded.
    pub fn fail(&self, fitness: &mut f64) {
        *fitness = self.failure_fitness;
    }
}
