//! Planning results persisted as JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};
use search::{Action, PlanResult, StateSimulator, Termination};

use crate::error::ArtifactError;
use crate::json::{read_json, write_json};
use crate::labels;

/// A saved plan for one scramble scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRecord {
    /// Scenario the plan starts from.
    pub scramble_index: usize,
    /// Labels of the scramble sequence.
    pub scramble: Vec<String>,
    /// Labels of the planned actions (the scramble excluded).
    pub plan: Vec<String>,
    pub solved: bool,
    pub termination: Termination,
    pub rounds: usize,
    /// Candidates probed during planning.
    pub evaluations: u64,
    /// Goal distance after each round.
    pub distances: Vec<u32>,
    /// `max_distance - distance` after each round.
    #[serde(default)]
    pub progress: Vec<u32>,
    /// Macros available to the planner.
    #[serde(default)]
    pub macros_used: usize,
    #[serde(default)]
    pub wall_time_ms: u64,
}

impl PlanRecord {
    /// Capture a planner result with the simulator's labels.
    pub fn from_result<S: StateSimulator + ?Sized>(
        sim: &S,
        scramble_index: usize,
        scramble: &[Action],
        macros_used: usize,
        result: &PlanResult,
    ) -> Self {
        Self {
            scramble_index,
            scramble: labels::to_labels(sim, scramble),
            plan: labels::to_labels(sim, &result.actions),
            solved: result.solved(),
            termination: result.termination,
            rounds: result.rounds,
            evaluations: result.stats.evaluations,
            distances: result.distances.clone(),
            progress: result.progress(),
            macros_used,
            wall_time_ms: result.stats.wall_time_ms,
        }
    }

    /// Scramble actions resolved against the simulator.
    pub fn scramble_actions<S: StateSimulator + ?Sized>(
        &self,
        sim: &S,
    ) -> Result<Vec<Action>, ArtifactError> {
        labels::to_actions(sim, self.scramble.as_slice())
    }

    /// Planned actions resolved against the simulator.
    pub fn plan_actions<S: StateSimulator + ?Sized>(
        &self,
        sim: &S,
    ) -> Result<Vec<Action>, ArtifactError> {
        labels::to_actions(sim, self.plan.as_slice())
    }

    pub fn save(&self, path: &Path) -> Result<(), ArtifactError> {
        write_json(path, self)?;
        tracing::info!(
            path = %path.display(),
            solved = self.solved,
            steps = self.plan.len(),
            "Saved plan"
        );
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        read_json(path)
    }
}
