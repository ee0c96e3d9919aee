//! Scramble scenarios stored as `start-NNN.txt` label files.

use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use search::{Action, StateSimulator};

use crate::error::ArtifactError;
use crate::labels;

/// Number of scenarios in a standard scramble set.
pub const DEFAULT_SCENARIOS: usize = 100;

/// File name of scenario `index`, e.g. `start-007.txt`.
pub fn scramble_file_name(index: usize) -> String {
    format!("start-{index:03}.txt")
}

/// A directory of numbered scramble files.
#[derive(Debug, Clone)]
pub struct ScrambleSet {
    dir: PathBuf,
    count: usize,
}

impl ScrambleSet {
    /// A set of [`DEFAULT_SCENARIOS`] scrambles under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            count: DEFAULT_SCENARIOS,
        }
    }

    /// Override the number of scenarios.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Path of scenario `index`, rejecting indices outside the set.
    pub fn path(&self, index: usize) -> Result<PathBuf, ArtifactError> {
        if index >= self.count {
            return Err(ArtifactError::InvalidScenario {
                index,
                count: self.count,
            });
        }
        Ok(self.dir.join(scramble_file_name(index)))
    }

    /// Raw labels of scenario `index`.
    pub fn load_labels(&self, index: usize) -> Result<Vec<String>, ArtifactError> {
        let path = self.path(index)?;
        let text = fs::read_to_string(&path).map_err(|e| ArtifactError::io(&path, e))?;
        Ok(labels::split(&text))
    }

    /// Scenario `index` resolved against the simulator's action table.
    pub fn load<S: StateSimulator + ?Sized>(
        &self,
        sim: &S,
        index: usize,
    ) -> Result<Vec<Action>, ArtifactError> {
        let labels = self.load_labels(index)?;
        let actions = labels::to_actions(sim, labels.as_slice())?;
        tracing::debug!(index, len = actions.len(), "Loaded scramble");
        Ok(actions)
    }

    /// Write scenario `index`, creating the directory if needed.
    pub fn write<S: StateSimulator + ?Sized>(
        &self,
        sim: &S,
        index: usize,
        actions: &[Action],
    ) -> Result<PathBuf, ArtifactError> {
        let path = self.path(index)?;
        fs::create_dir_all(&self.dir).map_err(|e| ArtifactError::io(&self.dir, e))?;
        let mut text = sim.format_sequence(actions);
        text.push('\n');
        fs::write(&path, text).map_err(|e| ArtifactError::io(&path, e))?;
        Ok(path)
    }

    /// Fill the whole set with seeded random scrambles of `length` actions.
    pub fn generate<S: StateSimulator + ?Sized>(
        &self,
        sim: &S,
        length: usize,
        seed: u64,
    ) -> Result<Vec<PathBuf>, ArtifactError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let paths = (0..self.count)
            .map(|index| {
                let actions = random_scramble(sim, length, &mut rng);
                self.write(sim, index, &actions)
            })
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!(
            dir = %self.dir.display(),
            count = self.count,
            length,
            seed,
            "Generated scramble set"
        );
        Ok(paths)
    }
}

/// Random action sequence that never follows an action with its inverse.
pub fn random_scramble<S, R>(sim: &S, length: usize, rng: &mut R) -> Vec<Action>
where
    S: StateSimulator + ?Sized,
    R: Rng + ?Sized,
{
    let mut actions: Vec<Action> = Vec::with_capacity(length);
    while actions.len() < length {
        let cancelling = actions.last().map(|&prev| sim.inverse(prev));
        let allowed: Vec<Action> = sim.actions().filter(|&a| Some(a) != cancelling).collect();
        match allowed.choose(rng) {
            Some(&a) => actions.push(a),
            None => break,
        }
    }
    actions
}
