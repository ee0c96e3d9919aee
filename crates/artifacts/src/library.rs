//! Learned macro libraries persisted as JSON.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use search::{Action, Macro, MacroSet, StateSimulator};

use crate::error::ArtifactError;
use crate::json::{read_json, write_json};
use crate::labels;

/// One stored macro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroEntry {
    /// Action labels in application order.
    pub actions: Vec<String>,
    /// State change relative to the base state it was learned from.
    pub net_effect: u32,
    /// Number of actions.
    pub length: usize,
}

/// Macros learned from one base state, in extraction order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroLibrary {
    /// Scramble index the base state came from, if any.
    #[serde(default)]
    pub source_index: Option<usize>,
    /// Labels of the base state's action sequence.
    #[serde(default)]
    pub base: Vec<String>,
    pub macros: Vec<MacroEntry>,
}

impl MacroLibrary {
    /// Label a learned macro set with the simulator's action table.
    pub fn from_macros<S: StateSimulator + ?Sized>(
        sim: &S,
        source_index: Option<usize>,
        base: &[Action],
        macros: &MacroSet,
    ) -> Self {
        let macros = macros
            .iter()
            .map(|m| MacroEntry {
                actions: labels::to_labels(sim, &m.actions),
                net_effect: m.net_effect,
                length: m.len(),
            })
            .collect();
        Self {
            source_index,
            base: labels::to_labels(sim, base),
            macros,
        }
    }

    /// Resolve the stored labels into a macro set.
    pub fn to_macro_set<S: StateSimulator + ?Sized>(
        &self,
        sim: &S,
    ) -> Result<MacroSet, ArtifactError> {
        let mut set = MacroSet::new();
        for entry in &self.macros {
            let actions = labels::to_actions(sim, entry.actions.as_slice())?;
            set.push(Macro::new(actions, entry.net_effect));
        }
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    /// Drop later entries whose label sequence repeats an earlier one.
    /// Returns the number removed.
    pub fn dedup(&mut self) -> usize {
        let before = self.macros.len();
        let mut seen: HashSet<Vec<String>> = HashSet::new();
        self.macros.retain(|entry| seen.insert(entry.actions.clone()));
        before - self.macros.len()
    }

    /// Write the library as JSON with duplicate macros removed.
    pub fn save(&self, path: &Path) -> Result<(), ArtifactError> {
        let mut unique = self.clone();
        let dropped = unique.dedup();
        if dropped > 0 {
            tracing::warn!(dropped, "Dropped duplicate macros before saving");
        }
        write_json(path, &unique)?;
        tracing::info!(path = %path.display(), macros = unique.len(), "Saved macro library");
        Ok(())
    }

    /// Read a library written by [`save`](MacroLibrary::save).
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let library: Self = read_json(path)?;
        tracing::debug!(path = %path.display(), macros = library.len(), "Loaded macro library");
        Ok(library)
    }
}
