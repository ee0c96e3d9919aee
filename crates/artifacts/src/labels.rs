//! Conversion between action ids and their stored text labels.

use search::{Action, StateSimulator};

use crate::error::ArtifactError;

/// Resolve `labels` against the simulator's action table.
pub fn to_actions<S, L>(sim: &S, labels: &[L]) -> Result<Vec<Action>, ArtifactError>
where
    S: StateSimulator + ?Sized,
    L: AsRef<str>,
{
    labels
        .iter()
        .map(|label| {
            let label = label.as_ref();
            sim.action_by_label(label)
                .ok_or_else(|| ArtifactError::UnknownLabel(label.to_string()))
        })
        .collect()
}

/// Labels of `actions`, in order.
pub fn to_labels<S: StateSimulator + ?Sized>(sim: &S, actions: &[Action]) -> Vec<String> {
    actions
        .iter()
        .map(|&a| sim.action_label(a).to_string())
        .collect()
}

/// Split a whitespace-separated label string.
pub fn split(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}
