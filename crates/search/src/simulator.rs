//! Capability interface the search core drives, plus its error type.

use std::fmt;
use std::ops::Range;

/// Identifier of a primitive action within a simulator's fixed action table.
pub type Action = usize;

/// Errors that can occur during macro learning or planning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The simulator exposes an empty action table.
    #[error("simulator has no primitive actions")]
    NoActions,
    /// The learning fringe ran dry before the budget was spent.
    #[error("fringe exhausted after {expansions} expansions")]
    FringeExhausted { expansions: u64 },
    /// Undoing a probe did not restore the state it started from.
    #[error("undoing {actions:?} did not restore the prior state")]
    Irreversible { actions: Vec<Action> },
    /// A label that is not in the simulator's action table.
    #[error("unknown action label '{0}'")]
    UnknownAction(String),
}

/// Canonical, fixed-width byte encoding of a simulator state.
///
/// Two states are identical for deduplication exactly when their keys are
/// equal. Keys are derived from the raw state representation, never from
/// object identity.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey(Box<[u8]>);

impl StateKey {
    /// Wrap raw state bytes.
    pub fn new(bytes: impl Into<Box<[u8]>>) -> Self {
        Self(bytes.into())
    }

    /// Raw state bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&[u8]> for StateKey {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.into())
    }
}

impl fmt::Debug for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateKey(")?;
        for b in self.0.iter() {
            write!(f, "{b:02x}")?;
        }
        write!(f, ")")
    }
}

/// Result of applying one primitive action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Canonical key of the state reached.
    pub state: StateKey,
    /// Whether the reached state is the goal.
    pub solved: bool,
}

/// A deterministic, reversible environment the search engine can drive.
///
/// The engine applies actions experimentally and rolls them back through
/// [`inverse`](StateSimulator::inverse) instead of re-deriving state, so
/// implementations must guarantee that `step(a)` followed by
/// `step(inverse(a))` reproduces the prior state exactly.
pub trait StateSimulator {
    /// Number of primitive actions; ids are `0..num_actions()`.
    fn num_actions(&self) -> usize;

    /// Human-readable label for `action`.
    fn action_label(&self, action: Action) -> &str;

    /// The action that undoes `action`.
    fn inverse(&self, action: Action) -> Action;

    /// Return to the canonical origin and replay `sequence`.
    fn reset(&mut self, sequence: &[Action]);

    /// Apply one primitive action.
    fn step(&mut self, action: Action) -> Transition;

    /// Canonical key of the current state.
    fn state_key(&self) -> StateKey;

    /// Goal distance when `baseline` is `None`, else distance from `baseline`.
    fn diff(&self, baseline: Option<&StateKey>) -> u32;

    /// Upper bound of [`diff`](StateSimulator::diff).
    fn max_diff(&self) -> u32;

    /// Actions applied since the last reset.
    fn sequence(&self) -> &[Action];

    /// Undo a previously applied `action`.
    ///
    /// Defaults to stepping the inverse; simulators that keep a history may
    /// override this to drop the undone entry instead of recording two.
    fn revert(&mut self, action: Action) {
        let inverse = self.inverse(action);
        self.step(inverse);
    }

    /// All action ids in table order.
    fn actions(&self) -> Range<Action> {
        0..self.num_actions()
    }

    /// Look up an action by label.
    fn action_by_label(&self, label: &str) -> Option<Action> {
        self.actions().find(|&a| self.action_label(a) == label)
    }

    /// Parse a space-separated label string.
    fn parse_sequence(&self, text: &str) -> Result<Vec<Action>, SearchError> {
        text.split_whitespace()
            .map(|label| {
                self.action_by_label(label)
                    .ok_or_else(|| SearchError::UnknownAction(label.to_string()))
            })
            .collect()
    }

    /// Format actions as a space-separated label string.
    fn format_sequence(&self, sequence: &[Action]) -> String {
        sequence
            .iter()
            .map(|&a| self.action_label(a))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockSim;

    #[test]
    fn test_state_key_equality_is_structural() {
        let a = StateKey::new(vec![1u8, 2, 3]);
        let b = StateKey::from(&[1u8, 2, 3][..]);
        assert_eq!(a, b);
        assert_ne!(a, StateKey::new(vec![1u8, 2]));
    }

    #[test]
    fn test_state_key_no_concatenation_collision() {
        // [1, 23] and [12, 3] collide when joined as decimal strings.
        let a = StateKey::new(vec![1u8, 23]);
        let b = StateKey::new(vec![12u8, 3]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_parse_and_format_sequence() {
        let sim = MockSim::new(2, 5);
        let seq = sim.parse_sequence("+0 -1 +1").unwrap();
        assert_eq!(seq, vec![0, 3, 1]);
        assert_eq!(sim.format_sequence(&seq), "+0 -1 +1");
    }

    #[test]
    fn test_parse_unknown_label() {
        let sim = MockSim::new(2, 5);
        let err = sim.parse_sequence("+0 *2").unwrap_err();
        assert_eq!(err, SearchError::UnknownAction("*2".to_string()));
    }

    #[test]
    fn test_default_revert_restores() {
        let mut sim = MockSim::new(3, 5);
        sim.reset(&[0, 1]);
        let before = sim.state_key();
        sim.step(2);
        sim.revert(2);
        assert_eq!(sim.state_key(), before);
    }
}
