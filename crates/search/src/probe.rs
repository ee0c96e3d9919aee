//! Scoped apply/evaluate/undo against a shared simulator.
//!
//! Every candidate the learner and planner look at is measured by applying
//! its actions to the one live simulator and rolling them back afterwards.
//! [`Probe`] owns that rollback: it either commits the actions, is undone
//! explicitly (with a check that the origin state came back), or rewinds on
//! drop, so no exit path leaves the simulator displaced.

use crate::simulator::{Action, SearchError, StateKey, StateSimulator};

/// Actions applied to a borrowed simulator, pending undo or commit.
pub struct Probe<'a, S: StateSimulator> {
    sim: &'a mut S,
    origin: &'a StateKey,
    actions: &'a [Action],
    state: StateKey,
    solved: bool,
    armed: bool,
}

impl<'a, S: StateSimulator> Probe<'a, S> {
    /// Apply `actions` in order to `sim`, which must currently be at `origin`.
    ///
    /// `actions` must be non-empty.
    pub fn apply(sim: &'a mut S, origin: &'a StateKey, actions: &'a [Action]) -> Self {
        debug_assert!(!actions.is_empty(), "probe needs at least one action");
        let mut state = origin.clone();
        let mut solved = false;
        for &action in actions {
            let transition = sim.step(action);
            state = transition.state;
            solved = transition.solved;
        }
        Self {
            sim,
            origin,
            actions,
            state,
            solved,
            armed: true,
        }
    }

    /// Key of the probed state.
    pub fn state(&self) -> &StateKey {
        &self.state
    }

    /// Whether the probed state is the goal.
    pub fn solved(&self) -> bool {
        self.solved
    }

    /// Heuristic of the probed state (see [`StateSimulator::diff`]).
    pub fn diff(&self, baseline: Option<&StateKey>) -> u32 {
        self.sim.diff(baseline)
    }

    /// Roll back and verify the simulator returned to the origin state.
    pub fn undo(mut self) -> Result<(), SearchError> {
        self.armed = false;
        rewind(self.sim, self.actions);
        if self.sim.state_key() != *self.origin {
            tracing::error!(
                actions = ?self.actions,
                "Simulator did not return to the probe origin"
            );
            return Err(SearchError::Irreversible {
                actions: self.actions.to_vec(),
            });
        }
        Ok(())
    }

    /// Keep the actions applied; the simulator stays at the probed state.
    pub fn commit(mut self) -> StateKey {
        self.armed = false;
        std::mem::replace(&mut self.state, self.origin.clone())
    }
}

impl<S: StateSimulator> Drop for Probe<'_, S> {
    fn drop(&mut self) {
        if self.armed {
            rewind(self.sim, self.actions);
        }
    }
}

/// Undo `actions` (applied in order) by reverting them in reverse order.
pub fn rewind<S: StateSimulator + ?Sized>(sim: &mut S, actions: &[Action]) {
    for &action in actions.iter().rev() {
        sim.revert(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockSim;

    #[test]
    fn test_undo_restores_origin() {
        let mut sim = MockSim::new(3, 7);
        sim.reset(&[0, 4]);
        let origin = sim.state_key();
        let actions = [1, 1, 2];
        let probe = Probe::apply(&mut sim, &origin, &actions);
        assert_ne!(probe.state(), &origin);
        probe.undo().unwrap();
        assert_eq!(sim.state_key(), origin);
    }

    #[test]
    fn test_drop_rewinds() {
        let mut sim = MockSim::new(3, 7);
        let origin = sim.state_key();
        let actions = [0, 2];
        {
            let probe = Probe::apply(&mut sim, &origin, &actions);
            assert_eq!(probe.diff(None), 2);
        }
        assert_eq!(sim.state_key(), origin);
    }

    #[test]
    fn test_rewinds_on_early_return() {
        fn peek(sim: &mut MockSim, origin: &StateKey) -> Option<u32> {
            let actions = [1];
            let probe = Probe::apply(sim, origin, &actions);
            let h = probe.diff(None);
            if h > 0 {
                return Some(h);
            }
            probe.undo().ok()?;
            None
        }
        let mut sim = MockSim::new(2, 5);
        let origin = sim.state_key();
        assert_eq!(peek(&mut sim, &origin), Some(1));
        assert_eq!(sim.state_key(), origin);
    }

    #[test]
    fn test_commit_keeps_state() {
        let mut sim = MockSim::new(2, 5);
        let origin = sim.state_key();
        let actions = [0];
        let probe = Probe::apply(&mut sim, &origin, &actions);
        let reached = probe.state().clone();
        let committed = probe.commit();
        assert_eq!(committed, reached);
        assert_eq!(sim.state_key(), reached);
    }

    #[test]
    fn test_solved_flag() {
        let mut sim = MockSim::new(1, 5);
        sim.reset(&[0]);
        let origin = sim.state_key();
        let actions = [1];
        let probe = Probe::apply(&mut sim, &origin, &actions);
        assert!(probe.solved());
    }

    #[test]
    fn test_irreversible_simulator_detected() {
        let mut sim = MockSim::new(2, 5).with_broken_inverse();
        let origin = sim.state_key();
        let actions = [0];
        let probe = Probe::apply(&mut sim, &origin, &actions);
        let err = probe.undo().unwrap_err();
        assert_eq!(err, SearchError::Irreversible { actions: vec![0] });
    }
}
