//! Bridges between the search traits and the cube simulator.

use cube::{CubeEnv, ACTION_LABELS, NUM_ACTIONS};

use crate::simulator::{Action, StateKey, StateSimulator, Transition};

// ---------------------------------------------------------------------------
// StateSimulator for CubeEnv
// ---------------------------------------------------------------------------

impl StateSimulator for CubeEnv {
    fn num_actions(&self) -> usize {
        NUM_ACTIONS
    }

    fn action_label(&self, action: Action) -> &str {
        ACTION_LABELS.get(action).copied().unwrap_or("?")
    }

    fn inverse(&self, action: Action) -> Action {
        CubeEnv::inverse(action)
    }

    fn reset(&mut self, sequence: &[Action]) {
        CubeEnv::reset(self, sequence);
    }

    fn step(&mut self, action: Action) -> Transition {
        let solved = CubeEnv::step(self, action);
        Transition {
            state: self.state_key(),
            solved,
        }
    }

    fn state_key(&self) -> StateKey {
        StateKey::from(&self.facelets()[..])
    }

    fn diff(&self, baseline: Option<&StateKey>) -> u32 {
        CubeEnv::diff(self, baseline.map(StateKey::as_bytes))
    }

    fn max_diff(&self) -> u32 {
        cube::MAX_DIFF
    }

    fn sequence(&self) -> &[Action] {
        CubeEnv::sequence(self)
    }

    // Pops the history instead of growing it, so rewinds keep it short.
    fn revert(&mut self, action: Action) {
        self.undo(action);
    }
}
