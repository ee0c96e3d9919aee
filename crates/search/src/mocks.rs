//! Mock simulators for testing the search core without a real puzzle.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::simulator::{Action, StateKey, StateSimulator, Transition};

// ---------------------------------------------------------------------------
// MockSim
// ---------------------------------------------------------------------------

/// A bank of counters modulo `modulus`.
///
/// Action `i < n` increments register `i`, action `n + i` decrements it, so
/// `inverse(a) = (a + n) % 2n`. Labels are `"+i"` and `"-i"`. The goal is
/// all registers at zero unless overridden with [`MockSim::with_goal`].
#[derive(Debug, Clone)]
pub struct MockSim {
    registers: Vec<u8>,
    modulus: u8,
    goal: Vec<u8>,
    labels: Vec<String>,
    history: Vec<Action>,
    broken_inverse: bool,
}

impl MockSim {
    /// `n` registers, each counting modulo `modulus`.
    pub fn new(n: usize, modulus: u8) -> Self {
        let labels = (0..n)
            .map(|i| format!("+{i}"))
            .chain((0..n).map(|i| format!("-{i}")))
            .collect();
        Self {
            registers: vec![0; n],
            modulus: modulus.max(1),
            goal: vec![0; n],
            labels,
            history: Vec::new(),
            broken_inverse: false,
        }
    }

    /// Report every action as its own inverse, violating reversibility.
    pub fn with_broken_inverse(mut self) -> Self {
        self.broken_inverse = true;
        self
    }

    /// Use `goal` instead of all-zero registers. Values outside the modulus
    /// make the goal unreachable.
    pub fn with_goal(mut self, goal: Vec<u8>) -> Self {
        self.goal = goal;
        self
    }

    pub fn registers(&self) -> &[u8] {
        &self.registers
    }

    fn width(&self) -> usize {
        self.registers.len()
    }

    fn apply(&mut self, action: Action) {
        let n = self.width();
        let m = u16::from(self.modulus);
        let (index, delta) = if action < n {
            (action, 1)
        } else {
            (action - n, m - 1)
        };
        let r = &mut self.registers[index];
        *r = ((u16::from(*r) + delta) % m) as u8;
    }
}

impl StateSimulator for MockSim {
    fn num_actions(&self) -> usize {
        2 * self.width()
    }

    fn action_label(&self, action: Action) -> &str {
        self.labels.get(action).map_or("?", String::as_str)
    }

    fn inverse(&self, action: Action) -> Action {
        if self.broken_inverse {
            return action;
        }
        (action + self.width()) % self.num_actions()
    }

    fn reset(&mut self, sequence: &[Action]) {
        self.registers.iter_mut().for_each(|r| *r = 0);
        self.history.clear();
        for &action in sequence {
            self.step(action);
        }
    }

    fn step(&mut self, action: Action) -> Transition {
        self.apply(action);
        self.history.push(action);
        Transition {
            state: self.state_key(),
            solved: self.diff(None) == 0,
        }
    }

    fn state_key(&self) -> StateKey {
        StateKey::from(self.registers.as_slice())
    }

    fn diff(&self, baseline: Option<&StateKey>) -> u32 {
        let reference = baseline.map_or(self.goal.as_slice(), StateKey::as_bytes);
        self.registers
            .iter()
            .zip(reference)
            .filter(|(a, b)| a != b)
            .count() as u32
    }

    fn max_diff(&self) -> u32 {
        self.width() as u32
    }

    fn sequence(&self) -> &[Action] {
        &self.history
    }
}

// ---------------------------------------------------------------------------
// InstrumentedSim
// ---------------------------------------------------------------------------

/// Wraps a simulator and counts goal-distance evaluations per state.
pub struct InstrumentedSim<S> {
    inner: S,
    goal_evaluations: RefCell<HashMap<StateKey, usize>>,
}

impl<S: StateSimulator> InstrumentedSim<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            goal_evaluations: RefCell::new(HashMap::new()),
        }
    }

    /// Number of states whose goal distance was computed more than once.
    pub fn duplicate_evaluations(&self) -> usize {
        self.goal_evaluations
            .borrow()
            .values()
            .filter(|&&n| n > 1)
            .count()
    }

    /// Total goal-distance computations.
    pub fn total_evaluations(&self) -> usize {
        self.goal_evaluations.borrow().values().sum()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: StateSimulator> StateSimulator for InstrumentedSim<S> {
    fn num_actions(&self) -> usize {
        self.inner.num_actions()
    }

    fn action_label(&self, action: Action) -> &str {
        self.inner.action_label(action)
    }

    fn inverse(&self, action: Action) -> Action {
        self.inner.inverse(action)
    }

    fn reset(&mut self, sequence: &[Action]) {
        self.inner.reset(sequence);
    }

    fn step(&mut self, action: Action) -> Transition {
        self.inner.step(action)
    }

    fn state_key(&self) -> StateKey {
        self.inner.state_key()
    }

    fn diff(&self, baseline: Option<&StateKey>) -> u32 {
        if baseline.is_none() {
            *self
                .goal_evaluations
                .borrow_mut()
                .entry(self.inner.state_key())
                .or_insert(0) += 1;
        }
        self.inner.diff(baseline)
    }

    fn max_diff(&self) -> u32 {
        self.inner.max_diff()
    }

    fn sequence(&self) -> &[Action] {
        self.inner.sequence()
    }

    fn revert(&mut self, action: Action) {
        self.inner.revert(action);
    }
}
