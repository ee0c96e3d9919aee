//! Round-based greedy planner over primitives and learned macros.
//!
//! Each round probes every primitive action and every macro from the
//! current state, commits the single candidate with the smallest goal
//! distance, and repeats. There is no backtracking: once committed, a step
//! stays in the plan. States seen anywhere in the run are never evaluated
//! twice.

use std::collections::HashSet;
use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::PlannerConfig;
use crate::node::MacroSet;
use crate::probe::Probe;
use crate::progress::ProgressSink;
use crate::simulator::{Action, SearchError, StateKey, StateSimulator};

/// Why a planning run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The goal state was reached.
    Solved,
    /// All affordable rounds were spent without reaching the goal.
    BudgetExhausted,
    /// Every candidate of a round led to an already-visited state.
    DeadEnd,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solved => write!(f, "solved"),
            Self::BudgetExhausted => write!(f, "budget_exhausted"),
            Self::DeadEnd => write!(f, "dead_end"),
        }
    }
}

/// Counters from a single planning run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanStats {
    /// Candidates probed (primitives and macros).
    pub evaluations: u64,
    /// Candidates skipped because their state was already visited.
    pub duplicates_skipped: u64,
    /// Committed steps that were single primitives.
    pub primitive_steps: u64,
    /// Committed steps that were macros.
    pub macro_steps: u64,
    /// Wall-clock time of the run.
    pub wall_time_ms: u64,
}

/// Outcome of a planning run. Unsolved results are partial traces, not errors.
#[derive(Debug, Clone)]
pub struct PlanResult {
    pub termination: Termination,
    /// Actions committed from the start state (the start prefix excluded).
    pub actions: Vec<Action>,
    /// Rounds completed.
    pub rounds: usize,
    /// Goal distance after each committed round.
    pub distances: Vec<u32>,
    /// Largest goal distance the simulator can report.
    pub max_distance: u32,
    pub stats: PlanStats,
}

impl PlanResult {
    pub fn solved(&self) -> bool {
        self.termination == Termination::Solved
    }

    /// Progress after each round: `max_distance - distance`.
    pub fn progress(&self) -> Vec<u32> {
        self.distances
            .iter()
            .map(|&h| self.max_distance.saturating_sub(h))
            .collect()
    }
}

/// A one-step candidate considered in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Candidate {
    Primitive(Action),
    Macro(usize),
}

/// Greedy best-first planner.
#[derive(Debug, Clone)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    /// Create a planner with the given configuration.
    pub fn new(config: PlannerConfig) -> Self {
        config.validate();
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan from the state reached by replaying `start` towards the goal.
    pub fn run<S: StateSimulator>(
        &self,
        sim: &mut S,
        start: &[Action],
        macros: &MacroSet,
    ) -> Result<PlanResult, SearchError> {
        self.run_with_progress(sim, start, macros, &())
    }

    /// Like [`run`](Planner::run), reporting progress to `progress`.
    pub fn run_with_progress<S: StateSimulator>(
        &self,
        sim: &mut S,
        start: &[Action],
        macros: &MacroSet,
        progress: &dyn ProgressSink,
    ) -> Result<PlanResult, SearchError> {
        if sim.num_actions() == 0 {
            return Err(SearchError::NoActions);
        }

        let start_time = Instant::now();
        let mut stats = PlanStats::default();
        let mut plan: Vec<Action> = Vec::new();
        let mut trace: Vec<u32> = Vec::new();

        sim.reset(start);
        let mut current = sim.state_key();
        let mut visited: HashSet<StateKey> = HashSet::new();
        visited.insert(current.clone());

        let max_distance = sim.max_diff();
        let start_distance = sim.diff(None);
        let rounds = self.config.rounds(sim.num_actions() + macros.len());

        tracing::info!(
            start_len = start.len(),
            macros = macros.len(),
            rounds,
            goal_distance = start_distance,
            "Starting planning"
        );

        let finish = |termination: Termination,
                      plan: Vec<Action>,
                      rounds_done: usize,
                      trace: Vec<u32>,
                      mut stats: PlanStats| {
            stats.wall_time_ms = start_time.elapsed().as_millis() as u64;
            progress.finish();
            tracing::info!(
                %termination,
                steps = plan.len(),
                rounds = rounds_done,
                evaluations = stats.evaluations,
                time_ms = stats.wall_time_ms,
                "Planning finished"
            );
            PlanResult {
                termination,
                actions: plan,
                rounds: rounds_done,
                distances: trace,
                max_distance,
                stats,
            }
        };

        if start_distance == 0 {
            return Ok(finish(Termination::Solved, plan, 0, trace, stats));
        }

        for round in 0..rounds {
            let before = stats.evaluations;
            let mut best: Option<(u32, Candidate)> = None;

            for action in sim.actions() {
                let step = [action];
                match evaluate(sim, &current, &step, &mut visited, &mut stats)? {
                    Evaluation::Solved => {
                        plan.push(action);
                        stats.primitive_steps += 1;
                        trace.push(0);
                        progress.evaluated(stats.evaluations - before);
                        progress.round(max_distance, max_distance);
                        return Ok(finish(Termination::Solved, plan, round + 1, trace, stats));
                    }
                    Evaluation::Scored(h) => {
                        if best.map_or(true, |(best_h, _)| h < best_h) {
                            best = Some((h, Candidate::Primitive(action)));
                        }
                    }
                    Evaluation::Duplicate => {}
                }
            }

            for (index, m) in macros.iter().enumerate() {
                match evaluate(sim, &current, &m.actions, &mut visited, &mut stats)? {
                    Evaluation::Solved => {
                        plan.extend_from_slice(&m.actions);
                        stats.macro_steps += 1;
                        trace.push(0);
                        progress.evaluated(stats.evaluations - before);
                        progress.round(max_distance, max_distance);
                        return Ok(finish(Termination::Solved, plan, round + 1, trace, stats));
                    }
                    Evaluation::Scored(h) => {
                        if best.map_or(true, |(best_h, _)| h < best_h) {
                            best = Some((h, Candidate::Macro(index)));
                        }
                    }
                    Evaluation::Duplicate => {}
                }
            }

            let Some((h, candidate)) = best else {
                tracing::warn!(round, "Every candidate was already visited");
                progress.evaluated(stats.evaluations - before);
                return Ok(finish(Termination::DeadEnd, plan, round, trace, stats));
            };

            let primitive;
            let committed: &[Action] = match candidate {
                Candidate::Primitive(action) => {
                    stats.primitive_steps += 1;
                    primitive = [action];
                    &primitive
                }
                Candidate::Macro(index) => {
                    stats.macro_steps += 1;
                    macros.get(index).map_or(&[][..], |m| m.actions.as_slice())
                }
            };
            for &action in committed {
                sim.step(action);
            }
            plan.extend_from_slice(committed);
            current = sim.state_key();
            trace.push(h);
            progress.evaluated(stats.evaluations - before);
            progress.round(max_distance.saturating_sub(h), max_distance);

            tracing::debug!(
                round,
                goal_distance = h,
                progress = max_distance.saturating_sub(h),
                step_len = committed.len(),
                plan_len = plan.len(),
                "Committed step"
            );
        }

        Ok(finish(Termination::BudgetExhausted, plan, rounds, trace, stats))
    }
}

/// Result of probing one candidate.
enum Evaluation {
    /// Reached the goal; the simulator stays there.
    Solved,
    /// New state with the given goal distance; the simulator was restored.
    Scored(u32),
    /// State already visited this run; the simulator was restored.
    Duplicate,
}

/// Apply `actions`, measure, and undo unless the goal was reached.
fn evaluate<S: StateSimulator>(
    sim: &mut S,
    current: &StateKey,
    actions: &[Action],
    visited: &mut HashSet<StateKey>,
    stats: &mut PlanStats,
) -> Result<Evaluation, SearchError> {
    stats.evaluations += 1;
    let probe = Probe::apply(sim, current, actions);
    if !visited.insert(probe.state().clone()) {
        stats.duplicates_skipped += 1;
        probe.undo()?;
        return Ok(Evaluation::Duplicate);
    }
    let h = probe.diff(None);
    if h == 0 {
        probe.commit();
        return Ok(Evaluation::Solved);
    }
    probe.undo()?;
    Ok(Evaluation::Scored(h))
}
