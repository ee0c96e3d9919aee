//! Bounded best-first exploration that harvests focused macros.
//!
//! Starting from a base state, the learner repeatedly expands the fringe
//! node with the smallest `f = h + g`, where `h` is the distance of a state
//! from the base state. Committed nodes are kept in a bounded visited table
//! ranked by net effect `h`, then path length; at the end the best of them
//! become macros.

use std::collections::HashSet;
use std::time::Instant;

use ordered_float::OrderedFloat;

use crate::config::LearnerConfig;
use crate::frontier::{Frontier, Update};
use crate::node::{Macro, MacroSet, SearchNode};
use crate::probe::{rewind, Probe};
use crate::progress::ProgressSink;
use crate::simulator::{Action, SearchError, StateKey, StateSimulator};

/// Counters from a single learning run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LearnStats {
    /// Fringe nodes committed and expanded.
    pub expansions: u64,
    /// Primitive actions evaluated (the budgeted unit).
    pub evaluations: u64,
    /// Fringe selections that hit an already-visited state.
    pub duplicates_merged: u64,
    /// Nodes dropped because the fringe hit its ceiling.
    pub fringe_evictions: u64,
    /// Nodes dropped because the visited table hit its cap.
    pub visited_evictions: u64,
    /// Smallest net effect among nodes evicted from the visited table.
    pub best_evicted: Option<u32>,
    /// Replays that restarted from the base actions.
    pub resets: u64,
    /// Replays that rewound to a common prefix instead.
    pub rewinds: u64,
    /// Largest fringe size observed.
    pub peak_fringe: usize,
    /// Smallest net effect of any committed node that did not become a
    /// macro, whether evicted during the run or left over after extraction.
    pub best_discarded: Option<u32>,
    /// Wall-clock time of the run.
    pub wall_time_ms: u64,
}

/// Macros and statistics from a learning run.
#[derive(Debug, Clone)]
pub struct LearnOutcome {
    pub macros: MacroSet,
    pub stats: LearnStats,
}

/// Visited-table ordering key, see [`SearchNode::rank`].
type Rank = (OrderedFloat<f64>, usize);

/// Best-first macro learner.
#[derive(Debug, Clone)]
pub struct MacroLearner {
    config: LearnerConfig,
}

impl MacroLearner {
    /// Create a learner with the given configuration.
    pub fn new(config: LearnerConfig) -> Self {
        config.validate();
        Self { config }
    }

    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    /// Learn macros around the state reached by replaying `base`.
    pub fn run<S: StateSimulator>(
        &self,
        sim: &mut S,
        base: &[Action],
    ) -> Result<LearnOutcome, SearchError> {
        self.run_with_progress(sim, base, &())
    }

    /// Like [`run`](MacroLearner::run), reporting evaluations to `progress`.
    pub fn run_with_progress<S: StateSimulator>(
        &self,
        sim: &mut S,
        base: &[Action],
        progress: &dyn ProgressSink,
    ) -> Result<LearnOutcome, SearchError> {
        if sim.num_actions() == 0 {
            return Err(SearchError::NoActions);
        }

        let start_time = Instant::now();
        let budget = self.config.budget;
        let mut stats = LearnStats::default();

        sim.reset(base);
        let baseline = sim.state_key();

        let mut fringe: Frontier<StateKey, SearchNode, OrderedFloat<f64>> =
            match self.config.fringe_capacity() {
                Some(capacity) => Frontier::new(capacity),
                None => Frontier::unbounded(),
            };
        // Bucketed by (net effect, length) so the cap evicts the least
        // focused entry and extraction comes out in rank order.
        let mut visited: Frontier<StateKey, SearchNode, Rank> =
            Frontier::new(self.config.retention());
        // Every key ever committed, including ones since evicted from `visited`.
        let mut closed: HashSet<StateKey> = HashSet::new();

        let root = SearchNode::root();
        let root_f = root.f;
        fringe.push(root, baseline.clone(), root_f);

        // Path currently applied to `sim` on top of `base`.
        let mut applied: Vec<Action> = Vec::new();

        tracing::info!(
            budget,
            max_macros = self.config.max_macros,
            reduction = self.config.reduction,
            fringe_capacity = ?self.config.fringe_capacity(),
            actions = sim.num_actions(),
            base_len = base.len(),
            "Starting macro learning"
        );

        while stats.evaluations < budget {
            let (key, node, f) = fringe.pop().ok_or(SearchError::FringeExhausted {
                expansions: stats.expansions,
            })?;

            if closed.contains(&key) {
                stats.duplicates_merged += 1;
                let replace = visited
                    .get(&key)
                    .is_some_and(|(stored, _)| node.better_than(stored));
                if replace {
                    // Same state, same net effect: this moves the entry
                    // within the table and never evicts.
                    let rank = node.rank();
                    visited.push(node, key, rank);
                }
                continue;
            }

            closed.insert(key.clone());
            let rank = node.rank();
            let evicted = visited.push(node.clone(), key.clone(), rank);
            if let Some((_, dropped, (effect, _))) = evicted {
                stats.visited_evictions += 1;
                if !dropped.is_root() {
                    let effect = effect.0 as u32;
                    stats.best_evicted =
                        Some(stats.best_evicted.map_or(effect, |best| best.min(effect)));
                }
            }

            self.replay(sim, base, &mut applied, &node.actions, &mut stats);

            tracing::debug!(
                expansion = stats.expansions,
                depth = node.g(),
                f = %f,
                fringe = fringe.len(),
                visited = visited.len(),
                "Expanding node"
            );

            let child_g = node.g() + 1;
            let before = stats.evaluations;
            for action in sim.actions() {
                if stats.evaluations >= budget {
                    break;
                }
                stats.evaluations += 1;

                let step = [action];
                let probe = Probe::apply(sim, &key, &step);
                let child_key = probe.state().clone();
                let h = probe.diff(Some(&baseline));
                probe.undo()?;

                if child_key == baseline {
                    continue;
                }
                if closed.contains(&child_key) {
                    // Only a strictly shorter path can improve a committed state.
                    let improves = visited
                        .get(&child_key)
                        .is_some_and(|(stored, _)| child_g < stored.g());
                    if !improves {
                        continue;
                    }
                }

                let mut actions = Vec::with_capacity(child_g);
                actions.extend_from_slice(&node.actions);
                actions.push(action);
                let child = SearchNode::new(actions, h);
                let child_f = child.f;
                if let Update::Stored { evicted: Some(_) } = fringe.update(child, child_key, child_f)
                {
                    stats.fringe_evictions += 1;
                }
            }

            stats.expansions += 1;
            stats.peak_fringe = stats.peak_fringe.max(fringe.len());
            progress.evaluated(stats.evaluations - before);
        }

        let macros = self.extract(&mut visited, &mut stats);
        stats.wall_time_ms = start_time.elapsed().as_millis() as u64;
        progress.finish();

        tracing::info!(
            macros = macros.len(),
            expansions = stats.expansions,
            evaluations = stats.evaluations,
            duplicates = stats.duplicates_merged,
            time_ms = stats.wall_time_ms,
            "Macro learning finished"
        );

        Ok(LearnOutcome { macros, stats })
    }

    /// Bring `sim` from `base + applied` to `base + target`.
    ///
    /// Rewinds to the common prefix and applies the new suffix when that is
    /// no more work than resetting and replaying the whole path.
    fn replay<S: StateSimulator>(
        &self,
        sim: &mut S,
        base: &[Action],
        applied: &mut Vec<Action>,
        target: &[Action],
        stats: &mut LearnStats,
    ) {
        let common = applied
            .iter()
            .zip(target)
            .take_while(|(a, b)| a == b)
            .count();
        let rewind_cost = (applied.len() - common) + (target.len() - common);
        let reset_cost = base.len() + target.len();

        if rewind_cost <= reset_cost {
            if common < applied.len() {
                stats.rewinds += 1;
            }
            rewind(sim, &applied[common..]);
            for &action in &target[common..] {
                sim.step(action);
            }
        } else {
            stats.resets += 1;
            let mut full = Vec::with_capacity(reset_cost);
            full.extend_from_slice(base);
            full.extend_from_slice(target);
            sim.reset(&full);
        }

        applied.clear();
        applied.extend_from_slice(target);
    }

    /// Pop the best retained candidates into a macro set.
    fn extract(
        &self,
        visited: &mut Frontier<StateKey, SearchNode, Rank>,
        stats: &mut LearnStats,
    ) -> MacroSet {
        let quota = self.config.output_size();
        let mut macros = MacroSet::new();
        while macros.len() < quota {
            let Some((_, node, rank)) = visited.pop() else {
                break;
            };
            if node.is_root() {
                continue;
            }
            macros.push(Macro::new(node.actions, rank.0 .0 as u32));
        }
        let leftover = visited
            .iter()
            .find(|(_, node, _)| !node.is_root())
            .map(|(_, _, rank)| rank.0 .0 as u32);
        stats.best_discarded = match (leftover, stats.best_evicted) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        macros
    }
}
