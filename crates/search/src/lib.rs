//! Macro-learning and planning search core for reversible simulators.
//!
//! Drives any [`StateSimulator`] through experimental apply/undo steps. The
//! [`MacroLearner`] explores outward from a base state and harvests short
//! action sequences with small, focused effects; the [`Planner`] then walks
//! greedily towards the goal using primitives and those macros. Both are
//! written against the trait so they can be tested with mocks (no cube).
//!
//! # Key types
//!
//! - [`Frontier`]: bounded bucketed priority queue with id index
//! - [`MacroLearner`] / [`LearnerConfig`]: best-first macro harvesting
//! - [`Planner`] / [`PlannerConfig`]: round-based greedy planning
//! - [`StateSimulator`] / [`StateKey`]: the simulator capability interface
//! - [`Probe`]: scoped apply-then-undo of a candidate sequence
//! - [`ProgressSink`]: progress hooks for long runs

pub mod adapters;
pub mod config;
pub mod frontier;
pub mod learner;
pub mod mocks;
pub mod node;
pub mod planner;
pub mod probe;
pub mod progress;
pub mod simulator;

pub use config::{LearnerConfig, PlannerConfig};
pub use frontier::{Frontier, Update};
pub use learner::{LearnOutcome, LearnStats, MacroLearner};
pub use node::{Macro, MacroSet, SearchNode};
pub use planner::{PlanResult, PlanStats, Planner, Termination};
pub use probe::Probe;
pub use progress::ProgressSink;
pub use simulator::{Action, SearchError, StateKey, StateSimulator, Transition};
