//! 3x3x3 permutation-puzzle simulator.
//!
//! Provides a deterministic, reversible cube environment that the macro
//! learner and planner drive through apply/undo steps. The state is a flat
//! array of 54 facelet colors; each of the 12 quarter-turn actions is a
//! precomputed permutation of those facelets.
//!
//! # Key types
//!
//! - [`CubeEnv`]: the simulator (reset / step / diff / render)
//! - [`Face`]: facelet colors and face identifiers
//! - [`CubeError`]: label parsing errors

pub mod env;
pub mod geometry;
pub mod types;

pub use env::{CubeEnv, MAX_DIFF};
pub use geometry::{Geometry, NUM_FACELETS};
pub use types::{CubeError, Face, ACTION_LABELS, NUM_ACTIONS};
