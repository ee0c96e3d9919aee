//! On-disk artifacts for macro learning and planning runs.
//!
//! Scramble scenarios are plain-text label files (`start-NNN.txt`); learned
//! macro libraries and plans are JSON. Actions are always stored by label so
//! files stay readable and independent of action-id order.

pub mod error;
pub mod json;
pub mod labels;
pub mod library;
pub mod record;
pub mod scramble;
pub mod summary;

pub use error::ArtifactError;
pub use library::{MacroEntry, MacroLibrary};
pub use record::PlanRecord;
pub use scramble::{random_scramble, scramble_file_name, ScrambleSet, DEFAULT_SCENARIOS};
pub use summary::{median, MacroSummary};
