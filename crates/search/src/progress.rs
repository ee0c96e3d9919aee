//! Progress reporting hooks for long-running searches.

/// Receives progress from the learner and planner.
///
/// All methods default to no-ops; `()` is the silent sink.
pub trait ProgressSink {
    /// `count` more primitive evaluations were spent.
    fn evaluated(&self, _count: u64) {}

    /// A planner round ended with `progress` out of `max_progress`, where
    /// progress is the goal distance subtracted from its maximum.
    fn round(&self, _progress: u32, _max_progress: u32) {}

    /// The run ended.
    fn finish(&self) {}
}

impl ProgressSink for () {}
