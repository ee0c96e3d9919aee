use std::path::PathBuf;

/// Errors from reading or writing persisted artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON artifact could not be parsed or serialized.
    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Scenario index outside the scramble set.
    #[error("Scenario index {index} out of range 0..{count}")]
    InvalidScenario { index: usize, count: usize },

    /// A stored label is not in the simulator's action table.
    #[error("Unknown action label '{0}'")]
    UnknownLabel(String),
}

impl ArtifactError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}
