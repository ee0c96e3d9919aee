//! JSON file helpers shared by the artifact types.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ArtifactError;

/// Read and parse a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let contents = fs::read_to_string(path).map_err(|e| ArtifactError::io(path, e))?;
    serde_json::from_str(&contents).map_err(|e| ArtifactError::json(path, e))
}

/// Write `value` as pretty JSON, creating parent directories as needed.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ArtifactError::io(parent, e))?;
    }
    let json = serde_json::to_string_pretty(value).map_err(|e| ArtifactError::json(path, e))?;
    fs::write(path, json).map_err(|e| ArtifactError::io(path, e))?;
    tracing::debug!(path = %path.display(), "Wrote JSON artifact");
    Ok(())
}
