//! API data files served as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

/// Locations of the API data files.
#[derive(Debug, Clone, Default)]
pub struct ApiFiles {
    /// OpenAPI specification (YAML)
    pub openapi: Option<PathBuf>,

    /// API service description (JSON)
    pub service: Option<PathBuf>,
}

/// Errors that can occur when loading data files.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Invalid YAML in {path}: {message}")]
    InvalidYaml { path: String, message: String },

    #[error("Invalid JSON in {path}: {message}")]
    InvalidJson { path: String, message: String },
}

fn read(path: &Path) -> Result<String, DataError> {
    fs::read_to_string(path).map_err(|e| DataError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Load a YAML OpenAPI document as a JSON value.
pub fn load_openapi_spec(path: &Path) -> Result<Value, DataError> {
    let content = read(path)?;
    serde_yaml::from_str(&content).map_err(|e| DataError::InvalidYaml {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Load a JSON document.
pub fn load_json(path: &Path) -> Result<Value, DataError> {
    let content = read(path)?;
    serde_json::from_str(&content).map_err(|e| DataError::InvalidJson {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
