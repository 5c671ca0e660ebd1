//! Error types for cg-core

use thiserror::Error;

/// Core error type for contextgraph
#[derive(Error, Debug)]
pub enum CoreError {
    /// P001: Header block could not be read as a YAML mapping
    #[error("[P001] Malformed header: {message}")]
    MalformedHeader { message: String },

    /// P002: Version is not a semantic version
    #[error("[P002] Invalid version format: '{version}'. Expected semantic version (e.g. '1.0.0')")]
    InvalidVersionFormat { version: String },

    /// P003: One or more required fields are absent
    #[error("[P003] Missing required fields: {}", fields.join(", "))]
    MissingRequiredField { fields: Vec<String> },

    /// P004: No dataset could be declared or inferred
    #[error("[P004] No datasets found. Declare them in the header, use '## Dataset: Name (id: ...)' headings or a '## Datasets' list, or supply a default dataset id")]
    NoDatasetsFound,

    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: IO error with file path context
    #[error("[E004] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E005: YAML serialization/deserialization error
    #[error("[E005] YAML error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// E006: JSON serialization/deserialization error
    #[error("[E006] JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Whether this error came from document parsing (as opposed to config or I/O)
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            CoreError::MalformedHeader { .. }
                | CoreError::InvalidVersionFormat { .. }
                | CoreError::MissingRequiredField { .. }
                | CoreError::NoDatasetsFound
        )
    }
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
