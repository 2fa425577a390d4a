//! Error types for template variable extraction.

use thiserror::Error;

/// Result type alias for variable extraction operations.
pub type VarsResult<T> = Result<T, VarsError>;

/// Errors that can occur while analyzing a template.
///
/// The public parse functions never return these; they are caught where they
/// arise and recorded in the `errors` list of the result.
#[derive(Error, Debug)]
pub enum VarsError {
    #[error("YAML parse failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("compose content too large: len={len}")]
    InputTooLarge { len: usize, max: usize },

    #[error("Invalid stored schema: {0}")]
    InvalidSchema(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid options: {0}")]
    Options(#[from] toml::de::Error),
}
