use std::path::PathBuf;
use thiserror::Error;

/// Surveyor error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Source file is not valid text: {file}")]
    NonText { file: String },

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("Directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Surveyor operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a config validation error
    pub fn config_validation(msg: impl Into<String>) -> Self {
        Error::ConfigValidation(msg.into())
    }

    /// Create an error for content that is not UTF-8 text
    pub fn non_text(file: impl Into<String>) -> Self {
        Error::NonText { file: file.into() }
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Whether this error means the analysis itself could not run, as
    /// opposed to a problem with the surrounding tooling.
    pub fn is_content_error(&self) -> bool {
        matches!(self, Error::NonText { .. })
    }
}
