use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for srcfuse operations
#[derive(Error, Debug)]
pub enum FuseError {
    /// IO error when reading sources or writing artifacts
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A seed file is missing from the library root
    #[error(
        "Cannot find {path} in directory {root}. Please either specify a valid project root directory or omit it on the command line."
    )]
    MissingSeed { path: String, root: PathBuf },

    /// A file referenced by a directive does not exist
    #[error("Cannot find {path} (included from {included_from})")]
    MissingInclude { path: String, included_from: String },

    /// The user declined to overwrite an existing artifact
    #[error("Aborted: refused to overwrite {}", .path.display())]
    Aborted { path: PathBuf },

    /// Moving a finished artifact into place failed
    #[error("Failed to persist output: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// Regex compilation error
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FuseError>;
