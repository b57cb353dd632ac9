//! Error types for the file-based policy source.

use thiserror::Error;

use gridscale_policy::PolicyError;

/// Result type alias for policy source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors that can occur while loading policies from disk.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to walk policy directory {path}: {source}")]
    Walk {
        path: String,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A file decoded with errors; the decoder's combined error carries
    /// the per-block findings.
    #[error(transparent)]
    Policy(#[from] PolicyError),
}
