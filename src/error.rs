//! Error types for bundle operations.
//!
//! Two severities exist in the pipeline. Everything represented here is
//! fatal and ends the run; individual binary download failures are not
//! errors at all but [`DownloadOutcome::Failed`](crate::bundler::DownloadOutcome)
//! values collected into the final report.

use thiserror::Error;

/// Result type alias for bundle operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for all bundle operations
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument and subprocess errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// Version resolution errors
    #[error("Release error: {0}")]
    Release(#[from] ReleaseError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem, archive and download errors
    #[error("Bundler error: {0}")]
    Bundler(#[from] crate::bundler::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

/// Errors raised while resolving a release version from the hosting API.
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Transport-level failure talking to the API
    #[error("request to release API failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("GET {url} returned status {status}")]
    HttpStatus {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// No non-draft release carries a semantic version tag
    #[error("no releases found for {project}")]
    NoReleases {
        /// `org/repo` of the project
        project: String,
    },
}
