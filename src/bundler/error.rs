//! Error type for filesystem, archive and download operations.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for bundler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while assembling a bundle
#[derive(Error, Debug)]
pub enum Error {
    /// Free-form error, usually raised through [`bail!`](crate::bail)
    #[error("{0}")]
    GenericError(String),

    /// Bare IO error
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// IO error with the operation and path that caused it
    #[error("{context} {}: {source}", path.display())]
    Fs {
        /// What was being done
        context: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Zip archive error
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Directory traversal error
    #[error("directory walk failed: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// Transport error during a download
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Download answered with something other than 200 OK
    #[error("GET {url} returned status {status}")]
    HttpStatus {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Archive entry would be written outside the destination
    #[error("archive entry escapes destination: {}", .0.display())]
    UnsafeEntry(PathBuf),

    /// Blocking task panicked or was cancelled
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Attaches an operation description and path to IO errors.
pub trait ErrorExt<T> {
    /// Converts an IO error into [`Error::Fs`].
    fn fs_context(self, context: &'static str, path: &Path) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: &Path) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context,
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Returns early with an [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}
