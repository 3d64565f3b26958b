//! Offline release bundler for Dapr.
//!
//! This library resolves the versions of the Dapr runtime, dashboard and CLI,
//! downloads their platform-specific release archives, saves the runtime
//! container image, records everything in a manifest and compresses the
//! result into one archive:
//!
//! - [`source`] - release version resolution against the GitHub API
//! - [`bundler`] - configuration, downloads, archives and orchestration
//! - [`docker`] - container image acquisition through an [`docker::ImageEngine`]
//! - [`metadata`] - the `details.json` bundle manifest
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod docker;
pub mod error;
pub mod metadata;
pub mod source;

// Re-export commonly used types
pub use bundler::{BuildConfig, BuildConfigBuilder, BundleReport, Bundler, TargetArch, TargetOs};
pub use error::{BundlerError, CliError, ReleaseError, Result};
