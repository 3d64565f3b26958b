//! Bundle assembly: configuration, binary downloads, archives and the
//! pipeline orchestrator.
//!
//! # Module Organization
//!
//! - [`settings`] - target platform types and the immutable [`BuildConfig`]
//! - [`builder`] - binary acquisition, checksums and the [`Bundler`] pipeline
//! - [`archive`] - zip and tar.gz creation/extraction
//! - [`utils`] - filesystem and HTTP helpers

pub mod archive;
pub mod builder;
mod error;
pub mod settings;
pub mod utils;

pub use builder::{
    BinaryArtifact, BundleReport, Bundler, DownloadOutcome, archive_file_name,
    assemble_binaries, bundle_artifacts, release_download_url,
};
pub use error::{Error, ErrorExt, Result};
pub use settings::{
    ArchiveFormat, BuildConfig, BuildConfigBuilder, DIST_SUBDIR, DOCKER_SUBDIR, TargetArch,
    TargetOs,
};
