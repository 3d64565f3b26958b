//! Bundle assembly and orchestration.
//!
//! This module provides the main [`Bundler`] orchestrator that runs the
//! bundling pipeline:
//!
//! 1. Resolve `latest` version selectors
//! 2. Reset the bundle and archive directories
//! 3. Download release archives and unpack the CLI
//! 4. Save the runtime container image (not for darwin)
//! 5. Write the manifest and compress the bundle
//!
//! # Example
//!
//! ```no_run
//! use daprbundle::{BuildConfig, Bundler, TargetArch, TargetOs};
//! use daprbundle::cli::{OutputManager, RuntimeConfig};
//! use daprbundle::docker::DockerEngine;
//!
//! # async fn example() -> daprbundle::Result<()> {
//! let config = BuildConfig::builder(TargetOs::Linux, TargetArch::Amd64).build()?;
//! let output = RuntimeConfig::new(OutputManager::new(false, false));
//!
//! let bundler = Bundler::new(&config, DockerEngine::new(), &output)?;
//! let report = bundler.run().await?;
//! println!("Archive: {}", report.archive_path.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`assembler`] - release asset naming and binary downloads
//! - [`checksum`] - SHA256 checksum calculation for the final archive
//! - [`orchestrator`] - [`Bundler`] and [`BundleReport`]

pub mod assembler;
pub mod checksum;
mod orchestrator;

pub use assembler::{
    BinaryArtifact, DownloadOutcome, archive_file_name, assemble_binaries, bundle_artifacts,
    release_download_url,
};
pub use orchestrator::{BundleReport, Bundler};
