//! Main bundling pipeline.
//!
//! This module provides the [`Bundler`] orchestrator that runs the pipeline
//! stages in order and collects a [`BundleReport`].

use super::assembler::{DownloadOutcome, assemble_binaries};
use super::checksum::calculate_sha256;
use crate::bundler::archive::create_archive;
use crate::bundler::settings::BuildConfig;
use crate::bundler::utils::{fs, http};
use crate::cli::RuntimeConfig;
use crate::docker::{ImageEngine, ImageRef, fetch_image};
use crate::error::Result;
use crate::metadata::{BundleManifest, write_manifest};
use crate::source::{ReleaseClient, ResolvedVersions};
use reqwest::Client;
use std::path::PathBuf;

/// Outcome of a bundling run.
#[derive(Clone, Debug)]
pub struct BundleReport {
    /// Versions that were bundled
    pub versions: ResolvedVersions,
    /// One entry per release archive, in download order
    pub downloads: Vec<DownloadOutcome>,
    /// Saved image tarball, `None` for darwin targets
    pub image_file: Option<PathBuf>,
    /// Written `details.json`
    pub manifest_path: PathBuf,
    /// Final archive
    pub archive_path: PathBuf,
    /// Hex SHA-256 of the final archive
    pub archive_sha256: String,
}

impl BundleReport {
    /// Downloads that failed.
    pub fn failed_downloads(&self) -> impl Iterator<Item = &DownloadOutcome> {
        self.downloads.iter().filter(|d| d.is_failed())
    }

    /// Whether every release archive made it into the bundle.
    pub fn is_complete(&self) -> bool {
        self.failed_downloads().next().is_none()
    }
}

/// Bundling pipeline orchestrator.
///
/// Holds the run configuration, the HTTP client shared by version
/// resolution and downloads, and the container engine.
pub struct Bundler<'a, E> {
    config: &'a BuildConfig,
    client: Client,
    releases: ReleaseClient,
    engine: E,
    runtime_config: &'a RuntimeConfig,
}

impl<E> std::fmt::Debug for Bundler<'_, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bundler")
            .field("config", &self.config)
            .field("releases", &self.releases)
            .field("engine", &"<ImageEngine>")
            .finish()
    }
}

impl<'a, E: ImageEngine> Bundler<'a, E> {
    /// Creates a bundler for `config` using `engine` for the image stage.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn new(config: &'a BuildConfig, engine: E, runtime_config: &'a RuntimeConfig) -> Result<Self> {
        let client = http::build_client(config.http_timeout())?;
        let releases = ReleaseClient::from_config(client.clone(), config);

        Ok(Self {
            config,
            client,
            releases,
            engine,
            runtime_config,
        })
    }

    /// Returns the container engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Runs every stage in order.
    ///
    /// # Errors
    ///
    /// Version resolution, filesystem, image and archive failures end the
    /// run. Failed binary downloads do not; they are listed in the report.
    pub async fn run(&self) -> Result<BundleReport> {
        let config = self.config;
        let output = self.runtime_config;

        output.section("Resolving versions")?;
        let versions = self.releases.resolve_all(config).await?;
        output.indent(&format!("runtime:   {}", versions.runtime))?;
        output.indent(&format!("dashboard: {}", versions.dashboard))?;
        output.indent(&format!("cli:       {}", versions.cli))?;

        self.reset_workspace().await?;

        output.section("Downloading binaries")?;
        let downloads = assemble_binaries(&self.client, config, &versions, output).await?;

        let image = config
            .target_os()
            .bundles_container_image()
            .then(|| ImageRef::dapr(&versions.runtime));
        let image_file = match &image {
            Some(image) => {
                output.section("Saving container image")?;
                Some(fetch_image(&self.engine, image, &config.docker_dir(), output).await?)
            }
            None => {
                output.verbose_println(&format!(
                    "Skipping container image for {} target",
                    config.target_os()
                ))?;
                None
            }
        };

        output.section("Packaging")?;
        let manifest_path = config.manifest_path();
        let manifest = BundleManifest::new(&versions);
        write_manifest(&manifest_path, &manifest).await?;
        output.indent(&format!("✓ {}", manifest_path.display()))?;

        let archive_path = config.archive_path();
        {
            let bundle_dir = config.bundle_dir().to_path_buf();
            let archive_path = archive_path.clone();
            let format = config.archive_format();
            tokio::task::spawn_blocking(move || create_archive(&bundle_dir, &archive_path, format))
                .await
                .map_err(crate::bundler::Error::from)??;
        }
        let archive_sha256 = calculate_sha256(&archive_path).await?;
        log::info!("{}  {}", archive_sha256, archive_path.display());
        output.success(&format!("Created {}", archive_path.display()))?;

        Ok(BundleReport {
            versions,
            downloads,
            image_file,
            manifest_path,
            archive_path,
            archive_sha256,
        })
    }

    /// Deletes and recreates the bundle and archive directories.
    pub async fn reset_workspace(&self) -> Result<()> {
        for dir in [self.config.bundle_dir(), self.config.archive_dir()] {
            self.runtime_config
                .verbose_println(&format!("Resetting {}", dir.display()))?;
            fs::create_dir_all(dir, true).await?;
        }
        Ok(())
    }
}
