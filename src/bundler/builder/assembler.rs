//! Release asset naming and binary acquisition.
//!
//! Four release archives make up a bundle. Runtime, placement and dashboard
//! archives are stored as downloaded under `<bundle>/dist`; the CLI archive
//! lands in the bundle root and is unpacked there, leaving the bare `dapr`
//! executable.
//!
//! A failed download does not abort the run. Each download yields a
//! [`DownloadOutcome`] and failures are reported together at the end.

use crate::bundler::archive::extract_archive;
use crate::bundler::error::Result;
use crate::bundler::settings::{BuildConfig, TargetArch, TargetOs};
use crate::bundler::utils::{fs, http};
use crate::cli::RuntimeConfig;
use crate::source::{Project, ResolvedVersions};
use reqwest::Client;
use std::path::{Path, PathBuf};

/// Binary name of the CLI, whose archive is unpacked in place.
pub const CLI_BINARY: &str = "dapr";

/// Which resolved version applies to an artifact.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Component {
    /// `dapr/dapr` version
    Runtime,
    /// `dapr/dashboard` version
    Dashboard,
    /// `dapr/cli` version
    Cli,
}

/// Where in the bundle an artifact is stored.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Location {
    /// `<bundle>/dist`
    Dist,
    /// `<bundle>` itself
    Root,
}

/// One release archive to download.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BinaryArtifact {
    /// Logical binary name, the first part of the asset file name
    pub binary: &'static str,
    /// Repository publishing the asset
    pub project: Project,
    /// Version source
    pub component: Component,
    /// Destination inside the bundle
    pub location: Location,
}

impl BinaryArtifact {
    /// Picks this artifact's version out of the resolved set.
    pub fn version<'v>(&self, versions: &'v ResolvedVersions) -> &'v str {
        match self.component {
            Component::Runtime => &versions.runtime,
            Component::Dashboard => &versions.dashboard,
            Component::Cli => &versions.cli,
        }
    }

    /// Destination directory for this artifact.
    pub fn dest_dir(&self, config: &BuildConfig) -> PathBuf {
        match self.location {
            Location::Dist => config.dist_dir(),
            Location::Root => config.bundle_dir().to_path_buf(),
        }
    }
}

/// The four archives of a bundle, in download order.
pub fn bundle_artifacts() -> [BinaryArtifact; 4] {
    [
        BinaryArtifact {
            binary: "daprd",
            project: Project::DAPR,
            component: Component::Runtime,
            location: Location::Dist,
        },
        BinaryArtifact {
            binary: "placement",
            project: Project::DAPR,
            component: Component::Runtime,
            location: Location::Dist,
        },
        BinaryArtifact {
            binary: "dashboard",
            project: Project::DASHBOARD,
            component: Component::Dashboard,
            location: Location::Dist,
        },
        BinaryArtifact {
            binary: CLI_BINARY,
            project: Project::CLI,
            component: Component::Cli,
            location: Location::Root,
        },
    ]
}

/// Release asset file name: `<binary>_<os>_<arch>.<zip|tar.gz>`.
pub fn archive_file_name(binary: &str, os: TargetOs, arch: TargetArch) -> String {
    format!("{}_{}_{}.{}", binary, os, arch, os.archive_format().extension())
}

/// Release asset URL: `<host>/<org>/<repo>/releases/download/v<version>/<file>`.
pub fn release_download_url(host: &str, project: Project, version: &str, file_name: &str) -> String {
    format!(
        "{}/{}/{}/releases/download/v{}/{}",
        host, project.org, project.repo, version, file_name
    )
}

/// Result of one asset download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Asset written to disk
    Downloaded {
        /// Logical binary name
        binary: &'static str,
        /// Source URL
        url: String,
        /// Written file
        path: PathBuf,
        /// Bytes written
        bytes: u64,
    },
    /// Download failed; the bundle is incomplete
    Failed {
        /// Logical binary name
        binary: &'static str,
        /// Source URL
        url: String,
        /// Error description
        reason: String,
    },
}

impl DownloadOutcome {
    /// Logical binary name.
    pub fn binary(&self) -> &'static str {
        match self {
            DownloadOutcome::Downloaded { binary, .. } | DownloadOutcome::Failed { binary, .. } => {
                binary
            }
        }
    }

    /// Source URL.
    pub fn url(&self) -> &str {
        match self {
            DownloadOutcome::Downloaded { url, .. } | DownloadOutcome::Failed { url, .. } => url,
        }
    }

    /// Whether the download failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, DownloadOutcome::Failed { .. })
    }
}

/// Downloads one release archive into its destination directory.
///
/// Only a failure to create the destination directory is an error; HTTP
/// failures are returned as [`DownloadOutcome::Failed`].
pub async fn download_binary(
    client: &Client,
    config: &BuildConfig,
    artifact: &BinaryArtifact,
    version: &str,
    runtime_config: &RuntimeConfig,
) -> Result<DownloadOutcome> {
    let dest_dir = artifact.dest_dir(config);
    fs::create_dir_all(&dest_dir, false).await?;

    let file_name = archive_file_name(artifact.binary, config.target_os(), config.target_arch());
    let url = release_download_url(config.download_host(), artifact.project, version, &file_name);
    let path = dest_dir.join(&file_name);

    runtime_config.progress(&format!("Downloading {} {}", artifact.binary, version))?;
    runtime_config.verbose_println(&format!("  {}", url))?;

    match http::download_to_file(client, &url, &path).await {
        Ok(bytes) => {
            runtime_config.indent(&format!("✓ {} ({} bytes)", file_name, bytes))?;
            Ok(DownloadOutcome::Downloaded {
                binary: artifact.binary,
                url,
                path,
                bytes,
            })
        }
        Err(e) => {
            log::error!("Download of {} failed: {}", url, e);
            runtime_config.error(&format!("Failed to download {}: {}", file_name, e))?;
            Ok(DownloadOutcome::Failed {
                binary: artifact.binary,
                url,
                reason: e.to_string(),
            })
        }
    }
}

/// Downloads all bundle archives and unpacks the CLI into the bundle root.
///
/// Returns one outcome per artifact of [`bundle_artifacts`], in order.
///
/// # Errors
///
/// Directory creation and CLI extraction failures are fatal.
pub async fn assemble_binaries(
    client: &Client,
    config: &BuildConfig,
    versions: &ResolvedVersions,
    runtime_config: &RuntimeConfig,
) -> Result<Vec<DownloadOutcome>> {
    let mut outcomes = Vec::with_capacity(4);
    for artifact in bundle_artifacts() {
        let version = artifact.version(versions);
        outcomes.push(download_binary(client, config, &artifact, version, runtime_config).await?);
    }

    let cli_archive = outcomes.iter().find_map(|outcome| match outcome {
        DownloadOutcome::Downloaded { binary, path, .. } if *binary == CLI_BINARY => {
            Some(path.clone())
        }
        _ => None,
    });

    if let Some(archive) = cli_archive {
        unpack_cli(&archive, config, runtime_config).await?;
    }

    Ok(outcomes)
}

/// Unpacks the CLI archive into the bundle root and deletes the archive.
async fn unpack_cli(archive: &Path, config: &BuildConfig, runtime_config: &RuntimeConfig) -> Result<()> {
    runtime_config.progress(&format!("Unpacking {}", archive.display()))?;

    let files = {
        let archive = archive.to_path_buf();
        let dest = config.bundle_dir().to_path_buf();
        let format = config.archive_format();
        tokio::task::spawn_blocking(move || extract_archive(&archive, &dest, format)).await??
    };

    for file in &files {
        runtime_config.verbose_println(&format!("  extracted {}", file.display()))?;
    }

    fs::remove_file(archive).await
}
