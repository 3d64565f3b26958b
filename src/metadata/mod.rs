//! Bundle manifest (`details.json`).
//!
//! Records the resolved versions and the layout of the bundle so that an
//! offline installer can find binaries and the image without guessing.

use crate::bundler::settings::{DIST_SUBDIR, DOCKER_SUBDIR};
use crate::bundler::utils::fs::set_readonly;
use crate::docker::ImageRef;
use crate::error::{BundlerError, CliError, Result};
use crate::source::ResolvedVersions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Contents of `details.json`.
///
/// ```json
/// {
///   "daprd": "1.7.0",
///   "dashboard": "0.10.0",
///   "cli": "1.7.0",
///   "daprBinarySubDir": "dist",
///   "dockerImageSubDir": "docker",
///   "daprImageName": "daprio/dapr:1.7.0",
///   "daprImageFileName": "daprio-dapr-1.7.0.tar.gz"
/// }
/// ```
///
/// The image keys name the runtime image even for darwin bundles, which
/// ship no image file; installers check `dockerImageSubDir` for the file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleManifest {
    /// Runtime version
    pub daprd: String,

    /// Dashboard version
    pub dashboard: String,

    /// CLI version
    pub cli: String,

    /// Subdirectory holding the runtime, placement and dashboard archives
    pub dapr_binary_sub_dir: String,

    /// Subdirectory holding the image tarball
    pub docker_image_sub_dir: String,

    /// Runtime image reference
    pub dapr_image_name: String,

    /// Runtime image tarball file name
    pub dapr_image_file_name: String,
}

impl BundleManifest {
    /// Builds the manifest for resolved versions.
    pub fn new(versions: &ResolvedVersions) -> Self {
        let image = ImageRef::dapr(&versions.runtime);
        Self {
            daprd: versions.runtime.clone(),
            dashboard: versions.dashboard.clone(),
            cli: versions.cli.clone(),
            dapr_binary_sub_dir: DIST_SUBDIR.to_string(),
            docker_image_sub_dir: DOCKER_SUBDIR.to_string(),
            dapr_image_name: image.reference(),
            dapr_image_file_name: image.file_name(),
        }
    }
}

/// Writes `manifest` to `path` and makes the file read-only.
pub async fn write_manifest(path: &Path, manifest: &BundleManifest) -> Result<()> {
    let json = serde_json::to_string_pretty(manifest)?;
    tokio::fs::write(path, json).await.map_err(|e| {
        BundlerError::Cli(CliError::ExecutionFailed {
            command: "write_manifest".to_string(),
            reason: format!("Failed to write {}: {}", path.display(), e),
        })
    })?;

    set_readonly(path).await?;
    log::debug!("Wrote manifest {}", path.display());
    Ok(())
}

/// Reads a manifest written by [`write_manifest`].
pub async fn load_manifest(path: &Path) -> Result<BundleManifest> {
    let json = tokio::fs::read_to_string(path).await.map_err(|e| {
        BundlerError::Cli(CliError::ExecutionFailed {
            command: "read_manifest".to_string(),
            reason: format!("Failed to read {}: {}", path.display(), e),
        })
    })?;
    Ok(serde_json::from_str(&json)?)
}
