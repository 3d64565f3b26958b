//! Core BuildConfig struct and implementations.

use super::{ArchiveFormat, TargetArch, TargetOs};
use crate::source::VersionSelector;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Subdirectory of the bundle holding runtime, placement and dashboard archives.
pub const DIST_SUBDIR: &str = "dist";

/// Subdirectory of the bundle holding the saved container image.
pub const DOCKER_SUBDIR: &str = "docker";

/// Manifest file written at the bundle root.
pub const MANIFEST_FILE: &str = "details.json";

/// Prefix of the final archive name (`daprbundle_<os>_<arch>.<ext>`).
pub const ARCHIVE_PREFIX: &str = "daprbundle";

/// Default bundle directory.
pub const DEFAULT_BUNDLE_DIR: &str = "daprbundle";

/// Default directory for the final archive.
pub const DEFAULT_ARCHIVE_DIR: &str = "archive";

/// Default host serving release downloads.
pub const DEFAULT_DOWNLOAD_HOST: &str = "https://github.com";

/// Default GitHub REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default per-request HTTP timeout (10 minutes).
/// Release archives are tens of megabytes and CI runners can be slow.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(600);

/// Immutable configuration for one bundling run.
///
/// Constructed once via [`BuildConfigBuilder`](super::BuildConfigBuilder)
/// (or from parsed CLI arguments) and passed by reference to every stage.
///
/// # Examples
///
/// ```
/// use daprbundle::{BuildConfig, TargetArch, TargetOs};
///
/// # fn example() -> daprbundle::bundler::Result<()> {
/// let config = BuildConfig::builder(TargetOs::Linux, TargetArch::Amd64)
///     .bundle_dir("out/daprbundle")
///     .build()?;
/// assert_eq!(
///     config.archive_path(),
///     std::path::Path::new("archive/daprbundle_linux_amd64.tar.gz")
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct BuildConfig {
    pub(super) target_os: TargetOs,
    pub(super) target_arch: TargetArch,
    pub(super) runtime_version: VersionSelector,
    pub(super) dashboard_version: VersionSelector,
    pub(super) cli_version: VersionSelector,
    pub(super) bundle_dir: PathBuf,
    pub(super) archive_dir: PathBuf,
    pub(super) download_host: String,
    pub(super) api_url: String,
    pub(super) github_token: Option<String>,
    pub(super) http_timeout: Duration,
    pub(super) strict: bool,
}

impl std::fmt::Debug for BuildConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildConfig")
            .field("target_os", &self.target_os)
            .field("target_arch", &self.target_arch)
            .field("runtime_version", &self.runtime_version)
            .field("dashboard_version", &self.dashboard_version)
            .field("cli_version", &self.cli_version)
            .field("bundle_dir", &self.bundle_dir)
            .field("archive_dir", &self.archive_dir)
            .field("download_host", &self.download_host)
            .field("api_url", &self.api_url)
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .field("http_timeout", &self.http_timeout)
            .field("strict", &self.strict)
            .finish()
    }
}

impl BuildConfig {
    /// Starts a builder for the given target platform.
    pub fn builder(target_os: TargetOs, target_arch: TargetArch) -> super::BuildConfigBuilder {
        super::BuildConfigBuilder::new(target_os, target_arch)
    }

    /// Returns the target operating system.
    pub fn target_os(&self) -> TargetOs {
        self.target_os
    }

    /// Returns the target architecture.
    pub fn target_arch(&self) -> TargetArch {
        self.target_arch
    }

    /// Returns the archive format for this target.
    pub fn archive_format(&self) -> ArchiveFormat {
        self.target_os.archive_format()
    }

    /// Version selector for `daprd` and `placement`.
    pub fn runtime_version(&self) -> &VersionSelector {
        &self.runtime_version
    }

    /// Version selector for the dashboard.
    pub fn dashboard_version(&self) -> &VersionSelector {
        &self.dashboard_version
    }

    /// Version selector for the CLI.
    pub fn cli_version(&self) -> &VersionSelector {
        &self.cli_version
    }

    /// Root of the bundle tree.
    pub fn bundle_dir(&self) -> &Path {
        &self.bundle_dir
    }

    /// `<bundle>/dist`
    pub fn dist_dir(&self) -> PathBuf {
        self.bundle_dir.join(DIST_SUBDIR)
    }

    /// `<bundle>/docker`
    pub fn docker_dir(&self) -> PathBuf {
        self.bundle_dir.join(DOCKER_SUBDIR)
    }

    /// `<bundle>/details.json`
    pub fn manifest_path(&self) -> PathBuf {
        self.bundle_dir.join(MANIFEST_FILE)
    }

    /// Directory receiving the final archive.
    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    /// File name of the final archive.
    pub fn archive_file_name(&self) -> String {
        format!(
            "{}_{}_{}.{}",
            ARCHIVE_PREFIX,
            self.target_os,
            self.target_arch,
            self.archive_format().extension()
        )
    }

    /// Full path of the final archive.
    pub fn archive_path(&self) -> PathBuf {
        self.archive_dir.join(self.archive_file_name())
    }

    /// Host serving `/<org>/<repo>/releases/download/...`.
    pub fn download_host(&self) -> &str {
        &self.download_host
    }

    /// GitHub REST API base URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Optional API token.
    pub fn github_token(&self) -> Option<&str> {
        self.github_token.as_deref()
    }

    /// Per-request HTTP timeout.
    pub fn http_timeout(&self) -> Duration {
        self.http_timeout
    }

    /// Whether failed downloads should fail the run.
    pub fn strict(&self) -> bool {
        self.strict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_name_follows_os_and_arch() {
        let config = BuildConfig::builder(TargetOs::Windows, TargetArch::Arm64)
            .build()
            .unwrap();
        assert_eq!(config.archive_file_name(), "daprbundle_windows_arm64.zip");

        let config = BuildConfig::builder(TargetOs::Darwin, TargetArch::Amd64)
            .build()
            .unwrap();
        assert_eq!(config.archive_file_name(), "daprbundle_darwin_amd64.tar.gz");
    }

    #[test]
    fn layout_is_rooted_at_bundle_dir() {
        let config = BuildConfig::builder(TargetOs::Linux, TargetArch::Arm)
            .bundle_dir("/tmp/b")
            .build()
            .unwrap();
        assert_eq!(config.dist_dir(), Path::new("/tmp/b/dist"));
        assert_eq!(config.docker_dir(), Path::new("/tmp/b/docker"));
        assert_eq!(config.manifest_path(), Path::new("/tmp/b/details.json"));
    }
}
