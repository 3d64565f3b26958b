//! Builder for constructing BuildConfig.

use super::core::{
    DEFAULT_API_URL, DEFAULT_ARCHIVE_DIR, DEFAULT_BUNDLE_DIR, DEFAULT_DOWNLOAD_HOST,
    DEFAULT_HTTP_TIMEOUT,
};
use super::{BuildConfig, TargetArch, TargetOs};
use crate::bundler::error::ErrorExt;
use crate::source::VersionSelector;
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Builder for constructing [`BuildConfig`].
///
/// Target OS and architecture are required up front; everything else has a
/// default matching the command line defaults (all versions `latest`,
/// `daprbundle/` bundle directory, `archive/` archive directory).
///
/// # Examples
///
/// ```
/// use daprbundle::{BuildConfig, TargetArch, TargetOs};
/// use daprbundle::source::VersionSelector;
///
/// # fn example() -> daprbundle::bundler::Result<()> {
/// let config = BuildConfig::builder(TargetOs::Linux, TargetArch::Amd64)
///     .runtime_version(VersionSelector::pinned("1.6.0"))
///     .archive_dir("dist-archive")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BuildConfigBuilder {
    target_os: TargetOs,
    target_arch: TargetArch,
    runtime_version: VersionSelector,
    dashboard_version: VersionSelector,
    cli_version: VersionSelector,
    bundle_dir: PathBuf,
    archive_dir: PathBuf,
    download_host: String,
    api_url: String,
    github_token: Option<String>,
    http_timeout: Duration,
    strict: bool,
}

impl BuildConfigBuilder {
    /// Creates a new builder for the given target platform.
    pub fn new(target_os: TargetOs, target_arch: TargetArch) -> Self {
        Self {
            target_os,
            target_arch,
            runtime_version: VersionSelector::Latest,
            dashboard_version: VersionSelector::Latest,
            cli_version: VersionSelector::Latest,
            bundle_dir: PathBuf::from(DEFAULT_BUNDLE_DIR),
            archive_dir: PathBuf::from(DEFAULT_ARCHIVE_DIR),
            download_host: DEFAULT_DOWNLOAD_HOST.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            github_token: None,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            strict: false,
        }
    }

    /// Sets the runtime (`daprd`, `placement`, container image) version.
    pub fn runtime_version(mut self, version: VersionSelector) -> Self {
        self.runtime_version = version;
        self
    }

    /// Sets the dashboard version.
    pub fn dashboard_version(mut self, version: VersionSelector) -> Self {
        self.dashboard_version = version;
        self
    }

    /// Sets the CLI version.
    pub fn cli_version(mut self, version: VersionSelector) -> Self {
        self.cli_version = version;
        self
    }

    /// Sets the bundle directory.
    pub fn bundle_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.bundle_dir = path.as_ref().to_path_buf();
        self
    }

    /// Sets the directory receiving the final archive.
    pub fn archive_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.archive_dir = path.as_ref().to_path_buf();
        self
    }

    /// Sets the release download host. A trailing slash is dropped.
    pub fn download_host(mut self, host: impl Into<String>) -> Self {
        self.download_host = host.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the GitHub API base URL. A trailing slash is dropped.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the API token sent as a bearer token.
    pub fn github_token(mut self, token: Option<String>) -> Self {
        self.github_token = token.filter(|t| !t.is_empty());
        self
    }

    /// Sets the per-request HTTP timeout.
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Fail the run when any binary download failed.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Both directories are wiped at the start of every run, so they must
    /// be non-empty, neither may contain the other, and neither may be the
    /// working directory or one of its parents. Paths are compared after
    /// lexical normalization, so `./daprbundle` and `daprbundle` collide.
    pub fn build(self) -> crate::bundler::Result<BuildConfig> {
        let cwd =
            std::env::current_dir().fs_context("reading current directory", Path::new("."))?;
        self.check_directories(&cwd)?;

        Ok(BuildConfig {
            target_os: self.target_os,
            target_arch: self.target_arch,
            runtime_version: self.runtime_version,
            dashboard_version: self.dashboard_version,
            cli_version: self.cli_version,
            bundle_dir: self.bundle_dir,
            archive_dir: self.archive_dir,
            download_host: self.download_host,
            api_url: self.api_url,
            github_token: self.github_token,
            http_timeout: self.http_timeout,
            strict: self.strict,
        })
    }

    fn check_directories(&self, cwd: &Path) -> crate::bundler::Result<()> {
        if self.bundle_dir.as_os_str().is_empty() || self.archive_dir.as_os_str().is_empty() {
            crate::bail!("bundle and archive directories must not be empty");
        }

        let bundle_dir = self
            .bundle_dir
            .absolutize_from(cwd)
            .fs_context("resolving", &self.bundle_dir)?;
        let archive_dir = self
            .archive_dir
            .absolutize_from(cwd)
            .fs_context("resolving", &self.archive_dir)?;

        for (given, resolved) in [
            (&self.bundle_dir, &bundle_dir),
            (&self.archive_dir, &archive_dir),
        ] {
            if cwd.starts_with(resolved) {
                crate::bail!(
                    "directory {} is the working directory or one of its parents",
                    given.display()
                );
            }
        }
        if archive_dir.starts_with(&bundle_dir) || bundle_dir.starts_with(&archive_dir) {
            crate::bail!(
                "bundle directory {} and archive directory {} must not contain each other",
                self.bundle_dir.display(),
                self.archive_dir.display()
            );
        }
        Ok(())
    }
}
