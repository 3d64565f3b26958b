//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap, with validation
//! and conversion into the immutable [`BuildConfig`].

use crate::bundler::settings::{
    DEFAULT_API_URL, DEFAULT_ARCHIVE_DIR, DEFAULT_BUNDLE_DIR, DEFAULT_DOWNLOAD_HOST,
};
use crate::bundler::{BuildConfig, TargetArch, TargetOs};
use crate::source::VersionSelector;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Offline release bundler for Dapr
#[derive(Parser, Debug)]
#[command(
    name = "daprbundle",
    version,
    about = "Offline release bundler for Dapr",
    long_about = "Downloads the Dapr runtime, placement, dashboard and CLI release archives for one
OS/architecture pair, saves the daprio/dapr container image, writes details.json and
compresses everything into archive/daprbundle_<os>_<arch>.<zip|tar.gz>.

Usage:
  daprbundle --runtime_os linux --runtime_arch amd64
  daprbundle --runtime_os windows --runtime_arch amd64 --runtime_ver 1.7.0 --cli_ver 1.7.0
  daprbundle --runtime_os darwin --runtime_arch arm64 --archive_dir out

Exit code 0 = archive created. Failed binary downloads are reported but only
change the exit code (2) with --strict."
)]
pub struct Args {
    /// Target operating system
    #[arg(long = "runtime_os", value_enum, value_name = "OS")]
    pub runtime_os: TargetOs,

    /// Target architecture
    #[arg(long = "runtime_arch", value_enum, value_name = "ARCH")]
    pub runtime_arch: TargetArch,

    /// Runtime (daprd, placement, image) version; "latest" or empty for the newest release
    #[arg(long = "runtime_ver", default_value = "latest", value_name = "VERSION")]
    pub runtime_ver: VersionSelector,

    /// Dashboard version, or "latest"
    #[arg(long = "dashboard_ver", default_value = "latest", value_name = "VERSION")]
    pub dashboard_ver: VersionSelector,

    /// CLI version, or "latest"
    #[arg(long = "cli_ver", default_value = "latest", value_name = "VERSION")]
    pub cli_ver: VersionSelector,

    /// Output directory for the final archive
    #[arg(long = "archive_dir", default_value = DEFAULT_ARCHIVE_DIR, value_name = "DIR")]
    pub archive_dir: PathBuf,

    /// Directory the bundle tree is assembled in
    #[arg(long = "bundle_dir", default_value = DEFAULT_BUNDLE_DIR, value_name = "DIR")]
    pub bundle_dir: PathBuf,

    /// GitHub token for the releases API (raises rate limits)
    #[arg(long = "github_token", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// GitHub REST API base URL
    #[arg(long = "github_api_url", env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub github_api_url: String,

    /// Host serving release downloads
    #[arg(long = "download_host", default_value = DEFAULT_DOWNLOAD_HOST)]
    pub download_host: String,

    /// Per-request HTTP timeout in seconds
    #[arg(long = "http_timeout", default_value_t = 600, value_name = "SECONDS")]
    pub http_timeout: u64,

    /// Exit with status 2 when any binary download failed
    #[arg(long)]
    pub strict: bool,

    /// Print per-file details
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        for (flag, url) in [
            ("--github_api_url", &self.github_api_url),
            ("--download_host", &self.download_host),
        ] {
            let parsed = url::Url::parse(url).map_err(|e| format!("Invalid {flag} {url}: {e}"))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(format!("Invalid {flag} {url}: scheme must be http or https"));
            }
        }

        if self.http_timeout == 0 {
            return Err("--http_timeout must be greater than zero".to_string());
        }

        Ok(())
    }
}

impl TryFrom<&Args> for BuildConfig {
    type Error = crate::bundler::Error;

    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        BuildConfig::builder(args.runtime_os, args.runtime_arch)
            .runtime_version(args.runtime_ver.clone())
            .dashboard_version(args.dashboard_ver.clone())
            .cli_version(args.cli_ver.clone())
            .bundle_dir(&args.bundle_dir)
            .archive_dir(&args.archive_dir)
            .github_token(args.github_token.clone())
            .api_url(args.github_api_url.as_str())
            .download_host(args.download_host.as_str())
            .http_timeout(Duration::from_secs(args.http_timeout))
            .strict(args.strict)
            .build()
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self::new(super::OutputManager::new(args.verbose, false))
    }
}

impl RuntimeConfig {
    /// Wraps an output manager
    pub fn new(output: super::OutputManager) -> Self {
        Self { output }
    }

    /// Print verbose message if in verbose mode
    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print warning message if not in quiet mode
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Print error message
    pub fn error(&self, message: &str) -> std::io::Result<()> {
        self.output.error(message)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    /// Print section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.output.section(title)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}
