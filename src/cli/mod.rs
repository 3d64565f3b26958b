//! Command line interface for daprbundle.
//!
//! Parses arguments, runs the bundling pipeline with the docker engine and
//! prints the end-of-run report.

mod args;
mod output;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;

use crate::bundler::{BuildConfig, BundleReport, Bundler, DownloadOutcome};
use crate::docker::DockerEngine;
use crate::error::{CliError, Result};

/// Exit code when `--strict` is set and a download failed.
pub const EXIT_INCOMPLETE: i32 = 2;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let runtime_config = RuntimeConfig::from(&args);
    let config = BuildConfig::try_from(&args)?;
    log::debug!(
        "Bundling for {}/{} into {}",
        config.target_os(),
        config.target_arch(),
        config.archive_path().display()
    );

    let bundler = Bundler::new(&config, DockerEngine::new(), &runtime_config)?;
    let report = bundler.run().await?;

    print_report(&report, config.strict(), &runtime_config)?;
    Ok(exit_code(&report, config.strict()))
}

/// Exit code for a finished run.
pub fn exit_code(report: &BundleReport, strict: bool) -> i32 {
    if strict && !report.is_complete() {
        EXIT_INCOMPLETE
    } else {
        0
    }
}

/// Prints the end-of-run summary, listing every failed download.
///
/// An incomplete bundle is a warning, or an error under `strict`.
pub fn print_report(
    report: &BundleReport,
    strict: bool,
    runtime_config: &RuntimeConfig,
) -> std::io::Result<()> {
    runtime_config.section("Summary")?;
    runtime_config.indent(&format!("archive: {}", report.archive_path.display()))?;
    runtime_config.indent(&format!("sha256:  {}", report.archive_sha256))?;
    if let Some(image) = &report.image_file {
        runtime_config.indent(&format!("image:   {}", image.display()))?;
    }

    if report.is_complete() {
        return runtime_config.success("All binaries downloaded");
    }

    let failed: Vec<_> = report.failed_downloads().collect();
    let headline = format!(
        "{} of {} downloads failed, bundle is incomplete:",
        failed.len(),
        report.downloads.len()
    );
    if strict {
        runtime_config.error(&headline)?;
    } else {
        runtime_config.warn(&headline)?;
    }
    for outcome in failed {
        if let DownloadOutcome::Failed { binary, url, reason } = outcome {
            runtime_config.indent(&format!("{} ({}): {}", binary, url, reason))?;
        }
    }
    Ok(())
}
