//! Container engine port and the docker CLI implementation.

use crate::bundler::archive::gzip_file;
use crate::bundler::utils::fs::remove_file;
use crate::error::{BundlerError, CliError};
use std::ffi::OsStr;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use super::availability::{DOCKER_BINARY, check_docker_available};
use super::config::{DOCKER_PULL_TIMEOUT, DOCKER_SAVE_TIMEOUT};
use super::image::ImageRef;

/// Operations the bundler needs from a container engine.
///
/// Every failure is fatal to the run.
pub trait ImageEngine {
    /// Verifies the engine can be used. Defaults to always available.
    fn check_available(&self) -> impl Future<Output = Result<(), BundlerError>> + Send {
        async { Ok(()) }
    }

    /// Pulls `image` into the local image store.
    fn pull(&self, image: &ImageRef) -> impl Future<Output = Result<(), BundlerError>> + Send;

    /// Saves `image` to `dest` as a gzip-compressed tarball.
    fn save(
        &self,
        image: &ImageRef,
        dest: &Path,
    ) -> impl Future<Output = Result<(), BundlerError>> + Send;
}

/// [`ImageEngine`] backed by the `docker` CLI.
#[derive(Clone, Debug)]
pub struct DockerEngine {
    program: PathBuf,
    pull_timeout: Duration,
    save_timeout: Duration,
}

impl Default for DockerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DockerEngine {
    /// Uses the `docker` found on `PATH`, falling back to a bare `docker`
    /// so the spawn error names the missing command.
    pub fn new() -> Self {
        let program = DOCKER_BINARY
            .clone()
            .unwrap_or_else(|| PathBuf::from("docker"));
        Self::with_program(program)
    }

    /// Uses an explicit engine executable (e.g. a docker-compatible CLI).
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            pull_timeout: DOCKER_PULL_TIMEOUT,
            save_timeout: DOCKER_SAVE_TIMEOUT,
        }
    }

    /// Runs one engine subcommand, failing on spawn error, timeout or
    /// non-zero exit.
    async fn run(&self, args: &[&OsStr], limit: Duration) -> Result<(), BundlerError> {
        let command = format!(
            "docker {}",
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );
        log::debug!("Running: {}", command);

        let output = timeout(
            limit,
            Command::new(&self.program)
                .args(args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| {
            BundlerError::Cli(CliError::ExecutionFailed {
                command: command.clone(),
                reason: format!("timed out after {} seconds", limit.as_secs()),
            })
        })?
        .map_err(|e| {
            BundlerError::Cli(CliError::ExecutionFailed {
                command: command.clone(),
                reason: e.to_string(),
            })
        })?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            log::debug!("{}", line);
        }

        if !output.status.success() {
            return Err(BundlerError::Cli(CliError::ExecutionFailed {
                command,
                reason: format!(
                    "exit code {}: {}",
                    output.status.code().unwrap_or(-1),
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            }));
        }

        Ok(())
    }
}

impl ImageEngine for DockerEngine {
    async fn check_available(&self) -> Result<(), BundlerError> {
        check_docker_available(&self.program).await
    }

    async fn pull(&self, image: &ImageRef) -> Result<(), BundlerError> {
        let reference = image.reference();
        self.run(&[OsStr::new("pull"), OsStr::new(&reference)], self.pull_timeout)
            .await
    }

    async fn save(&self, image: &ImageRef, dest: &Path) -> Result<(), BundlerError> {
        // `docker save` writes a plain tar; compress it afterwards.
        let mut raw = dest.as_os_str().to_owned();
        raw.push(".raw");
        let raw = PathBuf::from(raw);

        let reference = image.reference();
        self.run(
            &[
                OsStr::new("save"),
                OsStr::new("-o"),
                raw.as_os_str(),
                OsStr::new(&reference),
            ],
            self.save_timeout,
        )
        .await?;

        let compressed = {
            let raw = raw.clone();
            let dest = dest.to_path_buf();
            tokio::task::spawn_blocking(move || gzip_file(&raw, &dest))
                .await
                .map_err(anyhow::Error::from)
        };
        remove_file(&raw).await?;

        let bytes = compressed??;
        log::info!("Saved {} ({} bytes uncompressed)", dest.display(), bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_engine_fails_pull() {
        let engine = DockerEngine::with_program("/nonexistent/docker");
        let err = engine
            .pull(&ImageRef::new("daprio/dapr", "1.7.0"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BundlerError::Cli(CliError::ExecutionFailed { ref command, .. })
                if command == "docker pull daprio/dapr:1.7.0"
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_is_fatal() {
        // `false` ignores its arguments and exits 1.
        let engine = DockerEngine::with_program("false");
        let err = engine
            .pull(&ImageRef::new("daprio/dapr", "1.7.0"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("exit code 1"));
    }
}
