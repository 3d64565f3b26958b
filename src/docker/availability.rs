//! Docker binary lookup and daemon availability checking.

use crate::error::{BundlerError, CliError};
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::LazyLock;
use tokio::process::Command;
use tokio::time::timeout;

use super::config::{DOCKER_INFO_TIMEOUT, DOCKER_START_HELP};

/// Location of the `docker` executable, if it is on `PATH`.
///
/// Cached result to avoid repeated lookups.
pub static DOCKER_BINARY: LazyLock<Option<PathBuf>> = LazyLock::new(|| match which::which("docker") {
    Ok(path) => {
        log::debug!("Found docker at: {}", path.display());
        Some(path)
    }
    Err(e) => {
        log::debug!("docker not found in PATH: {}", e);
        None
    }
});

/// Checks if Docker is installed and the daemon is running.
///
/// # Returns
///
/// * `Ok(())` - Docker is available
/// * `Err` - Docker is not installed or daemon is not running
pub async fn check_docker_available(program: &std::path::Path) -> Result<(), BundlerError> {
    let status_result = timeout(
        DOCKER_INFO_TIMEOUT,
        Command::new(program)
            .arg("info")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status(),
    )
    .await;

    match status_result {
        // Timeout occurred
        Err(_) => Err(BundlerError::Cli(CliError::ExecutionFailed {
            command: "docker info".to_string(),
            reason: format!(
                "Docker daemon check timed out after {} seconds.\n\
                 {}",
                DOCKER_INFO_TIMEOUT.as_secs(),
                DOCKER_START_HELP
            ),
        })),

        // Command succeeded
        Ok(Ok(status)) if status.success() => Ok(()),

        // Docker command exists but daemon isn't responding
        Ok(Ok(status)) => Err(BundlerError::Cli(CliError::ExecutionFailed {
            command: "docker info".to_string(),
            reason: format!(
                "Docker daemon is not responding (exit code: {}).\n\
                 {}",
                status.code().unwrap_or(-1),
                DOCKER_START_HELP
            ),
        })),

        // Docker command not found - not installed
        Ok(Err(e)) => Err(BundlerError::Cli(CliError::ExecutionFailed {
            command: "docker".to_string(),
            reason: format!(
                "Docker command not found: {}\n\
                 Install from: https://docs.docker.com/get-docker/",
                e
            ),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_program_is_reported() {
        let err = check_docker_available(std::path::Path::new("/nonexistent/docker"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Docker command not found"));
    }
}
