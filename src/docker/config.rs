//! Docker timeouts and help text.

use std::time::Duration;

/// Timeout for Docker info check (5 seconds)
/// Quick daemon availability check shouldn't take long
pub const DOCKER_INFO_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for `docker pull` (30 minutes)
/// Image layers are large and registries can be slow from CI runners
pub const DOCKER_PULL_TIMEOUT: Duration = Duration::from_secs(1800);

/// Timeout for `docker save` (30 minutes)
pub const DOCKER_SAVE_TIMEOUT: Duration = Duration::from_secs(1800);

/// Platform-specific Docker startup instructions
#[cfg(target_os = "macos")]
pub const DOCKER_START_HELP: &str = "Start Docker Desktop from Applications or Spotlight";

#[cfg(target_os = "linux")]
pub const DOCKER_START_HELP: &str = "Start Docker daemon: sudo systemctl start docker";

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
pub const DOCKER_START_HELP: &str = "Start Docker Desktop";
