//! Release sources and version resolution.
//!
//! A [`Project`] names a GitHub repository publishing release assets; a
//! [`VersionSelector`] is either a pinned version or `latest`, which
//! [`ReleaseClient`] resolves against the releases API.

mod github;

pub use github::{GitHubRelease, ReleaseClient, select_latest};

use std::fmt;
use std::str::FromStr;

/// Sentinel accepted on the command line for "newest release".
pub const LATEST: &str = "latest";

/// A GitHub repository that publishes release assets.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Project {
    /// Owning organization
    pub org: &'static str,
    /// Repository name
    pub repo: &'static str,
}

impl Project {
    /// Runtime repository: `daprd`, `placement` and the container image.
    pub const DAPR: Project = Project::new("dapr", "dapr");
    /// Dashboard repository.
    pub const DASHBOARD: Project = Project::new("dapr", "dashboard");
    /// CLI repository.
    pub const CLI: Project = Project::new("dapr", "cli");

    /// Creates a project reference.
    pub const fn new(org: &'static str, repo: &'static str) -> Self {
        Self { org, repo }
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.org, self.repo)
    }
}

/// Which release of a project to bundle.
///
/// Parses `latest`, an empty or blank string as [`VersionSelector::Latest`].
#[derive(Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum VersionSelector {
    /// Newest non-draft release by semantic version ordering
    #[default]
    Latest,
    /// An exact version, used verbatim
    Pinned(String),
}

impl VersionSelector {
    /// Shorthand for [`VersionSelector::Pinned`].
    pub fn pinned(version: impl Into<String>) -> Self {
        VersionSelector::Pinned(version.into())
    }
}

impl FromStr for VersionSelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // CI workflows pass unset inputs as empty strings
        if s.is_empty() || s == LATEST {
            Ok(VersionSelector::Latest)
        } else {
            Ok(VersionSelector::Pinned(s.to_string()))
        }
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSelector::Latest => f.write_str(LATEST),
            VersionSelector::Pinned(v) => f.write_str(v),
        }
    }
}

/// Concrete versions for the three bundled projects.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
pub struct ResolvedVersions {
    /// `dapr/dapr` version (daprd, placement, container image)
    pub runtime: String,
    /// `dapr/dashboard` version
    pub dashboard: String,
    /// `dapr/cli` version
    pub cli: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_latest_sentinel() {
        assert_eq!("latest".parse::<VersionSelector>(), Ok(VersionSelector::Latest));
        assert_eq!(
            "1.6.0".parse::<VersionSelector>(),
            Ok(VersionSelector::pinned("1.6.0"))
        );
        assert_eq!("".parse::<VersionSelector>(), Ok(VersionSelector::Latest));
        assert_eq!("  ".parse::<VersionSelector>(), Ok(VersionSelector::Latest));
    }

    #[test]
    fn project_displays_as_slug() {
        assert_eq!(Project::DASHBOARD.to_string(), "dapr/dashboard");
    }
}
