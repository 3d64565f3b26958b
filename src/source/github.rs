//! GitHub releases API client.

use super::{Project, ResolvedVersions, VersionSelector};
use crate::bundler::BuildConfig;
use crate::error::ReleaseError;
use reqwest::Client;
use semver::Version;
use serde::Deserialize;

/// Subset of a GitHub release object needed for version selection.
#[derive(Clone, Debug, Deserialize)]
pub struct GitHubRelease {
    /// Git tag, usually `v<semver>`
    pub tag_name: String,
    /// Unpublished draft releases are never selected
    #[serde(default)]
    pub draft: bool,
}

/// Picks the highest semantic version among non-draft releases.
///
/// A leading `v` is stripped from every tag before parsing. Tags that are
/// not valid semantic versions are skipped.
///
/// # Errors
///
/// [`ReleaseError::NoReleases`] when nothing eligible remains.
pub fn select_latest(project: Project, releases: &[GitHubRelease]) -> Result<String, ReleaseError> {
    let mut best: Option<(Version, &str)> = None;

    for release in releases.iter().filter(|r| !r.draft) {
        let tag = release.tag_name.strip_prefix('v').unwrap_or(&release.tag_name);
        let version = match Version::parse(tag) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Skipping {} release tag {:?}: {}", project, release.tag_name, e);
                continue;
            }
        };

        if best.as_ref().is_none_or(|(current, _)| version > *current) {
            best = Some((version, tag));
        }
    }

    best.map(|(_, tag)| tag.to_string())
        .ok_or_else(|| ReleaseError::NoReleases {
            project: project.to_string(),
        })
}

/// Client for the releases listing endpoint.
#[derive(Clone)]
pub struct ReleaseClient {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for ReleaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReleaseClient")
            .field("api_url", &self.api_url)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl ReleaseClient {
    /// Creates a client against `api_url` (no trailing slash).
    pub fn new(client: Client, api_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            token,
        }
    }

    /// Creates a client from the run configuration.
    pub fn from_config(client: Client, config: &BuildConfig) -> Self {
        Self::new(
            client,
            config.api_url(),
            config.github_token().map(str::to_string),
        )
    }

    /// Lists releases of `project`, newest page first.
    ///
    /// # Errors
    ///
    /// Transport failures and any non-success status are fatal.
    pub async fn list_releases(&self, project: Project) -> Result<Vec<GitHubRelease>, ReleaseError> {
        let url = format!(
            "{}/repos/{}/{}/releases",
            self.api_url, project.org, project.repo
        );
        log::debug!("Listing releases: {}", url);

        let mut request = self
            .client
            .get(&url)
            .query(&[("per_page", "100")])
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ReleaseError::HttpStatus {
                url,
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }

    /// Resolves one selector to a concrete version.
    ///
    /// Pinned versions are returned verbatim without touching the network.
    pub async fn resolve(
        &self,
        project: Project,
        selector: &VersionSelector,
    ) -> Result<String, ReleaseError> {
        match selector {
            VersionSelector::Pinned(version) => Ok(version.clone()),
            VersionSelector::Latest => {
                let releases = self.list_releases(project).await?;
                let version = select_latest(project, &releases)?;
                log::info!("Resolved latest {} release: {}", project, version);
                Ok(version)
            }
        }
    }

    /// Resolves runtime, dashboard and CLI selectors, in that order.
    pub async fn resolve_all(&self, config: &BuildConfig) -> Result<ResolvedVersions, ReleaseError> {
        Ok(ResolvedVersions {
            runtime: self.resolve(Project::DAPR, config.runtime_version()).await?,
            dashboard: self
                .resolve(Project::DASHBOARD, config.dashboard_version())
                .await?,
            cli: self.resolve(Project::CLI, config.cli_version()).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn release(tag: &str, draft: bool) -> GitHubRelease {
        GitHubRelease {
            tag_name: tag.to_string(),
            draft,
        }
    }

    #[test]
    fn selects_semver_maximum_not_first_listed() {
        let releases = vec![
            release("v1.9.6", false),
            release("v1.10.0", false),
            release("v1.11.0", true),
            release("v1.2.3", false),
        ];
        assert_eq!(select_latest(Project::DAPR, &releases).unwrap(), "1.10.0");
    }

    #[test]
    fn skips_non_semver_tags() {
        let releases = vec![release("nightly", false), release("0.9.0", false)];
        assert_eq!(select_latest(Project::DASHBOARD, &releases).unwrap(), "0.9.0");
    }

    #[test]
    fn drafts_only_means_no_releases() {
        let releases = vec![release("v1.0.0", true)];
        let err = select_latest(Project::CLI, &releases).unwrap_err();
        assert!(matches!(err, ReleaseError::NoReleases { .. }));
        assert!(err.to_string().contains("dapr/cli"));
    }

    #[tokio::test]
    async fn pinned_version_is_returned_unchanged() {
        // Unroutable API: a network call would fail the test.
        let client = ReleaseClient::new(Client::new(), "http://127.0.0.1:9", None);
        let version = client
            .resolve(Project::DAPR, &VersionSelector::pinned("1.6.0"))
            .await
            .unwrap();
        assert_eq!(version, "1.6.0");
    }

    #[tokio::test]
    async fn latest_is_resolved_from_api() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/dapr/dapr/releases")
            .match_query(Matcher::Any)
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"tag_name": "v1.7.0-rc.1", "draft": false, "prerelease": true},
                    {"tag_name": "v1.6.2", "draft": false, "prerelease": false},
                    {"tag_name": "v1.8.0", "draft": true, "prerelease": false}
                ]"#,
            )
            .create_async()
            .await;

        let client = ReleaseClient::new(Client::new(), server.url(), Some("secret".into()));
        let version = client
            .resolve(Project::DAPR, &VersionSelector::Latest)
            .await
            .unwrap();

        assert_eq!(version, "1.7.0-rc.1");
        assert_ne!(version, "latest");
        assert!(!version.starts_with('v'));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn http_error_is_fatal() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/dapr/cli/releases")
            .match_query(Matcher::Any)
            .with_status(403)
            .create_async()
            .await;

        let client = ReleaseClient::new(Client::new(), server.url(), None);
        let err = client
            .resolve(Project::CLI, &VersionSelector::Latest)
            .await
            .unwrap_err();
        assert!(matches!(err, ReleaseError::HttpStatus { status: 403, .. }));
    }

    #[tokio::test]
    async fn empty_release_list_is_fatal() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/dapr/dashboard/releases")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = ReleaseClient::new(Client::new(), server.url(), None);
        let err = client
            .resolve(Project::DASHBOARD, &VersionSelector::Latest)
            .await
            .unwrap_err();
        assert!(matches!(err, ReleaseError::NoReleases { .. }));
    }
}
