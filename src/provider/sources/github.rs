//! GitHub Releases API provider

use std::collections::BTreeSet;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::error::FetchError;
use crate::provider::http::{build_client, check_status, rate_limited, read_json};
use crate::provider::release::{Field, Release};
use crate::provider::traits::Provider;
use crate::version::Version;

/// Default base URL for GitHub API
const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Response from the latest-release endpoint
#[derive(Debug, Deserialize)]
struct LatestRelease {
    tag_name: String,
    html_url: Option<String>,
    #[serde(default)]
    assets: Vec<Asset>,
}

#[derive(Debug, Deserialize)]
struct Asset {
    browser_download_url: String,
    #[serde(default)]
    download_count: u64,
}

#[derive(Debug, Deserialize)]
struct Contributor {
    login: String,
}

/// Provider for the latest release of a GitHub repository (`owner/repo`)
pub struct GitHubProvider {
    client: reqwest::Client,
    base_url: String,
    repository: String,
}

impl GitHubProvider {
    pub fn new(repository: &str) -> Self {
        Self::with_base_url(repository, DEFAULT_BASE_URL)
    }

    /// Creates a new GitHubProvider with a custom base URL
    pub fn with_base_url(repository: &str, base_url: &str) -> Self {
        Self {
            client: build_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            repository: repository.to_string(),
        }
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        // GitHub answers an exhausted anonymous quota with 403
        if response.status() == StatusCode::FORBIDDEN {
            return Err(rate_limited(&response));
        }

        Ok(response)
    }

    async fn fetch_latest(&self) -> Result<LatestRelease, FetchError> {
        let url = format!("{}/repos/{}/releases/latest", self.base_url, self.repository);
        let response = check_status(self.get(&url).await?, &self.repository)?;

        read_json(response, "GitHub release").await
    }

    /// Contributor logins, or `None` when the repository hides them
    async fn fetch_contributors(&self) -> Result<Option<BTreeSet<String>>, FetchError> {
        let url = format!("{}/repos/{}/contributors", self.base_url, self.repository);
        let response = self.get(&url).await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            // Empty repositories answer 204 without a body
            StatusCode::NO_CONTENT => return Ok(Some(BTreeSet::new())),
            _ => {}
        }

        let response = check_status(response, &self.repository)?;
        let contributors: Vec<Contributor> = read_json(response, "GitHub contributors").await?;

        Ok(Some(contributors.into_iter().map(|c| c.login).collect()))
    }
}

#[async_trait::async_trait]
impl Provider for GitHubProvider {
    fn name(&self) -> &'static str {
        "GitHub"
    }

    async fn fetch(&self) -> Result<Release, FetchError> {
        let latest = self.fetch_latest().await?;
        let contributors = self.fetch_contributors().await?;

        let asset = latest.assets.first();

        Ok(Release::new(Version::parse(&latest.tag_name))
            .with_changelog_link(latest.html_url)
            .with_download_link(asset.map(|a| a.browser_download_url.clone()))
            .with_download_count(asset.map(|a| a.download_count))
            .with_contributors(Field::from(contributors)))
    }
}
