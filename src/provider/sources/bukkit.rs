//! Bukkit provider backed by the CurseForge servermods feed
//!
//! The feed lists every file of a project, oldest first. The changelog URL
//! needs the project slug, which only shows up in the redirect target of the
//! numeric dev.bukkit.org project page.

use serde::Deserialize;
use tracing::debug;

use crate::error::FetchError;
use crate::provider::http::{build_client, check_status, last_segment, read_json};
use crate::provider::release::Release;
use crate::provider::traits::Provider;
use crate::version::Version;

/// Default base URL for the servermods API
const DEFAULT_API_URL: &str = "https://api.curseforge.com";

/// Default base URL for dev.bukkit.org project pages
const DEFAULT_SITE_URL: &str = "https://dev.bukkit.org";

const CHANGELOG_URL: &str = "https://www.curseforge.com/minecraft/bukkit-plugins";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerModFile {
    name: String,
    download_url: String,
    file_url: String,
}

/// Provider for a dev.bukkit.org project
pub struct BukkitProvider {
    client: reqwest::Client,
    api_url: String,
    site_url: String,
    project_id: u32,
    api_key: Option<String>,
}

impl BukkitProvider {
    pub fn new(project_id: u32) -> Self {
        Self::with_base_urls(project_id, DEFAULT_API_URL, DEFAULT_SITE_URL)
    }

    /// Creates a new BukkitProvider with custom API and site URLs
    pub fn with_base_urls(project_id: u32, api_url: &str, site_url: &str) -> Self {
        Self {
            client: build_client(),
            api_url: api_url.trim_end_matches('/').to_string(),
            site_url: site_url.trim_end_matches('/').to_string(),
            project_id,
            api_key: None,
        }
    }

    /// Sends `X-API-Key` with feed requests. Empty keys are ignored.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        self.api_key = (!api_key.trim().is_empty()).then_some(api_key);
        self
    }

    async fn fetch_latest_file(&self) -> Result<ServerModFile, FetchError> {
        let url = format!(
            "{}/servermods/files?projectIds={}",
            self.api_url, self.project_id
        );
        debug!("Fetching {}", url);

        let mut request = self.client.get(&url);
        if let Some(api_key) = &self.api_key {
            request = request.header("X-API-Key", api_key);
        }

        let response = check_status(request.send().await?, &self.project_id.to_string())?;
        let files: Vec<ServerModFile> = read_json(response, "Bukkit files").await?;

        files
            .into_iter()
            .last()
            .ok_or_else(|| FetchError::NotFound(self.project_id.to_string()))
    }

    /// Project slug taken from where the numeric project page redirects to
    async fn fetch_slug(&self) -> Result<String, FetchError> {
        let url = format!("{}/projects/{}", self.site_url, self.project_id);
        debug!("Fetching {}", url);

        let response = self.client.get(&url).send().await?;
        let response = check_status(response, &self.project_id.to_string())?;

        last_segment(response.url().as_str())
            .map(str::to_string)
            .ok_or_else(|| FetchError::Parse(format!("No project slug in {}", response.url())))
    }
}

#[async_trait::async_trait]
impl Provider for BukkitProvider {
    fn name(&self) -> &'static str {
        "Bukkit"
    }

    async fn fetch(&self) -> Result<Release, FetchError> {
        let file = self.fetch_latest_file().await?;
        let slug = self.fetch_slug().await?;

        let file_id = last_segment(&file.file_url).ok_or_else(|| {
            FetchError::Parse(format!("No file id in {}", file.file_url))
        })?;
        let changelog_link = format!("{}/{}/files/{}", CHANGELOG_URL, slug, file_id);

        Ok(Release::new(Version::parse(&file.name))
            .with_download_link(Some(file.download_url))
            .with_changelog_link(Some(changelog_link)))
    }
}
