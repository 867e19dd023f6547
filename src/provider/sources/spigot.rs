//! SpigotMC legacy update API provider
//!
//! The legacy endpoint answers with a single plain-text line holding the
//! version name and nothing else, so every other attribute is unsupported.

use tracing::debug;

use crate::error::FetchError;
use crate::provider::http::{build_client, check_status};
use crate::provider::release::Release;
use crate::provider::traits::Provider;
use crate::version::Version;

/// Default base URL for the SpigotMC API
const DEFAULT_BASE_URL: &str = "https://api.spigotmc.org";

/// Resource pages on the SpigotMC website
const RESOURCE_PAGE_URL: &str = "https://www.spigotmc.org/resources";

/// Body the legacy endpoint sends for unknown resource ids
const INVALID_RESOURCE: &str = "invalid resource";

/// Provider for a SpigotMC resource through the legacy update API
pub struct SpigotProvider {
    client: reqwest::Client,
    base_url: String,
    resource_id: u32,
}

impl SpigotProvider {
    pub fn new(resource_id: u32) -> Self {
        Self::with_base_url(resource_id, DEFAULT_BASE_URL)
    }

    /// Creates a new SpigotProvider with a custom base URL
    pub fn with_base_url(resource_id: u32, base_url: &str) -> Self {
        Self {
            client: build_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            resource_id,
        }
    }

    fn resource_page(&self) -> String {
        format!("{}/{}", RESOURCE_PAGE_URL, self.resource_id)
    }
}

#[async_trait::async_trait]
impl Provider for SpigotProvider {
    fn name(&self) -> &'static str {
        "Spigot"
    }

    async fn fetch(&self) -> Result<Release, FetchError> {
        let url = format!(
            "{}/legacy/update.php?resource={}",
            self.base_url, self.resource_id
        );
        debug!("Fetching {}", url);

        let response = self.client.get(&url).send().await?;
        let response = check_status(response, &self.resource_id.to_string())?;

        let body = response.text().await?;
        let line = body.lines().next().map(str::trim).unwrap_or_default();

        if line.is_empty() {
            return Err(FetchError::Parse(
                "Spigot returned an empty version line".to_string(),
            ));
        }

        if line.eq_ignore_ascii_case(INVALID_RESOURCE) {
            return Err(FetchError::NotFound(self.resource_id.to_string()));
        }

        let page = self.resource_page();

        Ok(Release::new(Version::parse(line))
            .with_changelog_link(Some(format!("{}/updates", page)))
            .with_download_link(Some(page)))
    }
}
