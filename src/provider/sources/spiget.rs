//! Spiget API provider
//!
//! Spiget mirrors SpigotMC resources with richer metadata than the legacy
//! update endpoint: price, premium flag, donation link and contributors.

use serde::Deserialize;
use tracing::debug;

use crate::error::FetchError;
use crate::provider::http::{Scalar, build_client, check_status, format_price, read_json};
use crate::provider::release::{Field, Release};
use crate::provider::traits::Provider;
use crate::version::Version;

/// Default base URL for the Spiget API
const DEFAULT_BASE_URL: &str = "https://api.spiget.org";

/// SpigotMC website, which resource file and update paths are relative to
const SPIGOT_SITE_URL: &str = "https://www.spigotmc.org";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Resource {
    file: ResourceFile,
    #[serde(default)]
    updates: Vec<UpdateRef>,
    price: Option<Scalar>,
    currency: Option<String>,
    downloads: Option<u64>,
    premium: Option<bool>,
    donation_link: Option<String>,
    contributors: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResourceFile {
    url: String,
}

#[derive(Debug, Deserialize)]
struct UpdateRef {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct LatestVersion {
    name: String,
}

/// Provider for a SpigotMC resource through the Spiget API
pub struct SpigetProvider {
    client: reqwest::Client,
    base_url: String,
    resource_id: u32,
}

impl SpigetProvider {
    pub fn new(resource_id: u32) -> Self {
        Self::with_base_url(resource_id, DEFAULT_BASE_URL)
    }

    /// Creates a new SpigetProvider with a custom base URL
    pub fn with_base_url(resource_id: u32, base_url: &str) -> Self {
        Self {
            client: build_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            resource_id,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}/v2/resources/{}{}", self.base_url, self.resource_id, path);
        debug!("Fetching {}", url);

        let response = self.client.get(&url).send().await?;
        let response = check_status(response, &self.resource_id.to_string())?;

        read_json(response, "Spiget").await
    }
}

fn split_contributors(raw: &str) -> std::collections::BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[async_trait::async_trait]
impl Provider for SpigetProvider {
    fn name(&self) -> &'static str {
        "Spiget"
    }

    async fn fetch(&self) -> Result<Release, FetchError> {
        let resource: Resource = self.get_json("").await?;
        let latest: LatestVersion = self.get_json("/versions/latest").await?;

        let download_link = format!(
            "{}/{}",
            SPIGOT_SITE_URL,
            resource.file.url.trim_start_matches('/')
        );
        let changelog_link = resource.updates.first().map(|update| {
            format!(
                "{}/resources/{}/update?update={}",
                SPIGOT_SITE_URL, self.resource_id, update.id
            )
        });
        let price = resource
            .price
            .as_ref()
            .map(|price| format_price(price, resource.currency.as_deref()));
        let donation_link = resource
            .donation_link
            .filter(|link| !link.trim().is_empty());

        Ok(Release::new(Version::parse(&latest.name))
            .with_download_link(Field::Present(download_link))
            .with_changelog_link(changelog_link)
            .with_donation_link(donation_link)
            .with_price(price)
            .with_download_count(resource.downloads)
            .with_premium(resource.premium)
            .with_contributors(resource.contributors.as_deref().map(split_contributors)))
    }
}
