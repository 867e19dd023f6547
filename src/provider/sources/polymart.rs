//! Polymart API provider

use std::collections::BTreeSet;

use serde::Deserialize;
use tracing::debug;

use crate::error::FetchError;
use crate::provider::http::{Scalar, build_client, check_status, format_price, read_json};
use crate::provider::release::{Field, Release};
use crate::provider::traits::Provider;
use crate::version::Version;

/// Default base URL for the Polymart API
const DEFAULT_BASE_URL: &str = "https://api.polymart.org";

#[derive(Debug, Deserialize)]
struct Envelope {
    response: ResourceResponse,
}

#[derive(Debug, Deserialize)]
struct ResourceResponse {
    #[serde(default = "default_success")]
    success: bool,
    resource: Option<Resource>,
}

fn default_success() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct Resource {
    price: Scalar,
    currency: Option<String>,
    downloads: Scalar,
    url: String,
    owner: Owner,
    updates: Updates,
}

#[derive(Debug, Deserialize)]
struct Owner {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Updates {
    latest: LatestUpdate,
}

#[derive(Debug, Deserialize)]
struct LatestUpdate {
    version: String,
}

/// Provider for a Polymart resource
pub struct PolymartProvider {
    client: reqwest::Client,
    base_url: String,
    resource_id: u32,
}

impl PolymartProvider {
    pub fn new(resource_id: u32) -> Self {
        Self::with_base_url(resource_id, DEFAULT_BASE_URL)
    }

    /// Creates a new PolymartProvider with a custom base URL
    pub fn with_base_url(resource_id: u32, base_url: &str) -> Self {
        Self {
            client: build_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            resource_id,
        }
    }
}

#[async_trait::async_trait]
impl Provider for PolymartProvider {
    fn name(&self) -> &'static str {
        "Polymart"
    }

    async fn fetch(&self) -> Result<Release, FetchError> {
        let url = format!(
            "{}/v1/getResourceInfo/resource_id={}",
            self.base_url, self.resource_id
        );
        debug!("Fetching {}", url);

        let response = self.client.get(&url).send().await?;
        let response = check_status(response, &self.resource_id.to_string())?;
        let envelope: Envelope = read_json(response, "Polymart").await?;

        // Polymart reports unknown resources with a 200 and success=false
        let resource = match envelope.response {
            ResourceResponse {
                success: true,
                resource: Some(resource),
            } => resource,
            _ => return Err(FetchError::NotFound(self.resource_id.to_string())),
        };

        let download_link = resource
            .url
            .split('?')
            .next()
            .unwrap_or(&resource.url)
            .to_string();
        let changelog_link = format!("{}/updates", download_link);
        let premium = resource.price.as_f64().map(|price| price > 0.0);

        Ok(Release::new(Version::parse(&resource.updates.latest.version))
            .with_download_link(Field::Present(download_link))
            .with_changelog_link(Field::Present(changelog_link))
            .with_donation_link(Field::Absent)
            .with_price(Field::Present(format_price(
                &resource.price,
                resource.currency.as_deref(),
            )))
            .with_download_count(resource.downloads.as_u64())
            .with_premium(premium)
            .with_contributors(Field::Present(BTreeSet::from([resource.owner.name]))))
    }
}
