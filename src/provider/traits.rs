//! Provider trait for fetching the latest release from a remote source

#[cfg(test)]
use mockall::automock;

use crate::error::FetchError;
use crate::provider::release::Release;

/// Trait for fetching the latest release from one remote source
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    /// Stable provider name, used for diagnostics and notifications
    fn name(&self) -> &'static str;

    /// Fetches the latest release from the remote source
    ///
    /// Every call performs fresh requests; nothing is cached between calls.
    ///
    /// # Returns
    /// * `Ok(Release)` - The latest release with every field this source can supply
    /// * `Err(FetchError::RateLimited)` - The source refused the request for now
    /// * `Err(FetchError)` - Any other network, status or parse failure
    async fn fetch(&self) -> Result<Release, FetchError>;
}
