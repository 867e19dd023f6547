//! Resolution pass over the registered providers

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::FETCH_STAGGER_DELAY_MS;
use crate::error::ResolveError;
use crate::provider::{Provider, Release};
use crate::update::download::DownloadOutcome;
use crate::update::result::{ActiveRelease, ResolvedUpdate, UpdateResult};
use crate::version::Version;

/// Owns the registered providers and the state of the last resolution pass
pub struct Resolver {
    providers: Vec<Arc<dyn Provider>>,
    current: Version,
    enabled: bool,
    globally_enabled: bool,
    unstable: bool,
    state: ResolvedUpdate,
}

impl Resolver {
    pub fn new(current: Version, providers: Vec<Arc<dyn Provider>>) -> Self {
        Self {
            providers,
            current,
            enabled: true,
            globally_enabled: true,
            unstable: false,
            state: ResolvedUpdate::unknown(),
        }
    }

    /// Accept alpha/beta/rc/snapshot releases as updates
    pub fn with_unstable(mut self, unstable: bool) -> Self {
        self.unstable = unstable;
        self
    }

    /// Host-wide toggle shared by every updater of the host
    pub fn with_global_enabled(mut self, enabled: bool) -> Self {
        self.globally_enabled = enabled;
        self
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled && self.globally_enabled
    }

    pub fn current_version(&self) -> &Version {
        &self.current
    }

    pub fn providers(&self) -> &[Arc<dyn Provider>] {
        &self.providers
    }

    pub fn state(&self) -> &ResolvedUpdate {
        &self.state
    }

    pub fn result(&self) -> UpdateResult {
        self.state.result()
    }

    /// Winning provider of the last pass, `None` until a pass has selected one
    pub fn active_provider(&self) -> Option<&Arc<dyn Provider>> {
        self.state.active().map(ActiveRelease::provider)
    }

    pub fn active_release(&self) -> Option<&Release> {
        self.state.active().map(ActiveRelease::release)
    }

    /// Run one resolution pass.
    ///
    /// Provider failures are logged and skipped. When every provider fails
    /// the previous state is kept and [`ResolveError::AllProvidersFailed`]
    /// is returned for diagnostics.
    pub async fn resolve(&mut self) -> Result<&ResolvedUpdate, ResolveError> {
        if !self.is_enabled() {
            debug!("Update checking is disabled");
            self.state = ResolvedUpdate::new(UpdateResult::Disabled, None);
            return Ok(&self.state);
        }

        let fetched = self.fetch_all().await;

        if fetched.is_empty() {
            warn!(
                "All {} providers failed, keeping result {}",
                self.providers.len(),
                self.state.result()
            );
            return Err(ResolveError::AllProvidersFailed {
                attempted: self.providers.len(),
            });
        }

        let selected = self.select(&fetched);
        let (provider, release) = fetched
            .into_iter()
            .nth(selected.unwrap_or(0))
            .ok_or(ResolveError::AllProvidersFailed {
                attempted: self.providers.len(),
            })?;

        let result = match selected {
            Some(_) if release.version().is_newer_than(&self.current) => {
                UpdateResult::UpdateAvailable
            }
            _ => UpdateResult::Latest,
        };

        info!(
            "Resolved {} via {} (latest {}, running {})",
            result,
            provider.name(),
            release.version(),
            self.current
        );

        self.state = ResolvedUpdate::new(result, Some(ActiveRelease::new(provider, release)));
        Ok(&self.state)
    }

    /// Fold a download outcome into the result of the current pass
    pub fn apply_download(&mut self, outcome: DownloadOutcome) {
        if self.state.result() != UpdateResult::UpdateAvailable {
            return;
        }

        match outcome {
            DownloadOutcome::Downloaded => self.state.set_result(UpdateResult::Downloaded),
            DownloadOutcome::Exists => self.state.set_result(UpdateResult::Exists),
            DownloadOutcome::Skipped => {}
        }
    }

    /// Fetch every provider concurrently with staggered starts.
    /// Successful releases are returned in registration order.
    async fn fetch_all(&self) -> Vec<(Arc<dyn Provider>, Release)> {
        let futures = self.providers.iter().enumerate().map(|(i, provider)| {
            let delay = Duration::from_millis(FETCH_STAGGER_DELAY_MS * i as u64);
            async move {
                sleep(delay).await;
                (provider, provider.fetch().await)
            }
        });

        join_all(futures)
            .await
            .into_iter()
            .filter_map(|(provider, outcome)| match outcome {
                Ok(release) => {
                    debug!("{} reported {}", provider.name(), release.version());
                    Some((Arc::clone(provider), release))
                }
                Err(e) if e.is_rate_limited() => {
                    info!("Skipping {}: {}", provider.name(), e);
                    None
                }
                Err(e) => {
                    warn!("Failed to fetch release from {}: {}", provider.name(), e);
                    None
                }
            })
            .collect()
    }

    /// Index of the winning release, `None` when nothing is eligible.
    ///
    /// The highest eligible version wins and ties keep the earliest
    /// registered provider.
    fn select(&self, fetched: &[(Arc<dyn Provider>, Release)]) -> Option<usize> {
        let mut active: Option<usize> = None;

        for (i, (provider, release)) in fetched.iter().enumerate() {
            if !self.is_eligible(release.version()) {
                debug!(
                    "Ignoring unstable {} from {}",
                    release.version(),
                    provider.name()
                );
                continue;
            }

            match active {
                Some(j) if release.version() <= fetched[j].1.version() => {}
                _ => active = Some(i),
            }
        }

        active
    }

    fn is_eligible(&self, version: &Version) -> bool {
        !version.is_newer_than(&self.current) || !version.is_unstable() || self.unstable
    }
}
