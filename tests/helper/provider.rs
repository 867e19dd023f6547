//! Provider test utilities

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use release_radar::error::FetchError;
use release_radar::provider::{Provider, Release};
use release_radar::version::Version;

enum Outcome {
    Release(Release),
    RateLimited,
    Failure,
}

/// Provider answering every fetch with the same canned outcome
pub struct StubProvider {
    name: &'static str,
    outcome: Outcome,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn releasing(name: &'static str, version: &str) -> Arc<Self> {
        Self::with_release(name, Release::new(Version::parse(version)))
    }

    pub fn with_release(name: &'static str, release: Release) -> Arc<Self> {
        Self::new(name, Outcome::Release(release))
    }

    pub fn rate_limited(name: &'static str) -> Arc<Self> {
        Self::new(name, Outcome::RateLimited)
    }

    pub fn failing(name: &'static str) -> Arc<Self> {
        Self::new(name, Outcome::Failure)
    }

    fn new(name: &'static str, outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            name,
            outcome,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for StubProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(&self) -> Result<Release, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.outcome {
            Outcome::Release(release) => Ok(release.clone()),
            Outcome::RateLimited => Err(FetchError::RateLimited {
                retry_after_secs: Some(60),
            }),
            Outcome::Failure => Err(FetchError::Parse("unexpected payload".to_string())),
        }
    }
}
