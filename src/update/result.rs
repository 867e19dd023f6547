use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::provider::{Provider, Release};

/// Outcome of a resolution pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UpdateResult {
    /// No pass has completed yet
    #[default]
    Unknown,
    /// Checking is turned off locally or globally
    Disabled,
    /// No provider offers an accepted newer release
    Latest,
    /// A newer release is available
    UpdateAvailable,
    /// The newer release was already present in the download directory
    Exists,
    /// The newer release was downloaded during this pass
    Downloaded,
}

impl UpdateResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateResult::Unknown => "UNKNOWN",
            UpdateResult::Disabled => "DISABLED",
            UpdateResult::Latest => "LATEST",
            UpdateResult::UpdateAvailable => "UPDATE_AVAILABLE",
            UpdateResult::Exists => "EXISTS",
            UpdateResult::Downloaded => "DOWNLOADED",
        }
    }
}

impl fmt::Display for UpdateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The winning provider of a pass together with the release it reported
#[derive(Clone)]
pub struct ActiveRelease {
    provider: Arc<dyn Provider>,
    release: Release,
}

impl ActiveRelease {
    pub fn new(provider: Arc<dyn Provider>, release: Release) -> Self {
        Self { provider, release }
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn release(&self) -> &Release {
        &self.release
    }
}

impl fmt::Debug for ActiveRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveRelease")
            .field("provider", &self.provider.name())
            .field("release", &self.release)
            .finish()
    }
}

/// Snapshot produced by one resolution pass. Superseded, never merged.
#[derive(Debug, Clone)]
pub struct ResolvedUpdate {
    result: UpdateResult,
    active: Option<ActiveRelease>,
    checked_at: Option<DateTime<Utc>>,
}

impl ResolvedUpdate {
    pub(crate) fn unknown() -> Self {
        Self {
            result: UpdateResult::Unknown,
            active: None,
            checked_at: None,
        }
    }

    pub(crate) fn new(result: UpdateResult, active: Option<ActiveRelease>) -> Self {
        Self {
            result,
            active,
            checked_at: Some(Utc::now()),
        }
    }

    pub(crate) fn set_result(&mut self, result: UpdateResult) {
        self.result = result;
    }

    pub fn result(&self) -> UpdateResult {
        self.result
    }

    pub fn active(&self) -> Option<&ActiveRelease> {
        self.active.as_ref()
    }

    /// When the pass that produced this snapshot finished, `None` before any pass
    pub fn checked_at(&self) -> Option<DateTime<Utc>> {
        self.checked_at
    }
}
