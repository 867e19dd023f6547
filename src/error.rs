use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    Parse(String),

    #[error("Unexpected status: {0}")]
    UnexpectedStatus(reqwest::StatusCode),
}

impl FetchError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FetchError::RateLimited { .. })
    }
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Download request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Download failed with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("{context} {path:?}: {source}")]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Downloaded file is missing after write: {0:?}")]
    NotWritten(PathBuf),
}

impl DownloadError {
    pub(crate) fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            context,
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Please supply at least one provider for the updater")]
    NoProviders,

    #[error("The interval must be greater than 0")]
    NonPositiveInterval,

    #[error("Invalid interval: {0:?}")]
    InvalidInterval(String),

    #[error("One or more providers is missing a provider name")]
    EmptyProviderName,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("All {attempted} providers failed to fetch a release")]
    AllProvidersFailed { attempted: usize },
}

/// A release field the provider's remote source cannot supply
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{field} is not supported by the {provider} provider")]
pub struct Unsupported {
    pub provider: &'static str,
    pub field: &'static str,
}
