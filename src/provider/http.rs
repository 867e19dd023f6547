//! Shared HTTP plumbing for providers

use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::redirect::Policy;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::warn;

use crate::config::{FETCH_TIMEOUT_MS, MAX_REDIRECTS, USER_AGENT};
use crate::error::FetchError;

/// Build the HTTP client used by providers and downloads.
///
/// Requests identify themselves with [`USER_AGENT`], follow redirects and
/// give up after [`FETCH_TIMEOUT_MS`].
pub fn build_client() -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_millis(FETCH_TIMEOUT_MS))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .build()
        .expect("Failed to create HTTP client")
}

/// Map a response status to the provider error taxonomy
///
/// * 404 -> [`FetchError::NotFound`]
/// * 429 -> [`FetchError::RateLimited`]
/// * any other non-success status -> [`FetchError::UnexpectedStatus`]
pub(crate) fn check_status(response: Response, resource: &str) -> Result<Response, FetchError> {
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return Err(FetchError::NotFound(resource.to_string()));
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(rate_limited(&response));
    }

    if !status.is_success() {
        warn!("{} returned status {}", response.url(), status);
        return Err(FetchError::UnexpectedStatus(status));
    }

    Ok(response)
}

/// Build a rate-limit error, reading `Retry-After` seconds when present
pub(crate) fn rate_limited(response: &Response) -> FetchError {
    let retry_after_secs = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok());

    FetchError::RateLimited { retry_after_secs }
}

/// Deserialize a JSON body, reporting failures as parse errors
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    response: Response,
    source: &str,
) -> Result<T, FetchError> {
    response.json().await.map_err(|e| {
        warn!("Failed to parse {} response: {}", source, e);
        FetchError::Parse(e.to_string())
    })
}

/// Last non-empty path segment of a URL
pub(crate) fn last_segment(url: &str) -> Option<&str> {
    url.split(['?', '#'])
        .next()
        .unwrap_or(url)
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
}

/// JSON scalar that some APIs send as a number and others as a string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    pub(crate) fn as_text(&self) -> String {
        match self {
            Scalar::Number(number) => number.to_string(),
            Scalar::Text(text) => text.clone(),
        }
    }

    pub(crate) fn as_u64(&self) -> Option<u64> {
        match self {
            Scalar::Number(number) => number.as_u64(),
            Scalar::Text(text) => text.trim().parse().ok(),
        }
    }

    pub(crate) fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(number) => number.as_f64(),
            Scalar::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// Join a price and an optional currency the way release hosts display them
pub(crate) fn format_price(price: &Scalar, currency: Option<&str>) -> String {
    match currency.map(str::trim).filter(|c| !c.is_empty()) {
        Some(currency) => format!("{} {}", price.as_text(), currency),
        None => price.as_text(),
    }
}
