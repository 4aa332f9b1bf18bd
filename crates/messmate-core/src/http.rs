//! HTTP dataset fetcher over the published sheet endpoints.

use async_trait::async_trait;

use crate::fetch::{DatasetFetcher, FetchError};
use crate::record::DatasetKind;

/// Environment variable overriding the notice endpoint.
pub const NOTICE_URL_ENV: &str = "MESSMATE_NOTICE_URL";

/// Environment variable overriding the report endpoint.
pub const REPORT_URL_ENV: &str = "MESSMATE_REPORT_URL";

const DEFAULT_NOTICE_URL: &str = "https://script.google.com/macros/s/AKfycbzkM3kcvTe1OLnQnPmkIbIV4WZBcjaPN0aQz0fito3rOJICNilW3aZ5BMifvIDleg3EXg/exec";

const DEFAULT_REPORT_URL: &str = "https://script.google.com/macros/s/AKfycbwNG7JSVYg9RXpiOBQoJEfqfSH39qe1EIEgNf68X_X0tSsPoi7S4nCTrZGfNGSKQbvi3Q/exec";

// ---------------------------------------------------------------------------
// EndpointConfig
// ---------------------------------------------------------------------------

/// Where each dataset is fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub notice_url: String,
    pub report_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            notice_url: DEFAULT_NOTICE_URL.to_string(),
            report_url: DEFAULT_REPORT_URL.to_string(),
        }
    }
}

impl EndpointConfig {
    /// Resolve endpoints from the environment, falling back to the
    /// published defaults. Unset and blank variables are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            notice_url: env_override(NOTICE_URL_ENV).unwrap_or(defaults.notice_url),
            report_url: env_override(REPORT_URL_ENV).unwrap_or(defaults.report_url),
        }
    }

    /// Endpoint URL for one dataset kind.
    #[must_use]
    pub fn url_for(&self, kind: DatasetKind) -> &str {
        match kind {
            DatasetKind::Notice => &self.notice_url,
            DatasetKind::Report => &self.report_url,
        }
    }
}

fn env_override(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Err(_) => None,
    }
}

// ---------------------------------------------------------------------------
// HttpDatasetFetcher
// ---------------------------------------------------------------------------

/// Fetches dataset payloads over HTTP with a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpDatasetFetcher {
    client: reqwest::Client,
    endpoints: EndpointConfig,
}

impl HttpDatasetFetcher {
    #[must_use]
    pub fn new(endpoints: EndpointConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoints,
        }
    }
}

#[async_trait]
impl DatasetFetcher for HttpDatasetFetcher {
    async fn fetch(&self, kind: DatasetKind) -> Result<serde_json::Value, FetchError> {
        let url = self.endpoints.url_for(kind);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| FetchError::Transport {
                kind,
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                kind,
                status: status.as_u16(),
            });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|err| FetchError::Body {
                kind,
                message: err.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
