//! Async client for the NCBI E-utilities endpoints pubfetch needs
//!
//! `esearch` resolves a query to ids, `efetch` downloads the XML that
//! [`pubfetch_parser`] turns into records, `elink` finds citing articles and `einfo`
//! lists searchable fields. Formatted citations come from the PubMed site rather
//! than E-utilities. Every request shares one rate limiter and goes through the
//! retry helper.

mod citation;
mod efetch;
mod einfo;
mod elink;
mod esearch;
pub(crate) mod responses;

use reqwest::{Client, Response, StatusCode};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{PubFetchError, Result};
use crate::rate_limit::RateLimiter;
use crate::retry::with_retry;

pub use citation::{CitationText, NcbiCitation};
pub use einfo::FieldInfo;
pub use esearch::ESEARCH_PAGE_SIZE;

/// Client for the E-utilities API
#[derive(Clone)]
pub struct EUtilsClient {
    client: Client,
    base_url: String,
    rate_limiter: RateLimiter,
    config: ClientConfig,
}

impl EUtilsClient {
    /// Create a client with default configuration (3 requests/s, no API key)
    pub fn new() -> Self {
        Self::with_config(ClientConfig::new())
    }

    /// Create a client with custom configuration
    ///
    /// ```
    /// use pubfetch_client::{ClientConfig, EUtilsClient};
    ///
    /// let config = ClientConfig::new()
    ///     .with_api_key("your_api_key_here")
    ///     .with_email("researcher@university.edu");
    ///
    /// let client = EUtilsClient::with_config(config);
    /// ```
    pub fn with_config(config: ClientConfig) -> Self {
        let rate_limiter = config.create_rate_limiter();
        let base_url = config.effective_base_url().to_string();

        let client = Client::builder()
            .user_agent(config.effective_user_agent())
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url,
            rate_limiter,
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `url` with the `api_key`, `email` and `tool` parameters appended
    fn with_api_params(&self, url: &str) -> String {
        let params = self
            .config
            .build_api_params()
            .into_iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(&value)))
            .collect::<Vec<_>>()
            .join("&");

        match (params.is_empty(), url.contains('?')) {
            (true, _) => url.to_string(),
            (false, true) => format!("{url}&{params}"),
            (false, false) => format!("{url}?{params}"),
        }
    }

    /// E-utilities GET with the api parameters appended
    pub(crate) async fn make_request(&self, url: &str) -> Result<Response> {
        self.send_with_retry(&self.with_api_params(url)).await
    }

    /// Rate-limited GET with retries; any non-success status ends as `ApiError`
    async fn send_with_retry(&self, url: &str) -> Result<Response> {
        let response = with_retry(
            || async {
                self.rate_limiter.acquire().await?;
                debug!(url = %url, "Sending NCBI request");
                let response = self.client.get(url).send().await?;

                // Server errors and throttling are retried
                let status = response.status();
                if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                    return Err(status_error(status));
                }
                Ok(response)
            },
            &self.config.retry_config,
            "NCBI API request",
        )
        .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "NCBI request failed");
            return Err(status_error(status));
        }
        Ok(response)
    }
}

fn status_error(status: StatusCode) -> PubFetchError {
    PubFetchError::ApiError {
        status: status.as_u16(),
        message: status.canonical_reason().unwrap_or("Unknown error").to_string(),
    }
}

impl Default for EUtilsClient {
    fn default() -> Self {
        Self::new()
    }
}
