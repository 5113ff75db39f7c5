//! # Lookup Client
//!
//! The [`ProductLookup`] seam and its HTTP implementation.
//!
//! ## Retry Policy
//! ```text
//! attempt 1 ──fail(retryable)──► wait ~initial ──► attempt 2 ──► wait ~2× ──► attempt 3
//!     │                                                                          │
//!     └── fail(permanent) ──► error                      still failing ──► error ┘
//! ```
//!
//! At most `max_retries` retries follow the first attempt. Each attempt is
//! bounded by `timeout_secs`.

use async_trait::async_trait;
use backoff::backoff::Backoff;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use reqwest::Client;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::LookupConfig;
use crate::error::{LookupError, LookupResult};
use crate::models::{LookupItem, LookupResponse};

/// Source of product data for a barcode.
#[async_trait]
pub trait ProductLookup: Send + Sync {
    /// First matching item, or `None` when the service knows nothing.
    async fn lookup(&self, barcode: &str) -> LookupResult<Option<LookupItem>>;
}

/// reqwest client for the lookup service.
#[derive(Clone)]
pub struct UpcLookupClient {
    http: Client,
    endpoint: Url,
    config: LookupConfig,
}

impl UpcLookupClient {
    pub fn new(config: LookupConfig) -> LookupResult<Self> {
        config.validate()?;
        let endpoint = config.endpoint_url()?;

        let http = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(concat!("scanlist/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LookupError::InvalidConfig(e.to_string()))?;

        Ok(UpcLookupClient {
            http,
            endpoint,
            config,
        })
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    fn create_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.config.initial_backoff())
            .with_max_interval(self.config.max_backoff())
            .with_multiplier(2.0)
            .with_max_elapsed_time(None)
            .build()
    }

    /// One request, no retries.
    async fn fetch_once(&self, barcode: &str) -> LookupResult<LookupResponse> {
        let mut request = self
            .http
            .get(self.endpoint.clone())
            .query(&[("upc", barcode)]);
        if !self.config.api_token.is_empty() {
            request = request.bearer_auth(&self.config.api_token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetches the full response document, retrying transient failures.
    pub async fn fetch(&self, barcode: &str) -> LookupResult<LookupResponse> {
        let mut backoff = self.create_backoff();
        let mut retries = 0u32;

        loop {
            match self.fetch_once(barcode).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && retries < self.config.max_retries => {
                    retries += 1;
                    let delay = backoff
                        .next_backoff()
                        .unwrap_or_else(|| self.config.max_backoff());
                    warn!(
                        barcode,
                        attempt = retries,
                        ?delay,
                        error = %e,
                        "Lookup failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    warn!(barcode, retries, error = %e, "Lookup failed");
                    return Err(e);
                }
            }
        }
    }
}

#[async_trait]
impl ProductLookup for UpcLookupClient {
    async fn lookup(&self, barcode: &str) -> LookupResult<Option<LookupItem>> {
        debug!(barcode, endpoint = %self.endpoint, "Looking up barcode");
        let response = self.fetch(barcode).await?;

        let total = response.items.len();
        let item = response.items.into_iter().next();
        info!(barcode, total, found = item.is_some(), "Lookup complete");
        Ok(item)
    }
}
