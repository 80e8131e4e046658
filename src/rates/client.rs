//! HTTP client for the exchange-rate service.

use super::models::{ExchangeRate, LatestResponse};
use crate::config::Config;
use crate::currency::CurrencyCode;
use crate::diagnostics::Diagnostic;
use crate::error::{PipelineError, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};
use wreq::Client;

/// Trait for rate lookups - enables mocking for tests.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Looks up how many `target` one unit of `base` buys. Single attempt.
    ///
    /// The convert command uses this form so a halted run can say whether
    /// the network or the currency was at fault.
    async fn fetch_rate(&self, base: &CurrencyCode, target: &CurrencyCode)
        -> Result<ExchangeRate>;

    /// Like [`fetch_rate`](Self::fetch_rate), but reports the failure as a
    /// diagnostic and returns `None` instead of an error.
    ///
    /// Both forms issue the same single request.
    async fn get_rate(&self, base: &CurrencyCode, target: &CurrencyCode) -> Option<ExchangeRate> {
        match self.fetch_rate(base, target).await {
            Ok(rate) => Some(rate),
            Err(e) => {
                Diagnostic::from(&e).emit();
                None
            }
        }
    }
}

/// Client for a frankfurter-compatible `/latest` endpoint.
pub struct RateClient {
    client: Client,
    base_url: String,
}

impl RateClient {
    /// Creates a new rate client with the given configuration.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Self::with_base_url(&config.rate_api_url, Duration::from_secs(config.timeout_secs))
    }

    /// Creates a new rate client against a custom base URL (for testing).
    pub fn with_base_url(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).connect_timeout(timeout).build()?;

        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }

    fn latest_url(&self, base: &CurrencyCode, target: &CurrencyCode) -> String {
        format!(
            "{}/latest?from={}&to={}",
            self.base_url,
            urlencoding::encode(base.as_str()),
            urlencoding::encode(target.as_str())
        )
    }
}

#[async_trait]
impl RateSource for RateClient {
    async fn fetch_rate(
        &self,
        base: &CurrencyCode,
        target: &CurrencyCode,
    ) -> Result<ExchangeRate> {
        let url = self.latest_url(base, target);
        info!("Fetching exchange rate {} -> {}", base, target);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| PipelineError::network(&url, e))?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(PipelineError::network(&url, format!("status {}", status)));
        }

        let body = response.text().await.map_err(|e| PipelineError::network(&url, e))?;

        parse_rate_response(&body, base, target)
    }
}

/// Extracts the `target` rate from a `/latest` response body.
///
/// Any deviation from the expected schema counts as an unsupported target.
pub fn parse_rate_response(
    body: &str,
    base: &CurrencyCode,
    target: &CurrencyCode,
) -> Result<ExchangeRate> {
    let unsupported = || PipelineError::UnsupportedCurrency { code: target.to_string() };

    let response: LatestResponse = serde_json::from_str(body).map_err(|e| {
        debug!("Unexpected rate response: {}", e);
        unsupported()
    })?;

    let rate = response.rates.get(target.as_str()).copied().ok_or_else(unsupported)?;

    ExchangeRate::new(base.clone(), target.clone(), rate).ok_or_else(unsupported)
}
