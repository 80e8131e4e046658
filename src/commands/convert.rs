//! Convert command: rate lookup, listing fetch, conversion and CSV output.

use crate::books::{BooksClient, ListingSource};
use crate::config::Config;
use crate::currency::CurrencyCode;
use crate::error::{PipelineError, Result};
use crate::output::{output_path, write_csv};
use crate::pipeline::{ConversionRun, EnrichedRecord};
use crate::rates::{ExchangeRate, RateClient, RateSource};
use anyhow::Context;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub rate: ExchangeRate,
    pub records: Vec<EnrichedRecord>,
    pub output_path: PathBuf,
    /// Listings whose price text could not be parsed
    pub fallback_count: usize,
}

/// Executes a conversion run.
pub struct ConvertCommand {
    config: Config,
}

impl ConvertCommand {
    /// Creates a new convert command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Creates the HTTP clients for a real run.
    pub fn clients(&self) -> anyhow::Result<(RateClient, BooksClient)> {
        let rates = RateClient::new(&self.config).context("Failed to create rate client")?;
        let books = BooksClient::new(&self.config).context("Failed to create HTTP client")?;
        Ok((rates, books))
    }

    /// Runs the whole pipeline with the provided clients.
    pub async fn execute_with(
        &self,
        rates: &impl RateSource,
        listings: &impl ListingSource,
        target: &str,
    ) -> Result<RunReport> {
        let rate = self.rate(rates, target).await?;
        self.convert_and_save(listings, rate).await
    }

    /// Validates `target` and fetches the rate from the base currency.
    ///
    /// An invalid code fails before any request is made.
    pub async fn rate(&self, rates: &impl RateSource, target: &str) -> Result<ExchangeRate> {
        let target: CurrencyCode = target.parse()?;
        debug!("Target currency: {}", target);

        rates.fetch_rate(&self.config.base_currency, &target).await
    }

    /// Fetches listings, converts them at `rate` and writes the CSV file.
    pub async fn convert_and_save(
        &self,
        listings: &impl ListingSource,
        rate: ExchangeRate,
    ) -> Result<RunReport> {
        let scraped = listings.fetch_listings(&self.config.source_url).await;
        if scraped.is_empty() {
            return Err(PipelineError::NoListings { url: self.config.source_url.clone() });
        }

        let fallback_count = scraped.iter().filter(|l| l.price.is_fallback()).count();
        if fallback_count > 0 {
            warn!("{} listing(s) had unparsable prices and were converted as 0.00", fallback_count);
        }

        let run = ConversionRun::start(rate);
        let records = run.convert(&scraped);

        let path = output_path(&self.config, &run.started_at());
        write_csv(&records, &path)?;

        info!("Converted {} listings", records.len());

        Ok(RunReport { rate: run.rate().clone(), records, output_path: path, fallback_count })
    }
}
