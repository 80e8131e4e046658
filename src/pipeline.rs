//! Conversion of scraped listings into enriched, output-ready records.

use crate::books::RawListing;
use crate::currency::CurrencyCode;
use crate::rates::ExchangeRate;
use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;
use tracing::debug;

/// Timestamp layout shared by every record of a run.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A listing combined with its converted price and run metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    pub name: String,
    pub price_original: f64,
    /// `round2(price_original * rate)`
    pub price_converted: f64,
    pub currency_from: CurrencyCode,
    pub currency_to: CurrencyCode,
    pub converted_at: String,
}

/// Rounds to two decimal places, ties away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Converts every listing at `rate`, preserving input order.
///
/// All records carry the same `converted_at` stamp.
pub fn convert(
    listings: &[RawListing],
    rate: f64,
    currency_from: &CurrencyCode,
    currency_to: &CurrencyCode,
    converted_at: &str,
) -> Vec<EnrichedRecord> {
    listings
        .iter()
        .map(|listing| {
            let price_original = listing.price.value();
            EnrichedRecord {
                name: listing.name.clone(),
                price_original,
                price_converted: round2(price_original * rate),
                currency_from: currency_from.clone(),
                currency_to: currency_to.clone(),
                converted_at: converted_at.to_string(),
            }
        })
        .collect()
}

/// One conversion run: a fetched rate plus the instant the run started.
#[derive(Debug, Clone)]
pub struct ConversionRun {
    rate: ExchangeRate,
    started_at: DateTime<Local>,
}

impl ConversionRun {
    /// Starts a run now.
    pub fn start(rate: ExchangeRate) -> Self {
        Self::at(rate, Local::now())
    }

    /// Starts a run at a fixed instant.
    pub fn at<Tz: TimeZone>(rate: ExchangeRate, started_at: DateTime<Tz>) -> Self {
        Self { rate, started_at: started_at.with_timezone(&Local) }
    }

    pub fn rate(&self) -> &ExchangeRate {
        &self.rate
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// The run's timestamp in [`TIMESTAMP_FORMAT`].
    pub fn timestamp(&self) -> String {
        self.started_at.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn convert(&self, listings: &[RawListing]) -> Vec<EnrichedRecord> {
        debug!(
            "Converting {} listings at {} {} -> {}",
            listings.len(),
            self.rate.rate(),
            self.rate.base(),
            self.rate.target()
        );
        convert(listings, self.rate.rate(), self.rate.base(), self.rate.target(), &self.timestamp())
    }
}
