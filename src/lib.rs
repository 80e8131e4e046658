//! bookfx - Scrape book prices and convert them into another currency
//!
//! Fetches a live exchange rate, scrapes the first listings of a catalogue
//! page, converts every price and saves the result as CSV.

pub mod books;
pub mod commands;
pub mod config;
pub mod currency;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod rates;

pub use books::{ParsedPrice, RawListing};
pub use config::Config;
pub use currency::CurrencyCode;
pub use error::PipelineError;
pub use pipeline::EnrichedRecord;
pub use rates::ExchangeRate;
