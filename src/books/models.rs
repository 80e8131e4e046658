//! Data models for scraped listings and their prices.

use serde::{Deserialize, Serialize};

/// Outcome of extracting a number from a price token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ParsedPrice {
    /// A decimal number was found in the text.
    Parsed { value: f64 },
    /// Nothing usable was found; the price counts as zero.
    Fallback { input: String },
}

impl ParsedPrice {
    /// Numeric value, `0.0` for a fallback.
    pub fn value(&self) -> f64 {
        match self {
            ParsedPrice::Parsed { value } => *value,
            ParsedPrice::Fallback { .. } => 0.0,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ParsedPrice::Fallback { .. })
    }
}

/// One product entry scraped from the listing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawListing {
    /// Title attribute of the product link, trimmed
    pub name: String,
    /// Price text as displayed, trimmed (e.g. "£51.77")
    pub price_text: String,
    /// Price extracted from `price_text` at scrape time
    pub price: ParsedPrice,
}

impl RawListing {
    /// Creates a listing, parsing `price_text` once.
    pub fn new(name: impl Into<String>, price_text: impl Into<String>) -> Self {
        let price_text = price_text.into();
        let price = super::parser::parse_price(&price_text);
        Self { name: name.into(), price_text, price }
    }
}
