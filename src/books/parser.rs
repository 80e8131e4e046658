//! HTML and price-text parsing for the books catalogue.

use super::models::{ParsedPrice, RawListing};
use super::selectors;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use regex_lite::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;
use tracing::{debug, trace, warn};

/// Hard upper bound on listings taken from one page.
pub const MAX_LISTINGS: usize = 10;

/// First "digits.digits" run in a price token.
static DECIMAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+\.\d+)").unwrap());

/// Extracts a decimal price from loosely formatted text such as "£51.77".
///
/// Never fails: text without a decimal number yields
/// [`ParsedPrice::Fallback`] and a warning diagnostic.
pub fn parse_price(text: &str) -> ParsedPrice {
    let parsed = DECIMAL.find(text).and_then(|m| m.as_str().parse::<f64>().ok());

    match parsed {
        Some(value) => ParsedPrice::Parsed { value },
        None => {
            Diagnostic::warning(
                DiagnosticKind::UnparsablePrice,
                format!("Couldn't extract numeric price from '{}'", text),
            )
            .emit();
            ParsedPrice::Fallback { input: text.to_string() }
        }
    }
}

/// Extracts up to `max` listings from a catalogue page, in page order.
///
/// `max` is clamped to [`MAX_LISTINGS`].
pub fn parse_listings(html: &str, max: usize) -> Vec<RawListing> {
    let document = Html::parse_document(html);
    let limit = max.min(MAX_LISTINGS);

    let listings: Vec<RawListing> =
        document.select(&selectors::PRODUCT).take(limit).filter_map(parse_product).collect();

    debug!("Parsed {} listings", listings.len());
    listings
}

/// Parses a single product card. Cards without a usable title are skipped.
fn parse_product(element: ElementRef) -> Option<RawListing> {
    let Some(name) = element
        .select(&selectors::TITLE_LINK)
        .next()
        .and_then(|e| e.value().attr(selectors::TITLE_ATTR))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
    else {
        warn!("Skipping product card without a title");
        return None;
    };

    let price_text = element
        .select(&selectors::PRICE)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    trace!("Parsed listing: {} - {}", name, price_text);
    Some(RawListing::new(name, price_text))
}
