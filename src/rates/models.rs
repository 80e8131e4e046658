//! Exchange-rate data models.

use crate::currency::CurrencyCode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Multiplier converting one unit of `base` into `target`.
///
/// Only valid for the instant it was fetched; no expiry is tracked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeRate {
    base: CurrencyCode,
    target: CurrencyCode,
    rate: f64,
}

impl ExchangeRate {
    /// Returns `None` unless `rate` is finite and strictly positive.
    pub fn new(base: CurrencyCode, target: CurrencyCode, rate: f64) -> Option<Self> {
        (rate.is_finite() && rate > 0.0).then_some(Self { base, target, rate })
    }

    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    pub fn target(&self) -> &CurrencyCode {
        &self.target
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

/// Body of `GET /latest?from=..&to=..`.
///
/// Only `rates` matters; `amount`, `base` and `date` are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct LatestResponse {
    pub rates: HashMap<String, f64>,
}
