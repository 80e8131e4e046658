//! Exchange-rate lookup against a frankfurter-compatible service.

pub mod client;
pub mod models;

pub use client::{RateClient, RateSource};
pub use models::ExchangeRate;
