//! Listing fetch and extraction for the books catalogue page.

pub mod client;
pub mod models;
pub mod parser;
pub mod selectors;

pub use client::{BooksClient, ListingSource};
pub use models::{ParsedPrice, RawListing};
pub use parser::{parse_listings, parse_price, MAX_LISTINGS};
