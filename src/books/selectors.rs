//! CSS selectors for the books catalogue markup.
//!
//! Update this file when the page structure changes.

use scraper::Selector;
use std::sync::LazyLock;

/// One product card on the catalogue page.
pub static PRODUCT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article.product_pod").unwrap());

/// Product link carrying the full title in its `title` attribute.
pub static TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h3 a").unwrap());

/// Attribute holding the untruncated book title.
pub static TITLE_ATTR: &str = "title";

/// Displayed price, e.g. "£51.77".
pub static PRICE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".price_color").unwrap());
