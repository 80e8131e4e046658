//! HTTP client for the listing page using wreq for TLS fingerprint emulation.

use super::models::RawListing;
use super::parser::{self, MAX_LISTINGS};
use crate::config::Config;
use crate::diagnostics::Diagnostic;
use crate::error::{PipelineError, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};
use wreq::Client;
use wreq_util::Emulation;

/// Trait for listing fetches - enables mocking for tests.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetches the page at `url` and extracts its listings.
    ///
    /// Failures are reported as diagnostics; the result is then empty.
    async fn fetch_listings(&self, url: &str) -> Vec<RawListing>;
}

/// Catalogue client with a browser-like identity.
pub struct BooksClient {
    client: Client,
    user_agent: String,
    max_listings: usize,
}

impl BooksClient {
    /// Creates a new books client with the given configuration.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
            max_listings: config.max_listings.min(MAX_LISTINGS),
        })
    }

    /// Performs a GET and returns the body. Errors on non-2xx responses.
    async fn get(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("User-Agent", self.user_agent.as_str())
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "en-GB,en;q=0.9")
            .send()
            .await
            .map_err(|e| PipelineError::network(url, e))?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(PipelineError::network(url, format!("status {}", status)));
        }

        response.text().await.map_err(|e| PipelineError::network(url, e))
    }
}

#[async_trait]
impl ListingSource for BooksClient {
    async fn fetch_listings(&self, url: &str) -> Vec<RawListing> {
        info!("Fetching listings from {}", url);

        match self.get(url).await {
            Ok(html) => parser::parse_listings(&html, self.max_listings),
            Err(e) => {
                Diagnostic::from(&e).emit();
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_test_config() -> Config {
        Config { timeout_secs: 5, ..Config::default() }
    }

    fn catalogue(count: usize) -> String {
        let cards: String = (0..count)
            .map(|i| {
                format!(
                    r#"<article class="product_pod">
                        <h3><a href="b{i}.html" title="Book {i}">Book {i}</a></h3>
                        <p class="price_color">£{i}.50</p>
                    </article>"#
                )
            })
            .collect();
        format!("<html><body>{}</body></html>", cards)
    }

    #[tokio::test]
    async fn test_fetch_listings_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(catalogue(3)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = BooksClient::new(&make_test_config()).unwrap();
        let listings = client.fetch_listings(&format!("{}/", mock_server.uri())).await;

        assert_eq!(listings.len(), 3);
        assert_eq!(listings[2].name, "Book 2");
        assert_eq!(listings[2].price.value(), 2.5);
    }

    #[tokio::test]
    async fn test_fetch_listings_caps_at_max() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(catalogue(20)))
            .mount(&mock_server)
            .await;

        let client = BooksClient::new(&make_test_config()).unwrap();
        let listings = client.fetch_listings(&mock_server.uri()).await;

        assert_eq!(listings.len(), 10);
        assert!(listings.iter().all(|l| !l.name.is_empty() && !l.price_text.is_empty()));
    }

    #[tokio::test]
    async fn test_fetch_listings_ignores_larger_configured_max() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(catalogue(20)))
            .mount(&mock_server)
            .await;

        let config = Config { max_listings: 50, ..make_test_config() };
        let client = BooksClient::new(&config).unwrap();
        assert_eq!(client.max_listings, MAX_LISTINGS);

        let listings = client.fetch_listings(&mock_server.uri()).await;
        assert_eq!(listings.len(), 10);
        assert_eq!(listings[9].name, "Book 9");
    }

    #[tokio::test]
    async fn test_fetch_listings_http_error_is_empty() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = BooksClient::new(&make_test_config()).unwrap();
        let listings = client.fetch_listings(&mock_server.uri()).await;
        assert!(listings.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_listings_no_products() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&mock_server)
            .await;

        let client = BooksClient::new(&make_test_config()).unwrap();
        assert!(client.fetch_listings(&mock_server.uri()).await.is_empty());
    }

    #[tokio::test]
    async fn test_get_error_mentions_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let client = BooksClient::new(&make_test_config()).unwrap();
        let err = client.get(&mock_server.uri()).await.unwrap_err();
        assert!(matches!(err, PipelineError::Network { .. }));
        assert!(err.to_string().contains("503"));
    }
}
