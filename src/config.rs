//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::books::MAX_LISTINGS;
use crate::currency::CurrencyCode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Page the listings are scraped from
    #[serde(default = "default_source_url")]
    pub source_url: String,

    /// Base URL of the frankfurter-compatible rate service
    #[serde(default = "default_rate_api_url")]
    pub rate_api_url: String,

    /// Currency the source page displays prices in
    #[serde(default = "default_base_currency")]
    pub base_currency: CurrencyCode,

    /// Maximum number of listings taken from the page (1 to 10)
    #[serde(default = "default_max_listings")]
    pub max_listings: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent sent with the listing request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Output CSV file
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,

    /// Append a timestamp to the output file name
    #[serde(default)]
    pub timestamped_output: bool,

    /// Console output format
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_source_url() -> String {
    "https://books.toscrape.com/".to_string()
}

fn default_rate_api_url() -> String {
    "https://api.frankfurter.app".to_string()
}

fn default_base_currency() -> CurrencyCode {
    CurrencyCode::from_static("GBP")
}

fn default_max_listings() -> usize {
    MAX_LISTINGS
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_output_file() -> PathBuf {
    PathBuf::from("book_prices.csv")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
            rate_api_url: default_rate_api_url(),
            base_currency: default_base_currency(),
            max_listings: default_max_listings(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            output_file: default_output_file(),
            timestamped_output: false,
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate().with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Checks values serde alone cannot constrain.
    ///
    /// `max_listings` above the page cap is clamped later, zero is refused.
    pub fn validate(&self) -> Result<()> {
        if self.max_listings == 0 {
            anyhow::bail!("max_listings must be at least 1");
        }
        if self.max_listings > MAX_LISTINGS {
            warn!(
                "max_listings = {} exceeds the limit of {}; using {}",
                self.max_listings, MAX_LISTINGS, MAX_LISTINGS
            );
        }
        Ok(())
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("bookfx.toml");
        if local_config.exists() {
            debug!("Found bookfx.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("bookfx").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var("BOOKFX_SOURCE_URL") {
            self.source_url = url;
        }

        if let Ok(url) = std::env::var("BOOKFX_RATE_API_URL") {
            self.rate_api_url = url;
        }

        if let Ok(timeout) = std::env::var("BOOKFX_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.timeout_secs = t;
            }
        }

        if let Ok(output) = std::env::var("BOOKFX_OUTPUT") {
            if !output.trim().is_empty() {
                self.output_file = PathBuf::from(output);
            }
        }

        self
    }
}

/// Console format for the converted table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
