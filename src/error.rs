//! Error types for the conversion pipeline.

use crate::diagnostics::DiagnosticKind;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that halt a conversion run.
///
/// Unparsable prices are deliberately absent: they are recovered as
/// [`ParsedPrice::Fallback`](crate::books::ParsedPrice) and never stop a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// User-supplied currency code is not three ASCII letters.
    #[error("Currency code must be a 3-letter alphabetic code (e.g., USD, EUR), got '{input}'")]
    InvalidCurrency { input: String },

    /// Connection error, timeout, non-success status or unreadable body.
    #[error("Network request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    /// Rate service answered but did not know the target currency.
    #[error("Currency '{code}' not supported or invalid")]
    UnsupportedCurrency { code: String },

    /// Listing fetch produced nothing to convert.
    #[error("No listings found at {url}")]
    NoListings { url: String },

    /// Output file could not be written.
    #[error("Failed to write output file {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Creates a network error from any displayable cause.
    pub fn network(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Network { url: url.into(), reason: reason.to_string() }
    }

    /// Machine-readable kind for diagnostics.
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::InvalidCurrency { .. } => DiagnosticKind::InvalidInputFormat,
            Self::Network { .. } | Self::NoListings { .. } => DiagnosticKind::NetworkFailure,
            Self::UnsupportedCurrency { .. } => DiagnosticKind::UnsupportedCurrency,
            Self::OutputWrite { .. } => DiagnosticKind::OutputWriteFailure,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
