//! Structured diagnostic events.
//!
//! Components report problems as [`Diagnostic`] values instead of printing.
//! Each one is logged through `tracing` with a machine-readable `kind`, and
//! the CLI decides how failures are shown to the user.

use serde::Serialize;
use std::fmt;
use tracing::{error, warn};

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The run continues (e.g. a price fell back to zero).
    Warning,
    /// The run halts.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    NetworkFailure,
    UnsupportedCurrency,
    InvalidInputFormat,
    UnparsablePrice,
    OutputWriteFailure,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::NetworkFailure => "network_failure",
            DiagnosticKind::UnsupportedCurrency => "unsupported_currency",
            DiagnosticKind::InvalidInputFormat => "invalid_input_format",
            DiagnosticKind::UnparsablePrice => "unparsable_price",
            DiagnosticKind::OutputWriteFailure => "output_write_failure",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single reported problem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self { severity: Severity::Warning, kind, message: message.into() }
    }

    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self { severity: Severity::Error, kind, message: message.into() }
    }

    /// Logs the diagnostic and hands it back for further use.
    pub fn emit(self) -> Self {
        match self.severity {
            Severity::Warning => warn!(kind = %self.kind, "{}", self.message),
            Severity::Error => error!(kind = %self.kind, "{}", self.message),
        }
        self
    }
}

impl From<&crate::error::PipelineError> for Diagnostic {
    fn from(err: &crate::error::PipelineError) -> Self {
        Diagnostic::error(err.kind(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    #[test]
    fn test_kind_strings() {
        assert_eq!(DiagnosticKind::UnparsablePrice.to_string(), "unparsable_price");
        assert_eq!(DiagnosticKind::NetworkFailure.as_str(), "network_failure");
    }

    #[test]
    fn test_from_pipeline_error() {
        let err = PipelineError::UnsupportedCurrency { code: "ABC".to_string() };
        let diag = Diagnostic::from(&err);
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.kind, DiagnosticKind::UnsupportedCurrency);
        assert!(diag.message.contains("ABC"));
    }

    #[test]
    fn test_emit_returns_self() {
        let diag = Diagnostic::warning(DiagnosticKind::UnparsablePrice, "bad price 'N/A'");
        let emitted = diag.clone().emit();
        assert_eq!(emitted, diag);
    }

    #[test]
    fn test_serialize() {
        let diag = Diagnostic::warning(DiagnosticKind::UnparsablePrice, "x");
        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("\"severity\":\"warning\""));
        assert!(json.contains("\"kind\":\"unparsable_price\""));
    }
}
