//! Output of enriched records: console rendering (table, JSON, CSV) and the
//! persisted CSV file.

use crate::config::{Config, OutputFormat};
use crate::error::{PipelineError, Result};
use crate::pipeline::EnrichedRecord;
use chrono::{DateTime, TimeZone};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Column order of the persisted table.
pub const CSV_HEADER: &str = "name,price_original,price_converted,currency_to,converted_at";

/// Formats records for the console.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats multiple records.
    pub fn format_records(&self, records: &[EnrichedRecord]) -> String {
        if records.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => CSV_HEADER.to_string(),
                OutputFormat::Table => "No records.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => self.json_records(records),
            OutputFormat::Table => self.table_records(records),
            OutputFormat::Csv => csv_records(records),
        }
    }

    // JSON formatting

    fn json_records(&self, records: &[EnrichedRecord]) -> String {
        serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string())
    }

    // Table formatting

    fn table_records(&self, records: &[EnrichedRecord]) -> String {
        let name_width = records.iter().map(|r| r.name.chars().count()).max().unwrap_or(0).max(4);

        let mut lines = Vec::with_capacity(records.len() + 2);
        lines.push(format!(
            "{:<name_width$}  {:>14}  {:>15}  {:<11}  {}",
            "name", "price_original", "price_converted", "currency_to", "converted_at"
        ));
        lines.push(format!(
            "{:-<name_width$}  {:->14}  {:->15}  {:-<11}  {:-<19}",
            "", "", "", "", ""
        ));

        for record in records {
            lines.push(format!(
                "{:<name_width$}  {:>14.2}  {:>15.2}  {:<11}  {}",
                record.name,
                record.price_original,
                record.price_converted,
                record.currency_to,
                record.converted_at
            ));
        }

        lines.join("\n")
    }
}

fn csv_records(records: &[EnrichedRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_HEADER.to_string());

    for record in records {
        lines.push(format!(
            "{},{:.2},{:.2},{},{}",
            csv_escape(&record.name),
            record.price_original,
            record.price_converted,
            record.currency_to,
            csv_escape(&record.converted_at)
        ));
    }

    lines.join("\n")
}

fn csv_escape(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Writes records to `path` as CSV, replacing any existing file.
pub fn write_csv(records: &[EnrichedRecord], path: &Path) -> Result<()> {
    let write_err = |source| PipelineError::OutputWrite { path: path.to_path_buf(), source };

    debug!("Writing {} records to {}", records.len(), path.display());

    let mut file = File::create(path).map_err(write_err)?;
    writeln!(file, "{}", csv_records(records)).map_err(write_err)?;
    file.flush().map_err(write_err)?;

    info!("Saved {} records to {}", records.len(), path.display());
    Ok(())
}

/// Resolves the output file for a run started at `now`.
///
/// With `timestamped_output` the stem gets a `_YYYYmmdd_HHMMSS` suffix.
pub fn output_path<Tz: TimeZone>(config: &Config, now: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    let base = &config.output_file;
    if !config.timestamped_output {
        return base.clone();
    }

    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("book_prices");
    let stamp = now.format("%Y%m%d_%H%M%S");
    let file_name = match base.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_{}.{}", stem, stamp, ext),
        None => format!("{}_{}", stem, stamp),
    };

    base.with_file_name(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::CurrencyCode;
    use chrono::Utc;
    use tempfile::TempDir;

    fn make_record(name: &str, original: f64, converted: f64) -> EnrichedRecord {
        EnrichedRecord {
            name: name.to_string(),
            price_original: original,
            price_converted: converted,
            currency_from: "GBP".parse::<CurrencyCode>().unwrap(),
            currency_to: "USD".parse::<CurrencyCode>().unwrap(),
            converted_at: "2024-05-10 12:00:00".to_string(),
        }
    }

    #[test]
    fn test_csv_records() {
        let csv = csv_records(&[make_record("A Light in the Attic", 51.77, 65.75)]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "A Light in the Attic,51.77,65.75,USD,2024-05-10 12:00:00");
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(csv_escape("simple"), "simple");
        assert_eq!(csv_escape("with,comma"), "\"with,comma\"");
        assert_eq!(csv_escape("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(csv_escape("with\nnewline"), "\"with\nnewline\"");
        assert_eq!(csv_escape("with\rreturn"), "\"with\rreturn\"");
        assert_eq!(csv_escape("crlf\r\nend"), "\"crlf\r\nend\"");
    }

    #[test]
    fn test_csv_zero_price() {
        let csv = csv_records(&[make_record("Mystery", 0.0, 0.0)]);
        assert!(csv.ends_with("Mystery,0.00,0.00,USD,2024-05-10 12:00:00"));
    }

    #[test]
    fn test_write_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        let records =
            vec![make_record("First, Book", 10.0, 12.7), make_record("Second", 51.77, 65.75)];
        write_csv(&records, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "\"First, Book\",10.00,12.70,USD,2024-05-10 12:00:00");
        assert_eq!(lines[2], "Second,51.77,65.75,USD,2024-05-10 12:00:00");
    }

    #[test]
    fn test_write_csv_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale content\nmore stale\nand more\nand more\n").unwrap();

        write_csv(&[make_record("Only", 1.0, 1.27)], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("stale"));
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_write_csv_invalid_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.csv");

        let err = write_csv(&[make_record("X", 1.0, 1.0)], &path).unwrap_err();
        match err {
            PipelineError::OutputWrite { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_output_path_fixed() {
        let config = Config::default();
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        assert_eq!(output_path(&config, &now), PathBuf::from("book_prices.csv"));
    }

    #[test]
    fn test_output_path_timestamped() {
        let config = Config {
            output_file: PathBuf::from("out/prices.csv"),
            timestamped_output: true,
            ..Config::default()
        };
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 8, 5, 9).unwrap();
        assert_eq!(output_path(&config, &now), PathBuf::from("out/prices_20240510_080509.csv"));

        let config = Config {
            output_file: PathBuf::from("prices"),
            timestamped_output: true,
            ..Config::default()
        };
        assert_eq!(output_path(&config, &now), PathBuf::from("prices_20240510_080509"));
    }

    #[test]
    fn test_format_table() {
        let formatter = Formatter::new(OutputFormat::Table);
        let output = formatter.format_records(&[make_record("A Light in the Attic", 51.77, 65.75)]);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("name"));
        assert!(lines[2].contains("A Light in the Attic"));
        assert!(lines[2].contains("51.77"));
        assert!(lines[2].contains("65.75"));
        assert!(lines[2].contains("USD"));
    }

    #[test]
    fn test_format_json() {
        let formatter = Formatter::new(OutputFormat::Json);
        let output = formatter.format_records(&[make_record("A", 1.0, 1.27)]);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["name"], "A");
        assert_eq!(parsed[0]["price_converted"], 1.27);
        assert_eq!(parsed[0]["currency_to"], "USD");
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(Formatter::new(OutputFormat::Json).format_records(&[]), "[]");
        assert_eq!(Formatter::new(OutputFormat::Csv).format_records(&[]), CSV_HEADER);
        assert_eq!(Formatter::new(OutputFormat::Table).format_records(&[]), "No records.");
    }
}
