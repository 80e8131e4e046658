//! bookfx - Scrape book prices and convert them into another currency

use anyhow::{Context, Result};
use bookfx::commands::ConvertCommand;
use bookfx::config::{Config, OutputFormat};
use bookfx::diagnostics::Diagnostic;
use bookfx::output::Formatter;
use bookfx::PipelineError;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "bookfx",
    version,
    about = "Scrape book prices and convert them into another currency",
    long_about = "Fetches the first listings of the books catalogue, converts every price from \
                  the site's currency using a live exchange rate and saves the result as CSV."
)]
struct Cli {
    /// Target currency code (prompted for when omitted)
    #[arg(long, env = "BOOKFX_TO")]
    to: Option<String>,

    /// Output CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Append a timestamp to the output file name
    #[arg(long)]
    timestamped: bool,

    /// Console output format
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(output) = cli.output {
        config.output_file = output;
    }
    if cli.timestamped {
        config.timestamped_output = true;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    println!("📘 Scraping book prices from {}\n", config.source_url);

    let target = match cli.to {
        Some(code) => code,
        None => prompt("Enter target currency (e.g., USD, EUR): ")?,
    };

    let cmd = ConvertCommand::new(config);
    let (rates, books) = cmd.clients()?;

    let rate = match cmd.rate(&rates, &target).await {
        Ok(rate) => rate,
        Err(e) => return Ok(halt(&e)),
    };

    println!("\n💱 Exchange Rate: 1 {} = {:.4} {}\n", rate.base(), rate.rate(), rate.target());

    let report = match cmd.convert_and_save(&books, rate).await {
        Ok(report) => report,
        Err(e) => return Ok(halt(&e)),
    };

    println!("📊 Converted Prices:\n");
    println!("{}", Formatter::new(cmd.config().format).format_records(&report.records));
    if report.fallback_count > 0 {
        println!("\n⚠️  {} price(s) could not be parsed and were set to 0.00", report.fallback_count);
    }
    println!("\n✅ Data saved to '{}'", report.output_path.display());

    Ok(ExitCode::SUCCESS)
}

/// Reads one line from stdin after printing `message`.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line).context("Failed to read from stdin")?;
    Ok(line.trim().to_string())
}

/// Renders a run-halting error and picks the exit code.
fn halt(err: &PipelineError) -> ExitCode {
    let diagnostic = Diagnostic::from(err);
    tracing::debug!(kind = %diagnostic.kind, "Run halted");
    eprintln!("❌ {}", diagnostic.message);
    ExitCode::FAILURE
}
