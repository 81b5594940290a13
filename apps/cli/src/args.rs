//! Command-line arguments for the price fetcher.
use std::path::PathBuf;

use clap::Parser;

/// Fetch USD prices for forex currency codes and crypto symbols.
///
/// API keys are read from the environment (or a `.env` file):
/// `CMC_API_KEY` for CoinMarketCap and `ER_API_KEY` for ExchangeRate-API.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Tickers to price, e.g. `BTC EUR ETH JPY`.
    pub tickers: Vec<String>,

    /// Text file with more tickers, separated by commas, spaces or new lines.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Print the quotes as a JSON array.
    #[arg(long)]
    pub json: bool,

    /// Print per-source diagnostics to stderr.
    #[arg(long)]
    pub report: bool,

    /// Currency reference document to use instead of the bundled one.
    #[arg(long, value_name = "PATH")]
    pub symbols: Option<PathBuf>,

    /// Per-request timeout in milliseconds.
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,
}
