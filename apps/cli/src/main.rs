//! `price-fetcher` prints current USD prices for a mixed list of forex
//! currency codes and crypto symbols.
//!
//! ```bash
//! CMC_API_KEY=... ER_API_KEY=... price-fetcher BTC EUR ETH JPY
//! price-fetcher --file tickers.txt --json --report
//! ```
mod args;
mod tickers;

use std::fs::File;
use std::io::BufReader;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use price_fetcher::{FetcherConfig, PriceFetcher, PriceQuote, SymbolTable};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::args::Args;
use crate::tickers::parse_ticker_list;

fn init_tracing() {
    let log_format = std::env::var("PF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

/// Positional tickers followed by the ones from `--file`.
fn collect_tickers(args: &Args) -> anyhow::Result<Vec<String>> {
    let mut tickers = args.tickers.clone();
    if let Some(path) = &args.file {
        let file = File::open(path)
            .with_context(|| format!("Failed to open ticker file {}", path.display()))?;
        tickers.extend(parse_ticker_list(BufReader::new(file))?);
    }
    if tickers.is_empty() {
        bail!("No tickers given; pass them as arguments or with --file");
    }
    Ok(tickers)
}

fn build_config(args: &Args) -> FetcherConfig {
    let mut config = FetcherConfig::from_env();
    if let Some(path) = &args.symbols {
        config.symbols_path = Some(path.clone());
    }
    if let Some(ms) = args.timeout_ms {
        config.request_timeout = Duration::from_millis(ms);
    }
    config
}

/// `TICKER<TAB>name<TAB>price` for known currencies, `TICKER<TAB>price` otherwise.
fn format_quote_line(quote: &PriceQuote, symbols: &SymbolTable) -> String {
    match symbols.name(&quote.ticker) {
        Some(name) => format!("{}\t{}\t{}", quote.ticker, name, quote.price),
        None => format!("{}\t{}", quote.ticker, quote.price),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing();

    let tickers = collect_tickers(&args)?;
    tracing::debug!("Fetching prices for {} tickers", tickers.len());
    let fetcher = PriceFetcher::from_config(build_config(&args))?;
    let report = fetcher.fetch_report(&tickers).await;

    if args.report {
        eprintln!("{}", report.summary());
        let not_found = report.not_found();
        if !not_found.is_empty() {
            eprintln!("not found: {}", not_found.join(","));
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.quotes)?);
    } else {
        for quote in &report.quotes {
            println!("{}", format_quote_line(quote, fetcher.symbols()));
        }
    }

    Ok(())
}
