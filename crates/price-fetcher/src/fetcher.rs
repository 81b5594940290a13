//! Price aggregator, the public entry point.
//!
//! A fetch:
//! 1. Returns immediately for an empty ticker list
//! 2. Classifies tickers into forex and crypto
//! 3. Calls the forex source, then the crypto source, skipping empty partitions
//! 4. Concatenates forex quotes followed by crypto quotes
//!
//! Source failures never surface as errors: they are logged with their
//! failure class and the source contributes nothing.

use std::borrow::Cow;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::classifier::classify;
use crate::config::FetcherConfig;
use crate::errors::{PriceFetchError, Result};
use crate::models::{FetchReport, PriceQuote, ProviderId, TickerKind};
use crate::provider::coinmarketcap::CoinMarketCapSource;
use crate::provider::exchange_rate::ExchangeRateSource;
use crate::provider::{build_client, PriceSource};
use crate::symbols::SymbolTable;

/// Fetches USD prices for mixed forex/crypto ticker lists.
///
/// Built once and reused; holds no state between calls apart from the
/// read-only symbol table.
///
/// # Example
///
/// ```ignore
/// use price_fetcher::PriceFetcher;
///
/// let fetcher = PriceFetcher::new(None, None)?;
/// let quotes = fetcher.fetch_prices(&["BTC", "EUR"]).await;
/// ```
pub struct PriceFetcher {
    symbols: SymbolTable,
    forex: Arc<dyn PriceSource>,
    crypto: Arc<dyn PriceSource>,
}

impl PriceFetcher {
    /// Create a fetcher from the two optional credentials.
    ///
    /// Missing keys route to the CoinMarketCap sandbox and the open
    /// ExchangeRate-API endpoint respectively.
    pub fn new(crypto_api_key: Option<String>, forex_api_key: Option<String>) -> Result<Self> {
        Self::from_config(FetcherConfig::with_keys(crypto_api_key, forex_api_key))
    }

    /// Create a fetcher from a full configuration.
    ///
    /// Fails if the configured symbol table cannot be loaded or the HTTP
    /// client cannot be built.
    pub fn from_config(config: FetcherConfig) -> Result<Self> {
        let symbols = match &config.symbols_path {
            Some(path) => SymbolTable::from_path(path)?,
            None => SymbolTable::bundled()?,
        };

        let client = build_client(config.request_timeout)?;
        let forex = ExchangeRateSource::new(client.clone(), config.forex_endpoint());
        let crypto = CoinMarketCapSource::new(client, config.crypto_endpoint());

        debug!(
            "Price fetcher ready: {} forex codes, forex rates field: {}, crypto sandbox: {}",
            symbols.len(),
            forex.endpoint().rates_field.as_str(),
            crypto.endpoint().sandbox
        );

        Ok(Self::with_sources(symbols, Arc::new(forex), Arc::new(crypto)))
    }

    /// Create a fetcher around arbitrary sources.
    pub fn with_sources(
        symbols: SymbolTable,
        forex: Arc<dyn PriceSource>,
        crypto: Arc<dyn PriceSource>,
    ) -> Self {
        Self {
            symbols,
            forex,
            crypto,
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Fetch prices for `tickers`: forex quotes first, then crypto quotes.
    ///
    /// Tickers a source could not price, or whose source failed, are absent
    /// from the result. Use [`fetch_report`](Self::fetch_report) to tell the
    /// two apart.
    pub async fn fetch_prices<S: AsRef<str>>(&self, tickers: &[S]) -> Vec<PriceQuote> {
        self.fetch_report(tickers).await.quotes
    }

    /// Fetch prices for a dynamically typed ticker list.
    ///
    /// Fails with [`PriceFetchError::InvalidInput`] unless `tickers` is a
    /// JSON array of strings.
    pub async fn fetch_prices_json(&self, tickers: &Value) -> Result<Vec<PriceQuote>> {
        let tickers = tickers_from_json(tickers)?;
        Ok(self.fetch_prices(&tickers).await)
    }

    /// Fetch prices and keep per-source diagnostics.
    pub async fn fetch_report<S: AsRef<str>>(&self, tickers: &[S]) -> FetchReport {
        let mut report = FetchReport::new();
        if tickers.is_empty() {
            return report;
        }

        let classified = classify(tickers, &self.symbols);
        debug!(
            "Classified {} tickers: {} forex, {} crypto",
            classified.len(),
            classified.forex.len(),
            classified.crypto.len()
        );

        // Forex first: the result order depends on it.
        self.run_source(self.forex.as_ref(), classified.forex, &mut report)
            .await;
        self.run_source(self.crypto.as_ref(), classified.crypto, &mut report)
            .await;

        if report.has_failures() {
            debug!("Fetch diagnostics: {}", report.summary());
        }
        report
    }

    async fn run_source(
        &self,
        source: &dyn PriceSource,
        tickers: Vec<String>,
        report: &mut FetchReport,
    ) {
        let provider_id: ProviderId = Cow::Borrowed(source.id());
        let kind: TickerKind = source.kind();

        if tickers.is_empty() {
            report.record_skip(provider_id, kind);
            return;
        }

        match source.fetch_quotes(&tickers).await {
            Ok(resolved) => {
                report.record_success(provider_id, kind, tickers, resolved.quotes, resolved.missing);
            }
            Err(e) => {
                let class = e.failure_class();
                warn!(
                    provider = source.id(),
                    failure_class = %class,
                    tickers = tickers.len(),
                    "Error fetching prices: {}",
                    e
                );
                report.record_failure(provider_id, kind, tickers, class, e.to_string());
            }
        }
    }
}

/// Validate a dynamically typed ticker list.
pub fn tickers_from_json(value: &Value) -> Result<Vec<String>> {
    let items = value.as_array().ok_or_else(|| {
        PriceFetchError::InvalidInput(format!(
            "Tickers must be provided as a list, got {}",
            json_type_name(value)
        ))
    })?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                PriceFetchError::InvalidInput(format!(
                    "Ticker at index {} must be a string, got {}",
                    i,
                    json_type_name(item)
                ))
            })
        })
        .collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
