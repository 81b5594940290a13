//! CoinMarketCap source for crypto symbols.
//!
//! One GET to `/v1/cryptocurrency/quotes/latest` per batch with the symbols
//! comma-joined in `symbol` and the key in the `X-CMC_PRO_API_KEY` header.
//! Prices are read from `data.<SYMBOL>.quote.USD.price`.
//!
//! Without a key the sandbox host is used; sandbox prices are synthetic.
//! API documentation: https://coinmarketcap.com/api/documentation/v1/

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::http::{parse_json, send};
use super::{PriceSource, SourceQuotes};
use crate::config::CryptoEndpoint;
use crate::errors::{PriceFetchError, Result};
use crate::models::{PriceQuote, TickerKind};

const PROVIDER_ID: &str = "COINMARKETCAP";
const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";
const QUOTE_CURRENCY: &str = "USD";

// ============================================================================
// API Response Structures
// ============================================================================

/// Response from /v1/cryptocurrency/quotes/latest
#[derive(Debug, Deserialize)]
struct QuotesLatestResponse {
    /// Assets keyed by requested symbol
    data: Option<HashMap<String, AssetEntry>>,
    status: Option<ResponseStatus>,
}

#[derive(Debug, Deserialize)]
struct AssetEntry {
    /// Quotes keyed by convert currency
    #[serde(default)]
    quote: HashMap<String, QuoteEntry>,
}

#[derive(Debug, Deserialize)]
struct QuoteEntry {
    price: Option<f64>,
}

/// Status block present on every response, successful or not
#[derive(Debug, Deserialize)]
struct ResponseStatus {
    error_message: Option<String>,
}

/// Error bodies carry `{"status": {"error_code": 1002, "error_message": "API key missing."}}`.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<QuotesLatestResponse>(body)
        .ok()
        .and_then(|r| r.status)
        .and_then(|s| s.error_message)
}

// ============================================================================
// CoinMarketCapSource
// ============================================================================

/// Crypto price source backed by CoinMarketCap.
pub struct CoinMarketCapSource {
    client: Client,
    endpoint: CryptoEndpoint,
}

impl CoinMarketCapSource {
    pub fn new(client: Client, endpoint: CryptoEndpoint) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &CryptoEndpoint {
        &self.endpoint
    }
}

/// Pick the USD price of each requested symbol out of `data`.
///
/// Symbols absent from `data`, or present without a USD price, are missing.
fn resolve_prices(tickers: &[String], data: &HashMap<String, AssetEntry>) -> SourceQuotes {
    let mut resolved = SourceQuotes::default();

    for ticker in tickers {
        let price = data
            .get(ticker)
            .and_then(|asset| asset.quote.get(QUOTE_CURRENCY))
            .and_then(|quote| quote.price);

        match price {
            Some(price) => resolved.quotes.push(PriceQuote::new(ticker.clone(), price)),
            None => resolved.missing.push(ticker.clone()),
        }
    }

    resolved
}

#[async_trait]
impl PriceSource for CoinMarketCapSource {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn kind(&self) -> TickerKind {
        TickerKind::Crypto
    }

    async fn fetch_quotes(&self, tickers: &[String]) -> Result<SourceQuotes> {
        let symbols = tickers.join(",");
        debug!(
            "CoinMarketCap request: {} symbols (sandbox: {})",
            tickers.len(),
            self.endpoint.sandbox
        );

        let request = self
            .client
            .get(&self.endpoint.url)
            .header(ACCEPT, "application/json")
            .header(API_KEY_HEADER, &self.endpoint.api_key)
            .query(&[("symbol", symbols.as_str())]);

        let body = send(PROVIDER_ID, request, error_message).await?;
        let response: QuotesLatestResponse = parse_json(PROVIDER_ID, &body)?;

        let data = response.data.ok_or_else(|| PriceFetchError::MissingField {
            provider: PROVIDER_ID.to_string(),
            field: "data",
        })?;

        let resolved = resolve_prices(tickers, &data);
        if !resolved.missing.is_empty() {
            debug!(
                "CoinMarketCap response has no USD price for: {}",
                resolved.missing.join(",")
            );
        }
        Ok(resolved)
    }
}
