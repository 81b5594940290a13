//! Price source trait definition.

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::{PriceQuote, TickerKind};

/// What a successful source request produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceQuotes {
    /// Resolved quotes, in request order
    pub quotes: Vec<PriceQuote>,
    /// Requested tickers the response did not price
    pub missing: Vec<String>,
}

/// Trait for upstream price providers.
///
/// A source receives a non-empty list of uppercased tickers of its
/// [`kind`](Self::kind) and issues exactly one request for the whole batch.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Unique identifier, e.g. "EXCHANGE_RATE". Used for logging and reports.
    fn id(&self) -> &'static str;

    /// The ticker partition this source prices.
    fn kind(&self) -> TickerKind;

    /// Fetch prices for `tickers`.
    ///
    /// Per-ticker misses go to [`SourceQuotes::missing`]; a failure of the
    /// request itself is returned as an error for the whole batch.
    async fn fetch_quotes(&self, tickers: &[String]) -> Result<SourceQuotes>;
}
