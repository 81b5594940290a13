use serde::{Deserialize, Serialize};

/// A USD-denominated price for one ticker.
///
/// Quotes carry no timestamp or precision metadata; the ticker is always the
/// uppercased form that was sent upstream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Uppercased ticker (currency code or crypto symbol)
    pub ticker: String,

    /// Price in USD
    pub price: f64,
}

impl PriceQuote {
    pub fn new(ticker: impl Into<String>, price: f64) -> Self {
        Self {
            ticker: ticker.into(),
            price,
        }
    }

    /// Borrowing view as a `(ticker, price)` pair.
    pub fn as_tuple(&self) -> (&str, f64) {
        (&self.ticker, self.price)
    }
}

impl From<PriceQuote> for (String, f64) {
    fn from(quote: PriceQuote) -> Self {
        (quote.ticker, quote.price)
    }
}

impl From<(String, f64)> for PriceQuote {
    fn from((ticker, price): (String, f64)) -> Self {
        Self { ticker, price }
    }
}
