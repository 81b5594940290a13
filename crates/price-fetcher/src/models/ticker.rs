use serde::{Deserialize, Serialize};

/// Which source a ticker is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TickerKind {
    /// Known currency code, priced by the exchange-rate source
    Forex,
    /// Anything else, priced by the crypto-quote source
    Crypto,
}

/// Output of the classifier: a stable partition of the uppercased input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassifiedTickers {
    pub forex: Vec<String>,
    pub crypto: Vec<String>,
}

impl ClassifiedTickers {
    /// Total number of classified tickers.
    pub fn len(&self) -> usize {
        self.forex.len() + self.crypto.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forex.is_empty() && self.crypto.is_empty()
    }

    /// The partition for the given kind.
    pub fn of_kind(&self, kind: TickerKind) -> &[String] {
        match kind {
            TickerKind::Forex => &self.forex,
            TickerKind::Crypto => &self.crypto,
        }
    }

    pub(crate) fn push(&mut self, kind: TickerKind, ticker: String) {
        match kind {
            TickerKind::Forex => self.forex.push(ticker),
            TickerKind::Crypto => self.crypto.push(ticker),
        }
    }
}
