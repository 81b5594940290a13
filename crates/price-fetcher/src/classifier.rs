//! Ticker classification.
//!
//! Every ticker is uppercased and routed by symbol-table membership: known
//! currency codes go to the forex source, everything else to the crypto
//! source. The partition is stable and drops nothing.

use crate::models::ClassifiedTickers;
use crate::symbols::SymbolTable;

/// Partition `tickers` into forex and crypto, preserving input order.
pub fn classify<S: AsRef<str>>(tickers: &[S], symbols: &SymbolTable) -> ClassifiedTickers {
    let mut classified = ClassifiedTickers::default();
    for ticker in tickers {
        let ticker = ticker.as_ref().to_uppercase();
        classified.push(symbols.kind_of(&ticker), ticker);
    }
    classified
}
