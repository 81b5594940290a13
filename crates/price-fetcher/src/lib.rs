//! Price Fetcher Crate
//!
//! Fetches current USD prices for a mixed list of forex currency codes and
//! crypto symbols, routing each ticker to the right upstream and merging the
//! results into one ordered list.
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |   PriceFetcher   |  (validates input, merges results)
//! +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |    Classifier    | --> |   SymbolTable    |  (bundled currency codes)
//! +------------------+     +------------------+
//!          |
//!          +--------------------------+
//!          v                          v
//! +--------------------+    +----------------------+
//! | ExchangeRateSource |    | CoinMarketCapSource  |
//! +--------------------+    +----------------------+
//!          |                          |
//!          v                          v
//!   forex quotes first  ++  crypto quotes
//! ```
//!
//! # Core Types
//!
//! - [`PriceFetcher`] - Entry point; built once, reused across calls
//! - [`FetcherConfig`] - Credentials, endpoint overrides, timeout, symbol table path
//! - [`PriceQuote`] - A (ticker, USD price) pair
//! - [`FetchReport`] - Quotes plus per-source diagnostics
//! - [`PriceSource`] - Trait implemented by both upstreams
//! - [`PriceFetchError`] - Typed failures with a [`FailureClass`]

pub mod classifier;
pub mod config;
pub mod errors;
pub mod fetcher;
pub mod models;
pub mod provider;
pub mod symbols;

pub use classifier::classify;
pub use config::FetcherConfig;
pub use errors::{FailureClass, PriceFetchError, Result};
pub use fetcher::{tickers_from_json, PriceFetcher};
pub use models::{
    ClassifiedTickers, FetchReport, PriceQuote, ProviderId, SourceAttempt, SourceOutcome,
    TickerKind,
};
pub use provider::coinmarketcap::CoinMarketCapSource;
pub use provider::exchange_rate::ExchangeRateSource;
pub use provider::{PriceSource, SourceQuotes};
pub use symbols::SymbolTable;
