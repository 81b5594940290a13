//! Upstream price sources.
//!
//! This module contains:
//! - The `PriceSource` trait both upstreams implement
//! - Shared HTTP plumbing (client construction, status and transport mapping)
//! - `ExchangeRateSource` for forex codes and `CoinMarketCapSource` for crypto symbols
//!
//! Sources report failures as typed [`PriceFetchError`](crate::errors::PriceFetchError)s.
//! Turning a failed batch into an empty contribution is the aggregator's job.

mod http;
mod traits;

pub mod coinmarketcap;
pub mod exchange_rate;

pub(crate) use http::build_client;
pub use traits::{PriceSource, SourceQuotes};
