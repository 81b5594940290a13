//! Price fetcher models
//!
//! - `types` - Type aliases for common identifiers (ProviderId)
//! - `quote` - The (ticker, USD price) pair returned to callers
//! - `ticker` - Ticker classification (TickerKind, ClassifiedTickers)
//! - `report` - Per-call diagnostics (FetchReport, SourceAttempt, SourceOutcome)

mod quote;
mod report;
mod ticker;
mod types;

pub use quote::PriceQuote;
pub use report::{FetchReport, SourceAttempt, SourceOutcome};
pub use ticker::{ClassifiedTickers, TickerKind};
pub use types::ProviderId;
