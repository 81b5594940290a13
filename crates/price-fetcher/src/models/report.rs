//! Per-call diagnostics for a price fetch.
//!
//! `fetch_prices` returns only quotes, which leaves a missing ticker ambiguous
//! between "the provider had no price" and "the provider request failed".
//! [`FetchReport`] keeps both apart.

use chrono::{DateTime, Utc};

use super::quote::PriceQuote;
use super::ticker::TickerKind;
use super::types::ProviderId;
use crate::errors::FailureClass;

/// What happened to one source during a fetch.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceOutcome {
    /// No tickers were routed to this source, so no request was issued.
    Skipped,

    /// The request succeeded. `missing` lists requested tickers the response
    /// did not price.
    Success { resolved: usize, missing: Vec<String> },

    /// The request failed as a whole; the source contributed nothing.
    Failed { class: FailureClass, message: String },
}

/// Record of a single source invocation.
#[derive(Clone, Debug)]
pub struct SourceAttempt {
    pub provider_id: ProviderId,
    pub kind: TickerKind,
    pub requested: Vec<String>,
    pub outcome: SourceOutcome,
}

/// Detailed result of a fetch: the merged quotes plus source diagnostics.
#[derive(Clone, Debug)]
pub struct FetchReport {
    /// Forex quotes followed by crypto quotes
    pub quotes: Vec<PriceQuote>,
    pub attempts: Vec<SourceAttempt>,
    pub fetched_at: DateTime<Utc>,
}

impl FetchReport {
    pub fn new() -> Self {
        Self {
            quotes: Vec::new(),
            attempts: Vec::new(),
            fetched_at: Utc::now(),
        }
    }

    pub fn record_skip(&mut self, provider_id: ProviderId, kind: TickerKind) {
        self.attempts.push(SourceAttempt {
            provider_id,
            kind,
            requested: Vec::new(),
            outcome: SourceOutcome::Skipped,
        });
    }

    pub fn record_success(
        &mut self,
        provider_id: ProviderId,
        kind: TickerKind,
        requested: Vec<String>,
        quotes: Vec<PriceQuote>,
        missing: Vec<String>,
    ) {
        self.attempts.push(SourceAttempt {
            provider_id,
            kind,
            requested,
            outcome: SourceOutcome::Success {
                resolved: quotes.len(),
                missing,
            },
        });
        self.quotes.extend(quotes);
    }

    pub fn record_failure(
        &mut self,
        provider_id: ProviderId,
        kind: TickerKind,
        requested: Vec<String>,
        class: FailureClass,
        message: String,
    ) {
        self.attempts.push(SourceAttempt {
            provider_id,
            kind,
            requested,
            outcome: SourceOutcome::Failed { class, message },
        });
    }

    /// Tickers a successful response did not contain.
    pub fn not_found(&self) -> Vec<&str> {
        self.attempts
            .iter()
            .filter_map(|a| match &a.outcome {
                SourceOutcome::Success { missing, .. } => Some(missing),
                _ => None,
            })
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// Tickers whose source request failed as a whole.
    pub fn failed(&self) -> Vec<&str> {
        self.attempts
            .iter()
            .filter(|a| matches!(a.outcome, SourceOutcome::Failed { .. }))
            .flat_map(|a| a.requested.iter().map(String::as_str))
            .collect()
    }

    /// Check if any source failed.
    pub fn has_failures(&self) -> bool {
        self.attempts
            .iter()
            .any(|a| matches!(a.outcome, SourceOutcome::Failed { .. }))
    }

    /// Summary for logging/debugging.
    pub fn summary(&self) -> String {
        self.attempts
            .iter()
            .map(|a| match &a.outcome {
                SourceOutcome::Skipped => format!("{}: SKIPPED", a.provider_id),
                SourceOutcome::Success { resolved, missing } if missing.is_empty() => {
                    format!("{}: OK ({}/{})", a.provider_id, resolved, a.requested.len())
                }
                SourceOutcome::Success { resolved, missing } => format!(
                    "{}: OK ({}/{}, not found: {})",
                    a.provider_id,
                    resolved,
                    a.requested.len(),
                    missing.join(",")
                ),
                SourceOutcome::Failed { class, message } => {
                    format!("{}: FAILED ({}: {})", a.provider_id, class, message)
                }
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl Default for FetchReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::*;

    #[test]
    fn test_report_summary() {
        let mut report = FetchReport::new();
        report.record_success(
            Cow::Borrowed("EXCHANGE_RATE"),
            TickerKind::Forex,
            vec!["EUR".to_string(), "XXX".to_string()],
            vec![PriceQuote::new("EUR", 0.92)],
            vec!["XXX".to_string()],
        );
        report.record_failure(
            Cow::Borrowed("COINMARKETCAP"),
            TickerKind::Crypto,
            vec!["BTC".to_string()],
            FailureClass::Transport,
            "connection refused".to_string(),
        );

        let summary = report.summary();
        assert!(summary.contains("EXCHANGE_RATE: OK (1/2, not found: XXX)"));
        assert!(summary.contains("COINMARKETCAP: FAILED (transport: connection refused)"));
    }

    #[test]
    fn test_not_found_and_failed_are_distinct() {
        let mut report = FetchReport::new();
        report.record_success(
            Cow::Borrowed("COINMARKETCAP"),
            TickerKind::Crypto,
            vec!["BTC".to_string(), "NOPE".to_string()],
            vec![PriceQuote::new("BTC", 64000.0)],
            vec!["NOPE".to_string()],
        );
        report.record_failure(
            Cow::Borrowed("EXCHANGE_RATE"),
            TickerKind::Forex,
            vec!["EUR".to_string()],
            FailureClass::HttpStatus,
            "HTTP 500".to_string(),
        );

        assert_eq!(report.not_found(), vec!["NOPE"]);
        assert_eq!(report.failed(), vec!["EUR"]);
        assert!(report.has_failures());
        assert_eq!(report.quotes, vec![PriceQuote::new("BTC", 64000.0)]);
    }

    #[test]
    fn test_skipped_source_has_no_failures() {
        let mut report = FetchReport::new();
        report.record_skip(Cow::Borrowed("EXCHANGE_RATE"), TickerKind::Forex);

        assert!(!report.has_failures());
        assert!(report.failed().is_empty());
        assert_eq!(report.summary(), "EXCHANGE_RATE: SKIPPED");
    }
}
