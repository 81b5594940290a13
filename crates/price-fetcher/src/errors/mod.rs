//! Error types and failure classification for the price fetcher.
//!
//! This module provides:
//! - [`PriceFetchError`]: The error enum for every fallible operation in the crate
//! - [`FailureClass`]: Coarse classification used for structured logging and for
//!   deciding whether a failure is contained inside a source

mod failure;

pub use failure::FailureClass;

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building a fetcher or fetching prices.
///
/// Only [`InvalidInput`](Self::InvalidInput) and the construction-time variants
/// ever reach the caller of a fetch. Upstream variants are produced by the
/// sources and absorbed by the aggregator, which logs them and records them in
/// the [`FetchReport`](crate::FetchReport).
#[derive(Error, Debug)]
pub enum PriceFetchError {
    /// The tickers argument was not a sequence of strings.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The configured currency reference document does not exist.
    #[error("Symbol table not found: {}", path.display())]
    SymbolTableNotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// The currency reference document exists but could not be read.
    #[error("Failed to read symbol table {}: {source}", path.display())]
    SymbolTableRead {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The currency reference document is not a flat code-to-name object.
    #[error("Malformed symbol table: {0}")]
    SymbolTableMalformed(String),

    /// The fetcher could not be configured (e.g. the HTTP client failed to build).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The request to an upstream source timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The source that timed out
        provider: String,
    },

    /// The request never produced an HTTP response (DNS, connect, TLS, ...).
    #[error("Request failed: {provider} - {message}")]
    Transport {
        /// The source the request was sent to
        provider: String,
        /// Description of the transport failure
        message: String,
    },

    /// The source answered with a non-success HTTP status.
    #[error("HTTP {status}: {provider} - {message}")]
    HttpStatus {
        /// The source that answered
        provider: String,
        /// HTTP status code
        status: u16,
        /// Error message extracted from the body, or the status reason
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Malformed response: {provider} - {message}")]
    MalformedResponse {
        /// The source that answered
        provider: String,
        /// Decoder message
        message: String,
    },

    /// The response decoded but lacks the field that carries the prices.
    #[error("Missing field `{field}` in {provider} response")]
    MissingField {
        /// The source that answered
        provider: String,
        /// Name of the missing field
        field: &'static str,
    },
}

impl PriceFetchError {
    /// Returns the failure classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use price_fetcher::errors::{FailureClass, PriceFetchError};
    ///
    /// let error = PriceFetchError::Timeout { provider: "COINMARKETCAP".to_string() };
    /// assert_eq!(error.failure_class(), FailureClass::Transport);
    ///
    /// let error = PriceFetchError::InvalidInput("expected a list".to_string());
    /// assert_eq!(error.failure_class(), FailureClass::InvalidInput);
    /// ```
    pub fn failure_class(&self) -> FailureClass {
        match self {
            Self::InvalidInput(_) => FailureClass::InvalidInput,

            Self::SymbolTableNotFound { .. }
            | Self::SymbolTableRead { .. }
            | Self::SymbolTableMalformed(_)
            | Self::Configuration(_) => FailureClass::Configuration,

            Self::Timeout { .. } | Self::Transport { .. } => FailureClass::Transport,

            Self::HttpStatus { .. } => FailureClass::HttpStatus,

            Self::MalformedResponse { .. } | Self::MissingField { .. } => FailureClass::Parse,
        }
    }

    /// Whether this failure is absorbed by the aggregator instead of being returned.
    pub fn is_contained(&self) -> bool {
        self.failure_class().is_upstream()
    }

    /// The source a contained failure came from, if any.
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::Timeout { provider }
            | Self::Transport { provider, .. }
            | Self::HttpStatus { provider, .. }
            | Self::MalformedResponse { provider, .. }
            | Self::MissingField { provider, .. } => Some(provider),
            _ => None,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PriceFetchError>;
