use std::fmt;

use serde::Serialize;

/// Classification of a [`PriceFetchError`](super::PriceFetchError).
///
/// # Behavior Summary
///
/// | Class | Returned to caller? | Source contribution |
/// |-------|--------------------|---------------------|
/// | `InvalidInput` | Yes | none issued |
/// | `Configuration` | Yes (construction) | none issued |
/// | `Transport` | No, logged | empty |
/// | `HttpStatus` | No, logged | empty |
/// | `Parse` | No, logged | empty |
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    /// The caller passed something that is not a list of tickers.
    InvalidInput,

    /// The fetcher could not be built (reference data, HTTP client).
    Configuration,

    /// No HTTP response was received: connect failure, DNS, TLS or timeout.
    Transport,

    /// The source answered with a non-success status.
    HttpStatus,

    /// The body was not valid JSON or lacked the expected field.
    Parse,
}

impl FailureClass {
    /// Upstream classes degrade to an empty contribution instead of failing the call.
    pub fn is_upstream(self) -> bool {
        matches!(self, Self::Transport | Self::HttpStatus | Self::Parse)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::Configuration => "configuration",
            Self::Transport => "transport",
            Self::HttpStatus => "http_status",
            Self::Parse => "parse",
        }
    }
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_classes() {
        assert!(FailureClass::Transport.is_upstream());
        assert!(FailureClass::HttpStatus.is_upstream());
        assert!(FailureClass::Parse.is_upstream());
        assert!(!FailureClass::InvalidInput.is_upstream());
        assert!(!FailureClass::Configuration.is_upstream());
    }

    #[test]
    fn test_display_matches_serde_name() {
        let json = serde_json::to_string(&FailureClass::HttpStatus).unwrap();
        assert_eq!(json, "\"http_status\"");
        assert_eq!(FailureClass::HttpStatus.to_string(), "http_status");
    }
}
