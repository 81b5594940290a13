//! Forex symbol table.
//!
//! The currency reference document (`exchange_rate_currencies.json`, a flat
//! code-to-name object) is embedded at compile time via `include_str!` and
//! parsed once per fetcher. A different document can be loaded from disk; a
//! missing file is a construction error, never an empty table.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;

use crate::errors::{PriceFetchError, Result};
use crate::models::TickerKind;

const BUNDLED_CURRENCIES: &str = include_str!("exchange_rate_currencies.json");

/// Immutable mapping from uppercase currency code to display name.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    names_by_code: HashMap<String, String>,
}

impl SymbolTable {
    /// The currency list shipped with the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_json_str(BUNDLED_CURRENCIES)
    }

    /// Load a currency document from disk.
    ///
    /// Fails with [`PriceFetchError::SymbolTableNotFound`] when the file does not exist.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                PriceFetchError::SymbolTableNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                PriceFetchError::SymbolTableRead {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;
        Self::from_json_str(&json)
    }

    /// Parse a JSON object of `code -> name`. Codes are uppercased.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: HashMap<String, String> = serde_json::from_str(json)
            .map_err(|e| PriceFetchError::SymbolTableMalformed(e.to_string()))?;

        let mut names_by_code = HashMap::with_capacity(raw.len());
        for (code, name) in raw {
            let code = code.trim().to_uppercase();
            if code.is_empty() {
                return Err(PriceFetchError::SymbolTableMalformed(
                    "empty currency code".to_string(),
                ));
            }
            if names_by_code.insert(code.clone(), name).is_some() {
                return Err(PriceFetchError::SymbolTableMalformed(format!(
                    "duplicate currency code: {}",
                    code
                )));
            }
        }

        Ok(Self { names_by_code })
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, ticker: &str) -> bool {
        self.names_by_code.contains_key(&ticker.to_uppercase())
    }

    /// Display name for a currency code, if known.
    pub fn name(&self, ticker: &str) -> Option<&str> {
        self.names_by_code
            .get(&ticker.to_uppercase())
            .map(String::as_str)
    }

    /// Forex if the ticker is a known currency code, crypto otherwise.
    pub fn kind_of(&self, ticker: &str) -> TickerKind {
        if self.contains(ticker) {
            TickerKind::Forex
        } else {
            TickerKind::Crypto
        }
    }

    pub fn len(&self) -> usize {
        self.names_by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names_by_code.is_empty()
    }

    /// All known codes, sorted.
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.names_by_code.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}
