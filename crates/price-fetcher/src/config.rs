//! Fetcher configuration and endpoint resolution.
//!
//! Endpoints are derived once from credential presence:
//!
//! | Source | No key | Key |
//! |--------|--------|-----|
//! | CoinMarketCap | sandbox host, bundled sandbox key | pro host, key in header |
//! | ExchangeRate | `/v4/latest/USD`, rates in `rates` | `/v6/{key}/latest/USD`, rates in `conversion_rates` |

use std::path::PathBuf;
use std::time::Duration;

/// CoinMarketCap sandbox key, published for anonymous testing.
pub const DEFAULT_CMC_SANDBOX_KEY: &str = "b54bcf4d-1bca-4e8e-9a24-22ff2c3d462c";

pub const CMC_SANDBOX_BASE_URL: &str = "https://sandbox-api.coinmarketcap.com";
pub const CMC_PRO_BASE_URL: &str = "https://pro-api.coinmarketcap.com";
const CMC_QUOTES_PATH: &str = "/v1/cryptocurrency/quotes/latest";

pub const ER_OPEN_BASE_URL: &str = "https://api.exchangerate-api.com";
pub const ER_KEYED_BASE_URL: &str = "https://v6.exchangerate-api.com";

/// Default HTTP request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a [`PriceFetcher`](crate::PriceFetcher).
#[derive(Clone, Debug)]
pub struct FetcherConfig {
    /// CoinMarketCap pro key; `None` routes to the sandbox
    pub crypto_api_key: Option<String>,
    /// ExchangeRate-API v6 key; `None` routes to the open v4 endpoint
    pub forex_api_key: Option<String>,
    /// Key sent to the sandbox when no crypto key is configured
    pub crypto_sandbox_key: String,
    /// Replaces the CoinMarketCap scheme and host
    pub crypto_base_url: Option<String>,
    /// Replaces the ExchangeRate-API scheme and host
    pub forex_base_url: Option<String>,
    pub request_timeout: Duration,
    /// Currency document on disk; `None` uses the bundled list
    pub symbols_path: Option<PathBuf>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            crypto_api_key: None,
            forex_api_key: None,
            crypto_sandbox_key: DEFAULT_CMC_SANDBOX_KEY.to_string(),
            crypto_base_url: None,
            forex_base_url: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            symbols_path: None,
        }
    }
}

impl FetcherConfig {
    /// Config with the two optional credentials and defaults for everything else.
    pub fn with_keys(crypto_api_key: Option<String>, forex_api_key: Option<String>) -> Self {
        Self {
            crypto_api_key: non_blank(crypto_api_key),
            forex_api_key: non_blank(forex_api_key),
            ..Self::default()
        }
    }

    /// Read configuration from the environment, loading `.env` first if present.
    ///
    /// Recognized variables: `CMC_API_KEY`, `ER_API_KEY`, `PF_CMC_SANDBOX_KEY`,
    /// `PF_CMC_BASE_URL`, `PF_ER_BASE_URL`, `PF_REQUEST_TIMEOUT_MS`, `PF_SYMBOLS_PATH`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| non_blank(lookup(key));
        let request_timeout = var("PF_REQUEST_TIMEOUT_MS")
            .and_then(|ms| ms.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        Self {
            crypto_api_key: var("CMC_API_KEY"),
            forex_api_key: var("ER_API_KEY"),
            crypto_sandbox_key: var("PF_CMC_SANDBOX_KEY")
                .unwrap_or_else(|| DEFAULT_CMC_SANDBOX_KEY.to_string()),
            crypto_base_url: var("PF_CMC_BASE_URL"),
            forex_base_url: var("PF_ER_BASE_URL"),
            request_timeout,
            symbols_path: var("PF_SYMBOLS_PATH").map(PathBuf::from),
        }
    }

    /// Resolved CoinMarketCap endpoint.
    pub fn crypto_endpoint(&self) -> CryptoEndpoint {
        let (default_base, api_key, sandbox) = match &self.crypto_api_key {
            Some(key) => (CMC_PRO_BASE_URL, key.clone(), false),
            None => (CMC_SANDBOX_BASE_URL, self.crypto_sandbox_key.clone(), true),
        };
        let base = self.crypto_base_url.as_deref().unwrap_or(default_base);

        CryptoEndpoint {
            url: format!("{}{}", base.trim_end_matches('/'), CMC_QUOTES_PATH),
            api_key,
            sandbox,
        }
    }

    /// Resolved ExchangeRate-API endpoint.
    pub fn forex_endpoint(&self) -> ForexEndpoint {
        match &self.forex_api_key {
            Some(key) => {
                let base = self.forex_base_url.as_deref().unwrap_or(ER_KEYED_BASE_URL);
                ForexEndpoint {
                    url: format!(
                        "{}/v6/{}/latest/USD",
                        base.trim_end_matches('/'),
                        urlencoding::encode(key)
                    ),
                    rates_field: RatesField::ConversionRates,
                }
            }
            None => {
                let base = self.forex_base_url.as_deref().unwrap_or(ER_OPEN_BASE_URL);
                ForexEndpoint {
                    url: format!("{}/v4/latest/USD", base.trim_end_matches('/')),
                    rates_field: RatesField::Rates,
                }
            }
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Where and how to query crypto quotes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CryptoEndpoint {
    pub url: String,
    pub api_key: String,
    pub sandbox: bool,
}

/// Where to query exchange rates and which body field carries them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForexEndpoint {
    pub url: String,
    pub rates_field: RatesField,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RatesField {
    /// Open v4 endpoint
    Rates,
    /// Authenticated v6 endpoint
    ConversionRates,
}

impl RatesField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rates => "rates",
            Self::ConversionRates => "conversion_rates",
        }
    }
}
