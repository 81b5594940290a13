//! ExchangeRate-API source for forex codes.
//!
//! One GET per batch against a USD-based "latest" endpoint:
//! - open v4 endpoint, rates under `rates`
//! - authenticated v6 endpoint (key in the path), rates under `conversion_rates`
//!
//! USD is always quoted as exactly 1.0 since the API does not reliably
//! self-quote. API documentation: https://www.exchangerate-api.com/docs

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::http::{parse_json, send};
use super::{PriceSource, SourceQuotes};
use crate::config::{ForexEndpoint, RatesField};
use crate::errors::{PriceFetchError, Result};
use crate::models::{PriceQuote, TickerKind};

const PROVIDER_ID: &str = "EXCHANGE_RATE";
const BASE_CURRENCY: &str = "USD";

/// Response from the `/latest/USD` endpoints
#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    /// v6 only: "success" or "error"
    result: Option<String>,
    /// v6 only: reason when `result` is "error"
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    /// v4 rates
    rates: Option<HashMap<String, f64>>,
    /// v6 rates
    conversion_rates: Option<HashMap<String, f64>>,
}

impl LatestRatesResponse {
    fn into_rates(self, field: RatesField) -> Option<HashMap<String, f64>> {
        match field {
            RatesField::Rates => self.rates,
            RatesField::ConversionRates => self.conversion_rates,
        }
    }
}

/// v6 error bodies look like `{"result": "error", "error-type": "invalid-key"}`.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<LatestRatesResponse>(body)
        .ok()
        .and_then(|r| r.error_type)
}

/// Forex price source backed by ExchangeRate-API.
pub struct ExchangeRateSource {
    client: Client,
    endpoint: ForexEndpoint,
}

impl ExchangeRateSource {
    pub fn new(client: Client, endpoint: ForexEndpoint) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &ForexEndpoint {
        &self.endpoint
    }

    async fn fetch_rates(&self) -> Result<HashMap<String, f64>> {
        debug!("Exchange rate request: {}", self.endpoint.rates_field.as_str());

        let request = self
            .client
            .get(&self.endpoint.url)
            .header(ACCEPT, "application/json");
        let body = send(PROVIDER_ID, request, error_message).await?;
        let response: LatestRatesResponse = parse_json(PROVIDER_ID, &body)?;

        let (rates, degraded) = rates_or_empty(response, self.endpoint.rates_field);
        if let Some(e) = degraded {
            warn!(
                provider = PROVIDER_ID,
                failure_class = %e.failure_class(),
                "Exchange rate response carries no rates, pricing USD only: {}",
                e
            );
        }
        Ok(rates)
    }
}

/// Rates from a decoded body, or an empty table plus the cause when the body
/// reports an error or lacks the rates field. USD stays priceable either way.
fn rates_or_empty(
    response: LatestRatesResponse,
    field: RatesField,
) -> (HashMap<String, f64>, Option<PriceFetchError>) {
    if response.result.as_deref() == Some("error") {
        let cause = PriceFetchError::MalformedResponse {
            provider: PROVIDER_ID.to_string(),
            message: format!(
                "provider reported error: {}",
                response.error_type.as_deref().unwrap_or("unspecified")
            ),
        };
        return (HashMap::new(), Some(cause));
    }

    match response.into_rates(field) {
        Some(rates) => (rates, None),
        None => (
            HashMap::new(),
            Some(PriceFetchError::MissingField {
                provider: PROVIDER_ID.to_string(),
                field: field.as_str(),
            }),
        ),
    }
}

/// Pick the requested codes out of a USD-based rate table.
///
/// USD, if requested, comes first with 1.0 and only once; other codes follow
/// in request order. Codes absent from the table are reported as missing.
fn resolve_rates(tickers: &[String], rates: &HashMap<String, f64>) -> SourceQuotes {
    let mut resolved = SourceQuotes::default();

    if tickers.iter().any(|t| t == BASE_CURRENCY) {
        resolved.quotes.push(PriceQuote::new(BASE_CURRENCY, 1.0));
    }

    for ticker in tickers.iter().filter(|t| *t != BASE_CURRENCY) {
        match rates.get(ticker) {
            Some(rate) => resolved.quotes.push(PriceQuote::new(ticker.clone(), *rate)),
            None => resolved.missing.push(ticker.clone()),
        }
    }

    resolved
}

#[async_trait]
impl PriceSource for ExchangeRateSource {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn kind(&self) -> TickerKind {
        TickerKind::Forex
    }

    async fn fetch_quotes(&self, tickers: &[String]) -> Result<SourceQuotes> {
        let rates = self.fetch_rates().await?;
        let resolved = resolve_rates(tickers, &rates);
        if !resolved.missing.is_empty() {
            debug!(
                "Exchange rate response has no rate for: {}",
                resolved.missing.join(",")
            );
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetcherConfig;

    fn tickers(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    fn rates() -> HashMap<String, f64> {
        [("USD", 1.0), ("EUR", 0.92), ("JPY", 149.5), ("GBP", 0.79)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_provider_id_and_kind() {
        let source = ExchangeRateSource::new(Client::new(), FetcherConfig::default().forex_endpoint());
        assert_eq!(source.id(), "EXCHANGE_RATE");
        assert_eq!(source.kind(), TickerKind::Forex);
    }

    #[test]
    fn test_resolve_in_request_order() {
        let resolved = resolve_rates(&tickers(&["JPY", "EUR"]), &rates());
        assert_eq!(
            resolved.quotes,
            vec![PriceQuote::new("JPY", 149.5), PriceQuote::new("EUR", 0.92)]
        );
        assert!(resolved.missing.is_empty());
    }

    #[test]
    fn test_usd_is_fixed_and_first() {
        let mut table = rates();
        table.insert("USD".to_string(), 0.999);

        let resolved = resolve_rates(&tickers(&["EUR", "USD", "USD"]), &table);
        assert_eq!(
            resolved.quotes,
            vec![PriceQuote::new("USD", 1.0), PriceQuote::new("EUR", 0.92)]
        );
    }

    #[test]
    fn test_usd_without_upstream_quote() {
        let resolved = resolve_rates(&tickers(&["USD"]), &HashMap::new());
        assert_eq!(resolved.quotes, vec![PriceQuote::new("USD", 1.0)]);
        assert!(resolved.missing.is_empty());
    }

    #[test]
    fn test_unknown_codes_are_missing() {
        let resolved = resolve_rates(&tickers(&["EUR", "XYZ"]), &rates());
        assert_eq!(resolved.quotes, vec![PriceQuote::new("EUR", 0.92)]);
        assert_eq!(resolved.missing, vec!["XYZ"]);
    }

    #[test]
    fn test_open_response_parsing() {
        let json = r#"{
            "provider": "https://www.exchangerate-api.com",
            "base": "USD",
            "date": "2024-05-01",
            "time_last_updated": 1714521601,
            "rates": { "USD": 1, "EUR": 0.935, "JPY": 157.8 }
        }"#;

        let response: LatestRatesResponse = serde_json::from_str(json).unwrap();
        let rates = response.into_rates(RatesField::Rates).unwrap();
        assert_eq!(rates.get("USD"), Some(&1.0));
        assert_eq!(rates.get("EUR"), Some(&0.935));
    }

    #[test]
    fn test_keyed_response_parsing() {
        let json = r#"{
            "result": "success",
            "base_code": "USD",
            "conversion_rates": { "USD": 1, "CHF": 0.91 }
        }"#;

        let response: LatestRatesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.result.as_deref(), Some("success"));
        let rates = response.into_rates(RatesField::ConversionRates).unwrap();
        assert_eq!(rates.get("CHF"), Some(&0.91));
    }

    #[test]
    fn test_wrong_field_for_mode_is_none() {
        let json = r#"{ "rates": { "EUR": 0.9 } }"#;
        let response: LatestRatesResponse = serde_json::from_str(json).unwrap();
        assert!(response.into_rates(RatesField::ConversionRates).is_none());
    }

    #[test]
    fn test_error_result_degrades_to_empty_rates() {
        let json = r#"{ "result": "error", "error-type": "quota-reached" }"#;
        let response: LatestRatesResponse = serde_json::from_str(json).unwrap();

        let (rates, cause) = rates_or_empty(response, RatesField::ConversionRates);
        assert!(rates.is_empty());
        let cause = cause.unwrap();
        assert!(cause.to_string().contains("quota-reached"));

        let resolved = resolve_rates(&tickers(&["USD", "EUR"]), &rates);
        assert_eq!(resolved.quotes, vec![PriceQuote::new("USD", 1.0)]);
        assert_eq!(resolved.missing, vec!["EUR"]);
    }

    #[test]
    fn test_absent_rates_field_degrades_to_empty_rates() {
        let response: LatestRatesResponse = serde_json::from_str(r#"{ "base": "USD" }"#).unwrap();

        let (rates, cause) = rates_or_empty(response, RatesField::Rates);
        assert!(rates.is_empty());
        assert!(matches!(
            cause,
            Some(PriceFetchError::MissingField { field: "rates", .. })
        ));
    }

    #[test]
    fn test_error_message_extraction() {
        let body = r#"{ "result": "error", "error-type": "invalid-key" }"#;
        assert_eq!(error_message(body), Some("invalid-key".to_string()));
        assert_eq!(error_message("<html>502</html>"), None);
    }
}
