use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::{PriceFetchError, Result};

pub(crate) fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| PriceFetchError::Configuration(format!("Failed to build HTTP client: {}", e)))
}

fn transport_error(provider: &str, e: reqwest::Error) -> PriceFetchError {
    if e.is_timeout() {
        PriceFetchError::Timeout {
            provider: provider.to_string(),
        }
    } else {
        PriceFetchError::Transport {
            provider: provider.to_string(),
            message: e.to_string(),
        }
    }
}

/// Send `request` and return the body of a 2xx response.
///
/// For other statuses `error_message` gets a chance to pull the provider's own
/// message out of the body.
pub(crate) async fn send(
    provider: &str,
    request: RequestBuilder,
    error_message: fn(&str) -> Option<String>,
) -> Result<String> {
    let response = request
        .send()
        .await
        .map_err(|e| transport_error(provider, e))?;

    let status = response.status();
    debug!("{} responded with {}", provider, status);

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
        });
        return Err(PriceFetchError::HttpStatus {
            provider: provider.to_string(),
            status: status.as_u16(),
            message,
        });
    }

    response
        .text()
        .await
        .map_err(|e| transport_error(provider, e))
}

pub(crate) fn parse_json<T: DeserializeOwned>(provider: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| PriceFetchError::MalformedResponse {
        provider: provider.to_string(),
        message: e.to_string(),
    })
}
