//! Fast Forex API client
//!
//! This module fetches the supported currency list and performs conversions
//! through the Fast Forex REST API.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::{ConversionError, ConversionResult, CurrencyDirectory, DirectoryFetchError, ForexApi};

/// Base URL for the Fast Forex API
pub const FAST_FOREX_BASE_URL: &str = "https://api.fastforex.io";

/// Client for the Fast Forex API
#[derive(Debug, Clone)]
pub struct FastForexClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FastForexClient {
    /// Create a new client against the public API
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: FAST_FOREX_BASE_URL.to_string(),
        }
    }

    /// Create a new client with a custom HTTP client
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: FAST_FOREX_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different host (self-hosted proxy, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn currencies_url(&self) -> String {
        format!("{}/currencies?api_key={}", self.base_url, self.api_key)
    }

    fn convert_url(&self, base: &str, target: &str, amount: Decimal) -> String {
        format!(
            "{}/convert?from={}&to={}&amount={}&api_key={}",
            self.base_url, base, target, amount, self.api_key
        )
    }

    async fn get(&self, url: &str) -> reqwest::Result<Response> {
        self.client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
    }
}

#[async_trait]
impl ForexApi for FastForexClient {
    async fn fetch_currencies(&self) -> Result<CurrencyDirectory, DirectoryFetchError> {
        log::info!("Fetching supported currencies from {}", self.base_url);

        let response = self.get(&self.currencies_url()).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryFetchError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        let currencies = parse_currencies(&text)?;
        log::debug!("Fast Forex supports {} currencies", currencies.len());
        Ok(currencies)
    }

    async fn convert(
        &self,
        base: &str,
        target: &str,
        amount: Decimal,
    ) -> Result<ConversionResult, ConversionError> {
        log::info!("Requesting conversion of {} {} to {}", amount, base, target);

        let response = self.get(&self.convert_url(base, target, amount)).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ConversionError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        Ok(parse_conversion(&text)?)
    }
}

/// Parses the body of `/currencies`
fn parse_currencies(body: &str) -> Result<CurrencyDirectory, serde_json::Error> {
    let response: CurrenciesResponse = serde_json::from_str(body)?;
    Ok(CurrencyDirectory::new(response.currencies))
}

/// Parses the body of `/convert`
fn parse_conversion(body: &str) -> Result<ConversionResult, serde_json::Error> {
    let response: ConvertResponse = serde_json::from_str(body)?;
    Ok(response.result)
}

/// `/currencies` response structure
#[derive(Debug, Deserialize)]
struct CurrenciesResponse {
    currencies: BTreeMap<String, String>,
}

/// `/convert` response structure
#[derive(Debug, Deserialize)]
struct ConvertResponse {
    result: ConversionResult,
}
