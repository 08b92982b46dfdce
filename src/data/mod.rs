//! Core data models for fxconvert
//!
//! This module contains the types shared by the API client, the conversion
//! cache and the history recorder, plus the `ForexApi` trait that the
//! converter talks to.

pub mod fastforex;
#[cfg(test)]
pub(crate) mod fake;

pub use fastforex::FastForexClient;

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Supported currencies, keyed by uppercase ISO code
///
/// Fetched once at startup and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyDirectory {
    currencies: BTreeMap<String, String>,
}

impl CurrencyDirectory {
    pub fn new(currencies: BTreeMap<String, String>) -> Self {
        Self { currencies }
    }

    /// Looks up a user-typed code, returning the stored code if it exists.
    ///
    /// Input is uppercased before the lookup; the stored keys are matched
    /// exactly.
    pub fn lookup(&self, input: &str) -> Option<&str> {
        let code = input.trim().to_uppercase();
        self.currencies
            .get_key_value(code.as_str())
            .map(|(code, _)| code.as_str())
    }

    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CurrencyDirectory {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(code, name)| (code.into(), name.into()))
                .collect(),
        )
    }
}

/// A single conversion to perform; also the cache key
///
/// Construct through [`ConversionRequest::new`] so codes are uppercased and
/// the amount is normalized, which keeps equal-looking requests on the same
/// key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConversionRequest {
    /// Date the conversion is filed under
    pub date: NaiveDate,
    /// Currency converted from
    pub base: String,
    /// Currency converted to
    pub target: String,
    /// Amount in the base currency
    pub amount: Decimal,
}

impl ConversionRequest {
    pub fn new(date: NaiveDate, base: &str, target: &str, amount: Decimal) -> Self {
        Self {
            date,
            base: base.to_uppercase(),
            target: target.to_uppercase(),
            amount: amount.normalize(),
        }
    }
}

/// Converted amounts keyed by currency code, as returned by the API
///
/// Fast Forex also reports the applied `rate` inside the same object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversionResult {
    amounts: BTreeMap<String, Decimal>,
}

impl ConversionResult {
    pub fn new(amounts: BTreeMap<String, Decimal>) -> Self {
        Self { amounts }
    }

    /// Converted amount for a currency code
    pub fn amount_for(&self, code: &str) -> Option<Decimal> {
        self.amounts.get(code).copied()
    }

    /// Exchange rate applied by the API, when reported
    pub fn rate(&self) -> Option<Decimal> {
        self.amounts.get("rate").copied()
    }
}

/// A completed conversion: the amount in the target currency plus the full
/// API result it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub converted_amount: Decimal,
    pub result: ConversionResult,
}

/// One line of conversion history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub base_currency: String,
    pub target_currency: String,
    pub converted_amount: Decimal,
}

impl ConversionRecord {
    /// Builds the record for a request and the amount it converted to
    pub fn from_request(request: &ConversionRequest, converted_amount: Decimal) -> Self {
        Self {
            date: request.date,
            amount: request.amount,
            base_currency: request.base.clone(),
            target_currency: request.target.clone(),
            converted_amount,
        }
    }
}

/// Errors that can occur when fetching the currency directory
#[derive(Debug, Error)]
pub enum DirectoryFetchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success status from the API
    #[error("Currency list request failed with status {0}")]
    Status(u16),

    /// Failed to parse JSON response
    #[error("Failed to parse currency list: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors that can occur when converting an amount
#[derive(Debug, Error)]
pub enum ConversionError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success status from the API
    #[error("Error: {0}")]
    Status(u16),

    /// Failed to parse JSON response
    #[error("Failed to parse conversion response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response did not include the requested currency
    #[error("Conversion response is missing an amount for {0}")]
    MissingTarget(String),
}

/// Remote currency service used by the converter
#[async_trait]
pub trait ForexApi: Send + Sync {
    /// Fetches every currency the service supports
    async fn fetch_currencies(&self) -> Result<CurrencyDirectory, DirectoryFetchError>;

    /// Converts `amount` from `base` into `target`
    async fn convert(
        &self,
        base: &str,
        target: &str,
        amount: Decimal,
    ) -> Result<ConversionResult, ConversionError>;
}
