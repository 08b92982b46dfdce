//! In-memory `ForexApi` used by unit tests

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::{ConversionError, ConversionResult, CurrencyDirectory, DirectoryFetchError, ForexApi};

/// Converts at a fixed rate and counts every call
#[derive(Debug)]
pub struct FakeApi {
    pub rate: Decimal,
    pub fail_status: Option<u16>,
    pub omit_target: bool,
    convert_calls: AtomicUsize,
}

impl FakeApi {
    pub fn new(rate: Decimal) -> Self {
        Self {
            rate,
            fail_status: None,
            omit_target: false,
            convert_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_status: Some(status),
            ..Self::new(Decimal::ONE)
        }
    }

    pub fn convert_calls(&self) -> usize {
        self.convert_calls.load(Ordering::SeqCst)
    }
}

pub fn directory() -> CurrencyDirectory {
    [
        ("USD", "United States Dollar"),
        ("EUR", "Euro"),
        ("BGN", "Bulgarian Lev"),
    ]
    .into_iter()
    .collect()
}

#[async_trait]
impl ForexApi for FakeApi {
    async fn fetch_currencies(&self) -> Result<CurrencyDirectory, DirectoryFetchError> {
        match self.fail_status {
            Some(status) => Err(DirectoryFetchError::Status(status)),
            None => Ok(directory()),
        }
    }

    async fn convert(
        &self,
        _base: &str,
        target: &str,
        amount: Decimal,
    ) -> Result<ConversionResult, ConversionError> {
        self.convert_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.fail_status {
            return Err(ConversionError::Status(status));
        }

        let mut amounts = BTreeMap::new();
        if !self.omit_target {
            amounts.insert(target.to_string(), amount * self.rate);
        }
        amounts.insert("rate".to_string(), self.rate);
        Ok(ConversionResult::new(amounts))
    }
}
