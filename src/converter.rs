//! Memoized conversions
//!
//! `Converter` owns the response cache and the history recorder. A cache hit
//! returns the stored result without touching the network or the history
//! file; a miss calls the API, records the conversion and then caches it.

use std::num::NonZeroUsize;
use std::time::Duration;

use thiserror::Error;

use crate::cache::{ConversionCache, DEFAULT_CAPACITY, DEFAULT_TTL};
use crate::data::{Conversion, ConversionError, ConversionRecord, ConversionRequest, ForexApi};
use crate::history::{ConversionRecorder, PersistError};

/// Errors from a single conversion request
#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Converts amounts through a `ForexApi`, memoizing results
pub struct Converter<A> {
    api: A,
    cache: ConversionCache,
    recorder: ConversionRecorder,
}

impl<A: ForexApi> Converter<A> {
    /// Creates a converter with the default 200-entry, 300-second cache
    pub fn new(api: A, recorder: ConversionRecorder) -> Self {
        let capacity = NonZeroUsize::new(DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self::with_cache(api, recorder, capacity, DEFAULT_TTL)
    }

    pub fn with_cache(
        api: A,
        recorder: ConversionRecorder,
        capacity: NonZeroUsize,
        ttl: Duration,
    ) -> Self {
        Self {
            api,
            cache: ConversionCache::new(capacity, ttl),
            recorder,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn cache(&self) -> &ConversionCache {
        &self.cache
    }

    /// Converts `request`, serving repeats within the TTL from the cache.
    ///
    /// # Returns
    /// * `Ok(Conversion)` from the cache or a fresh API call
    /// * `Err(RequestError::Conversion)` if the API call fails or omits the
    ///   target currency; nothing is cached
    /// * `Err(RequestError::Persist)` if the history could not be written;
    ///   nothing is cached, so a retry records again
    pub async fn convert(
        &mut self,
        request: &ConversionRequest,
    ) -> Result<Conversion, RequestError> {
        if let Some(cached) = self.cache.get(request) {
            log::debug!(
                "Cache hit for {} {} -> {} on {}",
                request.amount,
                request.base,
                request.target,
                request.date
            );
            return Ok(cached);
        }
        log::debug!("Cache miss for {} {} -> {}", request.amount, request.base, request.target);

        let result = match self
            .api
            .convert(&request.base, &request.target, request.amount)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                log::warn!("Conversion {} -> {} failed: {}", request.base, request.target, e);
                return Err(e.into());
            }
        };

        let converted_amount = result
            .amount_for(&request.target)
            .ok_or_else(|| ConversionError::MissingTarget(request.target.clone()))?;
        if let Some(rate) = result.rate() {
            log::debug!("Applied rate {} for {} -> {}", rate, request.base, request.target);
        }

        self.recorder
            .record(&ConversionRecord::from_request(request, converted_amount))?;

        let conversion = Conversion {
            converted_amount,
            result,
        };
        self.cache.insert(request.clone(), conversion.clone());

        Ok(conversion)
    }
}
