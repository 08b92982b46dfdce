//! Cache module for memoizing conversion responses
//!
//! This module provides an in-memory cache bounded both by entry count and by
//! entry age. The least-recently-used entry is evicted once the cache is
//! full, and entries older than the TTL are never returned.

mod ttl;

pub use ttl::{TtlCache, DEFAULT_CAPACITY, DEFAULT_TTL};

use crate::data::{Conversion, ConversionRequest};

/// Cache used by the converter, keyed by the full conversion request
pub type ConversionCache = TtlCache<ConversionRequest, Conversion>;
