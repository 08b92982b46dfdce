//! fxconvert Library
//!
//! Validation, API client, caching, history and the interactive loop behind
//! the `fxconvert` binary, exposed for integration tests.

pub mod cache;
pub mod cli;
pub mod config;
pub mod converter;
pub mod data;
pub mod history;
pub mod session;
pub mod validation;
