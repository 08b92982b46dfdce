//! Command-line interface parsing for fxconvert
//!
//! This module handles parsing of CLI arguments using clap. The date is
//! taken as an optional positional so a missing value can be reported with
//! the converter's own message and exit status instead of clap's.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Parser;
use thiserror::Error;

use crate::history::DEFAULT_HISTORY_FILE;
use crate::validation::{validate_date_on, InvalidDate};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// No date argument was given
    #[error("You must enter date as command line argument!")]
    MissingDate,

    /// The date argument failed validation
    #[error("Please enter a valid date format! {0}")]
    InvalidDate(#[from] InvalidDate),
}

/// fxconvert - Convert currency amounts through the Fast Forex API
#[derive(Parser, Debug)]
#[command(name = "fxconvert")]
#[command(about = "Interactive currency conversion through the Fast Forex API")]
#[command(version)]
pub struct Cli {
    /// Date to file conversions under, in YYYY-MM-DD form (not in the future)
    ///
    /// Examples:
    ///   fxconvert 2024-06-01
    ///   fxconvert 2020-02-29 --history ~/conversions.json
    #[arg(value_name = "DATE", allow_hyphen_values = true)]
    pub date: Option<String>,

    /// Path to config.json (defaults to ./config.json, then the user config directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// File that successful conversions are appended to
    #[arg(long, value_name = "PATH", default_value = DEFAULT_HISTORY_FILE)]
    pub history: PathBuf,

    /// Arguments after the date are accepted and ignored
    #[arg(hide = true, num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
    pub extra: Vec<String>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    /// Validated conversion date
    pub date: NaiveDate,
    /// Explicit config file, if one was given
    pub config_path: Option<PathBuf>,
    /// History log location
    pub history_path: PathBuf,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments, validating the date
    /// against today's local date.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        Self::from_cli_on(cli, Local::now().date_naive())
    }

    /// Same as [`StartupConfig::from_cli`] with an explicit "today".
    pub fn from_cli_on(cli: &Cli, today: NaiveDate) -> Result<Self, CliError> {
        let text = cli.date.as_deref().ok_or(CliError::MissingDate)?;
        let date = validate_date_on(text, today)?;

        Ok(StartupConfig {
            date,
            config_path: cli.config.clone(),
            history_path: cli.history.clone(),
        })
    }
}
