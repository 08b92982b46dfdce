//! fxconvert - Interactive currency conversion
//!
//! Takes a date on the command line, then converts amounts between currencies
//! through the Fast Forex API until the user types `end`.

use std::io;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use thiserror::Error;

use fxconvert::cli::{Cli, CliError, StartupConfig};
use fxconvert::config::{Config, ConfigError};
use fxconvert::converter::Converter;
use fxconvert::data::{DirectoryFetchError, FastForexClient, ForexApi};
use fxconvert::history::ConversionRecorder;
use fxconvert::session;

/// Errors that end the process with a non-zero status
#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Cli(#[from] CliError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Directory(#[from] DirectoryFetchError),

    #[error("Terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

async fn run(cli: Cli) -> Result<(), StartupError> {
    let startup = StartupConfig::from_cli(&cli)?;

    let config = match &startup.config_path {
        Some(path) => Config::load(path)?,
        None => Config::discover()?,
    };
    log::debug!(
        "Loaded configuration (base_url={}, cache_capacity={}, cache_ttl={:?})",
        config.base_url,
        config.cache_capacity,
        config.cache_ttl
    );

    let client = FastForexClient::new(config.api_key).with_base_url(config.base_url);
    let currencies = client.fetch_currencies().await?;

    let recorder = ConversionRecorder::new(startup.history_path);
    let mut converter =
        Converter::with_cache(client, recorder, config.cache_capacity, config.cache_ttl);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();
    session::run(&mut converter, &currencies, startup.date, &mut input, &mut output).await?;

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            println!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{}", e);
            ExitCode::FAILURE
        }
    }
}
