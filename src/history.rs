//! Conversion history persisted as a JSON array
//!
//! Every successful conversion is appended to `conversion_data.json`. The file
//! always holds a single valid JSON array: each append loads the existing
//! records, adds the new one and atomically replaces the file.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::data::ConversionRecord;

/// Default file name for the history log
pub const DEFAULT_HISTORY_FILE: &str = "conversion_data.json";

/// Errors that can occur while persisting history
#[derive(Debug, Error)]
pub enum PersistError {
    /// Reading or writing the history file failed
    #[error("Error saving data to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Record could not be encoded
    #[error("Error encoding conversion data: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Existing file is not a JSON array of records
    #[error("{path} is not a valid conversion history ({source}); leaving it untouched")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Appends conversion records to a JSON file
#[derive(Debug, Clone)]
pub struct ConversionRecorder {
    path: PathBuf,
}

impl ConversionRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record to the history file.
    ///
    /// # Returns
    /// * `Ok(())` once the file has been replaced with the extended array
    /// * `Err(PersistError)` if the existing file is unreadable or corrupt, or
    ///   the new file cannot be written
    pub fn record(&self, entry: &ConversionRecord) -> Result<(), PersistError> {
        let mut records = self.load()?;
        records.push(entry.clone());
        self.write_all(&records)?;

        log::info!(
            "Recorded conversion {} {} -> {} ({} records in {})",
            entry.amount,
            entry.base_currency,
            entry.target_currency,
            records.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Reads every record currently on disk.
    ///
    /// A missing or blank file is an empty history.
    pub fn load(&self) -> Result<Vec<ConversionRecord>, PersistError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|source| PersistError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Writes `records` to a temp file beside the target, then renames it
    /// into place.
    fn write_all(&self, records: &[ConversionRecord]) -> Result<(), PersistError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let temp = NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        self.encode(BufWriter::new(temp.as_file()), records)?;

        temp.persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;
        Ok(())
    }

    /// Serializes `records` as a pretty JSON array followed by a newline
    fn encode<W: Write>(&self, mut writer: W, records: &[ConversionRecord]) -> Result<(), PersistError> {
        serde_json::to_writer_pretty(&mut writer, records).map_err(|e| {
            if e.is_io() {
                self.io_error(e.into())
            } else {
                PersistError::Serialize(e)
            }
        })?;
        writer.write_all(b"\n").map_err(|e| self.io_error(e))?;
        writer.flush().map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: io::Error) -> PersistError {
        PersistError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
