//! Error types for the options analyzer
//!
//! Computation failures and export failures are kept in separate enums so a
//! caller can always tell "my inputs were bad" from "the analysis ran but the
//! result could not be saved".

use std::path::PathBuf;
use thiserror::Error;

/// Analysis (input and computation) error types
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Margin percentage or lot multiplier could not be used
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An instrument record is missing a field or carries an unusable value
    #[error("Invalid instrument record '{symbol}': {reason}")]
    InvalidInstrument {
        /// Symbol of the offending record (or its row position when unnamed)
        symbol: String,
        /// What was wrong with it
        reason: String,
    },

    /// Two records in one batch share a symbol
    #[error("Duplicate symbol in batch: {0}")]
    DuplicateSymbol(String),

    /// Engine constants are unusable (zero grid interval, zero holding period...)
    #[error("Invalid engine parameters: {0}")]
    InvalidParameters(String),

    /// The instrument source could not produce any data
    #[error("Instrument source unavailable: {0}")]
    SourceUnavailable(String),
}

impl AnalyzerError {
    /// Build an [`AnalyzerError::InvalidInstrument`]
    pub fn invalid_instrument(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInstrument {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }

    /// True when the caller supplied bad configuration or instrument data
    #[must_use]
    pub fn is_bad_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig(_) | Self::InvalidInstrument { .. } | Self::DuplicateSymbol(_)
        )
    }
}

/// Presentation / persistence error types
#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing has been analysed yet
    #[error("No analysis rows to export")]
    NoData,

    /// Destination could not be created or written
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV encoding or decoding failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook could not be built or saved
    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A re-read export does not describe a valid row
    #[error("Malformed export record: {0}")]
    Malformed(String),
}
