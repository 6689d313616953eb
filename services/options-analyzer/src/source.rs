//! Instrument sources
//!
//! The analyzer only needs a fixed-shape record set; where it comes from is
//! the source's business. Sources must not return two records with the same
//! symbol, and the engine rejects the batch if they do.

use crate::errors::AnalyzerError;
use crate::types::{InstrumentRecord, RawInstrumentRecord};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Supplier of instrument records
pub trait InstrumentSource {
    /// Name used in logs and batch metadata
    fn name(&self) -> &str;

    /// Produce the full record set, or fail the whole load
    fn load_instruments(&self) -> Result<Vec<InstrumentRecord>, AnalyzerError>;
}

/// Built-in NSE sample universe
#[derive(Debug, Default, Clone, Copy)]
pub struct SampleSource;

impl SampleSource {
    /// The sample records in display order
    pub fn records() -> Vec<InstrumentRecord> {
        vec![
            InstrumentRecord::new("NIFTY", 19500.0, 20000.0, 18000.0, 50),
            InstrumentRecord::new("BANKNIFTY", 44500.0, 46000.0, 42000.0, 25),
            InstrumentRecord::new("RELIANCE", 2450.0, 2650.0, 2250.0, 250),
            InstrumentRecord::new("TCS", 3600.0, 3850.0, 3200.0, 125),
            InstrumentRecord::new("INFY", 1480.0, 1600.0, 1350.0, 300),
            InstrumentRecord::new("HDFCBANK", 1650.0, 1750.0, 1450.0, 550),
            InstrumentRecord::new("ICICIBANK", 950.0, 1050.0, 850.0, 1375),
            InstrumentRecord::new("SBIN", 590.0, 650.0, 520.0, 1500),
            InstrumentRecord::new("BHARTIARTL", 880.0, 950.0, 750.0, 1220),
            InstrumentRecord::new("HINDUNILVR", 2580.0, 2800.0, 2350.0, 300),
        ]
    }
}

impl InstrumentSource for SampleSource {
    fn name(&self) -> &str {
        "sample"
    }

    fn load_instruments(&self) -> Result<Vec<InstrumentRecord>, AnalyzerError> {
        Ok(Self::records())
    }
}

/// In-memory records
#[derive(Debug, Clone)]
pub struct StaticSource {
    name: String,
    records: Vec<InstrumentRecord>,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, records: Vec<InstrumentRecord>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }
}

impl InstrumentSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_instruments(&self) -> Result<Vec<InstrumentRecord>, AnalyzerError> {
        Ok(self.records.clone())
    }
}

/// Headered CSV file with `symbol,spot_price,high_52w,low_52w,lot_size`
#[derive(Debug, Clone)]
pub struct CsvInstrumentSource {
    path: PathBuf,
    name: String,
}

impl CsvInstrumentSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse instrument rows from any reader.
    ///
    /// Every row must convert; the first bad row fails the load and is
    /// reported by its 1-based data row number when it has no symbol.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<InstrumentRecord>, AnalyzerError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut records = Vec::new();
        for (index, result) in reader.deserialize::<RawInstrumentRecord>().enumerate() {
            let row = index + 1;
            let raw = result.map_err(|e| {
                AnalyzerError::invalid_instrument(format!("row {row}"), e.to_string())
            })?;

            let record = InstrumentRecord::try_from(raw).map_err(|e| match e {
                AnalyzerError::InvalidInstrument { symbol, reason } if symbol == "<empty>" => {
                    AnalyzerError::invalid_instrument(format!("row {row}"), reason)
                }
                other => other,
            })?;

            debug!(row, symbol = %record.symbol, "Parsed instrument");
            records.push(record);
        }

        Ok(records)
    }
}

impl InstrumentSource for CsvInstrumentSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_instruments(&self) -> Result<Vec<InstrumentRecord>, AnalyzerError> {
        let file = File::open(&self.path).map_err(|e| {
            AnalyzerError::SourceUnavailable(format!("{}: {}", self.path.display(), e))
        })?;

        let records = Self::parse(file)?;
        info!("Loaded {} instruments from {}", records.len(), self.path.display());
        Ok(records)
    }
}
