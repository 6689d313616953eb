//! Batch export to CSV / JSON / XLSX
//!
//! One file per batch, one header row of field names. Values are written as
//! plain numbers so CSV and JSON exports can be read back without loss.

use crate::engine::AnalysisBatch;
use crate::errors::ExportError;
use crate::types::{AnalysisRow, StrikeQuote};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use tracing::info;

/// Worksheet holding the rows of an XLSX export
pub const SHEET_NAME: &str = "Options Analysis";

/// Export columns, in [`ExportRecord`] field order
pub const EXPORT_COLUMNS: [&str; 14] = [
    "symbol",
    "spot_price",
    "high_52w",
    "low_52w",
    "percentile",
    "lot_size",
    "adjusted_lot_size",
    "ce_strike",
    "ce_premium",
    "ce_irr_percent",
    "pe_strike",
    "pe_premium",
    "pe_irr_percent",
    "margin_percent",
];

/// Output file format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma separated, single sheet
    #[default]
    Csv,
    /// Pretty-printed array of records
    Json,
    /// Excel workbook, one sheet with auto-fitted columns
    Xlsx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Xlsx => "xlsx",
        }
    }
}

/// Flat projection of [`AnalysisRow`]; field order is the column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub symbol: String,
    pub spot_price: f64,
    pub high_52w: f64,
    pub low_52w: f64,
    pub percentile: f64,
    pub lot_size: u32,
    pub adjusted_lot_size: u64,
    pub ce_strike: f64,
    pub ce_premium: f64,
    pub ce_irr_percent: f64,
    pub pe_strike: f64,
    pub pe_premium: f64,
    pub pe_irr_percent: f64,
    pub margin_percent: f64,
}

impl From<&AnalysisRow> for ExportRecord {
    fn from(row: &AnalysisRow) -> Self {
        Self {
            symbol: row.symbol.clone(),
            spot_price: row.spot_price,
            high_52w: row.high_52w,
            low_52w: row.low_52w,
            percentile: row.percentile,
            lot_size: row.lot_size,
            adjusted_lot_size: row.adjusted_lot_size,
            ce_strike: row.ce.strike,
            ce_premium: row.ce.premium,
            ce_irr_percent: row.ce.irr_percent,
            pe_strike: row.pe.strike,
            pe_premium: row.pe.premium,
            pe_irr_percent: row.pe.irr_percent,
            margin_percent: row.margin_percent,
        }
    }
}

impl TryFrom<ExportRecord> for AnalysisRow {
    type Error = ExportError;

    fn try_from(record: ExportRecord) -> Result<Self, Self::Error> {
        if record.symbol.trim().is_empty() {
            return Err(ExportError::Malformed("empty symbol".to_string()));
        }
        Ok(Self {
            symbol: record.symbol,
            spot_price: record.spot_price,
            high_52w: record.high_52w,
            low_52w: record.low_52w,
            lot_size: record.lot_size,
            percentile: record.percentile,
            adjusted_lot_size: record.adjusted_lot_size,
            ce: StrikeQuote {
                strike: record.ce_strike,
                premium: record.ce_premium,
                irr_percent: record.ce_irr_percent,
            },
            pe: StrikeQuote {
                strike: record.pe_strike,
                premium: record.pe_premium,
                irr_percent: record.pe_irr_percent,
            },
            margin_percent: record.margin_percent,
        })
    }
}

/// Write rows as CSV with a header row
pub fn write_csv<W: Write>(writer: W, rows: &[AnalysisRow]) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(ExportRecord::from(row))?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Read rows back from a CSV export
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<AnalysisRow>, ExportError> {
    let mut reader = csv::Reader::from_reader(reader);
    reader
        .deserialize::<ExportRecord>()
        .map(|record| AnalysisRow::try_from(record?))
        .collect()
}

/// Write rows as a JSON array of export records
pub fn write_json<W: Write>(writer: W, rows: &[AnalysisRow]) -> Result<(), ExportError> {
    let records: Vec<ExportRecord> = rows.iter().map(ExportRecord::from).collect();
    serde_json::to_writer_pretty(writer, &records)?;
    Ok(())
}

/// Read rows back from a JSON export
pub fn read_json<R: Read>(reader: R) -> Result<Vec<AnalysisRow>, ExportError> {
    let records: Vec<ExportRecord> = serde_json::from_reader(reader)?;
    records.into_iter().map(AnalysisRow::try_from).collect()
}

/// Write rows to an XLSX workbook at `path`, one sheet named [`SHEET_NAME`]
pub fn write_xlsx(path: &Path, rows: &[AnalysisRow]) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in (0u16..).zip(EXPORT_COLUMNS) {
        worksheet.write_string(0, col, header)?;
    }

    for (row_num, row) in (1u32..).zip(rows) {
        let record = ExportRecord::from(row);
        worksheet.write_string(row_num, 0, record.symbol.as_str())?;

        let numbers = [
            record.spot_price,
            record.high_52w,
            record.low_52w,
            record.percentile,
            f64::from(record.lot_size),
            record.adjusted_lot_size as f64,
            record.ce_strike,
            record.ce_premium,
            record.ce_irr_percent,
            record.pe_strike,
            record.pe_premium,
            record.pe_irr_percent,
            record.margin_percent,
        ];
        for (col, value) in (1u16..).zip(numbers) {
            worksheet.write_number(row_num, col, value)?;
        }
    }

    worksheet.autofit();
    workbook.save(path)?;
    Ok(())
}

/// Writes a batch to a timestamped file in a directory
#[derive(Debug, Clone)]
pub struct BatchExporter {
    output_dir: PathBuf,
    format: ExportFormat,
    file_prefix: String,
}

impl BatchExporter {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        format: ExportFormat,
        file_prefix: impl Into<String>,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            format,
            file_prefix: file_prefix.into(),
        }
    }

    /// `{prefix}_{YYYYMMDD_HHMMSS}.{ext}` from the batch timestamp
    pub fn file_name(&self, batch: &AnalysisBatch) -> String {
        format!(
            "{}_{}.{}",
            self.file_prefix,
            batch.generated_at.format("%Y%m%d_%H%M%S"),
            self.format.extension()
        )
    }

    /// Export the batch and return the written path
    pub fn export(&self, batch: &AnalysisBatch) -> Result<PathBuf, ExportError> {
        if batch.is_empty() {
            return Err(ExportError::NoData);
        }

        fs::create_dir_all(&self.output_dir).map_err(|source| ExportError::Io {
            path: self.output_dir.clone(),
            source,
        })?;

        let path = self.output_dir.join(self.file_name(batch));
        if self.format == ExportFormat::Xlsx {
            write_xlsx(&path, &batch.rows)?;
        } else {
            let file = File::create(&path).map_err(|source| ExportError::Io {
                path: path.clone(),
                source,
            })?;
            let mut writer = BufWriter::new(file);

            match self.format {
                ExportFormat::Json => write_json(&mut writer, &batch.rows)?,
                _ => write_csv(&mut writer, &batch.rows)?,
            }
            writer.flush().map_err(|source| ExportError::Io {
                path: path.clone(),
                source,
            })?;
        }

        info!("Exported {} rows to {}", batch.len(), path.display());
        Ok(path)
    }
}

/// Load a previously exported file, picking the format from its extension.
/// XLSX workbooks are write-only.
pub fn load_export(path: &Path) -> Result<Vec<AnalysisRow>, ExportError> {
    if path.extension().and_then(|ext| ext.to_str()) == Some("xlsx") {
        return Err(ExportError::Malformed(format!(
            "{} is a workbook; reload a csv or json export instead",
            path.display()
        )));
    }
    let file = File::open(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => read_json(file),
        _ => read_csv(file),
    }
}
