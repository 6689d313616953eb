//! Configuration for the options analyzer

use crate::constants::{DEFAULT_LOT_MULTIPLIER, DEFAULT_MARGIN_PERCENT};
use crate::errors::AnalyzerError;
use crate::export::{BatchExporter, ExportFormat};
use crate::source::{CsvInstrumentSource, InstrumentSource, SampleSource};
use crate::types::{AnalysisConfig, EngineParams};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings file looked up when none is given
pub const DEFAULT_CONFIG_FILE: &str = "options-analyzer.toml";

/// Environment prefix, e.g. `OPTIONS_ANALYZER_ANALYSIS__MARGIN_PERCENT=20`
pub const ENV_PREFIX: &str = "OPTIONS_ANALYZER";

/// Top-level analyzer settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerSettings {
    /// Default user knobs
    pub analysis: AnalysisDefaults,
    /// Model constants
    pub engine: EngineParams,
    /// Where instruments come from
    pub source: SourceSettings,
    /// Where results go
    pub export: ExportSettings,
}

/// Defaults for the two per-run knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisDefaults {
    pub margin_percent: f64,
    pub lot_multiplier: u32,
}

impl Default for AnalysisDefaults {
    fn default() -> Self {
        Self {
            margin_percent: DEFAULT_MARGIN_PERCENT,
            lot_multiplier: DEFAULT_LOT_MULTIPLIER,
        }
    }
}

/// Instrument source configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// CSV file of instruments; the built-in sample universe when unset
    pub instruments_file: Option<PathBuf>,
}

/// Export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Output directory
    pub output_dir: PathBuf,
    /// File format
    pub format: ExportFormat,
    /// File name prefix
    pub file_prefix: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            format: ExportFormat::Csv,
            file_prefix: "Options_Analysis".to_string(),
        }
    }
}

impl AnalyzerSettings {
    /// Load settings from an optional file overlaid with environment variables
    pub fn from_file(path: &str) -> Result<Self> {
        Self::load(path, false)
    }

    /// Like [`Self::from_file`], but a missing file is an error
    pub fn from_required_file(path: &str) -> Result<Self> {
        Self::load(path, true)
    }

    fn load(path: &str, required: bool) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(required))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Per-run config from the configured defaults
    pub fn analysis_config(&self) -> Result<AnalysisConfig, AnalyzerError> {
        AnalysisConfig::new(self.analysis.margin_percent, self.analysis.lot_multiplier)
    }

    /// Instrument source selected by the settings
    pub fn instrument_source(&self) -> Box<dyn InstrumentSource> {
        match &self.source.instruments_file {
            Some(path) => Box::new(CsvInstrumentSource::new(path.clone())),
            None => Box::new(SampleSource),
        }
    }

    /// Exporter for the configured destination
    pub fn exporter(&self) -> BatchExporter {
        BatchExporter::new(
            self.export.output_dir.clone(),
            self.export.format,
            self.export.file_prefix.clone(),
        )
    }
}
