//! ShrivenQuant Options Analyzer
//! Margin-offset strike screening for NSE underlyings
//!
//! For every instrument in a batch:
//! - Position of spot inside its 52-week range (percentile)
//! - CE strike below and PE strike above spot, offset by a margin percentage
//!   and snapped to the strike grid
//! - Approximate premium for each strike
//! - Annualised return on the margin blocked to write each option
//!
//! The engine is a pure function of the instrument records and one
//! [`AnalysisConfig`]; sources, table rendering and file export sit around it.

pub mod config;
pub mod constants;
pub mod display;
pub mod engine;
pub mod errors;
pub mod export;
pub mod pricing;
pub mod source;
pub mod types;

pub use config::AnalyzerSettings;
pub use display::render_table;
pub use engine::{AnalysisBatch, OptionsAnalyzer};
pub use errors::{AnalyzerError, ExportError};
pub use export::{BatchExporter, ExportFormat, ExportRecord};
pub use pricing::{PremiumEstimator, RangePositioner, ReturnCalculator, StrikeGrid, StrikeSelector};
pub use source::{CsvInstrumentSource, InstrumentSource, SampleSource, StaticSource};
pub use types::{
    AnalysisConfig, AnalysisRow, EngineParams, InstrumentRecord, OptionSide, RawInstrumentRecord,
    StrikeQuote,
};
