//! Row assembly over a batch of instruments

use crate::errors::AnalyzerError;
use crate::pricing::{PremiumEstimator, RangePositioner, ReturnCalculator, StrikeSelector};
use crate::source::InstrumentSource;
use crate::types::{
    AnalysisConfig, AnalysisRow, EngineParams, InstrumentRecord, OptionSide, StrikeQuote,
};
use chrono::{DateTime, Utc};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Result of one completed analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisBatch {
    /// Rows in source order
    pub rows: Vec<AnalysisRow>,
    /// When the batch was computed
    pub generated_at: DateTime<Utc>,
    /// Config the rows were computed with
    pub config: AnalysisConfig,
    /// Name of the instrument source
    pub source: String,
}

impl AnalysisBatch {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Computes one [`AnalysisRow`] per instrument
#[derive(Debug, Clone)]
pub struct OptionsAnalyzer {
    params: EngineParams,
    strikes: StrikeSelector,
    premiums: PremiumEstimator,
    returns: ReturnCalculator,
}

impl OptionsAnalyzer {
    /// Build an analyzer from validated engine parameters
    pub fn new(params: EngineParams) -> Result<Self, AnalyzerError> {
        params.validate()?;
        Ok(Self {
            strikes: StrikeSelector::from(&params),
            premiums: PremiumEstimator::from(&params),
            returns: ReturnCalculator::from(&params),
            params,
        })
    }

    /// Engine parameters in use
    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    /// Quote one side for a spot price
    pub fn quote(&self, spot: f64, margin_percent: f64, side: OptionSide) -> StrikeQuote {
        let strike = self.strikes.strike(spot, margin_percent, side);
        let premium = self.premiums.estimate(spot, strike, side);
        let irr_percent = self.returns.annualized_return(premium, strike);
        StrikeQuote {
            strike,
            premium,
            irr_percent,
        }
    }

    /// Assemble the row for a single, already validated instrument
    pub fn analyze_instrument(
        &self,
        instrument: &InstrumentRecord,
        config: &AnalysisConfig,
    ) -> AnalysisRow {
        let percentile = RangePositioner::percentile(
            instrument.spot_price,
            instrument.high_52w,
            instrument.low_52w,
        );
        let ce = self.quote(instrument.spot_price, config.margin_percent, OptionSide::Call);
        let pe = self.quote(instrument.spot_price, config.margin_percent, OptionSide::Put);

        debug!(
            symbol = %instrument.symbol,
            percentile,
            ce_strike = ce.strike,
            pe_strike = pe.strike,
            "Instrument analysed"
        );

        AnalysisRow {
            symbol: instrument.symbol.clone(),
            spot_price: instrument.spot_price,
            high_52w: instrument.high_52w,
            low_52w: instrument.low_52w,
            lot_size: instrument.lot_size,
            percentile,
            adjusted_lot_size: u64::from(instrument.lot_size) * u64::from(config.lot_multiplier),
            ce,
            pe,
            margin_percent: config.margin_percent,
        }
    }

    /// Validate the whole batch, then assemble rows in input order.
    ///
    /// Any invalid record or duplicate symbol fails the run with no rows, as
    /// does a record whose derived values leave the finite range.
    pub fn analyze(
        &self,
        instruments: &[InstrumentRecord],
        config: &AnalysisConfig,
    ) -> Result<Vec<AnalysisRow>, AnalyzerError> {
        // Re-check: configs can be built directly as struct literals
        AnalysisConfig::new(config.margin_percent, config.lot_multiplier)?;
        validate_batch(instruments)?;

        instruments
            .iter()
            .map(|instrument| {
                let row = self.analyze_instrument(instrument, config);
                ensure_finite(&row)?;
                Ok(row)
            })
            .collect()
    }

    /// Load from `source` and analyse into a timestamped batch
    pub fn run(
        &self,
        source: &dyn InstrumentSource,
        config: &AnalysisConfig,
    ) -> Result<AnalysisBatch, AnalyzerError> {
        info!(
            source = source.name(),
            margin_percent = config.margin_percent,
            lot_multiplier = config.lot_multiplier,
            "Starting options analysis"
        );

        let instruments = source.load_instruments().inspect_err(|e| {
            warn!(source = source.name(), "Failed to load instruments: {}", e);
        })?;
        let rows = self.analyze(&instruments, config).inspect_err(|e| {
            warn!(source = source.name(), "Analysis rejected: {}", e);
        })?;

        info!(
            source = source.name(),
            margin_percent = config.margin_percent,
            lot_multiplier = config.lot_multiplier,
            "Analysis completed: {} instruments",
            rows.len()
        );

        Ok(AnalysisBatch {
            rows,
            generated_at: Utc::now(),
            config: *config,
            source: source.name().to_string(),
        })
    }
}

fn validate_batch(instruments: &[InstrumentRecord]) -> Result<(), AnalyzerError> {
    let mut seen = FxHashSet::default();
    for instrument in instruments {
        instrument.validate()?;
        if !seen.insert(instrument.symbol.as_str()) {
            return Err(AnalyzerError::DuplicateSymbol(instrument.symbol.clone()));
        }
    }
    Ok(())
}

fn ensure_finite(row: &AnalysisRow) -> Result<(), AnalyzerError> {
    let derived = [
        row.percentile,
        row.ce.strike,
        row.ce.premium,
        row.ce.irr_percent,
        row.pe.strike,
        row.pe.premium,
        row.pe.irr_percent,
    ];
    if derived.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(AnalyzerError::invalid_instrument(
            &row.symbol,
            "prices too large: derived strikes or returns overflow",
        ))
    }
}

impl Default for OptionsAnalyzer {
    fn default() -> Self {
        let params = EngineParams::default();
        Self {
            strikes: StrikeSelector::from(&params),
            premiums: PremiumEstimator::from(&params),
            returns: ReturnCalculator::from(&params),
            params,
        }
    }
}
