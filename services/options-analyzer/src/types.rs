//! Input, parameter and result records

use crate::constants::{
    DEFAULT_LOT_MULTIPLIER, DEFAULT_MARGIN_PERCENT, HOLDING_PERIOD_DAYS, ITM_TIME_VALUE_RATE,
    OTM_PREMIUM_RATE, STRIKE_INTERVAL, WRITER_MARGIN_RATE,
};
use crate::errors::AnalyzerError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Option side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionSide {
    /// Call option (CE), strike offset below spot
    #[serde(rename = "CE")]
    Call,
    /// Put option (PE), strike offset above spot
    #[serde(rename = "PE")]
    Put,
}

impl OptionSide {
    /// Exchange suffix for the side
    pub fn code(self) -> &'static str {
        match self {
            Self::Call => "CE",
            Self::Put => "PE",
        }
    }
}

impl fmt::Display for OptionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One underlying as supplied by an instrument source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentRecord {
    /// Trading symbol, unique within a batch
    pub symbol: String,
    /// Current price
    pub spot_price: f64,
    /// 52-week high
    pub high_52w: f64,
    /// 52-week low
    pub low_52w: f64,
    /// Exchange-defined lot size
    pub lot_size: u32,
}

impl InstrumentRecord {
    /// Create a new record (unvalidated)
    pub fn new(
        symbol: impl Into<String>,
        spot_price: f64,
        high_52w: f64,
        low_52w: f64,
        lot_size: u32,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            spot_price,
            high_52w,
            low_52w,
            lot_size,
        }
    }

    /// Check the record against the data model.
    ///
    /// A spot outside `[low_52w, high_52w]` is accepted: stale ranges are
    /// tolerated and simply produce a percentile outside 0-100.
    pub fn validate(&self) -> Result<(), AnalyzerError> {
        if self.symbol.trim().is_empty() {
            return Err(AnalyzerError::invalid_instrument(
                "<empty>",
                "symbol must not be empty",
            ));
        }
        if !self.spot_price.is_finite() || self.spot_price <= 0.0 {
            return Err(AnalyzerError::invalid_instrument(
                &self.symbol,
                format!("spot_price must be a positive number, got {}", self.spot_price),
            ));
        }
        if !self.high_52w.is_finite() || !self.low_52w.is_finite() {
            return Err(AnalyzerError::invalid_instrument(
                &self.symbol,
                "52-week high and low must be finite numbers",
            ));
        }
        if self.high_52w < self.low_52w {
            return Err(AnalyzerError::invalid_instrument(
                &self.symbol,
                format!(
                    "high_52w ({}) is below low_52w ({})",
                    self.high_52w, self.low_52w
                ),
            ));
        }
        if self.lot_size == 0 {
            return Err(AnalyzerError::invalid_instrument(
                &self.symbol,
                "lot_size must be positive",
            ));
        }
        Ok(())
    }
}

/// Untyped instrument record as read from files; every field may be absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawInstrumentRecord {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub spot_price: Option<String>,
    #[serde(default)]
    pub high_52w: Option<String>,
    #[serde(default)]
    pub low_52w: Option<String>,
    #[serde(default)]
    pub lot_size: Option<String>,
}

fn required<'a>(
    value: &'a Option<String>,
    symbol: &str,
    field: &str,
) -> Result<&'a str, AnalyzerError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AnalyzerError::invalid_instrument(
            symbol,
            format!("missing field '{field}'"),
        )),
    }
}

fn parse_price(value: &Option<String>, symbol: &str, field: &str) -> Result<f64, AnalyzerError> {
    let text = required(value, symbol, field)?;
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(AnalyzerError::invalid_instrument(
            symbol,
            format!("field '{field}' is not numeric: '{text}'"),
        )),
    }
}

impl TryFrom<RawInstrumentRecord> for InstrumentRecord {
    type Error = AnalyzerError;

    fn try_from(raw: RawInstrumentRecord) -> Result<Self, Self::Error> {
        let symbol = required(&raw.symbol, "<empty>", "symbol")?.to_string();
        let spot_price = parse_price(&raw.spot_price, &symbol, "spot_price")?;
        let high_52w = parse_price(&raw.high_52w, &symbol, "high_52w")?;
        let low_52w = parse_price(&raw.low_52w, &symbol, "low_52w")?;

        let lot_text = required(&raw.lot_size, &symbol, "lot_size")?;
        let lot_size = lot_text.parse::<u32>().map_err(|_| {
            AnalyzerError::invalid_instrument(
                &symbol,
                format!("field 'lot_size' is not a positive integer: '{lot_text}'"),
            )
        })?;

        let record = Self {
            symbol,
            spot_price,
            high_52w,
            low_52w,
            lot_size,
        };
        record.validate()?;
        Ok(record)
    }
}

/// User-supplied knobs for one analysis run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Strike offset from the snapped spot, in percent. Values outside 0-100
    /// (including negatives) are propagated, not rejected.
    pub margin_percent: f64,
    /// Multiplier applied to each instrument's lot size; 0 is allowed
    pub lot_multiplier: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            margin_percent: DEFAULT_MARGIN_PERCENT,
            lot_multiplier: DEFAULT_LOT_MULTIPLIER,
        }
    }
}

impl AnalysisConfig {
    /// Create a config, rejecting a non-numeric (NaN / infinite) margin
    pub fn new(margin_percent: f64, lot_multiplier: u32) -> Result<Self, AnalyzerError> {
        if !margin_percent.is_finite() {
            return Err(AnalyzerError::InvalidConfig(format!(
                "margin percentage must be a finite number, got {margin_percent}"
            )));
        }
        Ok(Self {
            margin_percent,
            lot_multiplier,
        })
    }

    /// Parse raw user-entered values
    pub fn parse(margin_percent: &str, lot_multiplier: &str) -> Result<Self, AnalyzerError> {
        let margin_text = margin_percent.trim();
        let margin = margin_text.parse::<f64>().map_err(|_| {
            AnalyzerError::InvalidConfig(format!(
                "margin percentage must be a number, got '{margin_text}'"
            ))
        })?;

        let multiplier_text = lot_multiplier.trim();
        let multiplier = multiplier_text.parse::<u32>().map_err(|_| {
            AnalyzerError::InvalidConfig(format!(
                "lot multiplier must be a non-negative integer, got '{multiplier_text}'"
            ))
        })?;

        Self::new(margin, multiplier)
    }
}

/// Fixed model constants, overridable only through settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParams {
    /// Strike grid spacing
    pub strike_interval: f64,
    /// ITM time-value buffer as a fraction of spot
    pub itm_time_value_rate: f64,
    /// ATM/OTM premium floor as a fraction of spot
    pub otm_premium_rate: f64,
    /// Writer margin as a fraction of strike (return denominator)
    pub writer_margin_rate: f64,
    /// Assumed holding period in days
    pub holding_period_days: u32,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            strike_interval: STRIKE_INTERVAL,
            itm_time_value_rate: ITM_TIME_VALUE_RATE,
            otm_premium_rate: OTM_PREMIUM_RATE,
            writer_margin_rate: WRITER_MARGIN_RATE,
            holding_period_days: HOLDING_PERIOD_DAYS,
        }
    }
}

impl EngineParams {
    /// Reject parameters that would make the model undefined
    pub fn validate(&self) -> Result<(), AnalyzerError> {
        if !self.strike_interval.is_finite() || self.strike_interval <= 0.0 {
            return Err(AnalyzerError::InvalidParameters(format!(
                "strike_interval must be positive, got {}",
                self.strike_interval
            )));
        }
        for (name, rate) in [
            ("itm_time_value_rate", self.itm_time_value_rate),
            ("otm_premium_rate", self.otm_premium_rate),
        ] {
            if !rate.is_finite() || rate < 0.0 {
                return Err(AnalyzerError::InvalidParameters(format!(
                    "{name} must be non-negative, got {rate}"
                )));
            }
        }
        if !self.writer_margin_rate.is_finite() || self.writer_margin_rate <= 0.0 {
            return Err(AnalyzerError::InvalidParameters(format!(
                "writer_margin_rate must be positive, got {}",
                self.writer_margin_rate
            )));
        }
        if self.holding_period_days == 0 {
            return Err(AnalyzerError::InvalidParameters(
                "holding_period_days must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Derived quote for one side of one instrument
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrikeQuote {
    /// Strike on the grid
    pub strike: f64,
    /// Approximate premium, 2 decimals
    pub premium: f64,
    /// Annualised return on writer margin, percent, 2 decimals
    pub irr_percent: f64,
}

/// One output row per instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRow {
    pub symbol: String,
    pub spot_price: f64,
    pub high_52w: f64,
    pub low_52w: f64,
    /// Exchange lot size as supplied
    pub lot_size: u32,
    /// Position of spot in the 52-week range (not clamped)
    pub percentile: f64,
    /// `lot_size * lot_multiplier`
    pub adjusted_lot_size: u64,
    /// Call side
    pub ce: StrikeQuote,
    /// Put side
    pub pe: StrikeQuote,
    /// Margin percentage the strikes were derived with
    pub margin_percent: f64,
}

impl AnalysisRow {
    /// Quote for the given side
    pub fn quote(&self, side: OptionSide) -> &StrikeQuote {
        match side {
            OptionSide::Call => &self.ce,
            OptionSide::Put => &self.pe,
        }
    }
}
