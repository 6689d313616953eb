//! Fixed constants of the strike/premium/return model
//!
//! These are the defaults behind [`crate::EngineParams`]. The user-facing
//! margin percentage (strike offset) is NOT one of them: it travels in
//! [`crate::AnalysisConfig`] and must never be mixed with
//! [`WRITER_MARGIN_RATE`].

/// Strike grid spacing in price units
pub const STRIKE_INTERVAL: f64 = 50.0;

/// Proportional time-value buffer added to intrinsic value for ITM strikes (2%)
pub const ITM_TIME_VALUE_RATE: f64 = 0.02;

/// Proportional premium floor for ATM/OTM strikes (1%)
pub const OTM_PREMIUM_RATE: f64 = 0.01;

/// Margin blocked to write one unit, as a fraction of strike (15%)
pub const WRITER_MARGIN_RATE: f64 = 0.15;

/// Assumed holding period for return annualisation
pub const HOLDING_PERIOD_DAYS: u32 = 30;

/// Calendar days used to annualise returns
pub const DAYS_PER_YEAR: f64 = 365.0;

// Analysis defaults
pub const DEFAULT_MARGIN_PERCENT: f64 = 15.0;
pub const DEFAULT_LOT_MULTIPLIER: u32 = 1;

/// Percentile reported when the 52-week range is flat
pub const FLAT_RANGE_PERCENTILE: f64 = 50.0;

// Rounding
pub const PERCENT_SCALE: f64 = 100.0;
pub const CENTS_SCALE: f64 = 100.0;
/// Grid quotients within this distance of a half step are treated as the
/// exact tie, so binary noise resolves the way the decimal value would.
pub const GRID_TIE_TOLERANCE: f64 = 1e-9;
