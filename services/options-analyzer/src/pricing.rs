//! Range positioning, strike selection, premium approximation and
//! return-on-margin calculation.
//!
//! None of this is an options-pricing model: there is no volatility, no time
//! decay and no Greeks. Premiums follow a piecewise rule (intrinsic value plus
//! a proportional buffer when in the money, a proportional floor otherwise)
//! and returns are annualised over a fixed holding period.

use crate::constants::{
    CENTS_SCALE, DAYS_PER_YEAR, FLAT_RANGE_PERCENTILE, GRID_TIE_TOLERANCE, PERCENT_SCALE,
};
use crate::types::{EngineParams, OptionSide};

/// Round to 2 decimals, half away from zero
pub fn round_to_cents(value: f64) -> f64 {
    (value * CENTS_SCALE).round() / CENTS_SCALE
}

// ============================================================================
// RANGE POSITIONING
// ============================================================================

/// Linear position of spot inside its 52-week range
#[derive(Debug)]
pub struct RangePositioner;

impl RangePositioner {
    /// Percentile of `spot` between `low` and `high`.
    ///
    /// A flat range returns exactly 50. The result is not clamped: a spot
    /// outside the range yields a value below 0 or above 100.
    pub fn percentile(spot: f64, high: f64, low: f64) -> f64 {
        if high == low {
            return FLAT_RANGE_PERCENTILE;
        }
        (spot - low) / (high - low) * PERCENT_SCALE
    }
}

// ============================================================================
// STRIKE SELECTION
// ============================================================================

/// Evenly spaced strike ladder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeGrid {
    interval: f64,
}

impl StrikeGrid {
    /// Grid with the given spacing (validated by [`EngineParams::validate`])
    pub fn new(interval: f64) -> Self {
        Self { interval }
    }

    /// Grid spacing
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Nearest grid point, ties rounded half away from zero.
    ///
    /// A step count within [`GRID_TIE_TOLERANCE`] of a half step counts as the
    /// tie, so `51174.99999999999` (binary `44500 * 1.15`) snaps the same way
    /// as `51175`. `steps - floor` is exact, so the check holds at any
    /// magnitude.
    pub fn snap(&self, price: f64) -> f64 {
        let steps = price / self.interval;
        let floor = steps.floor();
        let snapped = if (steps - floor - 0.5).abs() <= GRID_TIE_TOLERANCE {
            if steps >= 0.0 { floor + 1.0 } else { floor }
        } else {
            steps.round()
        };
        // `+ 0.0` folds -0.0 into 0.0
        snapped * self.interval + 0.0
    }
}

/// Derives margin-offset CE and PE strikes
#[derive(Debug, Clone, Copy)]
pub struct StrikeSelector {
    grid: StrikeGrid,
}

impl StrikeSelector {
    pub fn new(grid: StrikeGrid) -> Self {
        Self { grid }
    }

    /// Strike nearest to spot
    pub fn nearest_strike(&self, spot: f64) -> f64 {
        self.grid.snap(spot)
    }

    /// Snap spot, shift the snapped strike by `margin_percent`, snap again.
    ///
    /// CE shifts down and PE shifts up. A negative margin inverts that.
    pub fn strike(&self, spot: f64, margin_percent: f64, side: OptionSide) -> f64 {
        let nearest = self.nearest_strike(spot);
        let offset = margin_percent / PERCENT_SCALE;
        let target = match side {
            OptionSide::Call => nearest * (1.0 - offset),
            OptionSide::Put => nearest * (1.0 + offset),
        };
        self.grid.snap(target)
    }

    /// `(ce_strike, pe_strike)`
    pub fn strikes(&self, spot: f64, margin_percent: f64) -> (f64, f64) {
        (
            self.strike(spot, margin_percent, OptionSide::Call),
            self.strike(spot, margin_percent, OptionSide::Put),
        )
    }
}

// ============================================================================
// PREMIUM ESTIMATION
// ============================================================================

/// Piecewise premium approximation
#[derive(Debug, Clone, Copy)]
pub struct PremiumEstimator {
    itm_time_value_rate: f64,
    otm_premium_rate: f64,
}

impl PremiumEstimator {
    pub fn new(itm_time_value_rate: f64, otm_premium_rate: f64) -> Self {
        Self {
            itm_time_value_rate,
            otm_premium_rate,
        }
    }

    /// Approximate premium, rounded to 2 decimals.
    ///
    /// In the money: intrinsic value plus `spot * itm_time_value_rate`.
    /// At or out of the money: `spot * otm_premium_rate`.
    pub fn estimate(&self, spot: f64, strike: f64, side: OptionSide) -> f64 {
        let intrinsic = match side {
            OptionSide::Call => spot - strike,
            OptionSide::Put => strike - spot,
        };

        let premium = if intrinsic > 0.0 {
            intrinsic + spot * self.itm_time_value_rate
        } else {
            spot * self.otm_premium_rate
        };

        round_to_cents(premium)
    }
}

// ============================================================================
// RETURN ON MARGIN
// ============================================================================

/// Annualised return on the margin blocked to write an option
#[derive(Debug, Clone, Copy)]
pub struct ReturnCalculator {
    writer_margin_rate: f64,
    holding_period_days: u32,
}

impl ReturnCalculator {
    pub fn new(writer_margin_rate: f64, holding_period_days: u32) -> Self {
        Self {
            writer_margin_rate,
            holding_period_days,
        }
    }

    /// Margin required to write one unit at `strike`
    pub fn margin_required(&self, strike: f64) -> f64 {
        strike * self.writer_margin_rate
    }

    /// `premium / margin * (365 / holding days) * 100`, 2 decimals.
    /// Zero margin (zero strike) yields 0.
    pub fn annualized_return(&self, premium: f64, strike: f64) -> f64 {
        let margin_required = self.margin_required(strike);
        if margin_required == 0.0 {
            return 0.0;
        }

        let periods_per_year = DAYS_PER_YEAR / f64::from(self.holding_period_days);
        round_to_cents((premium / margin_required) * periods_per_year * PERCENT_SCALE)
    }
}

impl From<&EngineParams> for StrikeSelector {
    fn from(params: &EngineParams) -> Self {
        Self::new(StrikeGrid::new(params.strike_interval))
    }
}

impl From<&EngineParams> for PremiumEstimator {
    fn from(params: &EngineParams) -> Self {
        Self::new(params.itm_time_value_rate, params.otm_premium_rate)
    }
}

impl From<&EngineParams> for ReturnCalculator {
    fn from(params: &EngineParams) -> Self {
        Self::new(params.writer_margin_rate, params.holding_period_days)
    }
}
