//! Shared configuration, fixtures and assertions for analyzer tests

use options_analyzer::*;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize test logging once per process
pub fn init_test_env() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("options_analyzer=debug")
            .with_test_writer()
            .try_init()
            .ok(); // Ignore error if already initialized
    });
}

/// Test configuration constants
pub mod config {
    /// Seeded NIFTY scenario
    pub const NIFTY_SPOT: f64 = 19500.0;
    pub const NIFTY_HIGH: f64 = 20000.0;
    pub const NIFTY_LOW: f64 = 18000.0;
    pub const NIFTY_LOT: u32 = 50;

    /// Strike grid used by default
    pub const GRID: f64 = 50.0;

    /// Default margin for strike offset
    pub const MARGIN_PERCENT: f64 = 15.0;

    /// Float tolerance for derived values
    pub const EPSILON: f64 = 1e-9;
}

/// Common record factories
pub mod fixtures {
    use super::*;

    pub fn nifty() -> InstrumentRecord {
        InstrumentRecord::new(
            "NIFTY",
            config::NIFTY_SPOT,
            config::NIFTY_HIGH,
            config::NIFTY_LOW,
            config::NIFTY_LOT,
        )
    }

    pub fn flat(symbol: &str, price: f64) -> InstrumentRecord {
        InstrumentRecord::new(symbol, price, price, price, 100)
    }

    pub fn default_config() -> AnalysisConfig {
        AnalysisConfig::new(config::MARGIN_PERCENT, 1).expect("valid config")
    }

    pub fn analyzer() -> OptionsAnalyzer {
        OptionsAnalyzer::new(EngineParams::default()).expect("default params are valid")
    }

    /// Synthetic universe of `count` distinct instruments
    pub fn synthetic_universe(count: usize) -> Vec<InstrumentRecord> {
        (0..count)
            .map(|i| {
                let spot = 100.0 + i as f64 * 37.5;
                let lot = 25 + i as u32;
                InstrumentRecord::new(format!("SYM{i}"), spot, spot * 1.2, spot * 0.8, lot)
            })
            .collect()
    }

    /// CSV text for the given records
    pub fn instruments_csv(records: &[InstrumentRecord]) -> String {
        let mut out = String::from("symbol,spot_price,high_52w,low_52w,lot_size\n");
        for r in records {
            out.push_str(&format!(
                "{},{},{},{},{}\n",
                r.symbol, r.spot_price, r.high_52w, r.low_52w, r.lot_size
            ));
        }
        out
    }
}

/// Test assertion helpers
pub mod assertions {
    use super::*;

    /// Strike lies on the grid
    pub fn assert_on_grid(strike: f64, interval: f64) {
        let steps = strike / interval;
        assert!(
            (steps - steps.round()).abs() < 1e-9,
            "strike {strike} is not a multiple of {interval}"
        );
    }

    /// Every derived figure in a row is usable
    pub fn assert_row_sane(row: &AnalysisRow, interval: f64) {
        for side in [OptionSide::Call, OptionSide::Put] {
            let quote = row.quote(side);
            assert_on_grid(quote.strike, interval);
            assert!(quote.premium >= 0.0, "{} {side} premium negative", row.symbol);
            assert!(quote.premium.is_finite());
            assert!(quote.irr_percent.is_finite());
        }
        assert!(row.percentile.is_finite());
    }
}
