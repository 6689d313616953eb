//! Unit tests for annualised return on writer margin

use approx::assert_abs_diff_eq;
use options_analyzer::{EngineParams, ReturnCalculator};
use rstest::*;

#[fixture]
fn calculator() -> ReturnCalculator {
    ReturnCalculator::from(&EngineParams::default())
}

#[rstest]
#[case(3290.0, 16600.0, 1607.56)]
#[case(3340.0, 22450.0, 1206.73)]
#[case(195.0, 19500.0, 81.11)]
#[case(195.0, 21450.0, 73.74)]
#[case(195.0, 17550.0, 90.12)]
fn test_annualised_return(
    calculator: ReturnCalculator,
    #[case] premium: f64,
    #[case] strike: f64,
    #[case] expected: f64,
) {
    assert_abs_diff_eq!(calculator.annualized_return(premium, strike), expected, epsilon = 1e-9);
}

#[rstest]
fn test_margin_uses_writer_rate_not_strike_offset(calculator: ReturnCalculator) {
    assert_abs_diff_eq!(calculator.margin_required(20000.0), 3000.0, epsilon = 1e-9);
}

#[rstest]
#[case(0.0)]
#[case(19890.0)]
fn test_zero_strike_returns_zero(calculator: ReturnCalculator, #[case] premium: f64) {
    assert_eq!(calculator.annualized_return(premium, 0.0), 0.0);
}

#[rstest]
fn test_no_cap_above_hundred_percent(calculator: ReturnCalculator) {
    assert!(calculator.annualized_return(3290.0, 16600.0) > 100.0);
}

#[rstest]
fn test_holding_period_scales_return() {
    let monthly = ReturnCalculator::new(0.15, 30);
    let yearly = ReturnCalculator::new(0.15, 365);

    // 150 premium on 1000 strike: 100% of margin per period
    assert_abs_diff_eq!(yearly.annualized_return(150.0, 1000.0), 100.0, epsilon = 1e-9);
    assert_abs_diff_eq!(monthly.annualized_return(150.0, 1000.0), 1216.67, epsilon = 1e-9);
}
