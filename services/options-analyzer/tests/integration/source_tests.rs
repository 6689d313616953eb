//! Instrument source tests

use assert_matches::assert_matches;
use options_analyzer::*;
use rstest::*;
use std::io::Write;
use tempfile::NamedTempFile;

use crate::test_utils::fixtures;

#[rstest]
fn test_sample_source_has_ten_unique_instruments() {
    let records = SampleSource.load_instruments().unwrap();
    assert_eq!(records.len(), 10);
    for record in &records {
        assert!(record.validate().is_ok(), "{} invalid", record.symbol);
    }
    assert_eq!(records[1], InstrumentRecord::new("BANKNIFTY", 44500.0, 46000.0, 42000.0, 25));
}

#[rstest]
fn test_csv_parse_round_trips_sample() {
    let csv = fixtures::instruments_csv(&SampleSource::records());
    let parsed = CsvInstrumentSource::parse(csv.as_bytes()).unwrap();
    assert_eq!(parsed, SampleSource::records());
}

#[rstest]
fn test_csv_parse_trims_and_reorders_columns() {
    let csv =
        "lot_size, symbol ,low_52w,high_52w,spot_price\n 75 , FINNIFTY , 18000, 21000 ,20000\n";
    let parsed = CsvInstrumentSource::parse(csv.as_bytes()).unwrap();
    assert_eq!(
        parsed,
        vec![InstrumentRecord::new("FINNIFTY", 20000.0, 21000.0, 18000.0, 75)]
    );
}

#[rstest]
#[case(
    "symbol,spot_price,high_52w,low_52w,lot_size\nTCS,3600,3850,3200,125\nINFY,n/a,1600,1350,300\n",
    "INFY"
)]
#[case("symbol,spot_price,high_52w,low_52w,lot_size\nTCS,3600,,3200,125\n", "TCS")]
#[case("symbol,spot_price,high_52w,low_52w\nSBIN,590,650,520\n", "SBIN")]
#[case("symbol,spot_price,high_52w,low_52w,lot_size\n,590,650,520,10\n", "row 1")]
#[case("symbol,spot_price,high_52w,low_52w,lot_size\nA,1,2,0.5,1\nB,590,650,520,1.5\n", "B")]
fn test_csv_bad_rows_fail_whole_load(#[case] csv: &str, #[case] culprit: &str) {
    let err = CsvInstrumentSource::parse(csv.as_bytes()).unwrap_err();
    assert_matches!(err, AnalyzerError::InvalidInstrument { ref symbol, .. } if symbol == culprit);
}

#[rstest]
fn test_csv_file_source() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", fixtures::instruments_csv(&[fixtures::nifty()])).unwrap();

    let source = CsvInstrumentSource::new(file.path());
    assert_eq!(source.path(), file.path());
    assert_eq!(source.load_instruments().unwrap(), vec![fixtures::nifty()]);
}

#[rstest]
fn test_missing_file_is_source_unavailable() {
    let source = CsvInstrumentSource::new("/nonexistent/instruments.csv");
    let err = source.load_instruments().unwrap_err();
    assert_matches!(err, AnalyzerError::SourceUnavailable(_));
    assert!(!err.is_bad_input());
}

#[rstest]
fn test_static_source() {
    let source = StaticSource::new("fixed", vec![fixtures::nifty()]);
    assert_eq!(source.name(), "fixed");
    assert_eq!(source.load_instruments().unwrap().len(), 1);
}

#[rstest]
fn test_shipped_instrument_file_analyses() {
    let source =
        CsvInstrumentSource::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data/instruments.csv"));
    let batch = fixtures::analyzer()
        .run(&source, &fixtures::default_config())
        .unwrap();

    assert_eq!(batch.len(), 5);
    assert_eq!(batch.rows[2].symbol, "FINNIFTY");
    assert_eq!(batch.rows[2].percentile, 66.66666666666666);
}
