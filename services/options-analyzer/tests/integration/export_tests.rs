//! Export and re-read tests

use assert_matches::assert_matches;
use calamine::{Data, Reader, Xlsx, open_workbook};
use chrono::{TimeZone, Utc};
use options_analyzer::export::{
    EXPORT_COLUMNS, SHEET_NAME, load_export, read_csv, read_json, write_csv, write_json,
};
use options_analyzer::*;
use pretty_assertions::assert_eq;
use rstest::*;
use tempfile::TempDir;

use crate::test_utils::fixtures;

#[fixture]
fn batch() -> AnalysisBatch {
    let mut batch = fixtures::analyzer()
        .run(&SampleSource, &AnalysisConfig::new(12.5, 2).unwrap())
        .unwrap();
    batch.generated_at = Utc.with_ymd_and_hms(2024, 1, 25, 15, 30, 5).unwrap();
    batch
}

#[rstest]
fn test_csv_header_is_field_names(batch: AnalysisBatch) {
    let mut buf = Vec::new();
    write_csv(&mut buf, &batch.rows).unwrap();
    let text = String::from_utf8(buf).unwrap();

    assert_eq!(
        text.lines().next().unwrap(),
        "symbol,spot_price,high_52w,low_52w,percentile,lot_size,adjusted_lot_size,\
         ce_strike,ce_premium,ce_irr_percent,pe_strike,pe_premium,pe_irr_percent,margin_percent"
    );
    assert_eq!(text.lines().next().unwrap(), EXPORT_COLUMNS.join(","));
    assert_eq!(text.lines().count(), batch.len() + 1);
    assert!(!text.contains('₹'));
}

#[rstest]
fn test_csv_round_trip_reproduces_rows(batch: AnalysisBatch) {
    let mut buf = Vec::new();
    write_csv(&mut buf, &batch.rows).unwrap();
    let rows = read_csv(buf.as_slice()).unwrap();
    assert_eq!(rows, batch.rows);
}

#[rstest]
fn test_json_round_trip_reproduces_rows(batch: AnalysisBatch) {
    let mut buf = Vec::new();
    write_json(&mut buf, &batch.rows).unwrap();
    let rows = read_json(buf.as_slice()).unwrap();
    assert_eq!(rows, batch.rows);
}

#[rstest]
#[case(ExportFormat::Csv, "Options_Analysis_20240125_153005.csv")]
#[case(ExportFormat::Json, "Options_Analysis_20240125_153005.json")]
fn test_exporter_writes_timestamped_file(
    batch: AnalysisBatch,
    #[case] format: ExportFormat,
    #[case] expected_name: &str,
) {
    let dir = TempDir::new().unwrap();
    let exporter = BatchExporter::new(dir.path().join("out"), format, "Options_Analysis");

    let path = exporter.export(&batch).unwrap();
    assert_eq!(path.file_name().unwrap().to_str().unwrap(), expected_name);
    assert_eq!(load_export(&path).unwrap(), batch.rows);
}

#[rstest]
fn test_xlsx_export_has_named_sheet_and_header(batch: AnalysisBatch) {
    let dir = TempDir::new().unwrap();
    let exporter = BatchExporter::new(dir.path(), ExportFormat::Xlsx, "Options_Analysis");

    let path = exporter.export(&batch).unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "Options_Analysis_20240125_153005.xlsx"
    );

    let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
    assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_string()]);

    let range = workbook.worksheet_range(SHEET_NAME).unwrap();
    assert_eq!(range.height(), batch.len() + 1);

    let mut rows = range.rows();
    let header: Vec<&str> = rows
        .next()
        .unwrap()
        .iter()
        .map(|cell| match cell {
            Data::String(text) => text.as_str(),
            _ => "",
        })
        .collect();
    assert_eq!(header, EXPORT_COLUMNS.to_vec());

    let first = rows.next().unwrap();
    assert_eq!(first[0], Data::String(batch.rows[0].symbol.clone()));
    assert_eq!(first[1], Data::Float(batch.rows[0].spot_price));
    assert_eq!(first[7], Data::Float(batch.rows[0].ce.strike));
}

#[rstest]
fn test_xlsx_export_is_not_reloadable(batch: AnalysisBatch) {
    let dir = TempDir::new().unwrap();
    let path = BatchExporter::new(dir.path(), ExportFormat::Xlsx, "x")
        .export(&batch)
        .unwrap();
    assert_matches!(load_export(&path), Err(ExportError::Malformed(_)));
}

#[rstest]
fn test_empty_batch_has_nothing_to_export(mut batch: AnalysisBatch) {
    batch.rows.clear();
    let dir = TempDir::new().unwrap();
    let exporter = BatchExporter::new(dir.path(), ExportFormat::Csv, "x");
    assert_matches!(exporter.export(&batch), Err(ExportError::NoData));
}

#[rstest]
fn test_unwritable_destination_is_export_error(batch: AnalysisBatch) {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"file").unwrap();

    let exporter = BatchExporter::new(&blocker, ExportFormat::Csv, "x");
    assert_matches!(exporter.export(&batch), Err(ExportError::Io { .. }));
}

#[rstest]
fn test_malformed_export_rejected() {
    let csv = format!("{}\nNIFTY,abc,1,1,1,1,1,1,1,1,1,1,1,1\n", EXPORT_COLUMNS.join(","));
    assert_matches!(read_csv(csv.as_bytes()), Err(ExportError::Csv(_)));
}

#[rstest]
fn test_table_renders_every_row(batch: AnalysisBatch) {
    let table = render_table(&batch.rows);
    assert_eq!(table.lines().count(), batch.len() + 2);
    assert!(table.contains("HINDUNILVR"));
    assert!(table.contains("₹19500.00"));
}
