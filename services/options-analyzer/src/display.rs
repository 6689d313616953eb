//! Text table rendering of analysis rows
//!
//! Currency prefixes and percent suffixes are added here only; rows stay numeric.

use crate::types::AnalysisRow;

const RUPEE: &str = "₹";

/// Column headers in display order
pub const TABLE_COLUMNS: [&str; 12] = [
    "Symbol",
    "Spot",
    "52W High",
    "52W Low",
    "Percentile",
    "Lot Size",
    "CE Strike",
    "CE Premium",
    "CE IRR",
    "PE Strike",
    "PE Premium",
    "PE IRR",
];

fn price(value: f64) -> String {
    format!("{RUPEE}{value:.2}")
}

fn percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Display cells for one row, aligned with [`TABLE_COLUMNS`]
pub fn format_row(row: &AnalysisRow) -> [String; 12] {
    [
        row.symbol.clone(),
        price(row.spot_price),
        price(row.high_52w),
        price(row.low_52w),
        percent(row.percentile),
        row.adjusted_lot_size.to_string(),
        price(row.ce.strike),
        price(row.ce.premium),
        percent(row.ce.irr_percent),
        price(row.pe.strike),
        price(row.pe.premium),
        percent(row.pe.irr_percent),
    ]
}

/// Render rows as a fixed-width table with a header and separator line
pub fn render_table(rows: &[AnalysisRow]) -> String {
    let cells: Vec<[String; 12]> = rows.iter().map(format_row).collect();

    let mut widths = TABLE_COLUMNS.map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, TABLE_COLUMNS.iter().copied(), &widths);
    let total: usize = widths.iter().sum::<usize>() + 3 * (widths.len() - 1);
    out.push_str(&"-".repeat(total));
    out.push('\n');
    for row in &cells {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths.iter().copied())
        // padding counts chars, so the rupee sign is one column
        .map(|(cell, width)| format!("{cell:>width$}"))
        .collect::<Vec<_>>()
        .join(" | ");
    out.push_str(line.trim_end());
    out.push('\n');
}
