//! Integration tests for the streakscan analysis pipeline.
//!
//! These tests exercise the public API end to end, from rows through
//! extraction to the assembled analysis.

use std::collections::HashMap;

use streakscan::prelude::*;

/// Build a row from (column, cell) pairs.
fn row(cells: &[(&str, Cell)]) -> HashMap<String, Cell> {
    cells
        .iter()
        .map(|(name, cell)| (name.to_string(), cell.clone()))
        .collect()
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

/// Rows with Date/Open/Close columns, one per trading day.
fn price_rows(days: &[(&str, f64, f64)]) -> Vec<HashMap<String, Cell>> {
    days.iter()
        .map(|(date, open, close)| {
            row(&[
                ("Date", Cell::from(*date)),
                ("Open", Cell::from(*open)),
                ("Close", Cell::from(*close)),
            ])
        })
        .collect()
}

fn ohlc_columns() -> Vec<String> {
    columns(&["Date", "Open", "Close"])
}

// ============================================================
// SEGMENTATION
// ============================================================

#[test]
fn test_segmentation_compounds_multiplicatively() {
    let series = ChangeSeries::new(
        vec![1.0, 2.0, -1.0, -2.0, 3.0],
        Vec::new(),
        vec![0, 1, 2, 3, 4],
    )
    .unwrap();
    let streaks = segment_streaks(&series);

    assert_eq!(streaks.len(), 3);
    assert_eq!(streaks[0].sign, Sign::Up);
    assert_eq!(streaks[0].days, 2);
    assert!((streaks[0].percent - 3.02).abs() < 1e-9);
    assert_eq!(streaks[1].sign, Sign::Down);
    assert!((streaks[1].percent + 2.98).abs() < 1e-9);
    assert_eq!(streaks[2].days, 1);
}

#[test]
fn test_flat_day_counts_as_up() {
    let series = ChangeSeries::new(vec![-1.0, 0.0, 1.0], Vec::new(), vec![0, 1, 2]).unwrap();
    let streaks = segment_streaks(&series);

    assert_eq!(streaks.len(), 2);
    assert_eq!(streaks[0].sign, Sign::Down);
    assert_eq!(streaks[0].days, 1);
    assert_eq!(streaks[1].sign, Sign::Up);
    assert_eq!(streaks[1].days, 2);
}

// ============================================================
// EXTREMA
// ============================================================

#[test]
fn test_extrema_prefer_earlier_run_on_tie() {
    let series = ChangeSeries::new(
        vec![1.0, 2.0, -1.0, 3.0, 4.0],
        Vec::new(),
        vec![0, 1, 2, 3, 4],
    )
    .unwrap();
    let streaks = segment_streaks(&series);

    // Two up-runs of two days each; the first one wins.
    let max_up = longest_up(&streaks).unwrap();
    assert_eq!(max_up.start_index, 0);
    assert_eq!(max_up.days, 2);
    // Magnitude never breaks the tie, even though the later run moved more.
    assert!(streaks[2].percent > max_up.percent);
}

// ============================================================
// FULL PIPELINE
// ============================================================

#[test]
fn test_full_pipeline_with_filtered_rows() {
    // Row 2 has an unparseable open, so its change is filtered out and the
    // change series is compacted: change indices 0,1,2,3 map to rows 0,1,3,4.
    let rows = price_rows(&[
        ("2024-01-02", 100.0, 101.0), // up
        ("2024-01-03", 101.0, 103.0), // up
        ("2024-01-04", f64::NAN, 103.5),
        ("2024-01-05", 103.5, 102.0), // down
        ("2024-01-08", 102.0, 100.0), // down
    ]);
    let data = MarketData::from_records(&rows, &ohlc_columns()).unwrap();
    assert_eq!(data.series.len(), 4);
    assert_eq!(data.series.index_map(), &[0, 1, 3, 4]);

    let analysis = data.analyze();
    assert_eq!(analysis.streaks.len(), 2);

    // Streak indices are row positions, bridging the filtered row.
    let max_up = analysis.max_up.as_ref().unwrap();
    assert_eq!(max_up.start_index, 0);
    assert_eq!(max_up.end_index, 1);
    assert_eq!(max_up.start_price, Some(101.0));
    assert_eq!(max_up.end_price, Some(103.0));

    let max_down = analysis.max_down.as_ref().unwrap();
    assert_eq!(max_down.start_index, 3);
    assert_eq!(max_down.end_index, 4);

    // Up-streak started at close 101; first later close at or below that is
    // row 4 (100.0), three rows after the streak's end.
    let up = &analysis.recovery.up;
    assert!(up.recovered);
    assert_eq!(up.recovery_days, Some(3));
    assert_eq!(up.recovery_date.as_deref(), Some("2024-01-08"));
    assert_eq!(up.recovery_price, Some(100.0));

    // Down-streak never gets back up to 102 within the data.
    let down = &analysis.recovery.down;
    assert!(!down.recovered);
    assert_eq!(down.recovery_days, None);
    assert_eq!(down.start_price, Some(102.0));
}

#[test]
fn test_streak_dates_span_runs() {
    let rows = price_rows(&[
        ("2024-01-02", 100.0, 101.0),
        ("2024-01-03", 101.0, 103.0),
        ("2024-01-04", 103.0, 102.0),
    ]);
    let data = MarketData::from_records(&rows, &ohlc_columns()).unwrap();
    let analysis = data.analyze();

    let max_up = analysis.max_up.unwrap();
    assert_eq!(
        max_up.dates.as_deref(),
        Some(&["2024-01-02".to_string(), "2024-01-03".to_string()][..])
    );
}

#[test]
fn test_longest_first_recovery_finds_slowest_rebound() {
    // Streak A (row 0) recovers the day after; streak B (rows 2..=3, start
    // close 104.0) only recovers at row 6, three rows after it ends.
    let rows = price_rows(&[
        ("d0", 100.0, 103.0),
        ("d1", 103.0, 99.0),
        ("d2", 99.0, 104.0),
        ("d3", 104.0, 106.0),
        ("d4", 106.0, 105.0),
        ("d5", 105.0, 104.5),
        ("d6", 104.5, 103.0),
    ]);
    let data = MarketData::from_records(&rows, &ohlc_columns()).unwrap();
    let analysis = data.analyze();

    let longest = analysis.longest_first_recovery.unwrap();
    assert_eq!(longest.streak_sign, Sign::Up);
    assert_eq!(longest.streak_days, 2);
    assert_eq!(longest.first_recovery_days, Some(3));
    assert_eq!(longest.start_date, "d2");
    assert_eq!(longest.end_date, "d3");
    assert_eq!(longest.recovery_date.as_deref(), Some("d6"));
}

#[test]
fn test_no_valid_changes_yields_empty_analysis() {
    let rows = price_rows(&[("d0", 0.0, 10.0), ("d1", 0.0, 11.0)]);
    let data = MarketData::from_records(&rows, &ohlc_columns()).unwrap();
    assert!(data.series.is_empty());

    let analysis = data.analyze();
    assert!(analysis.streaks.is_empty());
    assert!(analysis.max_up.is_none());
    assert!(analysis.max_down.is_none());
    assert!(!analysis.recovery.up.recovered);
    assert!(analysis.longest_first_recovery.is_none());
}

#[test]
fn test_column_lookup_is_case_insensitive() {
    // The change derivation needs open and close, but a dataset exposing
    // "CLOSE" in a different spelling still resolves everywhere.
    let rows = vec![
        row(&[
            ("Date", Cell::from("d0")),
            ("OPEN", Cell::from(100.0)),
            ("CLOSE", Cell::from(101.0)),
        ]),
        row(&[
            ("Date", Cell::from("d1")),
            ("OPEN", Cell::from(101.0)),
            ("CLOSE", Cell::from(99.0)),
        ]),
    ];
    let data = MarketData::from_records(&rows, &columns(&["Date", "OPEN", "CLOSE"])).unwrap();

    let analysis = data.analyze();
    assert_eq!(analysis.streaks.len(), 2);
    assert_eq!(analysis.max_up.as_ref().unwrap().start_price, Some(101.0));
}

#[test]
fn test_reanalysis_is_bit_identical() {
    let rows = price_rows(&[
        ("d0", 100.0, 101.0),
        ("d1", 101.0, 99.0),
        ("d2", 99.0, 102.0),
        ("d3", 102.0, 101.5),
    ]);
    let data = MarketData::from_records(&rows, &ohlc_columns()).unwrap();
    assert_eq!(data.analyze(), data.analyze());
}

// ============================================================
// SUMMARY STATISTICS
// ============================================================

#[test]
fn test_summary_stats_reference_values() {
    let stats = summarize(&[1.0, 2.0, 3.0, 4.0]).unwrap();
    assert!((stats.q25 - 1.75).abs() < 1e-12);
    assert!((stats.median - 2.5).abs() < 1e-12);

    let stats = summarize(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
    assert_eq!(stats.mean, 5.0);
    assert_eq!(stats.std, 2.0);
}

#[test]
fn test_column_stats_over_records() {
    let rows = price_rows(&[("d0", 100.0, 101.0), ("d1", 101.0, 103.0), ("d2", 103.0, 99.0)]);
    let stats = column_stats(&rows, "Close").unwrap();
    assert_eq!(stats.count, 3);
    assert_eq!(stats.min, 99.0);
    assert_eq!(stats.max, 103.0);
    assert_eq!(stats.mean, 101.0);
}

#[test]
fn test_numeric_column_listing() {
    let rows = price_rows(&[("d0", 100.0, 101.0), ("d1", 101.0, 103.0)]);
    assert_eq!(numeric_columns(&rows, &ohlc_columns()), vec!["Open", "Close"]);
}

// ============================================================
// WIRE SHAPE
// ============================================================

#[test]
fn test_analysis_serializes_to_json() {
    let rows = price_rows(&[("d0", 100.0, 101.0), ("d1", 101.0, 99.0)]);
    let data = MarketData::from_records(&rows, &ohlc_columns()).unwrap();
    let analysis = data.analyze();

    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(json["streaks"][0]["sign"], "up");
    assert_eq!(json["streaks"][1]["sign"], "down");
    assert_eq!(json["max_up"]["days"], 1);
    assert!(json["recovery"]["up"]["recovered"].is_boolean());
    // Absent data is null on the wire, never an error.
    assert!(json["recovery"]["down"]["recovery_days"].is_null());

    let back: StreakAnalysis = serde_json::from_value(json).unwrap();
    assert_eq!(back, analysis);
}
