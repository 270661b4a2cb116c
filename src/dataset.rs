//! Tabular dataset seam: cells, rows and series extraction.
//!
//! The analysis core never parses files. Callers keep their own row
//! representation and expose it through [`Record`]; this module derives the
//! daily percent-change column and compacts it into the series the analysis
//! functions consume, together with the map back to original row positions.

use std::collections::HashMap;

use crate::{Result, StreakAnalysis, StreakError};

// ============================================================
// CELLS AND ROWS
// ============================================================

/// A single scalar cell of a tabular dataset.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Num(f64),
    Text(String),
    Null,
}

impl Cell {
    /// Numeric view of the cell. Text is parsed after trimming; non-finite
    /// numbers are rejected.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Num(n) => n.is_finite().then_some(*n),
            Cell::Text(s) => {
                let n: f64 = s.trim().parse().ok()?;
                n.is_finite().then_some(n)
            }
            Cell::Null => None,
        }
    }

    #[inline]
    pub fn is_numeric(&self) -> bool {
        self.as_f64().is_some()
    }

    /// Text view of the cell, used for date labels.
    pub fn to_label(&self) -> Option<String> {
        match self {
            Cell::Num(n) => Some(n.to_string()),
            Cell::Text(s) => Some(s.clone()),
            Cell::Null => None,
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Num(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

/// Row access by column name.
///
/// Callers keep their own row type; the extraction functions only need cells
/// looked up by column name. `None` means the row has no such column.
pub trait Record {
    fn field(&self, column: &str) -> Option<Cell>;
}

impl Record for HashMap<String, Cell> {
    fn field(&self, column: &str) -> Option<Cell> {
        self.get(column).cloned()
    }
}

impl<R: Record> Record for &R {
    fn field(&self, column: &str) -> Option<Cell> {
        (*self).field(column)
    }
}

// ============================================================
// COLUMN LOOKUP
// ============================================================

/// Case-insensitive column lookup, returning the stored spelling.
pub fn find_column<'a>(columns: &'a [String], name: &str) -> Option<&'a str> {
    columns
        .iter()
        .map(String::as_str)
        .find(|column| column.eq_ignore_ascii_case(name))
}

/// The date-like column: first one whose name contains "date" or "time"
/// (case-insensitive), falling back to the first column.
pub fn date_column(columns: &[String]) -> Option<&str> {
    columns
        .iter()
        .map(String::as_str)
        .find(|column| {
            let lower = column.to_ascii_lowercase();
            lower.contains("date") || lower.contains("time")
        })
        .or_else(|| columns.first().map(String::as_str))
}

/// Date label for every row, in row order. Rows without a label contribute
/// an empty string so positions stay aligned.
pub fn date_labels<R: Record>(rows: &[R], date_col: &str) -> Vec<String> {
    rows.iter()
        .map(|row| {
            row.field(date_col)
                .and_then(|cell| cell.to_label())
                .unwrap_or_default()
        })
        .collect()
}

// ============================================================
// NUMERIC COLUMN DETECTION
// ============================================================

const NUMERIC_SAMPLE_ROWS: usize = 10;
const NUMERIC_SAMPLE_QUORUM: f64 = 0.8;

/// Sample the first rows of `column`; numeric when at least 80% of the
/// sampled cells parse as numbers.
pub fn is_numeric_column<R: Record>(rows: &[R], column: &str) -> bool {
    if rows.is_empty() {
        return false;
    }
    let sample = rows.len().min(NUMERIC_SAMPLE_ROWS);
    let numeric = rows[..sample]
        .iter()
        .filter(|row| row.field(column).is_some_and(|cell| cell.is_numeric()))
        .count();
    numeric as f64 / sample as f64 >= NUMERIC_SAMPLE_QUORUM
}

/// All columns that [`is_numeric_column`] accepts, in column order.
pub fn numeric_columns<R: Record>(rows: &[R], columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .filter(|column| is_numeric_column(rows, column))
        .cloned()
        .collect()
}

// ============================================================
// DERIVED CHANGE COLUMN
// ============================================================

/// Daily percent change `(close - open) / open * 100` per row.
///
/// Returns `None` when the dataset has no open/close column pair
/// (case-insensitive). A row's entry is `None` when either side fails to
/// parse or the open is zero.
pub fn derive_pct_change<R: Record>(rows: &[R], columns: &[String]) -> Option<Vec<Option<f64>>> {
    let open_col = find_column(columns, "open")?;
    let close_col = find_column(columns, "close")?;

    Some(
        rows.iter()
            .map(|row| {
                let open = row.field(open_col)?.as_f64()?;
                let close = row.field(close_col)?.as_f64()?;
                (open != 0.0).then(|| (close - open) / open * 100.0)
            })
            .collect(),
    )
}

// ============================================================
// CHANGE SERIES
// ============================================================

/// Compacted percent-change series with its companion date labels and the
/// map back to original row positions.
///
/// `values[k]` came from row `index_map[k]`; the map is strictly increasing.
/// `dates` is either empty or parallel to `values`. Immutable once built.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChangeSeries {
    values: Vec<f64>,
    dates: Vec<String>,
    index_map: Vec<usize>,
}

impl ChangeSeries {
    /// Build a series directly, validating the invariants the analysis
    /// relies on: finite values, companion lengths, a strictly increasing
    /// index map.
    pub fn new(values: Vec<f64>, dates: Vec<String>, index_map: Vec<usize>) -> Result<Self> {
        if let Some(index) = values.iter().position(|value| !value.is_finite()) {
            return Err(StreakError::NonFiniteChange { index });
        }
        if index_map.len() != values.len() {
            return Err(StreakError::LengthMismatch {
                field: "index_map",
                expected: values.len(),
                got: index_map.len(),
            });
        }
        if !dates.is_empty() && dates.len() != values.len() {
            return Err(StreakError::LengthMismatch {
                field: "dates",
                expected: values.len(),
                got: dates.len(),
            });
        }
        if let Some(position) = index_map.windows(2).position(|pair| pair[1] <= pair[0]) {
            return Err(StreakError::UnsortedIndexMap {
                position: position + 1,
            });
        }
        Ok(Self {
            values,
            dates,
            index_map,
        })
    }

    /// Compact a row-aligned change column: every row with a finite change
    /// contributes one entry, remembering the original row index. Rows with
    /// a missing date label contribute an empty string so the labels stay
    /// parallel.
    pub fn from_changes<R: Record>(
        rows: &[R],
        changes: &[Option<f64>],
        date_col: Option<&str>,
    ) -> Self {
        let mut values = Vec::new();
        let mut dates = Vec::new();
        let mut index_map = Vec::new();

        for (row_index, change) in changes.iter().enumerate() {
            let Some(change) = change else { continue };
            if !change.is_finite() {
                continue;
            }
            values.push(*change);
            index_map.push(row_index);
            if let Some(col) = date_col {
                let label = rows
                    .get(row_index)
                    .and_then(|row| row.field(col))
                    .and_then(|cell| cell.to_label())
                    .unwrap_or_default();
                dates.push(label);
            }
        }

        Self {
            values,
            dates,
            index_map,
        }
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    #[inline]
    pub fn index_map(&self) -> &[usize] {
        &self.index_map
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ============================================================
// PRICE SERIES
// ============================================================

/// Row-aligned close prices.
///
/// Entries that failed to parse are the NaN sentinel, so positions stay
/// aligned with the source rows.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PriceSeries(Vec<f64>);

impl PriceSeries {
    pub fn new(prices: Vec<f64>) -> Self {
        Self(prices)
    }

    /// Extract close prices from rows, defaulting to a `"Close"` column when
    /// no close-named column exists.
    pub fn from_records<R: Record>(rows: &[R], columns: &[String]) -> Self {
        let close_col = find_column(columns, "close").unwrap_or("Close");
        Self(
            rows.iter()
                .map(|row| {
                    row.field(close_col)
                        .and_then(|cell| cell.as_f64())
                        .unwrap_or(f64::NAN)
                })
                .collect(),
        )
    }

    /// Price at `index`, or `None` when out of bounds or the sentinel.
    #[inline]
    pub fn price_at(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied().filter(|price| price.is_finite())
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================
// MARKET DATA BUNDLE
// ============================================================

/// Everything the analyzer needs for one instrument, extracted from rows.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MarketData {
    pub series: ChangeSeries,
    pub prices: PriceSeries,
    /// One date label per original row; empty when no date column exists.
    pub row_dates: Vec<String>,
}

impl MarketData {
    /// Run the full extraction pipeline over a row set.
    ///
    /// Returns `None` when the dataset has no open/close pair to derive a
    /// change column from.
    pub fn from_records<R: Record>(rows: &[R], columns: &[String]) -> Option<Self> {
        let changes = derive_pct_change(rows, columns)?;
        let date_col = date_column(columns);
        let series = ChangeSeries::from_changes(rows, &changes, date_col);
        let prices = PriceSeries::from_records(rows, columns);
        let row_dates = date_col
            .map(|col| date_labels(rows, col))
            .unwrap_or_default();
        Some(Self {
            series,
            prices,
            row_dates,
        })
    }

    /// Analyze this instrument.
    pub fn analyze(&self) -> StreakAnalysis {
        crate::analyze(&self.series, &self.prices, &self.row_dates)
    }
}

// ============================================================
// TESTS
// ============================================================
