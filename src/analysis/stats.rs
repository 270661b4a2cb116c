//! Descriptive statistics for one numeric series or column.

use crate::dataset::Record;

/// Summary of a numeric series: count, central tendency, spread, quartiles.
///
/// `std` is the population standard deviation (divisor `n`, not `n - 1`).
/// `mean` and `std` are rounded to 4 decimal places for display; the
/// quartiles are left unrounded.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Summarize a series, ignoring non-finite entries.
///
/// Returns `None` when no finite value remains.
pub fn summarize(values: &[f64]) -> Option<SummaryStats> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let count = sorted.len();
    let n = count as f64;
    let mean = sorted.iter().sum::<f64>() / n;
    let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

    Some(SummaryStats {
        count,
        mean: round4(mean),
        std: round4(variance.sqrt()),
        min: sorted[0],
        q25: percentile(&sorted, 0.25),
        median: percentile(&sorted, 0.5),
        q75: percentile(&sorted, 0.75),
        max: sorted[count - 1],
    })
}

/// Summarize one column of a row set.
pub fn column_stats<R: Record>(rows: &[R], column: &str) -> Option<SummaryStats> {
    let values: Vec<f64> = rows
        .iter()
        .filter_map(|row| row.field(column).and_then(|cell| cell.as_f64()))
        .collect();
    summarize(&values)
}

/// Linearly interpolated percentile over an ascending-sorted slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let index = (sorted.len() - 1) as f64 * p;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;
    let weight = index - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

// ============================================================
// TESTS
// ============================================================
