//! # streakscan
//!
//! Streak segmentation, recovery timing and summary statistics for daily
//! price series.
//!
//! A *streak* is a maximal run of same-signed daily percent changes. The
//! analyzer splits a change series into streaks, picks the longest up- and
//! down-streak, and measures how many trading days the close needed to cross
//! back over each streak's starting level, both for the two longest streaks
//! and for every streak (the "first recovery", used to find the slowest
//! rebound). Descriptive statistics for any numeric column round out the
//! crate.
//!
//! File parsing and display stay outside: rows reach the analyzer through
//! the [`dataset::Record`] trait, and every result is a plain serializable
//! structure.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::HashMap;
//! use streakscan::prelude::*;
//!
//! // Rows are anything implementing `Record`; a HashMap works out of the box.
//! let columns: Vec<String> = ["Date", "Open", "Close"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//! let rows: Vec<HashMap<String, Cell>> = vec![
//!     [
//!         ("Date".to_string(), Cell::from("2024-01-02")),
//!         ("Open".to_string(), Cell::from(100.0)),
//!         ("Close".to_string(), Cell::from(101.0)),
//!     ]
//!     .into_iter()
//!     .collect(),
//! ];
//!
//! let data = MarketData::from_records(&rows, &columns).expect("open/close present");
//! let analysis = data.analyze();
//! assert_eq!(analysis.streaks.len(), 1);
//! assert_eq!(analysis.streaks[0].sign, Sign::Up);
//! ```

pub mod analysis;
pub mod dataset;

pub mod prelude {
    pub use crate::{
        // Algorithms
        analysis::{
            attach_prices, column_stats, first_recoveries, longest_down, longest_first_recovery,
            longest_up, recovery_after, segment_streaks, summarize, to_row_space, SummaryStats,
        },
        // Pipeline
        analyze,
        analyze_parallel,
        // Dataset seam
        dataset::{
            date_column, date_labels, derive_pct_change, find_column, is_numeric_column,
            numeric_columns, Cell, ChangeSeries, MarketData, PriceSeries, Record,
        },
        // Types
        FirstRecovery,
        Recovery,
        RecoveryPair,
        Result,
        Sign,
        Streak,
        StreakAnalysis,
        // Errors
        StreakError,
        SymbolAnalysis,
    };
}

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, StreakError>;

/// Contract violations at the validated-input boundary.
///
/// Expected data problems (unparseable cells, an empty series, a streak
/// pointing past the price series) are never errors; they surface as `None`
/// fields or empty collections in the results.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreakError {
    #[error("non-finite change value at index {index}")]
    NonFiniteChange { index: usize },

    #[error("{field}: expected length {expected}, got {got}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("index map not strictly increasing at position {position}")]
    UnsortedIndexMap { position: usize },
}

// ============================================================
// SIGN
// ============================================================

/// Direction of a daily change or a streak. Zero counts as up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Up,
    Down,
}

impl Sign {
    /// Classify one daily change: `>= 0` is up.
    #[inline]
    pub fn from_change(change: f64) -> Self {
        if change >= 0.0 {
            Sign::Up
        } else {
            Sign::Down
        }
    }

    #[inline]
    pub fn is_up(self) -> bool {
        matches!(self, Sign::Up)
    }

    #[inline]
    pub fn is_down(self) -> bool {
        matches!(self, Sign::Down)
    }
}

// ============================================================
// RESULT TYPES
// ============================================================

/// A maximal run of same-signed daily changes.
///
/// Indices are positions in the change series when emitted by the segmenter,
/// and row positions once translated through the series' index map. The
/// price fields are only filled after translation, since prices live in row
/// space.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Streak {
    pub sign: Sign,
    /// Trading days in the run (at least 1).
    pub days: usize,
    /// Multiplicatively compounded percent change over the run.
    pub percent: f64,
    pub start_index: usize,
    pub end_index: usize,
    /// Date labels spanning the run, when the source had a date column.
    pub dates: Option<Vec<String>>,
    pub start_price: Option<f64>,
    pub end_price: Option<f64>,
    pub price_change: Option<f64>,
    pub price_change_percent: Option<f64>,
}

impl Streak {
    pub fn new(sign: Sign, days: usize, percent: f64, start_index: usize, end_index: usize) -> Self {
        Self {
            sign,
            days,
            percent,
            start_index,
            end_index,
            dates: None,
            start_price: None,
            end_price: None,
            price_change: None,
            price_change_percent: None,
        }
    }
}

/// Recovery timing for one streak: the first day after the run where the
/// close crossed back over the run's starting level.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Recovery {
    pub recovered: bool,
    /// Trading days from the streak's end to the first crossing.
    pub recovery_days: Option<usize>,
    pub recovery_date: Option<String>,
    pub recovery_price: Option<f64>,
    /// Rebound percent relative to the streak's end price.
    pub recovery_percent: Option<f64>,
    pub start_price: Option<f64>,
    pub end_price: Option<f64>,
    pub price_change: Option<f64>,
    pub price_change_percent: Option<f64>,
}

impl Recovery {
    /// The "insufficient data" result: nothing recovered, nothing known.
    pub fn none() -> Self {
        Self {
            recovered: false,
            recovery_days: None,
            recovery_date: None,
            recovery_price: None,
            recovery_percent: None,
            start_price: None,
            end_price: None,
            price_change: None,
            price_change_percent: None,
        }
    }
}

/// First-recovery statistics for one streak.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FirstRecovery {
    pub streak_sign: Sign,
    pub streak_days: usize,
    pub streak_percent: f64,
    pub first_recovery_days: Option<usize>,
    pub first_recovery_percent: Option<f64>,
    /// Label of the streak's first day; empty when the source had no dates.
    pub start_date: String,
    pub end_date: String,
    pub recovery_date: Option<String>,
    pub start_price: Option<f64>,
    pub end_price: Option<f64>,
    pub price_change: Option<f64>,
    pub price_change_percent: Option<f64>,
    pub recovery_price: Option<f64>,
}

/// Recovery results for the longest up- and down-streak.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RecoveryPair {
    pub up: Recovery,
    pub down: Recovery,
}

/// Complete analysis of one change series.
///
/// Plain data with no behavior; recomputed wholesale whenever the source
/// dataset changes.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StreakAnalysis {
    /// Every streak in emission order, indices in row space.
    pub streaks: Vec<Streak>,
    pub max_up: Option<Streak>,
    pub max_down: Option<Streak>,
    pub recovery: RecoveryPair,
    pub longest_first_recovery: Option<FirstRecovery>,
}

// ============================================================
// ANALYSIS PIPELINE
// ============================================================

use dataset::{ChangeSeries, MarketData, PriceSeries};

/// Run the full streak analysis for one instrument.
///
/// `row_dates` carries one date label per original row and may be empty.
/// Streak indices in the result are in row space: every streak is translated
/// through the series' index map exactly once, before any price lookup. An
/// empty series yields an analysis with no streaks and all-`None` results.
pub fn analyze(series: &ChangeSeries, prices: &PriceSeries, row_dates: &[String]) -> StreakAnalysis {
    let segmented = analysis::segment_streaks(series);
    let streaks: Vec<Streak> = segmented
        .iter()
        .map(|streak| analysis::to_row_space(streak, series.index_map()))
        .collect();

    let max_up = analysis::longest_up(&streaks).cloned().map(|mut streak| {
        analysis::attach_prices(&mut streak, prices);
        streak
    });
    let max_down = analysis::longest_down(&streaks).cloned().map(|mut streak| {
        analysis::attach_prices(&mut streak, prices);
        streak
    });

    let up = max_up
        .as_ref()
        .map(|streak| analysis::recovery_after(prices, streak, row_dates))
        .unwrap_or_else(Recovery::none);
    let down = max_down
        .as_ref()
        .map(|streak| analysis::recovery_after(prices, streak, row_dates))
        .unwrap_or_else(Recovery::none);

    let first = analysis::first_recoveries(&streaks, prices, row_dates);
    let longest_first_recovery = analysis::longest_first_recovery(&first).cloned();

    StreakAnalysis {
        streaks,
        max_up,
        max_down,
        recovery: RecoveryPair { up, down },
        longest_first_recovery,
    }
}

// ============================================================
// PARALLEL ANALYSIS
// ============================================================

use rayon::prelude::*;

/// Analysis of one instrument in a multi-symbol batch.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SymbolAnalysis {
    pub symbol: String,
    pub analysis: StreakAnalysis,
}

/// Analyze many instruments in parallel.
///
/// Each analysis is independent pure work over its own input, so this is a
/// plain fan-out; results come back in input order.
pub fn analyze_parallel<'a, I>(instruments: I) -> Vec<SymbolAnalysis>
where
    I: IntoParallelIterator<Item = (&'a str, &'a MarketData)>,
{
    instruments
        .into_par_iter()
        .map(|(symbol, data)| SymbolAnalysis {
            symbol: symbol.to_string(),
            analysis: data.analyze(),
        })
        .collect()
}

// ============================================================
// TESTS
// ============================================================
