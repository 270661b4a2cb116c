//! Streak segmentation: one left-to-right pass over a percent-change series.

use crate::dataset::ChangeSeries;
use crate::{Sign, Streak};

/// Split the series into maximal runs of same-signed daily changes.
///
/// A change of exactly zero counts as up. Each run compounds its daily
/// changes multiplicatively, so `percent` is the full-run move rather than
/// the sum of the daily values. Runs close strictly on a sign change; the
/// last one closes at the end of the input. An empty series yields no
/// streaks.
///
/// The emitted streaks partition the series: contiguous, non-overlapping,
/// with `days` summing to the series length. Indices are positions in the
/// change series; translate them to row space before any price lookup.
pub fn segment_streaks(series: &ChangeSeries) -> Vec<Streak> {
    let values = series.values();
    let dates = series.dates();
    let mut streaks = Vec::new();
    if values.is_empty() {
        return streaks;
    }

    let mut sign = Sign::from_change(values[0]);
    let mut days = 1usize;
    let mut factor = 1.0 + values[0] / 100.0;
    let mut start = 0usize;

    for (i, &change) in values.iter().enumerate().skip(1) {
        let next = Sign::from_change(change);
        if next == sign {
            days += 1;
            factor *= 1.0 + change / 100.0;
        } else {
            streaks.push(close_run(sign, days, factor, start, i - 1, dates));
            sign = next;
            days = 1;
            factor = 1.0 + change / 100.0;
            start = i;
        }
    }
    streaks.push(close_run(sign, days, factor, start, values.len() - 1, dates));

    streaks
}

/// Close the open run: the compound factor collapses back into a percent.
fn close_run(
    sign: Sign,
    days: usize,
    factor: f64,
    start: usize,
    end: usize,
    dates: &[String],
) -> Streak {
    let mut streak = Streak::new(sign, days, (factor - 1.0) * 100.0, start, end);
    if !dates.is_empty() {
        streak.dates = Some(dates[start..=end].to_vec());
    }
    streak
}

// ============================================================
// TESTS
// ============================================================
