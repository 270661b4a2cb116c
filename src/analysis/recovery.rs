//! Recovery timing: how long after a streak the close crosses back over the
//! streak's starting level.
//!
//! Two searches share the crossing rule (an up-streak recovers at the first
//! close at or below its start, a down-streak at or above) but differ in how
//! the rebound percent is anchored. [`recovery_after`] tolerates a missing
//! end price and reports a `None` percent; the batch first-recovery search
//! requires a positive end price before it reports anything at all. They are
//! deliberately kept as two independent scans.

use crate::dataset::PriceSeries;
use crate::{FirstRecovery, Recovery, Sign, Streak};

/// True when `price` has crossed back over the streak's starting level.
#[inline]
fn crossed(sign: Sign, price: f64, start_price: f64) -> bool {
    match sign {
        Sign::Up => price <= start_price,
        Sign::Down => price >= start_price,
    }
}

/// Date label at `index`; empty labels count as absent.
#[inline]
fn label_at(dates: &[String], index: usize) -> Option<String> {
    dates.get(index).filter(|label| !label.is_empty()).cloned()
}

/// Recovery search for one row-space streak.
///
/// Requires a parseable price at the streak's start, otherwise everything is
/// `None`. The endpoint summary fields are filled when both endpoints parse.
/// The scan walks forward from the day after the streak ends, skipping
/// sentinel entries; when it exhausts the series the result keeps the price
/// summary but reports `recovered: false`.
pub fn recovery_after(prices: &PriceSeries, streak: &Streak, dates: &[String]) -> Recovery {
    let Some(start_price) = prices.price_at(streak.start_index) else {
        return Recovery::none();
    };

    let end_price = prices.price_at(streak.end_index);
    let price_change = end_price.map(|end| end - start_price);
    let price_change_percent = price_change.map(|change| change / start_price * 100.0);

    let summary = Recovery {
        recovered: false,
        recovery_days: None,
        recovery_date: None,
        recovery_price: None,
        recovery_percent: None,
        start_price: Some(start_price),
        end_price,
        price_change,
        price_change_percent,
    };

    for i in streak.end_index + 1..prices.len() {
        let Some(price) = prices.price_at(i) else {
            continue;
        };
        if !crossed(streak.sign, price, start_price) {
            continue;
        }
        // Rebound is measured from the streak's end, when that price is
        // usable as a denominator.
        let recovery_percent = end_price
            .filter(|&end| end > 0.0)
            .map(|end| (price - end) / end * 100.0);
        return Recovery {
            recovered: true,
            recovery_days: Some(i - streak.end_index),
            recovery_date: label_at(dates, i),
            recovery_price: Some(price),
            recovery_percent,
            ..summary
        };
    }

    summary
}

/// Outcome of the per-streak first-recovery scan.
#[derive(Debug, Clone)]
struct FirstCrossing {
    days: usize,
    percent: f64,
    date: Option<String>,
    price: f64,
}

/// First-recovery scan for one row-space streak.
///
/// Stricter than [`recovery_after`]: both endpoint prices must parse and the
/// end price must be positive (it anchors the rebound percent), otherwise
/// there is no result at all. When a crossing is found the percent is always
/// present.
fn first_crossing(prices: &PriceSeries, streak: &Streak, dates: &[String]) -> Option<FirstCrossing> {
    let start_price = prices.price_at(streak.start_index)?;
    let end_price = prices.price_at(streak.end_index).filter(|&end| end > 0.0)?;

    for i in streak.end_index + 1..prices.len() {
        let Some(price) = prices.price_at(i) else {
            continue;
        };
        if crossed(streak.sign, price, start_price) {
            return Some(FirstCrossing {
                days: i - streak.end_index,
                percent: (price - end_price) / end_price * 100.0,
                date: label_at(dates, i),
                price,
            });
        }
    }
    None
}

/// First-recovery statistics for every streak, in emission order.
///
/// Streaks must already be in row space. A streak that never recovered (or
/// whose endpoint prices are unusable) carries `None` recovery fields; its
/// endpoint summary is still filled when both prices parse.
pub fn first_recoveries(
    streaks: &[Streak],
    prices: &PriceSeries,
    dates: &[String],
) -> Vec<FirstRecovery> {
    streaks
        .iter()
        .map(|streak| {
            let crossing = first_crossing(prices, streak, dates);

            let start_date = streak
                .dates
                .as_ref()
                .and_then(|run| run.first().cloned())
                .or_else(|| label_at(dates, streak.start_index))
                .unwrap_or_default();
            let end_date = streak
                .dates
                .as_ref()
                .and_then(|run| run.last().cloned())
                .or_else(|| label_at(dates, streak.end_index))
                .unwrap_or_default();

            let start_price = prices.price_at(streak.start_index);
            let end_price = prices.price_at(streak.end_index);
            let price_change = match (start_price, end_price) {
                (Some(start), Some(end)) => Some(end - start),
                _ => None,
            };
            let price_change_percent = match (start_price, price_change) {
                (Some(start), Some(change)) => Some(change / start * 100.0),
                _ => None,
            };

            FirstRecovery {
                streak_sign: streak.sign,
                streak_days: streak.days,
                streak_percent: streak.percent,
                first_recovery_days: crossing.as_ref().map(|c| c.days),
                first_recovery_percent: crossing.as_ref().map(|c| c.percent),
                start_date,
                end_date,
                recovery_date: crossing.as_ref().and_then(|c| c.date.clone()),
                start_price,
                end_price,
                price_change,
                price_change_percent,
                recovery_price: crossing.map(|c| c.price),
            }
        })
        .collect()
}

/// The streak that took longest to recover, earlier streak winning ties.
///
/// Streaks that never recovered are excluded; `None` when nothing recovered.
pub fn longest_first_recovery(stats: &[FirstRecovery]) -> Option<&FirstRecovery> {
    stats
        .iter()
        .filter(|entry| entry.first_recovery_days.is_some())
        .fold(None, |best, entry| match best {
            Some(current) if entry.first_recovery_days <= current.first_recovery_days => {
                Some(current)
            }
            _ => Some(entry),
        })
}

// ============================================================
// TESTS
// ============================================================
