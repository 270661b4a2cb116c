//! Longest-streak selection and index-space translation.
//!
//! Streaks are emitted in change-series positions while prices live in
//! original row positions. Translation happens here, exactly once per
//! streak, before any price lookup.

use crate::dataset::PriceSeries;
use crate::{Sign, Streak};

/// Longest streak of `sign`. Only a strictly longer run displaces the
/// current best, so the earlier streak wins ties; `percent` never
/// participates in the comparison.
pub fn longest_of(streaks: &[Streak], sign: Sign) -> Option<&Streak> {
    streaks
        .iter()
        .filter(|streak| streak.sign == sign)
        .fold(None, |best, streak| match best {
            Some(current) if streak.days <= current.days => Some(current),
            _ => Some(streak),
        })
}

/// Longest up-streak, or `None` when no up-streak exists.
pub fn longest_up(streaks: &[Streak]) -> Option<&Streak> {
    longest_of(streaks, Sign::Up)
}

/// Longest down-streak, or `None` when no down-streak exists.
pub fn longest_down(streaks: &[Streak]) -> Option<&Streak> {
    longest_of(streaks, Sign::Down)
}

/// Rewrite a streak's indices from change-series space to row space.
///
/// An index the map does not cover translates to itself, so an identity map
/// (nothing was filtered) leaves the streak unchanged.
pub fn to_row_space(streak: &Streak, index_map: &[usize]) -> Streak {
    let mut translated = streak.clone();
    translated.start_index = index_map
        .get(streak.start_index)
        .copied()
        .unwrap_or(streak.start_index);
    translated.end_index = index_map
        .get(streak.end_index)
        .copied()
        .unwrap_or(streak.end_index);
    translated
}

/// Fill the endpoint price summary of a row-space streak. Both endpoints
/// must parse, otherwise the fields stay `None`.
pub fn attach_prices(streak: &mut Streak, prices: &PriceSeries) {
    let (Some(start), Some(end)) = (
        prices.price_at(streak.start_index),
        prices.price_at(streak.end_index),
    ) else {
        return;
    };
    streak.start_price = Some(start);
    streak.end_price = Some(end);
    streak.price_change = Some(end - start);
    streak.price_change_percent = Some((end - start) / start * 100.0);
}

// ============================================================
// TESTS
// ============================================================
