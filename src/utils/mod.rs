use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// `count / total`, or `fallback` when there is nothing to divide by.
pub fn safe_rate(count: u32, total: u32, fallback: f64) -> f64 {
    if total == 0 {
        return fallback;
    }
    f64::from(count) / f64::from(total)
}

/// Points earned as a share of the maximum available (3 per match), in [0, 1].
pub fn points_share(wins: u32, draws: u32, matches: u32) -> f64 {
    if matches == 0 {
        return 0.0;
    }
    let points = f64::from(wins) * 3.0 + f64::from(draws);
    (points / (f64::from(matches) * 3.0)).clamp(0.0, 1.0)
}

/// Normalize probabilities to sum to `target`. An all-zero input is returned untouched.
pub fn normalize_probabilities(probs: &[f64], target: f64) -> Vec<f64> {
    let sum: f64 = probs.iter().sum();
    if sum <= 0.0 || !sum.is_finite() {
        return probs.to_vec();
    }
    probs.iter().map(|p| p / sum * target).collect()
}

/// Replaces NaN/inf with `fallback` and clamps to `[lo, hi]`.
pub fn sanitize(value: f64, lo: f64, hi: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(lo, hi)
    } else {
        fallback
    }
}

/// Rounds half away from zero to exactly `dp` places, so `42` renders as
/// `42.0`. Non-finite input becomes zero.
pub fn to_fixed(value: f64, dp: u32) -> Decimal {
    let mut fixed = Decimal::from_f64(value)
        .unwrap_or_default()
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    fixed.rescale(dp);
    fixed
}
