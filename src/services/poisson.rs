//! Over/Under probabilities from a Poisson goal model.
//!
//! Only `Over` is ever computed; `Under` is always `100 - Over`.

use crate::error::EngineError;

/// Rate substituted when the caller passes a non-positive λ.
pub const DEFAULT_LAMBDA: f64 = 2.5;

/// Checks `threshold` is a non-negative half-integer (0.5, 1.5, ...).
pub fn validate_threshold(threshold: f64) -> Result<(), EngineError> {
    if !threshold.is_finite() || threshold < 0.0 || (threshold - threshold.floor() - 0.5).abs() > 1e-9 {
        return Err(EngineError::InvalidThreshold(threshold));
    }
    Ok(())
}

/// P(X <= k) for X ~ Poisson(λ), summed term by term. Past the mode the
/// sum stops once the remaining terms can no longer change it.
pub fn cumulative(lambda: f64, k: u32) -> f64 {
    let lambda = effective_lambda(lambda);
    let mut term = (-lambda).exp();
    let mut sum = term;
    for i in 1..=k {
        // λ^i e^-λ / i! from the previous term
        term *= lambda / f64::from(i);
        sum += term;
        if f64::from(i) > lambda && term <= f64::EPSILON * sum {
            break;
        }
    }
    sum.min(1.0)
}

/// Percentage chance the match total exceeds `threshold`.
pub fn over_probability(lambda: f64, threshold: f64) -> Result<f64, EngineError> {
    validate_threshold(threshold)?;
    let k = threshold.floor() as u32;
    let over = (1.0 - cumulative(lambda, k)) * 100.0;
    Ok(over.clamp(0.0, 100.0))
}

/// Percentage chance a side with scoring rate `lambda` scores at least once.
pub fn scores_probability(lambda: f64) -> f64 {
    if !lambda.is_finite() || lambda <= 0.0 {
        return 0.0;
    }
    (1.0 - (-lambda).exp()) * 100.0
}

fn effective_lambda(lambda: f64) -> f64 {
    if lambda.is_finite() && lambda > 0.0 {
        lambda
    } else {
        DEFAULT_LAMBDA
    }
}
