//! The single place market values are made consistent and rounded.
//!
//! Upstream components work on unrounded `f64` percentages. Here the 1X2
//! triple is rescaled to 100, every Under and BTTS No is derived as an exact
//! complement, and values are fixed to one decimal place. Nothing downstream
//! recomputes a complement.

use rust_decimal::Decimal;

use crate::config::EngineConfig;
use crate::models::{BttsDistribution, GoalsDistribution, OutcomeDistribution, ProbabilityEstimate};
use crate::utils::{normalize_probabilities, sanitize, to_fixed};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, PartialEq)]
pub struct RawGoalLine {
    pub threshold: f64,
    pub over: f64,
}

/// Unrounded market values in percent (expected goals in goals).
#[derive(Debug, Clone, PartialEq)]
pub struct RawEstimate {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
    pub goals: Vec<RawGoalLine>,
    pub expected_goals: f64,
    pub btts_yes: f64,
    pub confidence: f64,
    /// Set when the season stats could not produce a measured goal expectation.
    pub fallback: bool,
}

#[derive(Debug, Clone)]
pub struct OutcomeNormalizer {
    baseline: [f64; 3],
    default_expected_goals: f64,
    default_btts: f64,
}

impl OutcomeNormalizer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            baseline: [
                config.outcome.baseline_home,
                config.outcome.baseline_draw,
                config.outcome.baseline_away,
            ],
            default_expected_goals: config.expected_goals.default_total,
            default_btts: config.btts.default_yes,
        }
    }

    pub fn normalize(&self, raw: &RawEstimate) -> ProbabilityEstimate {
        let outcome = self.normalize_outcome(raw.home, raw.draw, raw.away);
        let goals = normalize_goal_lines(&raw.goals);

        let yes = to_fixed(sanitize(raw.btts_yes, 0.0, 100.0, self.default_btts), 1);
        let btts = BttsDistribution { yes, no: HUNDRED - yes };

        let expected_goals = to_fixed(
            sanitize(raw.expected_goals, 0.0, 20.0, self.default_expected_goals),
            2,
        );
        let confidence = to_fixed(sanitize(raw.confidence, 0.0, 100.0, 0.0), 1);

        ProbabilityEstimate {
            outcome,
            goals,
            expected_goals,
            btts,
            confidence,
        }
    }

    fn normalize_outcome(&self, home: f64, draw: f64, away: f64) -> OutcomeDistribution {
        let mut triple = [home, draw, away].map(|v| sanitize(v, 0.0, f64::MAX, 0.0));
        if triple.iter().sum::<f64>() <= 0.0 {
            triple = self.baseline;
        }

        let scaled = normalize_probabilities(&triple, 100.0);
        let mut rounded: Vec<Decimal> = scaled.iter().map(|&v| to_fixed(v, 1)).collect();

        // Rounding can leave ±0.1 behind; the largest side absorbs it.
        let residue = HUNDRED - rounded.iter().copied().sum::<Decimal>();
        if !residue.is_zero() {
            let mut largest = 0;
            for i in 1..rounded.len() {
                if rounded[i] > rounded[largest] {
                    largest = i;
                }
            }
            rounded[largest] += residue;
        }

        OutcomeDistribution {
            home: rounded[0],
            draw: rounded[1],
            away: rounded[2],
        }
    }
}

/// Orders lines by threshold, keeps Over non-increasing, derives Under.
fn normalize_goal_lines(lines: &[RawGoalLine]) -> Vec<GoalsDistribution> {
    let mut sorted = lines.to_vec();
    sorted.sort_by(|a, b| a.threshold.total_cmp(&b.threshold));

    let mut ceiling = 100.0_f64;
    sorted
        .iter()
        .map(|line| {
            let over = sanitize(line.over, 0.0, 100.0, 50.0).min(ceiling);
            ceiling = over;
            let over = to_fixed(over, 1);
            GoalsDistribution {
                threshold: line.threshold,
                over,
                under: HUNDRED - over,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn normalizer() -> OutcomeNormalizer {
        OutcomeNormalizer::new(&EngineConfig::default())
    }

    fn raw(home: f64, draw: f64, away: f64) -> RawEstimate {
        RawEstimate {
            home,
            draw,
            away,
            goals: vec![
                RawGoalLine { threshold: 2.5, over: 54.44 },
                RawGoalLine { threshold: 0.5, over: 93.28 },
                RawGoalLine { threshold: 1.5, over: 75.06 },
                RawGoalLine { threshold: 3.5, over: 33.26 },
            ],
            expected_goals: 2.7,
            btts_yes: 46.77,
            confidence: 72.0,
            fallback: false,
        }
    }

    #[test]
    fn test_outcome_rescaled_to_exactly_100() {
        let estimate = normalizer().normalize(&raw(61.0, 21.9, 11.1));
        let o = &estimate.outcome;
        assert_eq!(o.home + o.draw + o.away, dec!(100.0));
        assert!(o.home > o.draw && o.draw > o.away);
    }

    #[test]
    fn test_rounding_residue_goes_to_largest_side() {
        // Thirds round to 33.3 each; the missing 0.1 lands on the first largest.
        let estimate = normalizer().normalize(&raw(1.0, 1.0, 1.0));
        assert_eq!(estimate.outcome.home, dec!(33.4));
        assert_eq!(estimate.outcome.draw, dec!(33.3));
        assert_eq!(estimate.outcome.away, dec!(33.3));
    }

    #[test]
    fn test_degenerate_outcome_uses_baseline() {
        let estimate = normalizer().normalize(&raw(0.0, f64::NAN, -4.0));
        assert_eq!(estimate.outcome.home, dec!(42.0));
        assert_eq!(estimate.outcome.draw, dec!(28.0));
        assert_eq!(estimate.outcome.away, dec!(30.0));
    }

    #[test]
    fn test_goal_lines_sorted_with_exact_complements() {
        let estimate = normalizer().normalize(&raw(50.0, 25.0, 25.0));
        let thresholds: Vec<f64> = estimate.goals.iter().map(|g| g.threshold).collect();
        assert_eq!(thresholds, vec![0.5, 1.5, 2.5, 3.5]);
        for line in &estimate.goals {
            assert_eq!(line.over + line.under, dec!(100.0));
        }
        assert_eq!(estimate.goals_line(2.5).unwrap().over, dec!(54.4));
    }

    #[test]
    fn test_goal_lines_forced_monotone() {
        let mut input = raw(50.0, 25.0, 25.0);
        input.goals = vec![
            RawGoalLine { threshold: 1.5, over: 40.0 },
            RawGoalLine { threshold: 2.5, over: 45.0 },
        ];
        let estimate = normalizer().normalize(&input);
        assert!(estimate.goals[0].over >= estimate.goals[1].over);
        assert_eq!(estimate.goals[1].over, dec!(40.0));
    }

    #[test]
    fn test_btts_and_confidence() {
        let estimate = normalizer().normalize(&raw(50.0, 25.0, 25.0));
        assert_eq!(estimate.btts.yes, dec!(46.8));
        assert_eq!(estimate.btts.no, dec!(53.2));
        assert_eq!(estimate.expected_goals, dec!(2.70));
        assert_eq!(estimate.confidence, dec!(72.0));
    }
}
