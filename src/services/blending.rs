use crate::config::BlendingConfig;
use crate::models::{BlendWeights, HeadToHeadSummary, Reliability};
use crate::services::normalizer::RawEstimate;

/// Merges the form-based estimate with head-to-head rates, market by market.
#[derive(Debug, Clone)]
pub struct BlendingPolicy {
    config: BlendingConfig,
}

impl BlendingPolicy {
    pub fn new(config: BlendingConfig) -> Self {
        Self { config }
    }

    /// Whether history may influence the estimate at all.
    pub fn is_active(&self, h2h: &HeadToHeadSummary) -> bool {
        h2h.reliability != Reliability::None && h2h.matches >= self.config.min_records
    }

    pub fn weights(&self, h2h: &HeadToHeadSummary) -> BlendWeights {
        if !self.is_active(h2h) {
            return BlendWeights::default();
        }
        // 1X2 only trusts meetings that could be oriented to the fixture.
        let one_x_two = if h2h.oriented >= self.config.min_records {
            self.config.one_x_two.weight(h2h.oriented)
        } else {
            0.0
        };
        BlendWeights {
            one_x_two,
            goals: self.config.goals.weight(h2h.matches),
            btts: self.config.btts.weight(h2h.matches),
        }
    }

    /// Returns the blended estimate and the weights applied. With the gate
    /// closed the stats estimate comes back unchanged.
    pub fn blend(&self, stats: &RawEstimate, h2h: &HeadToHeadSummary) -> (RawEstimate, BlendWeights) {
        let weights = self.weights(h2h);
        if !self.is_active(h2h) {
            return (stats.clone(), weights);
        }

        let mut blended = stats.clone();

        if weights.one_x_two > 0.0 {
            blended.home = mix(stats.home, h2h.home_win_rate * 100.0, weights.one_x_two);
            blended.draw = mix(stats.draw, h2h.draw_rate * 100.0, weights.one_x_two);
            blended.away = mix(stats.away, h2h.away_win_rate * 100.0, weights.one_x_two);
        }

        blended.expected_goals = mix(stats.expected_goals, h2h.average_goals, weights.goals);
        for line in &mut blended.goals {
            if let Some(rate) = h2h.over_rate(line.threshold) {
                line.over = mix(line.over, rate * 100.0, weights.goals);
            }
        }

        blended.btts_yes = mix(stats.btts_yes, h2h.btts_rate * 100.0, weights.btts);

        tracing::debug!(
            "Blended {} H2H meetings (1X2 w={:.3}, goals w={:.3}, btts w={:.3})",
            h2h.matches,
            weights.one_x_two,
            weights.goals,
            weights.btts
        );

        (blended, weights)
    }
}

fn mix(stats_value: f64, h2h_value: f64, weight: f64) -> f64 {
    stats_value * (1.0 - weight) + h2h_value * weight
}
