use rust_decimal::Decimal;

use crate::config::{SuggestionConfig, SuggestionRule};
use crate::models::{Market, ProbabilityEstimate, Suggestion};
use crate::utils::to_fixed;

/// Goal line the Goals market suggestion is read from.
const SUGGESTION_GOAL_LINE: f64 = 2.5;

/// Turns a normalized estimate into ranked, threshold-gated picks.
#[derive(Debug, Clone)]
pub struct SuggestionGenerator {
    config: SuggestionConfig,
}

impl SuggestionGenerator {
    pub fn new(config: SuggestionConfig) -> Self {
        Self { config }
    }

    /// At most one pick per market, highest confidence first. Never empty:
    /// when nothing clears its threshold a single balanced-match note is returned.
    pub fn generate(&self, estimate: &ProbabilityEstimate) -> Vec<Suggestion> {
        let mut suggestions: Vec<Suggestion> = [
            self.one_x_two(estimate),
            self.goals(estimate),
            self.btts(estimate),
        ]
        .into_iter()
        .flatten()
        .collect();

        if suggestions.is_empty() {
            suggestions.push(self.balanced(estimate));
        }

        // Stable, so ties keep 1X2 / Goals / BTTS order.
        suggestions.sort_by(|a, b| b.confidence.cmp(&a.confidence));
        suggestions.truncate(self.config.max_suggestions.max(1));
        suggestions
    }

    fn one_x_two(&self, estimate: &ProbabilityEstimate) -> Option<Suggestion> {
        let rule = &self.config.one_x_two;
        let outcome = &estimate.outcome;
        pick(rule, Market::OneXTwo, outcome.home, "Home win")
            .or_else(|| pick(rule, Market::OneXTwo, outcome.away, "Away win"))
    }

    fn goals(&self, estimate: &ProbabilityEstimate) -> Option<Suggestion> {
        let rule = &self.config.goals;
        let line = estimate.goals_line(SUGGESTION_GOAL_LINE)?;
        pick(rule, Market::Goals, line.over, "Over 2.5 goals")
            .or_else(|| pick(rule, Market::Goals, line.under, "Under 2.5 goals"))
    }

    fn btts(&self, estimate: &ProbabilityEstimate) -> Option<Suggestion> {
        let rule = &self.config.btts;
        pick(rule, Market::Btts, estimate.btts.yes, "Both teams to score")
            .or_else(|| pick(rule, Market::Btts, estimate.btts.no, "Both teams not to score"))
    }

    fn balanced(&self, estimate: &ProbabilityEstimate) -> Suggestion {
        let outcome = &estimate.outcome;
        let favourite = outcome.home.max(outcome.draw).max(outcome.away);
        Suggestion {
            market: Market::OneXTwo,
            claim: "Balanced match, no clear edge".to_string(),
            confidence: to_fixed(self.config.balanced_confidence, 1),
            probability: favourite,
        }
    }
}

fn pick(rule: &SuggestionRule, market: Market, probability: Decimal, claim: &str) -> Option<Suggestion> {
    if probability <= to_fixed(rule.threshold, 1) {
        return None;
    }
    let confidence = (to_fixed(rule.base_confidence, 1) + probability).min(to_fixed(rule.cap_confidence, 1));
    Some(Suggestion {
        market,
        claim: claim.to_string(),
        confidence,
        probability,
    })
}
