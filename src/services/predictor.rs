use crate::config::{ConfidenceConfig, EngineConfig, OutcomeConfig};
use crate::models::{
    FixtureRequest, HeadToHeadRecord, HeadToHeadSummary, MatchAnalysis, ProbabilityEstimate,
    Reliability, Suggestion, TeamSeasonStats, Venue, GOAL_LINES,
};
use crate::services::blending::BlendingPolicy;
use crate::services::expected_goals::{ExpectedGoals, ExpectedGoalsModel};
use crate::services::head_to_head::HeadToHeadAnalyzer;
use crate::services::normalizer::{OutcomeNormalizer, RawEstimate, RawGoalLine};
use crate::services::poisson;
use crate::services::strength::StrengthModel;
use crate::services::suggestions::SuggestionGenerator;

/// Probability estimation engine.
///
/// Holds only configuration, so one instance can serve any number of
/// concurrent callers. Every call is a pure function of its arguments.
#[derive(Debug, Clone)]
pub struct EstimationEngine {
    config: EngineConfig,
    strength: StrengthModel,
    expected_goals: ExpectedGoalsModel,
    head_to_head: HeadToHeadAnalyzer,
    blending: BlendingPolicy,
    normalizer: OutcomeNormalizer,
    suggestions: SuggestionGenerator,
}

impl Default for EstimationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl EstimationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            strength: StrengthModel::new(config.strength.clone()),
            expected_goals: ExpectedGoalsModel::new(config.expected_goals.clone()),
            head_to_head: HeadToHeadAnalyzer::new(&config),
            blending: BlendingPolicy::new(config.blending.clone()),
            normalizer: OutcomeNormalizer::new(&config),
            suggestions: SuggestionGenerator::new(config.suggestions.clone()),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Estimate match-outcome probabilities from season form and, when
    /// available, head-to-head history.
    pub fn estimate(
        &self,
        home: &TeamSeasonStats,
        away: &TeamSeasonStats,
        h2h: Option<&[HeadToHeadRecord]>,
    ) -> ProbabilityEstimate {
        self.estimate_with_history(home, away, h2h).0
    }

    pub fn suggest(&self, estimate: &ProbabilityEstimate) -> Vec<Suggestion> {
        self.suggestions.generate(estimate)
    }

    /// Full analysis for one fixture: estimate, head-to-head summary and picks.
    /// Absent team stats are treated as empty seasons.
    pub fn analyze(&self, request: &FixtureRequest) -> MatchAnalysis {
        let empty = TeamSeasonStats::default();
        let home = request.home.as_ref().unwrap_or(&empty);
        let away = request.away.as_ref().unwrap_or(&empty);

        let (estimate, head_to_head) =
            self.estimate_with_history(home, away, request.head_to_head.as_deref());
        let suggestions = self.suggest(&estimate);

        MatchAnalysis {
            home_team: display_name(&home.team, "Home"),
            away_team: display_name(&away.team, "Away"),
            estimate,
            head_to_head,
            suggestions,
        }
    }

    fn estimate_with_history(
        &self,
        home: &TeamSeasonStats,
        away: &TeamSeasonStats,
        h2h: Option<&[HeadToHeadRecord]>,
    ) -> (ProbabilityEstimate, HeadToHeadSummary) {
        let mut summary = self.head_to_head.analyze(h2h.unwrap_or_default(), &home.team);

        let stats = self.stats_estimate(home, away, summary.reliability);
        let (blended, weights) = self.blending.blend(&stats, &summary);
        summary.blended = self.blending.is_active(&summary);
        summary.weights = weights;

        let estimate = self.normalizer.normalize(&blended);

        tracing::debug!(
            "Estimate {} vs {}: 1X2 {}/{}/{}, xG {}, BTTS {}, confidence {} (H2H {:?}, {} meetings)",
            display_name(&home.team, "home"),
            display_name(&away.team, "away"),
            estimate.outcome.home,
            estimate.outcome.draw,
            estimate.outcome.away,
            estimate.expected_goals,
            estimate.btts.yes,
            estimate.confidence,
            summary.reliability,
            summary.matches
        );

        (estimate, summary)
    }

    /// Form-only estimate, before any head-to-head blending or rounding.
    fn stats_estimate(
        &self,
        home: &TeamSeasonStats,
        away: &TeamSeasonStats,
        reliability: Reliability,
    ) -> RawEstimate {
        for (venue, stats, split) in [("Home", home, &home.home), ("Away", away, &away.away)] {
            if split.is_overcounted() {
                tracing::warn!(
                    "{} split for {} reports {} matches but W/D/L sum higher, using the W/D/L total",
                    venue,
                    display_name(&stats.team, "unnamed team"),
                    split.matches_played
                );
            }
        }

        let home_strength = self.strength.strength(home, Venue::Home);
        let away_strength = self.strength.strength(away, Venue::Away);
        let (p_home, p_draw, p_away) = outcome_from_strengths(&self.config.outcome, home_strength, away_strength);

        let xg = self.expected_goals.expected_goals(home, away);
        let goals = GOAL_LINES
            .iter()
            .filter_map(|&threshold| {
                poisson::over_probability(xg.total, threshold)
                    .ok()
                    .map(|over| RawGoalLine { threshold, over })
            })
            .collect();

        let sample = home.home.effective_matches().min(away.away.effective_matches());
        let confidence = confidence_score(&self.config.confidence, sample, reliability, xg.fallback);

        tracing::debug!(
            "Strengths home={:.3} away={:.3}, xG home={:.2} away={:.2} total={:.2}{}",
            home_strength,
            away_strength,
            xg.home,
            xg.away,
            xg.total,
            if xg.fallback { " (default)" } else { "" }
        );

        RawEstimate {
            home: p_home,
            draw: p_draw,
            away: p_away,
            goals,
            expected_goals: xg.total,
            btts_yes: self.btts_yes(&xg),
            confidence,
            fallback: xg.fallback,
        }
    }

    fn btts_yes(&self, xg: &ExpectedGoals) -> f64 {
        if xg.fallback {
            return self.config.btts.default_yes;
        }
        poisson::scores_probability(xg.home) * poisson::scores_probability(xg.away) / 100.0
    }
}

/// Shifts the baseline 1X2 split by the strength difference. Equal strengths
/// return the baseline unchanged.
fn outcome_from_strengths(config: &OutcomeConfig, home_strength: f64, away_strength: f64) -> (f64, f64, f64) {
    let diff = home_strength - away_strength;
    let home = (config.baseline_home + config.swing * diff).max(config.floor);
    let away = (config.baseline_away - config.swing * diff).max(config.floor);
    let draw = (config.baseline_draw - config.draw_decay * diff.abs()).max(config.floor);
    (home, draw, away)
}

fn confidence_score(config: &ConfidenceConfig, sample: u32, reliability: Reliability, fallback: bool) -> f64 {
    let coverage = (f64::from(sample) / f64::from(config.full_sample.max(1))).min(1.0);
    let bonus = match reliability {
        Reliability::None => 0.0,
        Reliability::Low => config.bonus_low,
        Reliability::Medium => config.bonus_medium,
        Reliability::High => config.bonus_high,
    };
    let mut score = config.base + config.stats_weight * coverage + bonus;
    if fallback {
        score = score.min(config.fallback_cap);
    }
    score.clamp(0.0, 100.0)
}

fn display_name(name: &str, fallback: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        fallback.to_string()
    } else {
        name.to_string()
    }
}
