use crate::config::{EngineConfig, HeadToHeadConfig};
use crate::models::{
    BlendWeights, HeadToHeadRecord, HeadToHeadSummary, MatchOutcome, Reliability, GOAL_LINES,
};
use crate::services::poisson;

/// Keeps the `n` most recent meetings, newest first. Suppliers may hand
/// records over in any order.
pub fn most_recent(records: &[HeadToHeadRecord], n: usize) -> Vec<HeadToHeadRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(n);
    sorted
}

/// Aggregates prior meetings into rate statistics plus a reliability tier.
#[derive(Debug, Clone)]
pub struct HeadToHeadAnalyzer {
    config: HeadToHeadConfig,
    neutral: NeutralRates,
}

/// Rates reported when there is no history at all.
#[derive(Debug, Clone)]
struct NeutralRates {
    home: f64,
    draw: f64,
    away: f64,
    goals: f64,
    btts: f64,
}

impl HeadToHeadAnalyzer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            config: config.head_to_head.clone(),
            neutral: NeutralRates {
                home: config.outcome.baseline_home / 100.0,
                draw: config.outcome.baseline_draw / 100.0,
                away: config.outcome.baseline_away / 100.0,
                goals: config.expected_goals.default_total,
                btts: config.btts.default_yes / 100.0,
            },
        }
    }

    pub fn reliability(&self, matches: usize) -> Reliability {
        if matches >= self.config.high_min {
            Reliability::High
        } else if matches >= self.config.medium_min {
            Reliability::Medium
        } else if matches >= self.config.low_min {
            Reliability::Low
        } else {
            Reliability::None
        }
    }

    /// Summarizes `records` from the point of view of `fixture_home_team`.
    /// Only the most recent `max_records` meetings are considered.
    pub fn analyze(&self, records: &[HeadToHeadRecord], fixture_home_team: &str) -> HeadToHeadSummary {
        let recent = most_recent(records, self.config.max_records);
        let matches = recent.len();
        let reliability = self.reliability(matches);

        if matches == 0 {
            return self.neutral_summary();
        }

        let mut home_wins = 0;
        let mut draws = 0;
        let mut away_wins = 0;
        let mut goals = 0u64;
        let mut btts = 0usize;
        let mut overs = [0usize; GOAL_LINES.len()];

        for record in &recent {
            match record.outcome_for(fixture_home_team) {
                Some(MatchOutcome::HomeWin) => home_wins += 1,
                Some(MatchOutcome::Draw) => draws += 1,
                Some(MatchOutcome::AwayWin) => away_wins += 1,
                None => {}
            }
            goals += u64::from(record.total_goals());
            if record.both_teams_scored() {
                btts += 1;
            }
            for (count, line) in overs.iter_mut().zip(GOAL_LINES) {
                if record.is_over(line) {
                    *count += 1;
                }
            }
        }

        let oriented = home_wins + draws + away_wins;
        if oriented < matches {
            tracing::debug!(
                "{} of {} meetings do not involve '{}' by name, leaving them out of 1X2 rates",
                matches - oriented,
                matches,
                fixture_home_team
            );
        }
        let (home_win_rate, draw_rate, away_win_rate) = if oriented == 0 {
            (self.neutral.home, self.neutral.draw, self.neutral.away)
        } else {
            let oriented = oriented as f64;
            (
                home_wins as f64 / oriented,
                draws as f64 / oriented,
                away_wins as f64 / oriented,
            )
        };

        let total = matches as f64;
        HeadToHeadSummary {
            matches,
            oriented,
            home_wins,
            draws,
            away_wins,
            home_win_rate,
            draw_rate,
            away_win_rate,
            average_goals: goals as f64 / total,
            btts_rate: btts as f64 / total,
            over_rates: overs.iter().map(|&c| c as f64 / total).collect(),
            reliability,
            blended: false,
            weights: BlendWeights::default(),
        }
    }

    fn neutral_summary(&self) -> HeadToHeadSummary {
        let over_rates = GOAL_LINES
            .iter()
            .map(|&line| {
                poisson::over_probability(self.neutral.goals, line).unwrap_or(50.0) / 100.0
            })
            .collect();

        HeadToHeadSummary {
            matches: 0,
            oriented: 0,
            home_wins: 0,
            draws: 0,
            away_wins: 0,
            home_win_rate: self.neutral.home,
            draw_rate: self.neutral.draw,
            away_win_rate: self.neutral.away,
            average_goals: self.neutral.goals,
            btts_rate: self.neutral.btts,
            over_rates,
            reliability: Reliability::None,
            blended: false,
            weights: BlendWeights::default(),
        }
    }
}
