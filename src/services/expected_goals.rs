use serde::{Deserialize, Serialize};

use crate::config::ExpectedGoalsConfig;
use crate::models::TeamSeasonStats;
use crate::utils::safe_rate;

/// Goal expectation for one fixture. `home` and `away` are scaled so they
/// always add up to the clamped `total`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectedGoals {
    pub home: f64,
    pub away: f64,
    pub total: f64,
    /// True when the default total was used because a split had no matches.
    pub fallback: bool,
}

#[derive(Debug, Clone)]
pub struct ExpectedGoalsModel {
    config: ExpectedGoalsConfig,
}

impl ExpectedGoalsModel {
    pub fn new(config: ExpectedGoalsConfig) -> Self {
        Self { config }
    }

    /// Combines the home side's home split with the away side's away split.
    pub fn expected_goals(&self, home: &TeamSeasonStats, away: &TeamSeasonStats) -> ExpectedGoals {
        let home_split = &home.home;
        let away_split = &away.away;
        let home_matches = home_split.effective_matches();
        let away_matches = away_split.effective_matches();

        if home_matches == 0 || away_matches == 0 {
            return self.fallback();
        }

        let home_attack = safe_rate(home_split.goals_for, home_matches, 0.0);
        let home_defense = safe_rate(home_split.goals_against, home_matches, 0.0);
        let away_attack = safe_rate(away_split.goals_for, away_matches, 0.0);
        let away_defense = safe_rate(away_split.goals_against, away_matches, 0.0);

        let home_expected = (home_attack + away_defense) / 2.0;
        let away_expected = (away_attack + home_defense) / 2.0;
        let raw_total = home_expected + away_expected;
        if raw_total <= 0.0 || !raw_total.is_finite() {
            // Two goalless records; the ratio split below would be undefined.
            return self.even_split(self.config.min_total, false);
        }

        let total = raw_total.clamp(self.config.min_total, self.config.max_total);
        let scale = total / raw_total;
        ExpectedGoals {
            home: home_expected * scale,
            away: away_expected * scale,
            total,
            fallback: false,
        }
    }

    pub fn fallback(&self) -> ExpectedGoals {
        self.even_split(self.config.default_total, true)
    }

    fn even_split(&self, total: f64, fallback: bool) -> ExpectedGoals {
        ExpectedGoals {
            home: total / 2.0,
            away: total / 2.0,
            total,
            fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SplitRecord;

    fn model() -> ExpectedGoalsModel {
        ExpectedGoalsModel::new(ExpectedGoalsConfig::default())
    }

    fn team(home: SplitRecord, away: SplitRecord) -> TeamSeasonStats {
        TeamSeasonStats {
            home,
            away,
            ..Default::default()
        }
    }

    #[test]
    fn test_combines_attack_and_defense_rates() {
        let home = team(SplitRecord::new(7, 2, 1, 20, 8), SplitRecord::default());
        let away = team(SplitRecord::default(), SplitRecord::new(2, 3, 5, 8, 18));
        let xg = model().expected_goals(&home, &away);

        assert!(!xg.fallback);
        assert!((xg.home - 1.9).abs() < 1e-9);
        assert!((xg.away - 0.8).abs() < 1e-9);
        assert!((xg.total - 2.7).abs() < 1e-9);
    }

    #[test]
    fn test_missing_split_falls_back() {
        let home = team(SplitRecord::new(7, 2, 1, 20, 8), SplitRecord::default());
        let xg = model().expected_goals(&home, &TeamSeasonStats::default());
        assert!(xg.fallback);
        assert_eq!(xg.total, 2.5);
        assert_eq!(xg.home, 1.25);
    }

    #[test]
    fn test_total_is_clamped_and_split_rescaled() {
        let home = team(SplitRecord::new(10, 0, 0, 60, 10), SplitRecord::default());
        let away = team(SplitRecord::default(), SplitRecord::new(0, 0, 10, 10, 60));
        let xg = model().expected_goals(&home, &away);

        assert_eq!(xg.total, 5.0);
        assert!((xg.home + xg.away - 5.0).abs() < 1e-9);
        assert!(xg.home > xg.away);
    }

    #[test]
    fn test_goalless_records_use_minimum_total() {
        let home = team(SplitRecord::new(0, 5, 0, 0, 0), SplitRecord::default());
        let away = team(SplitRecord::default(), SplitRecord::new(0, 5, 0, 0, 0));
        let xg = model().expected_goals(&home, &away);
        assert!(!xg.fallback);
        assert_eq!(xg.total, 1.0);
    }
}
