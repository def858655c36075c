use crate::config::StrengthConfig;
use crate::models::{TeamSeasonStats, Venue};
use crate::utils::{points_share, safe_rate};

/// Converts a venue split of season form into a relative strength scalar.
///
/// The scalar is not a probability; it is only meaningful next to another
/// team's strength built the same way.
#[derive(Debug, Clone)]
pub struct StrengthModel {
    config: StrengthConfig,
}

impl StrengthModel {
    pub fn new(config: StrengthConfig) -> Self {
        Self { config }
    }

    pub fn strength(&self, stats: &TeamSeasonStats, venue: Venue) -> f64 {
        let split = stats.split(venue);
        let matches = split.effective_matches();
        if matches == 0 {
            return self.config.neutral;
        }

        let win_rate = safe_rate(split.wins, matches, 0.0);
        let goal_ratio =
            (f64::from(split.goals_for) + 1.0) / (f64::from(split.goals_against) + 1.0) - 1.0;
        let points = points_share(split.wins, split.draws, matches);

        self.config.win_rate_weight * win_rate
            + self.config.goal_ratio_weight * goal_ratio
            + self.config.points_weight * points
            + self.config.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SplitRecord;

    fn model() -> StrengthModel {
        StrengthModel::new(StrengthConfig::default())
    }

    #[test]
    fn test_empty_split_is_neutral() {
        let stats = TeamSeasonStats::default();
        assert_eq!(model().strength(&stats, Venue::Home), 0.4);
        assert_eq!(model().strength(&stats, Venue::Away), 0.4);
    }

    #[test]
    fn test_selects_requested_split() {
        let stats = TeamSeasonStats {
            home: SplitRecord::new(7, 2, 1, 20, 8),
            away: SplitRecord::new(2, 3, 5, 8, 18),
            ..Default::default()
        };
        let home = model().strength(&stats, Venue::Home);
        let away = model().strength(&stats, Venue::Away);

        // 0.4*0.7 + 0.25*(21/9 - 1) + 0.2*(23/30) + 0.15
        assert!((home - 0.916_666_666).abs() < 1e-6);
        assert!((away - 0.158_421).abs() < 1e-5);
        assert!(home > away);
    }

    #[test]
    fn test_stronger_record_gives_higher_strength() {
        let good = TeamSeasonStats {
            home: SplitRecord::new(8, 1, 1, 25, 6),
            ..Default::default()
        };
        let poor = TeamSeasonStats {
            home: SplitRecord::new(1, 2, 7, 6, 22),
            ..Default::default()
        };
        assert!(model().strength(&good, Venue::Home) > model().strength(&poor, Venue::Home));
    }
}
