use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Goal lines every estimate publishes Over/Under pairs for.
pub const GOAL_LINES: [f64; 4] = [0.5, 1.5, 2.5, 3.5];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Venue {
    Home,
    Away,
}

/// Results and goals for one slice of a season (overall, home or away games).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitRecord {
    pub matches_played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl SplitRecord {
    pub fn new(wins: u32, draws: u32, losses: u32, goals_for: u32, goals_against: u32) -> Self {
        Self {
            matches_played: wins.saturating_add(draws).saturating_add(losses),
            wins,
            draws,
            losses,
            goals_for,
            goals_against,
        }
    }

    /// Match count used for rates. Suppliers occasionally report W+D+L above
    /// `matches_played`; the larger figure keeps every rate within [0, 1].
    pub fn effective_matches(&self) -> u32 {
        self.matches_played.max(self.decided())
    }

    /// W+D+L exceeds the reported `matches_played`.
    pub fn is_overcounted(&self) -> bool {
        self.decided() > self.matches_played
    }

    fn decided(&self) -> u32 {
        self.wins.saturating_add(self.draws).saturating_add(self.losses)
    }

    pub fn is_empty(&self) -> bool {
        self.effective_matches() == 0
    }

    pub fn points(&self) -> u32 {
        self.wins.saturating_mul(3).saturating_add(self.draws)
    }
}

/// Per-team, per-competition season snapshot supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamSeasonStats {
    pub team: String,
    pub competition: String,
    pub season: String,
    pub overall: SplitRecord,
    pub home: SplitRecord,
    pub away: SplitRecord,
}

impl TeamSeasonStats {
    pub fn split(&self, venue: Venue) -> &SplitRecord {
        match venue {
            Venue::Home => &self.home,
            Venue::Away => &self.away,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    HomeWin,
    Draw,
    AwayWin,
}

impl MatchOutcome {
    pub fn mirrored(self) -> Self {
        match self {
            MatchOutcome::HomeWin => MatchOutcome::AwayWin,
            MatchOutcome::Draw => MatchOutcome::Draw,
            MatchOutcome::AwayWin => MatchOutcome::HomeWin,
        }
    }
}

/// One historical meeting between the two sides of a fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadToHeadRecord {
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u32,
    pub away_goals: u32,
}

impl HeadToHeadRecord {
    pub fn total_goals(&self) -> u32 {
        self.home_goals.saturating_add(self.away_goals)
    }

    /// Result from the point of view of the side that hosted this meeting.
    pub fn outcome(&self) -> MatchOutcome {
        match self.home_goals.cmp(&self.away_goals) {
            std::cmp::Ordering::Greater => MatchOutcome::HomeWin,
            std::cmp::Ordering::Equal => MatchOutcome::Draw,
            std::cmp::Ordering::Less => MatchOutcome::AwayWin,
        }
    }

    /// Result from the point of view of the fixture's home team, which may
    /// have been the visitor in this meeting. `None` when that team cannot be
    /// matched to exactly one side of the record.
    pub fn outcome_for(&self, fixture_home_team: &str) -> Option<MatchOutcome> {
        match (
            same_team(&self.home_team, fixture_home_team),
            same_team(&self.away_team, fixture_home_team),
        ) {
            (true, false) => Some(self.outcome()),
            (false, true) => Some(self.outcome().mirrored()),
            _ => None,
        }
    }

    pub fn both_teams_scored(&self) -> bool {
        self.home_goals > 0 && self.away_goals > 0
    }

    pub fn is_over(&self, threshold: f64) -> bool {
        f64::from(self.total_goals()) > threshold
    }
}

fn same_team(a: &str, b: &str) -> bool {
    let a = a.trim();
    let b = b.trim();
    !a.is_empty() && a.eq_ignore_ascii_case(b)
}

/// Sample-size bucket for head-to-head history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reliability {
    None,
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Market {
    #[serde(rename = "1X2")]
    OneXTwo,
    #[serde(rename = "Goals")]
    Goals,
    #[serde(rename = "BTTS")]
    Btts,
}

impl std::fmt::Display for Market {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Market::OneXTwo => "1X2",
            Market::Goals => "Goals",
            Market::Btts => "BTTS",
        };
        f.write_str(tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeDistribution {
    pub home: Decimal,
    pub draw: Decimal,
    pub away: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalsDistribution {
    pub threshold: f64,
    pub over: Decimal,
    pub under: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BttsDistribution {
    pub yes: Decimal,
    pub no: Decimal,
}

/// Published, display-stable estimate. All percentages carry one decimal place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityEstimate {
    pub outcome: OutcomeDistribution,
    pub goals: Vec<GoalsDistribution>,
    pub expected_goals: Decimal,
    pub btts: BttsDistribution,
    pub confidence: Decimal,
}

impl ProbabilityEstimate {
    pub fn goals_line(&self, threshold: f64) -> Option<&GoalsDistribution> {
        self.goals
            .iter()
            .find(|line| (line.threshold - threshold).abs() < 1e-9)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub market: Market,
    pub claim: String,
    pub confidence: Decimal,
    pub probability: Decimal,
}

/// Head-to-head weight actually applied to each market (0 when excluded).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BlendWeights {
    pub one_x_two: f64,
    pub goals: f64,
    pub btts: f64,
}

/// Aggregated view of head-to-head history, oriented to the fixture's home team.
/// Rates are fractions in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadToHeadSummary {
    pub matches: usize,
    /// Meetings whose home/away orientation to the fixture was resolved by
    /// team name. Only these feed the 1X2 counts and rates.
    #[serde(default)]
    pub oriented: usize,
    pub home_wins: usize,
    pub draws: usize,
    pub away_wins: usize,
    pub home_win_rate: f64,
    pub draw_rate: f64,
    pub away_win_rate: f64,
    pub average_goals: f64,
    pub btts_rate: f64,
    /// Over rate for each entry of [`GOAL_LINES`], same order.
    pub over_rates: Vec<f64>,
    pub reliability: Reliability,
    pub blended: bool,
    pub weights: BlendWeights,
}

impl HeadToHeadSummary {
    pub fn over_rate(&self, threshold: f64) -> Option<f64> {
        GOAL_LINES
            .iter()
            .position(|line| (line - threshold).abs() < 1e-9)
            .and_then(|i| self.over_rates.get(i).copied())
    }
}

/// Everything the caller supplies for one fixture. Any part may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureRequest {
    pub home: Option<TeamSeasonStats>,
    pub away: Option<TeamSeasonStats>,
    pub head_to_head: Option<Vec<HeadToHeadRecord>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchAnalysis {
    pub home_team: String,
    pub away_team: String,
    pub estimate: ProbabilityEstimate,
    pub head_to_head: HeadToHeadSummary,
    pub suggestions: Vec<Suggestion>,
}

// API Response types
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meeting(home: &str, away: &str, hg: u32, ag: u32) -> HeadToHeadRecord {
        HeadToHeadRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            home_team: home.to_string(),
            away_team: away.to_string(),
            home_goals: hg,
            away_goals: ag,
        }
    }

    #[test]
    fn test_outcome_is_mirrored_when_fixture_home_team_visited() {
        let record = meeting("Leeds", "York", 2, 0);
        assert_eq!(record.outcome_for("Leeds"), Some(MatchOutcome::HomeWin));
        assert_eq!(record.outcome_for("york "), Some(MatchOutcome::AwayWin));
    }

    #[test]
    fn test_outcome_unknown_when_fixture_home_team_unmatched() {
        let record = meeting("Leeds", "York", 2, 0);
        assert_eq!(record.outcome_for("Unknown"), None);
        assert_eq!(record.outcome_for(""), None);
        assert_eq!(meeting("Leeds", "leeds", 1, 0).outcome_for("Leeds"), None);
    }

    #[test]
    fn test_total_goals_saturates() {
        let record = meeting("A", "B", u32::MAX, 1);
        assert_eq!(record.total_goals(), u32::MAX);
        assert!(record.is_over(3.5));
        assert_eq!(SplitRecord::new(u32::MAX, 1, 1, 0, 0).matches_played, u32::MAX);
    }

    #[test]
    fn test_derived_flags() {
        let record = meeting("A", "B", 1, 2);
        assert!(record.both_teams_scored());
        assert!(record.is_over(2.5));
        assert!(!record.is_over(3.5));
        assert!(!meeting("A", "B", 0, 0).is_over(0.5));
    }

    #[test]
    fn test_effective_matches_uses_decided_games() {
        let split = SplitRecord {
            matches_played: 3,
            wins: 2,
            draws: 1,
            losses: 2,
            goals_for: 4,
            goals_against: 4,
        };
        assert_eq!(split.effective_matches(), 5);
        assert!(split.is_overcounted());
        assert!(!SplitRecord::new(2, 1, 0, 3, 1).is_overcounted());
        assert!(SplitRecord::default().is_empty());
    }

    #[test]
    fn test_market_tags_serialize() {
        assert_eq!(serde_json::to_string(&Market::OneXTwo).unwrap(), "\"1X2\"");
        assert_eq!(serde_json::to_string(&Market::Btts).unwrap(), "\"BTTS\"");
        assert_eq!(Market::Goals.to_string(), "Goals");
    }
}
