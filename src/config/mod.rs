//! Engine configuration.
//!
//! Every coefficient the estimation engine uses lives here as a named field.
//! Defaults reproduce the stock model; a JSON file can override any subset of
//! them and is validated once before the engine is built.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::error::ConfigError;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV_VAR: &str = "ODDSFORGE_ENGINE_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub strength: StrengthConfig,
    pub expected_goals: ExpectedGoalsConfig,
    pub outcome: OutcomeConfig,
    pub btts: BttsConfig,
    pub head_to_head: HeadToHeadConfig,
    pub blending: BlendingConfig,
    pub confidence: ConfidenceConfig,
    pub suggestions: SuggestionConfig,
}

/// Weights of the season-form strength scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrengthConfig {
    pub win_rate_weight: f64,
    pub goal_ratio_weight: f64,
    pub points_weight: f64,
    pub base: f64,
    /// Strength reported for a split with no matches.
    pub neutral: f64,
}

impl Default for StrengthConfig {
    fn default() -> Self {
        Self {
            win_rate_weight: 0.40,
            goal_ratio_weight: 0.25,
            points_weight: 0.20,
            base: 0.15,
            neutral: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpectedGoalsConfig {
    pub default_total: f64,
    pub min_total: f64,
    pub max_total: f64,
}

impl Default for ExpectedGoalsConfig {
    fn default() -> Self {
        Self {
            default_total: 2.5,
            min_total: 1.0,
            max_total: 5.0,
        }
    }
}

/// Maps a strength difference onto 1X2 percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutcomeConfig {
    pub baseline_home: f64,
    pub baseline_draw: f64,
    pub baseline_away: f64,
    /// Percentage points moved between home and away per unit of strength difference.
    pub swing: f64,
    /// Percentage points of draw removed per unit of absolute strength difference.
    pub draw_decay: f64,
    pub floor: f64,
}

impl Default for OutcomeConfig {
    fn default() -> Self {
        Self {
            baseline_home: 42.0,
            baseline_draw: 28.0,
            baseline_away: 30.0,
            swing: 25.0,
            draw_decay: 8.0,
            floor: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BttsConfig {
    pub default_yes: f64,
}

impl Default for BttsConfig {
    fn default() -> Self {
        Self { default_yes: 58.0 }
    }
}

/// Record window and reliability tier bounds for head-to-head history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadToHeadConfig {
    pub max_records: usize,
    pub low_min: usize,
    pub medium_min: usize,
    pub high_min: usize,
}

impl Default for HeadToHeadConfig {
    fn default() -> Self {
        Self {
            max_records: 10,
            low_min: 1,
            medium_min: 5,
            high_min: 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendRule {
    pub cap: f64,
    pub divisor: f64,
}

impl BlendRule {
    pub const fn new(cap: f64, divisor: f64) -> Self {
        Self { cap, divisor }
    }

    /// Weight given to head-to-head data for `records` meetings.
    pub fn weight(&self, records: usize) -> f64 {
        if self.divisor <= 0.0 {
            return 0.0;
        }
        (records as f64 / self.divisor).min(self.cap)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendingConfig {
    pub min_records: usize,
    pub one_x_two: BlendRule,
    pub goals: BlendRule,
    pub btts: BlendRule,
}

impl Default for BlendingConfig {
    fn default() -> Self {
        Self {
            min_records: 5,
            one_x_two: BlendRule::new(0.40, 25.0),
            goals: BlendRule::new(0.60, 15.0),
            btts: BlendRule::new(0.50, 20.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    pub base: f64,
    pub stats_weight: f64,
    /// Matches in a split at which the season sample counts as complete.
    pub full_sample: u32,
    pub bonus_low: f64,
    pub bonus_medium: f64,
    pub bonus_high: f64,
    /// Ceiling applied when expected goals had to fall back to the default.
    pub fallback_cap: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            base: 15.0,
            stats_weight: 60.0,
            full_sample: 10,
            bonus_low: 5.0,
            bonus_medium: 15.0,
            bonus_high: 25.0,
            fallback_cap: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuggestionRule {
    /// Probability (percent) a pick must strictly exceed.
    pub threshold: f64,
    pub base_confidence: f64,
    pub cap_confidence: f64,
}

impl SuggestionRule {
    pub const fn new(threshold: f64, base_confidence: f64, cap_confidence: f64) -> Self {
        Self {
            threshold,
            base_confidence,
            cap_confidence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    pub one_x_two: SuggestionRule,
    pub goals: SuggestionRule,
    pub btts: SuggestionRule,
    pub balanced_confidence: f64,
    pub max_suggestions: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            one_x_two: SuggestionRule::new(50.0, 10.0, 90.0),
            goals: SuggestionRule::new(60.0, 5.0, 85.0),
            btts: SuggestionRule::new(65.0, 5.0, 85.0),
            balanced_confidence: 40.0,
            max_suggestions: 5,
        }
    }
}

impl EngineConfig {
    /// Loads the config named by `ODDSFORGE_ENGINE_CONFIG`, or defaults when unset.
    pub fn load() -> Result<Self, ConfigError> {
        match env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim()),
            _ => {
                tracing::debug!("{} not set, using default engine config", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
        }
    }

    /// An explicit path wins over the environment.
    pub fn load_with_override(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: shown.clone(),
            source,
        })?;
        let config = Self::from_json(&raw).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: shown.clone(),
                source,
            },
            other => other,
        })?;
        tracing::info!("Loaded engine config from {}", shown);
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
            path: "<inline>".to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.strength;
        non_negative("strength.win_rate_weight", s.win_rate_weight)?;
        non_negative("strength.goal_ratio_weight", s.goal_ratio_weight)?;
        non_negative("strength.points_weight", s.points_weight)?;
        finite("strength.base", s.base)?;
        positive("strength.neutral", s.neutral)?;

        let xg = &self.expected_goals;
        positive("expected_goals.min_total", xg.min_total)?;
        positive("expected_goals.default_total", xg.default_total)?;
        if xg.max_total < xg.min_total {
            return Err(invalid(
                "expected_goals.max_total",
                format!("{} is below min_total {}", xg.max_total, xg.min_total),
            ));
        }

        let o = &self.outcome;
        percent("outcome.baseline_home", o.baseline_home)?;
        percent("outcome.baseline_draw", o.baseline_draw)?;
        percent("outcome.baseline_away", o.baseline_away)?;
        let baseline = o.baseline_home + o.baseline_draw + o.baseline_away;
        if (baseline - 100.0).abs() > 1e-6 {
            return Err(invalid("outcome.baseline_*", format!("baseline sums to {baseline}, expected 100")));
        }
        non_negative("outcome.swing", o.swing)?;
        non_negative("outcome.draw_decay", o.draw_decay)?;
        positive("outcome.floor", o.floor)?;

        percent("btts.default_yes", self.btts.default_yes)?;

        let h = &self.head_to_head;
        if h.max_records == 0 {
            return Err(invalid("head_to_head.max_records", "must be at least 1".to_string()));
        }
        if !(h.low_min >= 1 && h.low_min <= h.medium_min && h.medium_min <= h.high_min) {
            return Err(invalid(
                "head_to_head tiers",
                format!("expected 1 <= low ({}) <= medium ({}) <= high ({})", h.low_min, h.medium_min, h.high_min),
            ));
        }

        for (field, rule) in [
            ("blending.one_x_two", &self.blending.one_x_two),
            ("blending.goals", &self.blending.goals),
            ("blending.btts", &self.blending.btts),
        ] {
            if !(rule.cap.is_finite() && (0.0..=1.0).contains(&rule.cap)) {
                return Err(invalid(field, format!("cap {} outside [0, 1]", rule.cap)));
            }
            positive(field, rule.divisor)?;
        }

        let c = &self.confidence;
        percent("confidence.base", c.base)?;
        non_negative("confidence.stats_weight", c.stats_weight)?;
        if c.full_sample == 0 {
            return Err(invalid("confidence.full_sample", "must be at least 1".to_string()));
        }
        percent("confidence.fallback_cap", c.fallback_cap)?;

        let sg = &self.suggestions;
        for (field, rule) in [
            ("suggestions.one_x_two", &sg.one_x_two),
            ("suggestions.goals", &sg.goals),
            ("suggestions.btts", &sg.btts),
        ] {
            percent(field, rule.threshold)?;
            non_negative(field, rule.base_confidence)?;
            percent(field, rule.cap_confidence)?;
        }
        percent("suggestions.balanced_confidence", sg.balanced_confidence)?;
        if sg.max_suggestions == 0 {
            return Err(invalid("suggestions.max_suggestions", "must be at least 1".to_string()));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} is not finite")))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(invalid(field, format!("{value} is negative")));
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(invalid(field, format!("{value} must be greater than zero")));
    }
    Ok(())
}

fn percent(field: &'static str, value: f64) -> Result<(), ConfigError> {
    non_negative(field, value)?;
    if value > 100.0 {
        return Err(invalid(field, format!("{value} exceeds 100")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{ "blending": { "min_records": 3 } }"#).unwrap();
        assert_eq!(config.blending.min_records, 3);
        assert_eq!(config.blending.goals, BlendRule::new(0.60, 15.0));
        assert_eq!(config.strength, StrengthConfig::default());
    }

    #[test]
    fn test_rejects_baseline_not_summing_to_100() {
        let err = EngineConfig::from_json(r#"{ "outcome": { "baseline_home": 50.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "outcome.baseline_*", .. }));
    }

    #[test]
    fn test_rejects_blend_cap_above_one() {
        let raw = r#"{ "blending": { "btts": { "cap": 1.5, "divisor": 20.0 } } }"#;
        let err = EngineConfig::from_json(raw).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "blending.btts", .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = EngineConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_from_file_loads_and_reports_path() {
        let path = std::env::temp_dir().join(format!("oddsforge-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "suggestions": { "max_suggestions": 2 } }"#).unwrap();
        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.suggestions.max_suggestions, 2);

        std::fs::write(&path, "{ broken").unwrap();
        let err = EngineConfig::from_file(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        match err {
            ConfigError::Parse { path: shown, .. } => assert!(shown.ends_with(".json")),
            other => panic!("expected parse error, got {other:?}"),
        }

        let missing = EngineConfig::from_file(&path).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }

    #[test]
    fn test_blend_rule_weight_caps() {
        let rule = BlendRule::new(0.40, 25.0);
        assert_eq!(rule.weight(0), 0.0);
        assert!((rule.weight(5) - 0.2).abs() < 1e-12);
        assert_eq!(rule.weight(100), 0.40);
    }
}
