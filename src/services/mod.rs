pub mod blending;
pub mod expected_goals;
pub mod head_to_head;
pub mod normalizer;
pub mod poisson;
pub mod predictor;
pub mod strength;
pub mod suggestions;

pub use blending::BlendingPolicy;
pub use expected_goals::{ExpectedGoals, ExpectedGoalsModel};
pub use head_to_head::{most_recent, HeadToHeadAnalyzer};
pub use normalizer::{OutcomeNormalizer, RawEstimate, RawGoalLine};
pub use predictor::EstimationEngine;
pub use strength::StrengthModel;
pub use suggestions::SuggestionGenerator;
