use serde::{Deserialize, Serialize};

use super::config::{LabelThresholds, MatchingConfig};
use super::rules::MatchSignals;

/// Human-readable band for a match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    #[serde(rename = "Great Match")]
    Great,
    #[serde(rename = "Good Match")]
    Good,
    #[serde(rename = "Fair Match")]
    Fair,
    #[serde(rename = "No Match")]
    NoMatch,
}

impl MatchStatus {
    pub fn from_value(value: f64, labels: &LabelThresholds) -> Self {
        if value >= labels.great {
            MatchStatus::Great
        } else if value >= labels.good {
            MatchStatus::Good
        } else if value >= labels.fair {
            MatchStatus::Fair
        } else {
            MatchStatus::NoMatch
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchStatus::Great => "Great Match",
            MatchStatus::Good => "Good Match",
            MatchStatus::Fair => "Fair Match",
            MatchStatus::NoMatch => "No Match",
        }
    }
}

/// Listing filter. A pair failing either check is left out of listings
/// entirely, whatever its score.
///
/// Inclusion is decided here and nowhere else. [`MatchStatus`] only labels the
/// score, so an eligible pair with a low score is listed as "No Match".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
    pub has_skill_overlap: bool,
    pub meets_points_threshold: bool,
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        self.has_skill_overlap && self.meets_points_threshold
    }
}

pub(crate) fn decide_eligibility(
    candidate_points: u32,
    config: &MatchingConfig,
    signals: &MatchSignals,
) -> Eligibility {
    Eligibility {
        has_skill_overlap: !signals.matched_skills.is_empty(),
        meets_points_threshold: candidate_points >= config.points_threshold,
    }
}
