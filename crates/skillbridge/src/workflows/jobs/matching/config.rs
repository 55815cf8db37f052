use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

/// Relative weight of each factor in the final score. Must sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchWeights {
    pub skills: f64,
    pub points: f64,
    pub certificates: f64,
}

impl MatchWeights {
    pub fn sum(&self) -> f64 {
        self.skills + self.points + self.certificates
    }
}

pub const DEFAULT_WEIGHTS: MatchWeights = MatchWeights {
    skills: 0.60,
    points: 0.25,
    certificates: 0.15,
};

/// Lower bounds of each label band on the 0–100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelThresholds {
    pub great: f64,
    pub good: f64,
    pub fair: f64,
}

/// Scoring rubric for job/candidate pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub weights: MatchWeights,
    /// Points at which the points factor saturates.
    pub points_saturation: u32,
    /// Certificates at which the certificate factor saturates.
    pub certificate_saturation: u32,
    /// Minimum points for a candidate to be listed at all.
    pub points_threshold: u32,
    pub labels: LabelThresholds,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            weights: DEFAULT_WEIGHTS,
            points_saturation: 500,
            certificate_saturation: 5,
            points_threshold: 50,
            labels: LabelThresholds {
                great: 85.0,
                good: 65.0,
                fair: 40.0,
            },
        }
    }
}

impl From<&EngineConfig> for MatchingConfig {
    fn from(config: &EngineConfig) -> Self {
        Self {
            points_threshold: config.match_points_threshold,
            ..Self::default()
        }
    }
}
