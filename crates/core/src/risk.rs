//! Risk levels and the assessment value shared by the questionnaire and image flows.

use crate::constants::{
    HIGH_RISK_RECOMMENDATION, LOW_RISK_RECOMMENDATION, MEDIUM_RISK_RECOMMENDATION,
};
use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Screening risk level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Fixed recommendation text shown with this level.
    pub fn recommendation(self) -> &'static str {
        match self {
            RiskLevel::Low => LOW_RISK_RECOMMENDATION,
            RiskLevel::Medium => MEDIUM_RISK_RECOMMENDATION,
            RiskLevel::High => HIGH_RISK_RECOMMENDATION,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(CoreError::Validation(format!(
                "unknown risk level '{other}' (expected Low, Medium or High)"
            ))),
        }
    }
}

/// Which flow produced an assessment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssessmentSource {
    Questionnaire,
    ImageAnalysis,
}

/// Result of a screening. Created once per evaluation and never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub recommendation: &'static str,
    pub derived_from: AssessmentSource,
}

impl RiskAssessment {
    pub(crate) fn new(level: RiskLevel, derived_from: AssessmentSource) -> Self {
        Self {
            level,
            recommendation: level.recommendation(),
            derived_from,
        }
    }
}
