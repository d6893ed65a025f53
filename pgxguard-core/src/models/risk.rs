use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLabel {
    Safe,
    #[serde(rename = "Adjust Dosage")]
    AdjustDosage,
    Toxic,
    Ineffective,
    Unknown,
}

impl RiskLabel {
    pub const ALL: [RiskLabel; 5] = [
        RiskLabel::Safe,
        RiskLabel::AdjustDosage,
        RiskLabel::Toxic,
        RiskLabel::Ineffective,
        RiskLabel::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::Safe => "Safe",
            RiskLabel::AdjustDosage => "Adjust Dosage",
            RiskLabel::Toxic => "Toxic",
            RiskLabel::Ineffective => "Ineffective",
            RiskLabel::Unknown => "Unknown",
        }
    }
}

impl Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Low,
    Moderate,
    High,
    Critical,
    Unknown,
}

impl Severity {
    /// Rank used when picking the worst assessment. Unknown ranks lowest.
    pub fn rank(&self) -> i8 {
        match self {
            Severity::Unknown => -1,
            Severity::None => 0,
            Severity::Low => 1,
            Severity::Moderate => 2,
            Severity::High => 3,
            Severity::Critical => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::High => "high",
            Severity::Critical => "critical",
            Severity::Unknown => "unknown",
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_label: RiskLabel,
    pub severity: Severity,
    pub confidence_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.85 {
            ConfidenceLevel::High
        } else if score >= 0.70 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

/// FDA labeling status for a gene-drug pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FdaRequirement {
    Required,
    Recommended,
    Informative,
    #[default]
    None,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_label_serde_names() {
        let json = serde_json::to_string(&RiskLabel::AdjustDosage).unwrap();
        assert_eq!(json, "\"Adjust Dosage\"");
        let sev: Severity = serde_json::from_str("\"critical\"").unwrap();
        assert_eq!(sev, Severity::Critical);
    }

    #[rstest]
    fn test_severity_rank_order() {
        assert!(Severity::Critical.rank() > Severity::High.rank());
        assert!(Severity::None.rank() > Severity::Unknown.rank());
    }

    #[rstest]
    #[case(0.95, ConfidenceLevel::High)]
    #[case(0.85, ConfidenceLevel::High)]
    #[case(0.78, ConfidenceLevel::Medium)]
    #[case(0.57, ConfidenceLevel::Low)]
    fn test_confidence_level(#[case] score: f64, #[case] expected: ConfidenceLevel) {
        assert_eq!(ConfidenceLevel::from_score(score), expected);
    }
}
