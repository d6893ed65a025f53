use log::warn;
use serde::{Deserialize, Serialize};

use pgxguard_core::models::{Phenotype, RiskAssessment, RiskLabel, Severity};
use pgxguard_core::rules::{RiskRow, RuleSet};
use pgxguard_core::utils::round_to;

/// Confidence attached to a risk-table miss before any recomputation.
pub const NO_MATCH_PRIOR: f64 = 0.50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RiskLookup<'a> {
    Matched(&'a RiskRow),
    Missing,
}

impl<'a> RiskLookup<'a> {
    pub fn is_match(&self) -> bool {
        matches!(self, RiskLookup::Matched(_))
    }

    pub fn row(&self) -> Option<&'a RiskRow> {
        match self {
            RiskLookup::Matched(row) => Some(row),
            RiskLookup::Missing => None,
        }
    }

    /// Curated row confidence, or [NO_MATCH_PRIOR] on a miss.
    pub fn prior_confidence(&self) -> f64 {
        self.row()
            .map(|row| row.confidence_score)
            .unwrap_or(NO_MATCH_PRIOR)
    }

    pub fn risk_label(&self) -> RiskLabel {
        self.row().map(|row| row.risk_label).unwrap_or(RiskLabel::Unknown)
    }

    pub fn severity(&self) -> Severity {
        self.row().map(|row| row.severity).unwrap_or(Severity::Unknown)
    }

    /// The table verdict with its prior confidence, before scoring.
    pub fn prior_assessment(&self) -> RiskAssessment {
        RiskAssessment {
            risk_label: self.risk_label(),
            severity: self.severity(),
            confidence_score: self.prior_confidence(),
        }
    }
}

/// Exact lookup of (normalized drug, gene, phenotype) in the risk table.
pub fn lookup_risk<'a>(
    rules: &'a RuleSet,
    drug: &str,
    gene: &str,
    phenotype: Phenotype,
) -> RiskLookup<'a> {
    let drug = rules.normalize_drug(drug);
    match rules.risk_row(&drug, gene, phenotype) {
        Some(row) => RiskLookup::Matched(row),
        None => {
            warn!(
                "No risk data for ({drug}, {gene}, {}), returning Unknown",
                phenotype.abbreviation()
            );
            RiskLookup::Missing
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub highest_risk: RiskLabel,
    pub highest_severity: Severity,
    pub average_confidence: f64,
    pub count: usize,
}

///
/// Summarize several assessments: the most severe one (first wins on ties)
/// and the mean confidence.
///
pub fn aggregate_risk_assessments(assessments: &[RiskAssessment]) -> RiskSummary {
    let Some(first) = assessments.first() else {
        return RiskSummary {
            highest_risk: RiskLabel::Unknown,
            highest_severity: Severity::Unknown,
            average_confidence: 0.0,
            count: 0,
        };
    };

    let worst = assessments.iter().fold(first, |worst, a| {
        if a.severity.rank() > worst.severity.rank() {
            a
        } else {
            worst
        }
    });
    let mean = assessments.iter().map(|a| a.confidence_score).sum::<f64>() / assessments.len() as f64;

    RiskSummary {
        highest_risk: worst.risk_label,
        highest_severity: worst.severity,
        average_confidence: round_to(mean, 2),
        count: assessments.len(),
    }
}
