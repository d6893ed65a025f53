use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use pgxguard_core::models::{RiskLabel, Severity};

use crate::analysis::{AnalysisBatch, DrugAnalysis};

/// The slice of a drug analysis that cohort statistics need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortEntry {
    pub patient_id: String,
    pub drug: String,
    pub risk_label: RiskLabel,
    pub severity: Severity,
}

impl From<&DrugAnalysis> for CohortEntry {
    fn from(analysis: &DrugAnalysis) -> Self {
        CohortEntry {
            patient_id: analysis.patient_id.clone(),
            drug: analysis.drug.clone(),
            risk_label: analysis.risk_assessment.risk_label,
            severity: analysis.risk_assessment.severity,
        }
    }
}

pub fn cohort_entries(batches: &[AnalysisBatch]) -> Vec<CohortEntry> {
    batches
        .iter()
        .flat_map(|batch| batch.results.iter().map(CohortEntry::from))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortSummary {
    pub cohort_size: usize,
    pub risk_matrix: BTreeMap<String, BTreeMap<RiskLabel, usize>>,
    pub high_risk_patients: Vec<String>,
    pub high_risk_count: usize,
    pub alert: String,
}

fn empty_row() -> BTreeMap<RiskLabel, usize> {
    RiskLabel::ALL.iter().map(|label| (*label, 0)).collect()
}

///
/// Risk-label counts per drug and the patients with any high or critical
/// result. `cohort_size` counts entries, not distinct patients.
///
pub fn summarize_cohort(entries: &[CohortEntry]) -> CohortSummary {
    let mut risk_matrix: BTreeMap<String, BTreeMap<RiskLabel, usize>> = BTreeMap::new();
    let mut high_risk: BTreeSet<&str> = BTreeSet::new();

    for entry in entries {
        *risk_matrix
            .entry(entry.drug.clone())
            .or_insert_with(empty_row)
            .entry(entry.risk_label)
            .or_default() += 1;
        if matches!(entry.severity, Severity::High | Severity::Critical) {
            high_risk.insert(entry.patient_id.as_str());
        }
    }

    let high_risk_patients: Vec<String> = high_risk.into_iter().map(str::to_string).collect();
    let high_risk_count = high_risk_patients.len();

    CohortSummary {
        cohort_size: entries.len(),
        risk_matrix,
        high_risk_patients,
        high_risk_count,
        alert: format!("{high_risk_count} patients require immediate clinical review"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn entry(patient: &str, drug: &str, risk_label: RiskLabel, severity: Severity) -> CohortEntry {
        CohortEntry {
            patient_id: patient.to_string(),
            drug: drug.to_string(),
            risk_label,
            severity,
        }
    }

    #[rstest]
    fn test_summarize_cohort() {
        let summary = summarize_cohort(&[
            entry("P2", "CODEINE", RiskLabel::Toxic, Severity::Critical),
            entry("P1", "CODEINE", RiskLabel::Safe, Severity::None),
            entry("P2", "WARFARIN", RiskLabel::Toxic, Severity::High),
            entry("P3", "CLOPIDOGREL", RiskLabel::Ineffective, Severity::High),
        ]);

        assert_eq!(summary.cohort_size, 4);
        assert_eq!(summary.high_risk_patients, vec!["P2", "P3"]);
        assert_eq!(summary.high_risk_count, 2);
        assert_eq!(summary.alert, "2 patients require immediate clinical review");

        let codeine = &summary.risk_matrix["CODEINE"];
        assert_eq!(codeine.len(), 5);
        assert_eq!(codeine[&RiskLabel::Toxic], 1);
        assert_eq!(codeine[&RiskLabel::Safe], 1);
        assert_eq!(codeine[&RiskLabel::Unknown], 0);
    }

    #[rstest]
    fn test_matrix_serializes_label_names() {
        let summary = summarize_cohort(&[entry("P1", "CODEINE", RiskLabel::AdjustDosage, Severity::Moderate)]);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["risk_matrix"]["CODEINE"]["Adjust Dosage"], 1);
        assert_eq!(json["high_risk_count"], 0);
    }
}
