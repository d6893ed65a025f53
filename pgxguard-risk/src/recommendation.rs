use serde::{Deserialize, Serialize};

use pgxguard_core::models::{FdaRequirement, Severity};
use pgxguard_core::rules::RuleSet;

use crate::phenoconversion::PhenoconversionResult;
use crate::risk::RiskLookup;

/// Evidence level used when a gene-drug pair has a reference without one.
pub const REFERENCED_EVIDENCE_LEVEL: &str = "1A";
/// Evidence level used when a gene-drug pair has no reference at all.
pub const UNREFERENCED_EVIDENCE_LEVEL: &str = "4";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalRecommendation {
    pub cpic_guideline: String,
    pub action: String,
    pub alternative_drugs: Vec<String>,
    pub monitoring: String,
    pub evidence_level: String,
    pub fda_requirement: FdaRequirement,
    pub reference: Option<String>,
}

pub fn evidence_level(rules: &RuleSet, gene: &str, drug: &str) -> String {
    match rules.reference(gene, drug) {
        Some(reference) => reference
            .evidence_level
            .clone()
            .unwrap_or_else(|| REFERENCED_EVIDENCE_LEVEL.to_string()),
        None => UNREFERENCED_EVIDENCE_LEVEL.to_string(),
    }
}

pub fn monitoring_guidance(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => {
            "Do NOT initiate therapy. Consult clinical pharmacist or pharmacogenomics specialist."
        }
        Severity::High => {
            "Intensive monitoring required. Check labs frequently. Watch for adverse events."
        }
        Severity::Moderate => {
            "Monitor patient response. Adjust dose as needed based on clinical outcome."
        }
        Severity::Unknown => {
            "Insufficient curated evidence for this combination. Use standard monitoring and seek specialist pharmacogenomic review."
        }
        _ => "Standard monitoring per drug label.",
    }
}

pub fn no_rule_action(gene: &str, drug: &str, phenotype: &str) -> String {
    format!(
        "No curated pharmacogenomic rule found for {gene} + {drug} + {phenotype}. \
         Classify as Unknown and consult CPIC/PharmGKB or a pharmacogenomics specialist."
    )
}

/// Alert sentence for a detected phenoconversion, `None` otherwise.
pub fn phenoconversion_override(result: &PhenoconversionResult) -> Option<String> {
    if !result.phenoconversion_risk {
        return None;
    }
    let meds = result
        .caused_by
        .iter()
        .map(|m| format!("{} ({})", m.drug, m.strength))
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!(
        "Phenoconversion alert: genetic phenotype {} but functional phenotype {} due to co-medication with {}. \
         Base therapy decisions on the functional phenotype.",
        result.genetic_phenotype.abbreviation(),
        result.functional_phenotype.abbreviation(),
        meds
    ))
}

///
/// Assemble the recommendation for a canonical drug, its gene and the
/// effective phenotype name.
///
/// When `phenoconversion` flags a risk, the override sentence is appended to
/// both the action and the monitoring text.
///
pub fn build_recommendation(
    rules: &RuleSet,
    drug: &str,
    gene: &str,
    phenotype: &str,
    lookup: &RiskLookup,
    phenoconversion: Option<&PhenoconversionResult>,
) -> ClinicalRecommendation {
    let reference = rules.reference(gene, drug);

    let cpic_guideline = reference
        .map(|r| r.guideline.clone())
        .unwrap_or_else(|| format!("No curated CPIC guideline mapping for {drug} and {gene}"));
    let fda_requirement = match reference {
        Some(r) => r.fda_requirement.unwrap_or(FdaRequirement::Recommended),
        None => FdaRequirement::None,
    };

    let mut action = match lookup.row() {
        Some(row) if !row.action.trim().is_empty() => row.action.clone(),
        Some(_) => "Consult clinical guidelines.".to_string(),
        None => no_rule_action(gene, drug, phenotype),
    };
    let alternative_drugs = lookup
        .row()
        .map(|row| row.alternatives.clone())
        .unwrap_or_default();
    let mut monitoring = monitoring_guidance(lookup.severity()).to_string();

    if let Some(alert) = phenoconversion.and_then(phenoconversion_override) {
        action = format!("{action} {alert}");
        monitoring = format!("{monitoring} {alert}");
    }

    ClinicalRecommendation {
        cpic_guideline,
        action,
        alternative_drugs,
        monitoring,
        evidence_level: evidence_level(rules, gene, drug),
        fda_requirement,
        reference: reference.map(|r| r.citation()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phenoconversion::detect_phenoconversion;
    use crate::risk::lookup_risk;
    use pgxguard_core::models::Phenotype;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::path::Path;

    #[fixture]
    fn rules() -> RuleSet {
        RuleSet::try_from(Path::new("../tests/data/rules/rules.v1.json")).unwrap()
    }

    #[rstest]
    fn test_matched_recommendation(rules: RuleSet) {
        let lookup = lookup_risk(&rules, "CODEINE", "CYP2D6", Phenotype::Poor);
        let rec = build_recommendation(&rules, "CODEINE", "CYP2D6", "Poor Metabolizer", &lookup, None);

        assert_eq!(rec.cpic_guideline, "CPIC Guideline for Codeine and CYP2D6");
        assert_eq!(rec.evidence_level, "1A");
        assert_eq!(rec.fda_requirement, FdaRequirement::Required);
        assert_eq!(rec.reference.as_deref(), Some("Crews et al. (2014). PMID: 24458010"));
        assert_eq!(rec.monitoring, monitoring_guidance(Severity::Critical));
        assert!(!rec.alternative_drugs.is_empty());
    }

    #[rstest]
    fn test_unmatched_recommendation(rules: RuleSet) {
        let lookup = lookup_risk(&rules, "WARFARIN", "CYP2C9", Phenotype::Ultrarapid);
        let rec = build_recommendation(&rules, "WARFARIN", "CYP2C9", "Ultrarapid Metabolizer", &lookup, None);

        assert!(rec.action.starts_with("No curated pharmacogenomic rule found for CYP2C9 + WARFARIN"));
        assert!(rec.alternative_drugs.is_empty());
        assert!(rec.monitoring.starts_with("Insufficient curated evidence"));
    }

    #[rstest]
    fn test_phenoconversion_override(rules: RuleSet) {
        let pheno = detect_phenoconversion("CYP2D6", Phenotype::Normal, &["Fluoxetine"]);
        let lookup = lookup_risk(&rules, "CODEINE", "CYP2D6", pheno.functional_phenotype);
        let rec = build_recommendation(
            &rules,
            "CODEINE",
            "CYP2D6",
            &pheno.functional_phenotype_full,
            &lookup,
            Some(&pheno),
        );
        let alert = "Phenoconversion alert: genetic phenotype NM but functional phenotype IM due to co-medication with fluoxetine (strong). Base therapy decisions on the functional phenotype.";
        assert!(rec.action.ends_with(alert));
        assert!(rec.monitoring.ends_with(alert));
    }

    #[rstest]
    fn test_no_override_without_risk() {
        let pheno = detect_phenoconversion("CYP2D6", Phenotype::Normal, &["ibuprofen"]);
        assert_eq!(phenoconversion_override(&pheno), None);
    }

    #[rstest]
    #[case(Severity::None, "Standard monitoring per drug label.")]
    #[case(Severity::Low, "Standard monitoring per drug label.")]
    #[case(Severity::High, "Intensive monitoring required. Check labs frequently. Watch for adverse events.")]
    fn test_monitoring(#[case] severity: Severity, #[case] expected: &str) {
        assert_eq!(monitoring_guidance(severity), expected);
    }
}
