use std::fs::read_to_string;
use std::path::Path;

use pretty_assertions::assert_eq;
use rstest::*;

use pgxguard_core::models::{ConfidenceLevel, Phenotype, RiskLabel, Severity};
use pgxguard_core::rules::RuleSet;
use pgxguard_risk::analysis::{AnalysisRequest, PatientProfile, analyze, analyze_drug, analyze_with};
use pgxguard_risk::cohort::{cohort_entries, summarize_cohort};
use pgxguard_risk::explain::TemplateExplainer;
use pgxguard_risk::phenoconversion::InhibitorStrength;
use pgxguard_vcf::ParseOptions;

#[fixture]
fn rules() -> RuleSet {
    RuleSet::try_from(Path::new("../tests/data/rules/rules.v1.json")).unwrap()
}

fn vcf(name: &str) -> String {
    read_to_string(Path::new("../tests/data/vcf").join(name)).unwrap()
}

fn request(file: &str, drugs: &[&str], medications: &[&str]) -> AnalysisRequest {
    AnalysisRequest {
        patient_id: "PATIENT_001".to_string(),
        vcf: vcf(file),
        drugs: drugs.iter().map(|d| d.to_string()).collect(),
        medications: medications.iter().map(|m| m.to_string()).collect(),
        options: ParseOptions::default(),
    }
}

#[rstest]
#[case("pm_cyp2d6.vcf", "CODEINE", "CYP2D6", "*4/*4", Phenotype::Poor, RiskLabel::Toxic, Severity::Critical)]
#[case("pm_cyp2c19.vcf", "CLOPIDOGREL", "CYP2C19", "*2/*2", Phenotype::Poor, RiskLabel::Ineffective, Severity::High)]
#[case("im_cyp2c9.vcf", "WARFARIN", "CYP2C9", "*1/*3", Phenotype::Intermediate, RiskLabel::AdjustDosage, Severity::Moderate)]
#[case("dpyd_im.vcf", "5-FU", "DPYD", "*1/*2A", Phenotype::Intermediate, RiskLabel::AdjustDosage, Severity::High)]
#[case("normal_all.vcf", "codeine", "CYP2D6", "*1/*1", Phenotype::Normal, RiskLabel::Safe, Severity::None)]
fn test_vcf_to_verdict(
    rules: RuleSet,
    #[case] file: &str,
    #[case] drug: &str,
    #[case] gene: &str,
    #[case] diplotype: &str,
    #[case] phenotype: Phenotype,
    #[case] label: RiskLabel,
    #[case] severity: Severity,
) {
    let batch = analyze(&rules, &request(file, &[drug], &[])).unwrap();
    assert!(batch.success);
    assert_eq!(batch.results.len(), 1);

    let result = &batch.results[0];
    assert_eq!(result.pharmacogenomic_profile.primary_gene, gene);
    assert_eq!(result.pharmacogenomic_profile.diplotype, diplotype);
    assert_eq!(result.pharmacogenomic_profile.phenotype, phenotype);
    assert_eq!(result.risk_assessment.risk_label, label);
    assert_eq!(result.risk_assessment.severity, severity);
    assert!(!result.phenoconversion.phenoconversion_risk);
}

#[rstest]
fn test_poor_metabolizer_confidence(rules: RuleSet) {
    let batch = analyze(&rules, &request("pm_cyp2d6.vcf", &["CODEINE"], &[])).unwrap();
    let result = &batch.results[0];

    assert_eq!(result.quality_metrics.vcf_quality_score, 100.0);
    assert_eq!(result.quality_metrics.annotation_completeness, 1.0);
    assert_eq!(result.risk_assessment.confidence_score, 0.95);
    assert_eq!(result.quality_metrics.confidence_level, ConfidenceLevel::High);
    assert_eq!(result.confidence_breakdown.rules_version, "2025.1");
    assert_eq!(result.pharmacogenomic_profile.activity_score, Some(0.0));
    assert_eq!(result.pharmacogenomic_profile.detected_variants.len(), 1);
}

#[rstest]
fn test_strong_inhibitor_phenoconversion(rules: RuleSet) {
    let batch = analyze(&rules, &request("normal_all.vcf", &["CODEINE"], &[" Fluoxetine "])).unwrap();
    let result = &batch.results[0];
    let pheno = &result.phenoconversion;

    assert!(pheno.phenoconversion_risk);
    assert_eq!(pheno.genetic_phenotype, Phenotype::Normal);
    assert_eq!(pheno.functional_phenotype, Phenotype::Intermediate);
    assert_eq!(pheno.confidence_penalty, 0.10);
    assert_eq!(pheno.strongest(), Some(InhibitorStrength::Strong));

    // the profile keeps the genetic call, the verdict follows the functional one
    assert_eq!(result.pharmacogenomic_profile.phenotype, Phenotype::Normal);
    assert_eq!(result.risk_assessment.risk_label, RiskLabel::AdjustDosage);
    assert!(result.clinical_recommendation.action.contains("Phenoconversion alert"));
    assert_eq!(result.confidence_breakdown.phenoconversion_penalty, 0.10);
}

#[rstest]
fn test_unsupported_drug_does_not_abort_batch(rules: RuleSet) {
    let batch = analyze(&rules, &request("pm_cyp2d6.vcf", &["CODEINE", "ASPIRIN", "WARFARIN"], &[])).unwrap();

    assert!(!batch.success);
    let drugs: Vec<&str> = batch.results.iter().map(|r| r.drug.as_str()).collect();
    assert_eq!(drugs, vec!["CODEINE", "WARFARIN"]);
    assert_eq!(batch.errors, vec!["Error analyzing ASPIRIN: Drug 'ASPIRIN' is not supported"]);
}

#[rstest]
fn test_batch_reports_canonical_drug_names(rules: RuleSet) {
    let batch = analyze(&rules, &request("pm_cyp2c19.vcf", &["Plavix", "aspirin", "clopidogrel"], &[])).unwrap();

    let drugs: Vec<&str> = batch.results.iter().map(|r| r.drug.as_str()).collect();
    assert_eq!(drugs, vec!["CLOPIDOGREL"]);
    assert_eq!(batch.errors, vec!["Error analyzing ASPIRIN: Drug 'ASPIRIN' is not supported"]);
}

#[rstest]
fn test_low_quality_calls_never_reach_the_verdict(rules: RuleSet) {
    let batch = analyze(&rules, &request("mixed_quality.vcf", &["CODEINE"], &[])).unwrap();
    let result = &batch.results[0];

    assert_eq!(result.pharmacogenomic_profile.diplotype, "*1/*1");
    assert!(result.pharmacogenomic_profile.detected_variants.is_empty());
    assert_eq!(result.risk_assessment.risk_label, RiskLabel::Safe);
}

#[rstest]
fn test_unresolved_verdict_is_capped(rules: RuleSet) {
    let content = "##fileformat=VCFv4.2\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tSAMPLE\n\
22\t42522613\trs1135840\tC\tG\t100\tPASS\tGENE=CYP2D6;STAR=*1xN\tGT\t0/1\n";
    let profile = PatientProfile::from_vcf(content, &rules, &ParseOptions::default()).unwrap();
    let result = analyze_drug(&rules, &profile, "CODEINE", &["duloxetine"]).unwrap();

    assert_eq!(result.pharmacogenomic_profile.diplotype, "*1/*1xN");
    assert_eq!(result.pharmacogenomic_profile.phenotype, Phenotype::Ultrarapid);
    assert_eq!(result.phenoconversion.functional_phenotype, Phenotype::Rapid);
    assert_eq!(result.risk_assessment.risk_label, RiskLabel::Unknown);
    assert_eq!(result.risk_assessment.severity, Severity::Unknown);
    assert!(result.confidence_breakdown.unknown_capped);
    assert!(result.risk_assessment.confidence_score <= 0.69);
    assert!(
        result
            .clinical_recommendation
            .action
            .starts_with("No curated pharmacogenomic rule found for CYP2D6 + CODEINE + Rapid Metabolizer.")
    );
}

#[rstest]
fn test_line_order_does_not_change_verdict(rules: RuleSet) {
    let header = "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tSAMPLE\n";
    let a = "22\t1\trsA\tG\tA\t90\tPASS\tGENE=CYP2D6;STAR=*10\tGT\t0/1\n";
    let b = "22\t2\trsB\tG\tA\t90\tPASS\tGENE=CYP2D6;STAR=*4\tGT\t0/1\n";

    let forward = PatientProfile::from_vcf(&format!("{header}{a}{b}"), &rules, &ParseOptions::default()).unwrap();
    let reverse = PatientProfile::from_vcf(&format!("{header}{b}{a}"), &rules, &ParseOptions::default()).unwrap();

    let fwd = analyze_drug::<&str>(&rules, &forward, "CODEINE", &[]).unwrap();
    let rev = analyze_drug::<&str>(&rules, &reverse, "CODEINE", &[]).unwrap();
    assert_eq!(fwd.pharmacogenomic_profile.diplotype, "*4/*10");
    assert_eq!(fwd.pharmacogenomic_profile.diplotype, rev.pharmacogenomic_profile.diplotype);
    assert_eq!(fwd.risk_assessment, rev.risk_assessment);
}

#[rstest]
fn test_explanations_attach(rules: RuleSet) {
    let batch = analyze_with(
        &rules,
        &request("pm_cyp2d6.vcf", &["CODEINE"], &[]),
        Some(&TemplateExplainer),
    )
    .unwrap();
    let result = &batch.results[0];
    assert!(result.explanation.is_some());
    assert!(result.explanation_quality.as_ref().is_some_and(|q| q.passed));
}

#[rstest]
fn test_cohort_from_batches(rules: RuleSet) {
    let mut pm = request("pm_cyp2d6.vcf", &["CODEINE", "WARFARIN"], &[]);
    pm.patient_id = "P_PM".to_string();
    let mut nm = request("normal_all.vcf", &["CODEINE"], &[]);
    nm.patient_id = "P_NM".to_string();

    let batches = vec![analyze(&rules, &pm).unwrap(), analyze(&rules, &nm).unwrap()];
    let summary = summarize_cohort(&cohort_entries(&batches));

    assert_eq!(summary.cohort_size, 3);
    assert_eq!(summary.high_risk_patients, vec!["P_PM"]);
    assert_eq!(summary.risk_matrix["CODEINE"][&RiskLabel::Toxic], 1);
    assert_eq!(summary.risk_matrix["CODEINE"][&RiskLabel::Safe], 1);
    assert_eq!(summary.risk_matrix["WARFARIN"][&RiskLabel::Safe], 1);
}
