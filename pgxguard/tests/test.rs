use std::fs::read_to_string;
use std::path::Path;

use pretty_assertions::assert_eq;
use rstest::*;

use pgxguard::core::models::RiskLabel;
use pgxguard::core::rules::RuleSet;
use pgxguard::risk::analysis::{AnalysisRequest, analyze};

#[fixture]
fn rules() -> RuleSet {
    RuleSet::try_from(Path::new("../tests/data/rules/rules.v1.json")).unwrap()
}

#[rstest]
#[case("rules.v1.json")]
#[case("minimal.yaml")]
fn test_both_rule_formats_drive_the_pipeline(#[case] file: &str) {
    let rules = RuleSet::try_from(Path::new("../tests/data/rules").join(file).as_path()).unwrap();
    let request = AnalysisRequest {
        patient_id: "P1".to_string(),
        vcf: read_to_string("../tests/data/vcf/pm_cyp2d6.vcf").unwrap(),
        drugs: vec!["CODEINE".to_string()],
        ..Default::default()
    };
    let batch = analyze(&rules, &request).unwrap();
    assert_eq!(batch.results[0].risk_assessment.risk_label, RiskLabel::Toxic);
    assert_eq!(batch.results[0].quality_metrics.clinical_rules_version, rules.version());
}

#[rstest]
fn test_clopidogrel_poor_metabolizer(rules: RuleSet) {
    let request = AnalysisRequest {
        vcf: read_to_string("../tests/data/vcf/pm_cyp2c19.vcf").unwrap(),
        drugs: vec!["clopidogrel".to_string()],
        ..Default::default()
    };
    let batch = analyze(&rules, &request).unwrap();
    assert_eq!(batch.results[0].risk_assessment.risk_label, RiskLabel::Ineffective);
}
