use std::path::Path;

use pretty_assertions::assert_eq;
use rstest::*;

use pgxguard_core::models::Diplotype;
use pgxguard_core::rules::RuleSet;
use pgxguard_genotype::{call_phenotype, detected_variants, resolve_diplotypes};
use pgxguard_vcf::{ParseOptions, parse_vcf_content, parse_vcf_file};

#[fixture]
fn rules() -> RuleSet {
    RuleSet::try_from(Path::new("../tests/data/rules/rules.v1.json")).unwrap()
}

#[rstest]
#[case("pm_cyp2d6.vcf", "CYP2D6", "*4/*4", "Poor Metabolizer")]
#[case("pm_cyp2c19.vcf", "CYP2C19", "*2/*2", "Poor Metabolizer")]
#[case("im_cyp2c9.vcf", "CYP2C9", "*1/*3", "Intermediate Metabolizer")]
#[case("dpyd_im.vcf", "DPYD", "*1/*2A", "Intermediate Metabolizer")]
#[case("normal_all.vcf", "CYP2D6", "*1/*1", "Normal Metabolizer")]
#[case("normal_all.vcf", "CYP2C19", "*1/*1", "Normal Metabolizer")]
fn test_vcf_to_phenotype(
    rules: RuleSet,
    #[case] file: &str,
    #[case] gene: &str,
    #[case] diplotype: &str,
    #[case] phenotype: &str,
) {
    let path = Path::new("../tests/data/vcf").join(file);
    let records = parse_vcf_file(&path, &rules, &ParseOptions::default()).unwrap();
    let diplotypes = resolve_diplotypes(&records, &rules);

    assert_eq!(diplotypes[gene].to_string(), diplotype);
    assert_eq!(
        call_phenotype(gene, &diplotypes[gene], &rules).full_name(),
        phenotype
    );
}

#[rstest]
fn test_reference_calls_are_not_detected(rules: RuleSet) {
    let records = parse_vcf_file(
        Path::new("../tests/data/vcf/normal_all.vcf"),
        &rules,
        &ParseOptions::default(),
    )
    .unwrap();
    assert_eq!(records.len(), 2);
    assert!(detected_variants(&records, "CYP2D6", &rules).is_empty());
    assert!(detected_variants(&records, "CYP2C19", &rules).is_empty());
}

#[rstest]
#[case("rs67376798", "HapB3", "*1/HapB3", "Intermediate Metabolizer")]
#[case("rs75017182", "c.1129-5923C>G", "*1/c.1129-5923C>G", "Intermediate Metabolizer")]
#[case("rs3918290", "2A", "*1/*2A", "Intermediate Metabolizer")]
fn test_reported_diplotype_calls_the_same_phenotype(
    rules: RuleSet,
    #[case] rsid: &str,
    #[case] star: &str,
    #[case] reported: &str,
    #[case] phenotype: &str,
) {
    let vcf = format!(
        "##fileformat=VCFv4.2\n\
         #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tSAMPLE\n\
         1\t97450058\t{rsid}\tC\tT\t99\tPASS\tGENE=DPYD;STAR={star}\tGT\t0/1\n"
    );
    let records = parse_vcf_content(&vcf, &rules, &ParseOptions::default());
    let resolved = &resolve_diplotypes(&records, &rules)["DPYD"];
    assert_eq!(resolved.to_string(), reported);

    let reparsed = Diplotype::parse(&resolved.to_string());
    assert_eq!(&reparsed, resolved);

    let from_pipeline = call_phenotype("DPYD", resolved, &rules);
    let from_report = call_phenotype("DPYD", &reparsed, &rules);
    assert_eq!(from_pipeline.full_name(), phenotype);
    assert_eq!(from_report.full_name(), from_pipeline.full_name());
}
