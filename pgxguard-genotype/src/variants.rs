use pgxguard_core::models::{DetectedVariant, VariantRecord};
use pgxguard_core::rules::RuleSet;

const LOSS_OF_FUNCTION_ALLELES: [&str; 6] = ["*2A", "*3", "*4", "*5", "*6", "*13"];

/// Short clinical label for a call, from its rsID function or its star allele.
pub fn clinical_significance(rsid: &str, star_allele: &str, rules: &RuleSet) -> String {
    if let Some(annotation) = rules.allele_for_rsid(rsid) {
        let function = annotation.function.as_deref().unwrap_or_default();
        let label = if function.contains("No function") {
            "Loss-of-function variant"
        } else if function.contains("Decreased") {
            "Reduced function variant"
        } else if function.contains("Increased") {
            "Gain-of-function variant"
        } else {
            "Normal function variant"
        };
        return label.to_string();
    }

    match star_allele {
        "*1" | "*1B" => "Wild-type allele",
        s if LOSS_OF_FUNCTION_ALLELES.contains(&s) => "Loss-of-function variant",
        "*17" => "Gain-of-function variant",
        _ => "Variant of uncertain significance",
    }
    .to_string()
}

/// Non-reference, non-`*1` calls for one gene, in input order.
pub fn detected_variants(records: &[VariantRecord], gene: &str, rules: &RuleSet) -> Vec<DetectedVariant> {
    records
        .iter()
        .filter(|r| r.gene.as_deref() == Some(gene))
        .filter_map(|r| {
            let star = r.contributing_allele()?;
            Some(DetectedVariant {
                rsid: r.rsid.clone(),
                gene: gene.to_string(),
                star_allele: star.to_string(),
                zygosity: r.genotype.zygosity(),
                function: r.function.clone(),
                clinical_significance: Some(clinical_significance(&r.rsid, star, rules)),
            })
        })
        .collect()
}
