use pgxguard_core::models::VariantRecord;
use pgxguard_core::utils::round_to;

fn annotation_rate(records: &[VariantRecord]) -> f64 {
    let annotated = records.iter().filter(|r| r.is_annotated()).count();
    annotated as f64 / records.len() as f64
}

///
/// Overall call quality on a 0-100 scale.
///
/// Mean QUAL (capped at 100) contributes 70 points, the fraction of
/// annotated records 30 points. Empty input scores 0.
///
pub fn vcf_quality_score(records: &[VariantRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }

    let mean_qual = records.iter().map(|r| r.qual).sum::<f64>() / records.len() as f64;
    let score = mean_qual.min(100.0) * 0.7 + annotation_rate(records) * 30.0;

    round_to(score, 1)
}

/// Fraction of records carrying both a gene and a star allele. Empty input is complete.
pub fn annotation_completeness(records: &[VariantRecord]) -> f64 {
    if records.is_empty() {
        return 1.0;
    }
    round_to(annotation_rate(records), 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgxguard_core::models::Genotype;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn make_record(qual: f64, annotated: bool) -> VariantRecord {
        VariantRecord {
            chrom: "22".to_string(),
            pos: 1,
            rsid: "rs1".to_string(),
            ref_allele: "G".to_string(),
            alt_allele: "A".to_string(),
            qual,
            gene: annotated.then(|| "CYP2D6".to_string()),
            star_allele: annotated.then(|| "*4".to_string()),
            genotype: Genotype::default(),
            function: None,
        }
    }

    #[rstest]
    fn test_empty_inputs() {
        assert_eq!(vcf_quality_score(&[]), 0.0);
        assert_eq!(annotation_completeness(&[]), 1.0);
    }

    #[rstest]
    fn test_quality_score_caps_mean() {
        let records = vec![make_record(250.0, true), make_record(150.0, true)];
        assert_eq!(vcf_quality_score(&records), 100.0);
    }

    #[rstest]
    fn test_partial_annotation() {
        let records = vec![
            make_record(60.0, true),
            make_record(55.0, false),
            make_record(70.0, true),
        ];
        assert_eq!(annotation_completeness(&records), 0.67);
        assert_eq!(vcf_quality_score(&records), 63.2);
    }
}
