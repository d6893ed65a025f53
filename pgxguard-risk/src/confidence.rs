//! Decomposed, weighted confidence scoring with provenance.
use serde::{Deserialize, Serialize};

use pgxguard_core::config::{ConfidenceModel, ConfidenceWeights};
use pgxguard_core::models::{Diplotype, RiskLabel};
use pgxguard_core::rules::RuleSet;
use pgxguard_core::utils::{clamp_unit, round_to};

use crate::calibration::Calibrator;

/// The four independent confidence signals, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceComponents {
    pub evidence: f64,
    pub genotype: f64,
    pub phenotype: f64,
    pub rule_coverage: f64,
}

impl ConfidenceComponents {
    pub fn weighted(&self, weights: &ConfidenceWeights) -> f64 {
        let w = weights.normalized();
        clamp_unit(
            self.evidence * w.evidence
                + self.genotype * w.genotype
                + self.phenotype * w.phenotype
                + self.rule_coverage * w.rule_coverage,
        )
    }
}

/// Everything the confidence model looks at for one drug.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceInputs<'a> {
    pub evidence_level: &'a str,
    /// VCF quality score on a 0-100 scale.
    pub vcf_quality: f64,
    pub annotation_completeness: f64,
    /// Full phenotype name, e.g. "Poor Metabolizer".
    pub phenotype: &'a str,
    pub diplotype: &'a str,
    pub risk_label: RiskLabel,
    pub rule_matched: bool,
    pub gene_detected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    pub components: ConfidenceComponents,
    pub weights: ConfidenceWeights,
    pub raw_score: f64,
    pub unknown_capped: bool,
    pub phenoconversion_penalty: f64,
    pub penalized_score: f64,
    pub calibrated_score: f64,
    pub evidence_level: String,
    pub evidence_band: (f64, f64),
    pub rules_version: String,
}

pub fn evidence_band(level: &str, rules: &RuleSet) -> (f64, f64) {
    rules
        .evidence_band(level)
        .unwrap_or(rules.confidence_model().default_evidence_band)
}

/// Midpoint of the evidence band.
pub fn evidence_component(band: (f64, f64)) -> f64 {
    clamp_unit((band.0 + band.1) / 2.0)
}

pub fn genotype_component(
    vcf_quality: f64,
    annotation_completeness: f64,
    gene_detected: bool,
    model: &ConfidenceModel,
) -> f64 {
    let w = model.genotype_weights.normalized();
    let support = if gene_detected {
        model.gene_support_detected
    } else {
        model.gene_support_absent
    };
    clamp_unit(
        clamp_unit(vcf_quality / 100.0) * w.quality
            + clamp_unit(annotation_completeness) * w.annotation
            + clamp_unit(support) * w.gene_support,
    )
}

///
/// Confidence in the phenotype call itself.
///
/// A diplotype without `/` or `*` gets the fixed malformed value. One that
/// carries a multiplication allele is docked by the configured penalty,
/// never below the configured floor (or the base value if that is lower).
///
pub fn phenotype_component(phenotype: &str, diplotype: &str, model: &ConfidenceModel) -> f64 {
    if !Diplotype::is_well_formed(diplotype) {
        return clamp_unit(model.malformed_diplotype_confidence);
    }

    let base = model
        .phenotype_confidence
        .get(phenotype)
        .copied()
        .unwrap_or(model.phenotype_default);

    let score = if Diplotype::parse(diplotype).has_multiplication() {
        (base - model.multiplication_penalty).max(model.phenotype_floor.min(base))
    } else {
        base
    };
    clamp_unit(score)
}

pub fn rule_coverage_component(rule_matched: bool, risk_label: RiskLabel, model: &ConfidenceModel) -> f64 {
    let scores = &model.rule_coverage;
    let value = match (rule_matched, risk_label) {
        (true, RiskLabel::Unknown) => scores.matched_unknown,
        (true, _) => scores.matched,
        (false, _) => scores.unmatched,
    };
    clamp_unit(value)
}

pub fn confidence_components(inputs: &ConfidenceInputs, rules: &RuleSet) -> ConfidenceComponents {
    let model = rules.confidence_model();
    ConfidenceComponents {
        evidence: evidence_component(evidence_band(inputs.evidence_level, rules)),
        genotype: genotype_component(
            inputs.vcf_quality,
            inputs.annotation_completeness,
            inputs.gene_detected,
            model,
        ),
        phenotype: phenotype_component(inputs.phenotype, inputs.diplotype, model),
        rule_coverage: rule_coverage_component(inputs.rule_matched, inputs.risk_label, model),
    }
}

///
/// Score one drug's verdict.
///
/// The weighted component average is capped for an `Unknown` label, the
/// phenoconversion penalty is subtracted (floored at zero) and the result
/// is calibrated. The calibrated score respects the cap as well.
///
pub fn score_confidence(
    inputs: &ConfidenceInputs,
    phenoconversion_penalty: f64,
    rules: &RuleSet,
) -> ConfidenceBreakdown {
    let model = rules.confidence_model();
    let components = confidence_components(inputs, rules);
    let weighted = components.weighted(&model.weights);

    let is_unknown = inputs.risk_label == RiskLabel::Unknown;
    let unknown_capped = is_unknown && weighted > model.unknown_cap;
    let raw_score = if unknown_capped { model.unknown_cap } else { weighted };

    let penalty = phenoconversion_penalty.max(0.0);
    let penalized_score = (raw_score - penalty).max(0.0);

    let mut calibrated_score = Calibrator::new(&model.calibration).calibrate(penalized_score);
    if is_unknown {
        calibrated_score = round_to(calibrated_score.min(model.unknown_cap), 2);
    }

    let band = evidence_band(inputs.evidence_level, rules);
    ConfidenceBreakdown {
        components,
        weights: model.weights.normalized(),
        raw_score: round_to(raw_score, 4),
        unknown_capped,
        phenoconversion_penalty: penalty,
        penalized_score: round_to(penalized_score, 4),
        calibrated_score,
        evidence_level: inputs.evidence_level.to_string(),
        evidence_band: band,
        rules_version: rules.version().to_string(),
    }
}
