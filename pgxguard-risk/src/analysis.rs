//! Per-patient, per-drug orchestration of the whole pipeline.
use std::collections::{BTreeMap, HashSet};

use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use pgxguard_core::models::{
    ConfidenceLevel, DetectedVariant, Diplotype, Phenotype, RiskAssessment, VariantRecord,
};
use pgxguard_core::rules::RuleSet;
use pgxguard_genotype::{activity_score, call_phenotype, detected_variants, resolve_diplotypes};
use pgxguard_vcf::{
    ParseOptions, annotation_completeness, parse_vcf_content, validate_vcf_content,
    vcf_quality_score,
};

use crate::confidence::{ConfidenceBreakdown, ConfidenceInputs, score_confidence};
use crate::errors::{AnalysisError, Result};
use crate::explain::{
    Explainer, Explanation, ExplanationContext, ExplanationQuality, explain_with_fallback,
    score_explanation_quality,
};
use crate::phenoconversion::{PhenoconversionResult, detect_phenoconversion};
use crate::recommendation::{ClinicalRecommendation, build_recommendation};
use crate::risk::lookup_risk;

///
/// What a single VCF says about a patient, computed once and shared by
/// every drug in a request.
///
#[derive(Debug, Clone)]
pub struct PatientProfile {
    patient_id: String,
    records: Vec<VariantRecord>,
    diplotypes: BTreeMap<String, Diplotype>,
    vcf_quality: f64,
    annotation_completeness: f64,
}

impl PatientProfile {
    pub fn from_vcf(content: &str, rules: &RuleSet, options: &ParseOptions) -> Result<Self> {
        validate_vcf_content(content)?;
        let records = parse_vcf_content(content, rules, options);
        if records.is_empty() {
            warn!("No variants passed parsing, every gene falls back to the default diplotype");
        }
        Ok(Self::from_records(records, rules))
    }

    pub fn from_records(records: Vec<VariantRecord>, rules: &RuleSet) -> Self {
        let diplotypes = resolve_diplotypes(&records, rules);
        PatientProfile {
            patient_id: String::new(),
            vcf_quality: vcf_quality_score(&records),
            annotation_completeness: annotation_completeness(&records),
            records,
            diplotypes,
        }
    }

    pub fn with_patient_id(mut self, patient_id: &str) -> Self {
        self.patient_id = patient_id.to_string();
        self
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    pub fn records(&self) -> &[VariantRecord] {
        &self.records
    }

    pub fn diplotypes(&self) -> &BTreeMap<String, Diplotype> {
        &self.diplotypes
    }

    pub fn diplotype(&self, gene: &str) -> Option<&Diplotype> {
        self.diplotypes.get(gene)
    }

    pub fn vcf_quality(&self) -> f64 {
        self.vcf_quality
    }

    pub fn annotation_completeness(&self) -> f64 {
        self.annotation_completeness
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PharmacogenomicProfile {
    pub primary_gene: String,
    pub diplotype: String,
    /// Genetic phenotype, before any phenoconversion.
    pub phenotype: Phenotype,
    pub activity_score: Option<f64>,
    pub detected_variants: Vec<DetectedVariant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub vcf_parsing_success: bool,
    pub vcf_quality_score: f64,
    pub variants_analyzed: usize,
    pub annotation_completeness: f64,
    pub confidence_level: ConfidenceLevel,
    pub analysis_version: String,
    pub clinical_rules_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugAnalysis {
    pub patient_id: String,
    pub drug: String,
    pub risk_assessment: RiskAssessment,
    pub pharmacogenomic_profile: PharmacogenomicProfile,
    pub phenoconversion: PhenoconversionResult,
    pub clinical_recommendation: ClinicalRecommendation,
    pub quality_metrics: QualityMetrics,
    pub confidence_breakdown: ConfidenceBreakdown,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Explanation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation_quality: Option<ExplanationQuality>,
}

///
/// Run the full pipeline for one drug against an already parsed profile.
///
/// Risk lookup, recommendation and confidence all use the functional
/// phenotype; the reported profile keeps the genetic one.
///
pub fn analyze_drug<S: AsRef<str>>(
    rules: &RuleSet,
    profile: &PatientProfile,
    drug: &str,
    medications: &[S],
) -> Result<DrugAnalysis> {
    let canonical = rules.normalize_drug(drug);
    let gene = rules
        .primary_gene(&canonical)
        .ok_or_else(|| AnalysisError::UnsupportedDrug(drug.trim().to_string()))?;

    let diplotype = profile
        .diplotype(gene)
        .cloned()
        .unwrap_or_else(|| rules.default_diplotype().clone());
    let diplotype_str = diplotype.to_string();

    let genetic = call_phenotype(gene, &diplotype, rules);
    let detected = detected_variants(profile.records(), gene, rules);

    let phenoconversion = detect_phenoconversion(gene, genetic.phenotype, medications);
    let effective = genetic.with_phenotype(phenoconversion.functional_phenotype);
    let effective_name = effective.full_name();

    let lookup = lookup_risk(rules, &canonical, gene, effective.phenotype);
    let clinical_recommendation = build_recommendation(
        rules,
        &canonical,
        gene,
        effective_name,
        &lookup,
        Some(&phenoconversion),
    );

    let inputs = ConfidenceInputs {
        evidence_level: &clinical_recommendation.evidence_level,
        vcf_quality: profile.vcf_quality(),
        annotation_completeness: profile.annotation_completeness(),
        phenotype: effective_name,
        diplotype: &diplotype_str,
        risk_label: lookup.risk_label(),
        rule_matched: lookup.is_match(),
        gene_detected: !detected.is_empty(),
    };
    let confidence_breakdown = score_confidence(&inputs, phenoconversion.confidence_penalty, rules);

    let risk_assessment = RiskAssessment {
        risk_label: lookup.risk_label(),
        severity: lookup.severity(),
        confidence_score: confidence_breakdown.calibrated_score,
    };

    info!(
        "{canonical}: {gene} {diplotype_str} -> {} -> {} ({})",
        effective.abbreviation(),
        risk_assessment.risk_label,
        risk_assessment.confidence_score
    );

    Ok(DrugAnalysis {
        patient_id: profile.patient_id().to_string(),
        drug: canonical,
        risk_assessment,
        pharmacogenomic_profile: PharmacogenomicProfile {
            primary_gene: gene.to_string(),
            diplotype: diplotype_str,
            phenotype: genetic.phenotype,
            activity_score: activity_score(gene, &diplotype, rules),
            detected_variants: detected,
        },
        phenoconversion,
        clinical_recommendation,
        quality_metrics: QualityMetrics {
            vcf_parsing_success: true,
            vcf_quality_score: profile.vcf_quality(),
            variants_analyzed: profile.records().len(),
            annotation_completeness: profile.annotation_completeness(),
            confidence_level: ConfidenceLevel::from_score(risk_assessment.confidence_score),
            analysis_version: env!("CARGO_PKG_VERSION").to_string(),
            clinical_rules_version: rules.version().to_string(),
        },
        confidence_breakdown,
        explanation: None,
        explanation_quality: None,
    })
}

/// Attach an explanation and its quality score to a finished analysis.
pub fn attach_explanation(rules: &RuleSet, explainer: &dyn Explainer, analysis: &mut DrugAnalysis) {
    let profile = &analysis.pharmacogenomic_profile;
    let ctx = ExplanationContext {
        drug: &analysis.drug,
        gene: &profile.primary_gene,
        diplotype: &profile.diplotype,
        phenotype: &analysis.phenoconversion.functional_phenotype_full,
        risk: &analysis.risk_assessment,
        detected_variants: &profile.detected_variants,
        cpic_action: &analysis.clinical_recommendation.action,
        reference: rules.reference(&profile.primary_gene, &analysis.drug),
    };
    let explanation = explain_with_fallback(explainer, &ctx);
    let quality = score_explanation_quality(
        &explanation,
        ctx.gene,
        ctx.drug,
        ctx.detected_variants,
        ctx.cpic_action,
    );
    info!(
        "Explanation quality score for {}/{}: {} (fails={:?})",
        ctx.drug, ctx.gene, quality.explanation_quality_score, quality.quality_fail_reasons
    );
    analysis.explanation = Some(explanation);
    analysis.explanation_quality = Some(quality);
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub patient_id: String,
    pub vcf: String,
    pub drugs: Vec<String>,
    pub medications: Vec<String>,
    pub options: ParseOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisBatch {
    pub patient_id: String,
    /// Set by callers that stamp their output; the pipeline leaves it empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub success: bool,
    pub results: Vec<DrugAnalysis>,
    pub errors: Vec<String>,
}

/// Canonical names of the requested drugs, in request order, without blanks or repeats.
pub fn dedup_drugs(rules: &RuleSet, drugs: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    drugs
        .iter()
        .map(|d| d.trim())
        .filter(|d| !d.is_empty())
        .map(|d| rules.normalize_drug(d))
        .filter(|d| seen.insert(d.clone()))
        .collect()
}

pub fn analyze(rules: &RuleSet, request: &AnalysisRequest) -> Result<AnalysisBatch> {
    analyze_with(rules, request, None)
}

///
/// Analyze every requested drug for one patient.
///
/// Drugs run in parallel; results keep request order. A failing drug is
/// reported in `errors` and never stops its siblings.
///
pub fn analyze_with(
    rules: &RuleSet,
    request: &AnalysisRequest,
    explainer: Option<&dyn Explainer>,
) -> Result<AnalysisBatch> {
    let drugs = dedup_drugs(rules, &request.drugs);
    if drugs.is_empty() {
        return Err(AnalysisError::NoDrugs);
    }

    let profile = PatientProfile::from_vcf(&request.vcf, rules, &request.options)?
        .with_patient_id(&request.patient_id);

    let outcomes: Vec<(String, Result<DrugAnalysis>)> = drugs
        .par_iter()
        .map(|drug| {
            let outcome = analyze_drug(rules, &profile, drug, request.medications.as_slice())
                .map(|mut analysis| {
                    if let Some(explainer) = explainer {
                        attach_explanation(rules, explainer, &mut analysis);
                    }
                    analysis
                });
            (drug.clone(), outcome)
        })
        .collect();

    let mut results = Vec::new();
    let mut errors = Vec::new();
    for (drug, outcome) in outcomes {
        match outcome {
            Ok(analysis) => results.push(analysis),
            Err(e) => {
                warn!("Error analyzing {drug}: {e}");
                errors.push(format!("Error analyzing {drug}: {e}"));
            }
        }
    }

    Ok(AnalysisBatch {
        patient_id: request.patient_id.clone(),
        timestamp: None,
        success: !results.is_empty() && errors.is_empty(),
        results,
        errors,
    })
}
