//!
//! The boundary to natural-language explanation.
//!
//! Generating prose is not this crate's job: an external text-generation
//! client implements [Explainer]. [TemplateExplainer] is the deterministic
//! fallback, and [score_explanation_quality] checks any explanation without
//! another model call.
//!
use log::warn;
use serde::{Deserialize, Serialize};

use pgxguard_core::models::{DetectedVariant, RiskAssessment, RiskLabel};
use pgxguard_core::rules::LiteratureReference;
use pgxguard_core::utils::round_to;

use crate::errors::ExplanationError;

const ACTION_KEYWORDS: [&str; 6] = [
    "avoid",
    "dose",
    "monitor",
    "alternative",
    "consult",
    "standard dosing",
];
const MIN_PATIENT_SUMMARY_WORDS: usize = 6;
const PASSING_SCORE: f64 = 0.8;

/// Everything an explainer may mention about one drug verdict.
#[derive(Debug, Clone)]
pub struct ExplanationContext<'a> {
    pub drug: &'a str,
    pub gene: &'a str,
    pub diplotype: &'a str,
    pub phenotype: &'a str,
    pub risk: &'a RiskAssessment,
    pub detected_variants: &'a [DetectedVariant],
    pub cpic_action: &'a str,
    pub reference: Option<&'a LiteratureReference>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Explanation {
    pub summary: String,
    pub mechanism: String,
    pub variant_impact: String,
    pub clinical_context: String,
    pub patient_summary: String,
}

pub trait Explainer: Send + Sync {
    fn explain(&self, context: &ExplanationContext) -> Result<Explanation, ExplanationError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateExplainer;

fn gene_mechanism(gene: &str, drug: &str) -> String {
    match gene {
        "CYP2D6" => format!(
            "{gene} metabolises ~25% of clinically used drugs including opioids, antidepressants, and antipsychotics."
        ),
        "CYP2C19" => format!(
            "{gene} metabolises clopidogrel into its active antiplatelet form. Reduced activity increases cardiovascular risk."
        ),
        "CYP2C9" => format!(
            "{gene} is the primary enzyme for warfarin metabolism. Reduced activity raises plasma concentrations and bleeding risk."
        ),
        "SLCO1B1" => format!(
            "{gene} encodes the OATP1B1 hepatic transporter for statins. Reduced transport increases myopathy risk."
        ),
        "TPMT" => format!(
            "{gene} catalyses methylation of thiopurines. Deficiency causes severe myelosuppression."
        ),
        "DPYD" => format!(
            "{gene} is rate-limiting in fluoropyrimidine catabolism. Deficiency causes potentially fatal toxicity."
        ),
        _ => format!("{gene} affects the metabolism of {drug}."),
    }
}

fn phenotype_impact(phenotype: &str, diplotype: &str, gene: &str) -> String {
    match phenotype {
        "Poor Metabolizer" | "Poor Function" => format!(
            "The {diplotype} diplotype results in complete/near-complete loss of {gene} activity."
        ),
        "Intermediate Metabolizer" | "Decreased Function" => {
            format!("The {diplotype} diplotype reduces {gene} activity to ~50% of normal.")
        }
        "Normal Metabolizer" | "Normal Function" => {
            format!("The {diplotype} diplotype confers normal {gene} activity.")
        }
        "Rapid Metabolizer" | "Increased Function" => {
            format!("The {diplotype} diplotype results in increased {gene} activity.")
        }
        "Ultrarapid Metabolizer" => format!(
            "The {diplotype} diplotype results in significantly increased {gene} activity, often from gene duplication."
        ),
        _ => format!("The {diplotype} diplotype affects {gene} enzyme function."),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Explainer for TemplateExplainer {
    fn explain(&self, ctx: &ExplanationContext) -> Result<Explanation, ExplanationError> {
        let variants = if ctx.detected_variants.is_empty() {
            "reference alleles".to_string()
        } else {
            ctx.detected_variants
                .iter()
                .map(|v| format!("{} ({})", v.rsid, v.star_allele))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let (drug, gene, diplotype, phenotype) = (ctx.drug, ctx.gene, ctx.diplotype, ctx.phenotype);
        let opening = format!("Patient carries {diplotype} ({gene}), classified as {phenotype}.");
        let (verdict, patient_summary) = match ctx.risk.risk_label {
            RiskLabel::Toxic => (
                format!("{} toxicity risk for {drug}.", capitalize(ctx.risk.severity.as_str())),
                format!(
                    "Your genetic test shows your body cannot safely process {drug}. Ask your doctor for an alternative."
                ),
            ),
            RiskLabel::Ineffective => (
                format!("{drug} predicted ineffective."),
                format!(
                    "Your genetic test shows {drug} will not work well for you. Ask your doctor for an alternative."
                ),
            ),
            RiskLabel::AdjustDosage => (
                format!("Dosage modification recommended for {drug}."),
                format!("Your genetic test shows you may need a different dose of {drug}."),
            ),
            RiskLabel::Unknown => (
                format!("No curated rule covers {drug} for this phenotype."),
                format!(
                    "Your genetic test could not be matched to a guideline for {drug}. Talk with your doctor before starting it."
                ),
            ),
            RiskLabel::Safe => (
                format!("Standard dosing of {drug} is appropriate."),
                format!("{drug} should work normally for you at standard doses."),
            ),
        };

        let clinical_context = match ctx.reference {
            Some(r) => format!(
                "{} Reference: {} ({}). PMID: {}.",
                ctx.cpic_action, r.authors, r.year, r.pmid
            ),
            None => ctx.cpic_action.to_string(),
        };

        Ok(Explanation {
            summary: format!("{opening} {verdict} Variants: {variants}."),
            mechanism: gene_mechanism(gene, drug),
            variant_impact: phenotype_impact(phenotype, diplotype, gene),
            clinical_context,
            patient_summary,
        })
    }
}

///
/// Ask `primary` for an explanation and fall back to the template when it
/// fails. The failure is logged, never surfaced.
///
pub fn explain_with_fallback(primary: &dyn Explainer, context: &ExplanationContext) -> Explanation {
    match primary.explain(context) {
        Ok(explanation) => explanation,
        Err(e) => {
            warn!("{e}. Using template fallback.");
            TemplateExplainer.explain(context).unwrap_or_default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityFailure {
    MissingRsidMention,
    MissingGeneMention,
    MissingDrugMention,
    MissingActionableGuidance,
    PatientSummaryTooShort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationQuality {
    pub explanation_quality_score: f64,
    pub quality_fail_reasons: Vec<QualityFailure>,
    pub passed: bool,
    pub checks_passed: usize,
    pub checks_total: usize,
    pub cpic_action_present: bool,
}

fn contains_any<S: AsRef<str>>(text: &str, needles: &[S]) -> bool {
    let text = text.to_lowercase();
    needles
        .iter()
        .any(|n| text.contains(&n.as_ref().to_lowercase()))
}

/// Five deterministic checks on an explanation's content.
pub fn score_explanation_quality(
    explanation: &Explanation,
    gene: &str,
    drug: &str,
    detected_variants: &[DetectedVariant],
    cpic_action: &str,
) -> ExplanationQuality {
    let clinical_context = explanation.clinical_context.trim();
    let patient_summary = explanation.patient_summary.trim();
    let merged = [
        explanation.summary.trim(),
        explanation.mechanism.trim(),
        clinical_context,
        patient_summary,
    ]
    .join(" ");

    let rsids: Vec<&str> = detected_variants
        .iter()
        .map(|v| v.rsid.as_str())
        .filter(|r| !r.is_empty())
        .collect();

    let checks = [
        (
            detected_variants.is_empty() || contains_any(&merged, &rsids),
            QualityFailure::MissingRsidMention,
        ),
        (
            !gene.is_empty() && contains_any(&merged, &[gene]),
            QualityFailure::MissingGeneMention,
        ),
        (
            !drug.is_empty() && contains_any(&merged, &[drug]),
            QualityFailure::MissingDrugMention,
        ),
        (
            contains_any(clinical_context, &ACTION_KEYWORDS),
            QualityFailure::MissingActionableGuidance,
        ),
        (
            patient_summary.split_whitespace().count() >= MIN_PATIENT_SUMMARY_WORDS,
            QualityFailure::PatientSummaryTooShort,
        ),
    ];

    let checks_total = checks.len();
    let checks_passed = checks.iter().filter(|(ok, _)| *ok).count();
    let quality_fail_reasons = checks
        .iter()
        .filter(|(ok, _)| !ok)
        .map(|(_, reason)| *reason)
        .collect();
    let score = round_to(checks_passed as f64 / checks_total as f64, 2);

    ExplanationQuality {
        explanation_quality_score: score,
        quality_fail_reasons,
        passed: score >= PASSING_SCORE,
        checks_passed,
        checks_total,
        cpic_action_present: !cpic_action.trim().is_empty(),
    }
}
