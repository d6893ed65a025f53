//! # pgxguard-risk
//!
//! Everything downstream of the phenotype call:
//!
//! - [phenoconversion] shifts a genetic phenotype for inhibiting co-medications.
//! - [risk] looks the (drug, gene, phenotype) triple up in the curated table.
//! - [confidence] and [calibration] score the verdict from four independent
//!   signals and flatten the result onto calibrated bins.
//! - [recommendation] assembles the clinical action and monitoring text.
//! - [analysis] runs the whole pipeline per patient and drug, in parallel.
//! - [cohort] aggregates results across patients.
//! - [explain] is the seam for natural-language explanations.
pub mod analysis;
pub mod calibration;
pub mod cohort;
pub mod confidence;
pub mod errors;
pub mod explain;
pub mod phenoconversion;
pub mod recommendation;
pub mod risk;

pub use analysis::{
    AnalysisBatch, AnalysisRequest, DrugAnalysis, PatientProfile, analyze, analyze_drug,
    analyze_with,
};
pub use calibration::{CalibrationReport, Calibrator, load_calibration_jsonl};
pub use cohort::{CohortEntry, CohortSummary, summarize_cohort};
pub use confidence::{ConfidenceBreakdown, ConfidenceComponents, score_confidence};
pub use errors::{AnalysisError, CalibrationError, ExplanationError};
pub use explain::{Explainer, TemplateExplainer, score_explanation_quality};
pub use phenoconversion::{PhenoconversionResult, detect_phenoconversion};
pub use recommendation::{ClinicalRecommendation, build_recommendation};
pub use risk::{RiskLookup, aggregate_risk_assessments, lookup_risk};
