use std::collections::HashMap;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_MIN_QUALITY;
use crate::errors::ConfigError;

/// Weights of the four confidence components.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ConfidenceWeights {
    pub evidence: f64,
    pub genotype: f64,
    pub phenotype: f64,
    pub rule_coverage: f64,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        ConfidenceWeights {
            evidence: 0.40,
            genotype: 0.25,
            phenotype: 0.20,
            rule_coverage: 0.15,
        }
    }
}

impl ConfidenceWeights {
    ///
    /// Scale the weights so they sum to one. Negative weights count as zero;
    /// if nothing positive is left the defaults are used.
    ///
    pub fn normalized(&self) -> Self {
        let w = [
            self.evidence.max(0.0),
            self.genotype.max(0.0),
            self.phenotype.max(0.0),
            self.rule_coverage.max(0.0),
        ];
        let total: f64 = w.iter().sum();
        if total <= 0.0 {
            return ConfidenceWeights::default().normalized();
        }
        ConfidenceWeights {
            evidence: w[0] / total,
            genotype: w[1] / total,
            phenotype: w[2] / total,
            rule_coverage: w[3] / total,
        }
    }
}

/// Weights of the inputs to the genotype component.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct GenotypeWeights {
    pub quality: f64,
    pub annotation: f64,
    pub gene_support: f64,
}

impl Default for GenotypeWeights {
    fn default() -> Self {
        GenotypeWeights {
            quality: 0.6,
            annotation: 0.2,
            gene_support: 0.2,
        }
    }
}

impl GenotypeWeights {
    pub fn normalized(&self) -> Self {
        let w = [
            self.quality.max(0.0),
            self.annotation.max(0.0),
            self.gene_support.max(0.0),
        ];
        let total: f64 = w.iter().sum();
        if total <= 0.0 {
            return GenotypeWeights::default().normalized();
        }
        GenotypeWeights {
            quality: w[0] / total,
            annotation: w[1] / total,
            gene_support: w[2] / total,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct RuleCoverageScores {
    pub matched: f64,
    pub matched_unknown: f64,
    pub unmatched: f64,
}

impl Default for RuleCoverageScores {
    fn default() -> Self {
        RuleCoverageScores {
            matched: 0.95,
            matched_unknown: 0.35,
            unmatched: 0.55,
        }
    }
}

/// One calibration bin. `low <= s < high`, or `low <= s <= high` for the top bin.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct CalibrationBin {
    pub low: f64,
    pub high: f64,
    pub value: f64,
}

impl CalibrationBin {
    pub fn new(low: f64, high: f64, value: f64) -> Self {
        CalibrationBin { low, high, value }
    }

    pub fn contains(&self, score: f64) -> bool {
        if self.high >= 1.0 {
            self.low <= score && score <= self.high
        } else {
            self.low <= score && score < self.high
        }
    }
}

pub fn default_calibration_bins() -> Vec<CalibrationBin> {
    vec![
        CalibrationBin::new(0.90, 1.00, 0.95),
        CalibrationBin::new(0.80, 0.90, 0.87),
        CalibrationBin::new(0.70, 0.80, 0.78),
        CalibrationBin::new(0.60, 0.70, 0.68),
        CalibrationBin::new(0.50, 0.60, 0.57),
        CalibrationBin::new(0.40, 0.50, 0.45),
        CalibrationBin::new(0.00, 0.40, 0.30),
    ]
}

fn default_phenotype_confidence() -> HashMap<String, f64> {
    [
        ("Poor Metabolizer", 0.80),
        ("Intermediate Metabolizer", 0.80),
        ("Normal Metabolizer", 0.80),
        ("Rapid Metabolizer", 0.75),
        ("Ultrarapid Metabolizer", 0.80),
        ("Poor Function", 0.80),
        ("Decreased Function", 0.80),
        ("Normal Function", 0.80),
        ("Increased Function", 0.75),
        ("Unknown", 0.40),
    ]
    .into_iter()
    .map(|(name, score)| (name.to_string(), score))
    .collect()
}

///
/// Tunable parameters of the confidence decomposition.
///
/// Every field is optional in the rule set document; anything left out
/// takes the value from [ConfidenceModel::default].
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ConfidenceModel {
    pub weights: ConfidenceWeights,
    pub genotype_weights: GenotypeWeights,
    pub gene_support_detected: f64,
    pub gene_support_absent: f64,
    pub phenotype_confidence: HashMap<String, f64>,
    pub phenotype_default: f64,
    pub multiplication_penalty: f64,
    pub phenotype_floor: f64,
    pub malformed_diplotype_confidence: f64,
    pub rule_coverage: RuleCoverageScores,
    pub unknown_cap: f64,
    pub default_evidence_band: (f64, f64),
    pub calibration: Vec<CalibrationBin>,
}

impl Default for ConfidenceModel {
    fn default() -> Self {
        ConfidenceModel {
            weights: ConfidenceWeights::default(),
            genotype_weights: GenotypeWeights::default(),
            gene_support_detected: 1.0,
            gene_support_absent: 0.7,
            phenotype_confidence: default_phenotype_confidence(),
            phenotype_default: 0.60,
            multiplication_penalty: 0.05,
            phenotype_floor: 0.50,
            malformed_diplotype_confidence: 0.55,
            rule_coverage: RuleCoverageScores::default(),
            unknown_cap: 0.69,
            default_evidence_band: (0.50, 0.60),
            calibration: default_calibration_bins(),
        }
    }
}

/// Per-run pipeline settings, read from a TOML file.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub min_quality: f64,
    pub rules: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            min_quality: DEFAULT_MIN_QUALITY,
            rules: None,
        }
    }
}

impl TryFrom<&Path> for PipelineConfig {
    type Error = ConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let config: PipelineConfig = toml::from_str(&toml_str)?;
        if !config.min_quality.is_finite() || config.min_quality < 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "min_quality must be a non-negative number, got {}",
                config.min_quality
            )));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use std::path::PathBuf;

    #[rstest]
    fn test_try_from_toml() {
        let path = PathBuf::from("../tests/data/config/pipeline.toml");
        let config = PipelineConfig::try_from(path.as_path()).unwrap();

        assert_eq!(config.min_quality, 30.0);
        assert_eq!(
            config.rules,
            Some(PathBuf::from("../tests/data/rules/rules.v1.json"))
        );
    }

    #[rstest]
    fn test_missing_fields_take_defaults() {
        let config: PipelineConfig = toml::from_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.min_quality, 20.0);
    }

    #[rstest]
    fn test_negative_quality_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.toml");
        std::fs::write(&path, "min_quality = -1.0\n").unwrap();
        let result = PipelineConfig::try_from(path.as_path());
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[rstest]
    fn test_weights_normalize_to_one() {
        let weights = ConfidenceWeights {
            evidence: 2.0,
            genotype: 1.0,
            phenotype: 1.0,
            rule_coverage: 0.0,
        }
        .normalized();
        assert_eq!(weights.evidence, 0.5);
        assert_eq!(weights.rule_coverage, 0.0);

        let fallback = ConfidenceWeights {
            evidence: 0.0,
            genotype: 0.0,
            phenotype: 0.0,
            rule_coverage: 0.0,
        }
        .normalized();
        let total = fallback.evidence + fallback.genotype + fallback.phenotype + fallback.rule_coverage;
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[rstest]
    fn test_partial_confidence_model() {
        let model: ConfidenceModel =
            serde_json::from_str(r#"{"unknown_cap": 0.6, "weights": {"evidence": 1.0}}"#).unwrap();
        assert_eq!(model.unknown_cap, 0.6);
        assert_eq!(model.weights.evidence, 1.0);
        assert_eq!(model.weights.genotype, 0.25);
        assert_eq!(model.calibration.len(), 7);
        assert_eq!(model.phenotype_confidence.get("Unknown"), Some(&0.40));
    }

    #[rstest]
    fn test_calibration_bins_are_disjoint() {
        let bins = default_calibration_bins();
        for score in [0.0, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 0.8999] {
            let hits = bins.iter().filter(|b| b.contains(score)).count();
            assert_eq!(hits, 1, "score {score} hit {hits} bins");
        }
    }
}
