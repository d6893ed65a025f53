//! The clinical rule set.
//!
//! A [RuleSet] is built once from a versioned JSON or YAML document and is
//! read-only afterwards. Lookups that the document expresses loosely are
//! canonicalized at load time: diplotype keys are stored with their alleles
//! in [AlleleKey](crate::models::diplotype::AlleleKey) order, and risk rows
//! are keyed by the wording-independent [Phenotype].
use std::collections::{BTreeMap, HashMap};
use std::ffi::OsStr;
use std::fs::read_to_string;
use std::path::Path;

use fxhash::FxHashMap;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::ConfidenceModel;
use crate::consts::REQUIRED_RULE_KEYS;
use crate::errors::{Result, RuleSetError};
use crate::models::diplotype::normalize_allele;
use crate::models::{Diplotype, FdaRequirement, Phenotype, RiskLabel, Severity};
use crate::utils::normalize_name;

#[derive(Debug)]
pub enum RuleSetFileType {
    Json,
    Yaml,
}

impl RuleSetFileType {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(OsStr::to_str) {
            Some("json") => Ok(RuleSetFileType::Json),
            Some("yaml") | Some("yml") => Ok(RuleSetFileType::Yaml),
            _ => Err(RuleSetError::InvalidFileType),
        }
    }
}

/// Gene, star allele and function for one rsID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlleleAnnotation {
    pub gene: String,
    pub star: String,
    #[serde(default)]
    pub function: Option<String>,
}

/// One curated (drug, gene, phenotype) row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRow {
    pub drug: String,
    pub gene: String,
    pub phenotype: String,
    pub risk_label: RiskLabel,
    pub severity: Severity,
    pub confidence_score: f64,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub alternatives: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteratureReference {
    pub guideline: String,
    pub pmid: String,
    pub year: u16,
    pub authors: String,
    #[serde(default)]
    pub evidence_level: Option<String>,
    #[serde(default)]
    pub fda_requirement: Option<FdaRequirement>,
}

impl LiteratureReference {
    pub fn citation(&self) -> String {
        format!("{} ({}). PMID: {}", self.authors, self.year, self.pmid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RiskKey {
    pub drug: String,
    pub gene: String,
    pub phenotype: Phenotype,
}

#[derive(Deserialize)]
struct RuleSetDocument {
    rules_version: String,
    target_genes: Vec<String>,
    default_diplotype: String,
    default_phenotype: String,
    supported_drugs: BTreeMap<String, String>,
    drug_aliases: BTreeMap<String, String>,
    rsid_to_star_allele: HashMap<String, AlleleAnnotation>,
    phenotype_abbreviations: HashMap<String, String>,
    activity_scores: HashMap<String, HashMap<String, f64>>,
    diplotype_phenotypes: HashMap<String, HashMap<String, String>>,
    risk_table: Vec<RiskRow>,
    evidence_confidence: HashMap<String, (f64, f64)>,
    confidence_model: ConfidenceModel,
    literature_references: HashMap<String, LiteratureReference>,
}

#[derive(Debug, Clone)]
pub struct RuleSet {
    version: String,
    target_genes: Vec<String>,
    default_diplotype: Diplotype,
    default_phenotype: String,
    supported_drugs: BTreeMap<String, String>,
    drug_aliases: BTreeMap<String, String>,
    rsid_alleles: FxHashMap<String, AlleleAnnotation>,
    phenotype_abbreviations: HashMap<String, String>,
    activity_scores: FxHashMap<String, FxHashMap<String, f64>>,
    diplotype_phenotypes: FxHashMap<String, FxHashMap<Diplotype, String>>,
    risk_table: FxHashMap<RiskKey, RiskRow>,
    evidence_confidence: HashMap<String, (f64, f64)>,
    confidence_model: ConfidenceModel,
    references: HashMap<String, LiteratureReference>,
}

fn parse_row_phenotype(
    name: &str,
    abbreviations: &HashMap<String, String>,
) -> Option<Phenotype> {
    Phenotype::from_full_name(name)
        .map(|(phenotype, _)| phenotype)
        .or_else(|| {
            abbreviations
                .get(name)
                .and_then(|abbr| Phenotype::from_abbreviation(abbr))
        })
        .or_else(|| Phenotype::from_abbreviation(name))
}

impl RuleSet {
    ///
    /// Build a rule set from an already parsed document.
    ///
    /// All required top-level keys are checked before anything else so the
    /// error lists every missing key at once.
    ///
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let object = value.as_object().ok_or(RuleSetError::NotAMapping)?;
        let missing: Vec<String> = REQUIRED_RULE_KEYS
            .iter()
            .filter(|key| !object.contains_key(**key))
            .map(|key| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(RuleSetError::MissingKeys(missing));
        }

        let document: RuleSetDocument = serde_json::from_value(value)?;
        RuleSet::from_document(document)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        RuleSet::from_value(value)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let value: serde_json::Value = serde_yaml::from_str(content)?;
        RuleSet::from_value(value)
    }

    fn from_document(document: RuleSetDocument) -> Result<Self> {
        if document.target_genes.is_empty() {
            return Err(RuleSetError::InvalidEntry {
                key: "target_genes".to_string(),
                message: "at least one target gene is required".to_string(),
            });
        }

        let mut diplotype_phenotypes: FxHashMap<String, FxHashMap<Diplotype, String>> =
            FxHashMap::default();
        for (gene, mapping) in document.diplotype_phenotypes {
            let mut table = FxHashMap::default();
            for (key, phenotype) in mapping {
                let parts: Vec<&str> = key.split('|').collect();
                if parts.len() != 2 {
                    warn!("Skipping malformed diplotype key `{key}` for {gene}");
                    continue;
                }
                table.insert(
                    Diplotype::canonical(&normalize_allele(parts[0]), &normalize_allele(parts[1])),
                    phenotype,
                );
            }
            diplotype_phenotypes.insert(gene, table);
        }

        let mut risk_table: FxHashMap<RiskKey, RiskRow> = FxHashMap::default();
        for row in document.risk_table {
            let phenotype = parse_row_phenotype(&row.phenotype, &document.phenotype_abbreviations)
                .ok_or_else(|| RuleSetError::InvalidEntry {
                    key: "risk_table".to_string(),
                    message: format!(
                        "unrecognized phenotype `{}` for {} / {}",
                        row.phenotype, row.drug, row.gene
                    ),
                })?;
            let key = RiskKey {
                drug: normalize_name(&row.drug),
                gene: row.gene.clone(),
                phenotype,
            };
            if risk_table.contains_key(&key) {
                warn!(
                    "Duplicate risk row for {} / {} / {}; keeping the last one",
                    key.drug, key.gene, row.phenotype
                );
            }
            risk_table.insert(key, row);
        }

        let activity_scores: FxHashMap<String, FxHashMap<String, f64>> = document
            .activity_scores
            .into_iter()
            .map(|(gene, scores)| (gene, scores.into_iter().collect()))
            .collect();

        Ok(RuleSet {
            version: document.rules_version,
            target_genes: document.target_genes,
            default_diplotype: Diplotype::parse(&document.default_diplotype),
            default_phenotype: document.default_phenotype,
            supported_drugs: document
                .supported_drugs
                .into_iter()
                .map(|(drug, gene)| (normalize_name(&drug), gene))
                .collect(),
            drug_aliases: document
                .drug_aliases
                .into_iter()
                .map(|(alias, drug)| (normalize_name(&alias), normalize_name(&drug)))
                .collect(),
            rsid_alleles: document.rsid_to_star_allele.into_iter().collect(),
            phenotype_abbreviations: document.phenotype_abbreviations,
            activity_scores,
            diplotype_phenotypes,
            risk_table,
            evidence_confidence: document.evidence_confidence,
            confidence_model: document.confidence_model,
            references: document.literature_references,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn target_genes(&self) -> &[String] {
        &self.target_genes
    }

    pub fn is_target_gene(&self, gene: &str) -> bool {
        self.target_genes.iter().any(|g| g == gene)
    }

    pub fn default_diplotype(&self) -> &Diplotype {
        &self.default_diplotype
    }

    pub fn default_phenotype(&self) -> &str {
        &self.default_phenotype
    }

    ///
    /// Map a user-supplied drug name onto its canonical name.
    ///
    /// Order: exact alias, exact supported drug, then the first alias (in
    /// sorted order) that contains or is contained in the name. Anything
    /// else is returned upper-cased.
    ///
    pub fn normalize_drug(&self, name: &str) -> String {
        let upper = normalize_name(name);
        if let Some(canonical) = self.drug_aliases.get(&upper) {
            return canonical.clone();
        }
        if self.supported_drugs.contains_key(&upper) {
            return upper;
        }
        if !upper.is_empty() {
            for (alias, canonical) in &self.drug_aliases {
                if alias.contains(upper.as_str()) || upper.contains(alias.as_str()) {
                    return canonical.clone();
                }
            }
        }
        upper
    }

    /// Primary gene for a drug, after normalization.
    pub fn primary_gene(&self, drug: &str) -> Option<&str> {
        self.supported_drugs
            .get(&self.normalize_drug(drug))
            .map(String::as_str)
    }

    pub fn is_supported(&self, drug: &str) -> bool {
        self.primary_gene(drug).is_some()
    }

    /// Supported drug names with their genes, sorted by drug.
    pub fn supported_drugs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.supported_drugs
            .iter()
            .map(|(drug, gene)| (drug.as_str(), gene.as_str()))
    }

    pub fn allele_for_rsid(&self, rsid: &str) -> Option<&AlleleAnnotation> {
        self.rsid_alleles.get(rsid)
    }

    pub fn abbreviation_for(&self, phenotype_name: &str) -> Option<&str> {
        self.phenotype_abbreviations
            .get(phenotype_name)
            .map(String::as_str)
    }

    pub fn activity_score(&self, gene: &str, allele: &str) -> Option<f64> {
        self.activity_scores
            .get(gene)
            .and_then(|scores| scores.get(allele))
            .copied()
    }

    /// Curated phenotype name for a diplotype, in either allele order.
    pub fn diplotype_phenotype(&self, gene: &str, diplotype: &Diplotype) -> Option<&str> {
        self.diplotype_phenotypes
            .get(gene)
            .and_then(|table| table.get(&diplotype.canonicalized()))
            .map(String::as_str)
    }

    /// Risk row for a canonical drug name, gene and phenotype.
    pub fn risk_row(&self, drug: &str, gene: &str, phenotype: Phenotype) -> Option<&RiskRow> {
        let key = RiskKey {
            drug: drug.to_string(),
            gene: gene.to_string(),
            phenotype,
        };
        self.risk_table.get(&key)
    }

    pub fn evidence_band(&self, level: &str) -> Option<(f64, f64)> {
        self.evidence_confidence.get(level).copied()
    }

    pub fn confidence_model(&self) -> &ConfidenceModel {
        &self.confidence_model
    }

    pub fn reference(&self, gene: &str, drug: &str) -> Option<&LiteratureReference> {
        self.references.get(&format!("{gene}_{drug}"))
    }
}

impl TryFrom<&Path> for RuleSet {
    type Error = RuleSetError;

    fn try_from(path: &Path) -> Result<Self> {
        let file_type = RuleSetFileType::from_path(path)?;
        let content = read_to_string(path)?;
        let rules = match file_type {
            RuleSetFileType::Json => RuleSet::from_json_str(&content)?,
            RuleSetFileType::Yaml => RuleSet::from_yaml_str(&content)?,
        };

        info!(
            "Loaded clinical rules version {} from {}",
            rules.version(),
            path.display()
        );

        Ok(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use std::path::PathBuf;

    #[fixture]
    fn rules() -> RuleSet {
        RuleSet::try_from(Path::new("../tests/data/rules/rules.v1.json")).unwrap()
    }

    #[rstest]
    fn test_load_json(rules: RuleSet) {
        assert_eq!(rules.version(), "2025.1");
        assert_eq!(rules.target_genes().len(), 6);
        assert_eq!(rules.default_diplotype().to_string(), "*1/*1");
    }

    #[rstest]
    fn test_load_yaml() {
        let rules = RuleSet::try_from(Path::new("../tests/data/rules/minimal.yaml")).unwrap();
        assert_eq!(rules.version(), "test-yaml");
        assert_eq!(rules.primary_gene("codeine"), Some("CYP2D6"));
    }

    #[rstest]
    fn test_invalid_extension() {
        let path = PathBuf::from("rules.txt");
        assert!(matches!(
            RuleSetFileType::from_path(&path),
            Err(RuleSetError::InvalidFileType)
        ));
    }

    #[rstest]
    fn test_missing_keys_are_all_reported() {
        let result = RuleSet::from_json_str(r#"{"rules_version": "x", "target_genes": ["CYP2D6"]}"#);
        match result {
            Err(RuleSetError::MissingKeys(keys)) => {
                assert_eq!(keys.len(), 12);
                assert!(keys.contains(&"risk_table".to_string()));
                assert!(keys.contains(&"literature_references".to_string()));
            }
            other => panic!("expected MissingKeys, got {other:?}"),
        }
    }

    #[rstest]
    fn test_non_mapping_document() {
        assert!(matches!(
            RuleSet::from_json_str("[1, 2, 3]"),
            Err(RuleSetError::NotAMapping)
        ));
    }

    #[rstest]
    #[case("Plavix", "CLOPIDOGREL")]
    #[case("  codeine ", "CODEINE")]
    #[case("tylenol 3", "CODEINE")]
    #[case("5-FU", "FLUOROURACIL")]
    #[case("plavix 75mg", "CLOPIDOGREL")]
    #[case("aspirin", "ASPIRIN")]
    fn test_normalize_drug(rules: RuleSet, #[case] input: &str, #[case] expected: &str) {
        assert_eq!(rules.normalize_drug(input), expected);
    }

    #[rstest]
    fn test_diplotype_lookup_is_order_free(rules: RuleSet) {
        let forward = rules.diplotype_phenotype("CYP2D6", &Diplotype::parse("*1/*4"));
        let reverse = rules.diplotype_phenotype("CYP2D6", &Diplotype::parse("*4/*1"));
        assert_eq!(forward, Some("Intermediate Metabolizer"));
        assert_eq!(forward, reverse);
    }

    #[rstest]
    fn test_risk_rows_ignore_wording(rules: RuleSet) {
        let row = rules
            .risk_row("SIMVASTATIN", "SLCO1B1", Phenotype::Intermediate)
            .unwrap();
        assert_eq!(row.phenotype, "Decreased Function");
        assert_eq!(row.risk_label, RiskLabel::AdjustDosage);
    }

    #[rstest]
    fn test_reference_citation(rules: RuleSet) {
        let reference = rules.reference("CYP2D6", "CODEINE").unwrap();
        assert_eq!(reference.citation(), "Crews et al. (2014). PMID: 24458010");
    }

    #[rstest]
    fn test_unrecognized_row_phenotype_fails() {
        let mut value: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string("../tests/data/rules/rules.v1.json").unwrap(),
        )
        .unwrap();
        value["risk_table"][0]["phenotype"] = serde_json::Value::from("Sluggish Metabolizer");
        assert!(matches!(
            RuleSet::from_value(value),
            Err(RuleSetError::InvalidEntry { .. })
        ));
    }
}
