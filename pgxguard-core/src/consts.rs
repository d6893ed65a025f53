pub const DEFAULT_MIN_QUALITY: f64 = 20.0;
pub const WILD_TYPE_ALLELE: &str = "*1";
pub const DEFAULT_GENOTYPE: &str = "0/1";
pub const RULES_PATH_ENV: &str = "PGXGUARD_RULES_PATH";

pub const REQUIRED_RULE_KEYS: [&str; 14] = [
    "rules_version",
    "target_genes",
    "default_diplotype",
    "default_phenotype",
    "supported_drugs",
    "drug_aliases",
    "rsid_to_star_allele",
    "phenotype_abbreviations",
    "activity_scores",
    "diplotype_phenotypes",
    "risk_table",
    "evidence_confidence",
    "confidence_model",
    "literature_references",
];
