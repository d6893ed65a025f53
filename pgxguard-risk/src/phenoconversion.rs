//! Inhibitor-driven phenotype shifts.
//!
//! A strong or moderate CYP inhibitor taken alongside the analyzed drug can
//! make a patient behave like a poorer metabolizer than their genotype
//! suggests. The inhibitor lists and downgrade tables are fixed per gene.
use std::collections::HashSet;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use pgxguard_core::genes::gene_family;
use pgxguard_core::models::Phenotype;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InhibitorStrength {
    Weak,
    Moderate,
    Strong,
}

impl InhibitorStrength {
    pub fn penalty(&self) -> f64 {
        match self {
            InhibitorStrength::Weak => 0.02,
            InhibitorStrength::Moderate => 0.05,
            InhibitorStrength::Strong => 0.10,
        }
    }

    /// Functional phenotype after exposure to an inhibitor of this strength.
    pub fn downgrade(&self, phenotype: Phenotype) -> Phenotype {
        use Phenotype::*;
        match (self, phenotype) {
            (_, Unknown) => Unknown,
            (InhibitorStrength::Strong, Ultrarapid) => Normal,
            (InhibitorStrength::Strong, Rapid) => Intermediate,
            (InhibitorStrength::Strong, Normal) => Intermediate,
            (InhibitorStrength::Strong, Intermediate) => Poor,
            (InhibitorStrength::Strong, Poor) => Poor,
            (InhibitorStrength::Moderate, Ultrarapid) => Rapid,
            (InhibitorStrength::Moderate, Rapid) => Normal,
            (InhibitorStrength::Moderate, other) => other,
            (InhibitorStrength::Weak, other) => other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InhibitorStrength::Weak => "weak",
            InhibitorStrength::Moderate => "moderate",
            InhibitorStrength::Strong => "strong",
        }
    }
}

impl Display for InhibitorStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

struct InhibitorTiers {
    strong: &'static [&'static str],
    moderate: &'static [&'static str],
    weak: &'static [&'static str],
}

impl InhibitorTiers {
    /// Tiers from strongest to weakest.
    fn tiers(&self) -> [(InhibitorStrength, &'static [&'static str]); 3] {
        [
            (InhibitorStrength::Strong, self.strong),
            (InhibitorStrength::Moderate, self.moderate),
            (InhibitorStrength::Weak, self.weak),
        ]
    }
}

const CYP2D6_INHIBITORS: InhibitorTiers = InhibitorTiers {
    strong: &["fluoxetine", "paroxetine", "bupropion", "quinidine"],
    moderate: &["duloxetine", "terbinafine", "cinacalcet"],
    weak: &["amiodarone", "cimetidine"],
};

const CYP2C19_INHIBITORS: InhibitorTiers = InhibitorTiers {
    strong: &["omeprazole", "esomeprazole", "fluvoxamine"],
    moderate: &["fluconazole", "moclobemide"],
    weak: &["cimetidine", "etravirine"],
};

const CYP2C9_INHIBITORS: InhibitorTiers = InhibitorTiers {
    strong: &["fluconazole", "amiodarone"],
    moderate: &["miconazole", "metronidazole"],
    weak: &["ibuprofen"],
};

fn inhibitors_for(gene: &str) -> Option<&'static InhibitorTiers> {
    match gene.trim().to_uppercase().as_str() {
        "CYP2D6" => Some(&CYP2D6_INHIBITORS),
        "CYP2C19" => Some(&CYP2C19_INHIBITORS),
        "CYP2C9" => Some(&CYP2C9_INHIBITORS),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CausativeMedication {
    pub drug: String,
    pub strength: InhibitorStrength,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhenoconversionResult {
    pub phenoconversion_risk: bool,
    pub genetic_phenotype: Phenotype,
    pub functional_phenotype: Phenotype,
    pub functional_phenotype_full: String,
    pub caused_by: Vec<CausativeMedication>,
    pub confidence_penalty: f64,
    pub clinical_note: String,
}

impl PhenoconversionResult {
    pub fn strongest(&self) -> Option<InhibitorStrength> {
        self.caused_by.iter().map(|m| m.strength).max()
    }
}

/// Trim, lower-case and de-duplicate medication names, keeping first occurrences.
pub fn normalize_medications<S: AsRef<str>>(medications: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    medications
        .iter()
        .map(|m| m.as_ref().trim().to_lowercase())
        .filter(|m| !m.is_empty())
        .filter(|m| seen.insert(m.clone()))
        .collect()
}

///
/// Check concurrent medications for inhibitors of `gene`.
///
/// The strongest matched tier decides the functional phenotype and the
/// confidence penalty. Any match, even a weak one, raises the risk flag.
///
pub fn detect_phenoconversion<S: AsRef<str>>(
    gene: &str,
    genetic_phenotype: Phenotype,
    medications: &[S],
) -> PhenoconversionResult {
    let naming = gene_family(gene).naming;
    let medications = normalize_medications(medications);

    let mut caused_by: Vec<CausativeMedication> = Vec::new();
    if let Some(inhibitors) = inhibitors_for(gene) {
        for (strength, drugs) in inhibitors.tiers() {
            for med in &medications {
                if drugs.contains(&med.as_str()) {
                    caused_by.push(CausativeMedication {
                        drug: med.clone(),
                        strength,
                    });
                }
            }
        }
    }

    let Some(strongest) = caused_by.iter().map(|m| m.strength).max() else {
        return PhenoconversionResult {
            phenoconversion_risk: false,
            genetic_phenotype,
            functional_phenotype: genetic_phenotype,
            functional_phenotype_full: genetic_phenotype.full_name(naming).to_string(),
            caused_by,
            confidence_penalty: 0.0,
            clinical_note: "No known inhibitor-based phenoconversion signal detected.".to_string(),
        };
    };

    let functional = strongest.downgrade(genetic_phenotype);
    let mut drugs: Vec<&str> = caused_by.iter().map(|m| m.drug.as_str()).collect();
    drugs.sort_unstable();
    drugs.dedup();

    PhenoconversionResult {
        phenoconversion_risk: true,
        genetic_phenotype,
        functional_phenotype: functional,
        functional_phenotype_full: functional.full_name(naming).to_string(),
        clinical_note: format!(
            "Genetic phenotype {} may functionally shift to {} due to inhibitor exposure ({}). Source: inhibitor rule table.",
            genetic_phenotype.abbreviation(),
            functional.abbreviation(),
            drugs.join(", ")
        ),
        caused_by,
        confidence_penalty: strongest.penalty(),
    }
}
