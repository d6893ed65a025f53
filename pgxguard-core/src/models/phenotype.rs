use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// CPIC metabolizer categories, independent of how a gene names them.
/// Serialized as their abbreviations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phenotype {
    #[serde(rename = "PM")]
    Poor,
    #[serde(rename = "IM")]
    Intermediate,
    #[serde(rename = "NM")]
    Normal,
    #[serde(rename = "RM")]
    Rapid,
    #[serde(rename = "URM")]
    Ultrarapid,
    Unknown,
}

/// How a gene family spells its phenotypes. Transporters such as SLCO1B1
/// are reported by function, enzymes by metabolizer status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NamingConvention {
    #[default]
    Metabolizer,
    Function,
}

impl Phenotype {
    pub const ALL: [Phenotype; 6] = [
        Phenotype::Poor,
        Phenotype::Intermediate,
        Phenotype::Normal,
        Phenotype::Rapid,
        Phenotype::Ultrarapid,
        Phenotype::Unknown,
    ];

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Phenotype::Poor => "PM",
            Phenotype::Intermediate => "IM",
            Phenotype::Normal => "NM",
            Phenotype::Rapid => "RM",
            Phenotype::Ultrarapid => "URM",
            Phenotype::Unknown => "Unknown",
        }
    }

    pub fn from_abbreviation(abbreviation: &str) -> Option<Self> {
        match abbreviation.trim().to_uppercase().as_str() {
            "PM" => Some(Phenotype::Poor),
            "IM" => Some(Phenotype::Intermediate),
            "NM" => Some(Phenotype::Normal),
            "RM" => Some(Phenotype::Rapid),
            "URM" | "UM" => Some(Phenotype::Ultrarapid),
            "UNKNOWN" => Some(Phenotype::Unknown),
            _ => None,
        }
    }

    pub fn full_name(&self, naming: NamingConvention) -> &'static str {
        match (naming, self) {
            (_, Phenotype::Unknown) => "Unknown",
            (NamingConvention::Metabolizer, Phenotype::Poor) => "Poor Metabolizer",
            (NamingConvention::Metabolizer, Phenotype::Intermediate) => "Intermediate Metabolizer",
            (NamingConvention::Metabolizer, Phenotype::Normal) => "Normal Metabolizer",
            (NamingConvention::Metabolizer, Phenotype::Rapid) => "Rapid Metabolizer",
            (NamingConvention::Metabolizer, Phenotype::Ultrarapid) => "Ultrarapid Metabolizer",
            (NamingConvention::Function, Phenotype::Poor) => "Poor Function",
            (NamingConvention::Function, Phenotype::Intermediate) => "Decreased Function",
            (NamingConvention::Function, Phenotype::Normal) => "Normal Function",
            (NamingConvention::Function, Phenotype::Rapid) => "Increased Function",
            (NamingConvention::Function, Phenotype::Ultrarapid) => "Increased Function",
        }
    }

    ///
    /// Parse a full phenotype name in either naming convention.
    ///
    /// "Increased Function" maps to [Phenotype::Rapid]; function wording has
    /// no separate ultrarapid category.
    ///
    pub fn from_full_name(name: &str) -> Option<(Self, NamingConvention)> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("unknown") {
            return Some((Phenotype::Unknown, NamingConvention::Metabolizer));
        }
        for naming in [NamingConvention::Metabolizer, NamingConvention::Function] {
            for phenotype in Phenotype::ALL {
                if phenotype.full_name(naming).eq_ignore_ascii_case(name) {
                    return Some((phenotype, naming));
                }
            }
        }
        None
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Phenotype::Unknown)
    }
}

impl Display for Phenotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// A phenotype together with the spelling its gene uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhenotypeCall {
    pub phenotype: Phenotype,
    pub naming: NamingConvention,
}

impl PhenotypeCall {
    pub fn new(phenotype: Phenotype, naming: NamingConvention) -> Self {
        PhenotypeCall { phenotype, naming }
    }

    pub fn unknown(naming: NamingConvention) -> Self {
        PhenotypeCall {
            phenotype: Phenotype::Unknown,
            naming,
        }
    }

    pub fn full_name(&self) -> &'static str {
        self.phenotype.full_name(self.naming)
    }

    pub fn abbreviation(&self) -> &'static str {
        self.phenotype.abbreviation()
    }

    /// Same category, spelled the way another gene family spells it.
    pub fn with_naming(&self, naming: NamingConvention) -> Self {
        PhenotypeCall {
            phenotype: self.phenotype,
            naming,
        }
    }

    /// Same gene wording, different category.
    pub fn with_phenotype(&self, phenotype: Phenotype) -> Self {
        PhenotypeCall {
            phenotype,
            naming: self.naming,
        }
    }
}

impl Display for PhenotypeCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}
