//! Per-gene calling behavior.
//!
//! Each supported gene belongs to a [GeneFamily] that fixes how its
//! phenotypes are spelled and how a diplotype is turned into a phenotype.
use crate::models::NamingConvention;

/// Curated allele function sets for genes called by allele function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlleleFunctionSets {
    pub non_functional: &'static [&'static str],
    pub decreased: &'static [&'static str],
    pub increased: &'static [&'static str],
}

impl AlleleFunctionSets {
    pub fn is_non_functional(&self, allele: &str) -> bool {
        self.non_functional.contains(&allele)
    }

    pub fn is_decreased(&self, allele: &str) -> bool {
        self.decreased.contains(&allele)
    }

    pub fn is_increased(&self, allele: &str) -> bool {
        self.increased.contains(&allele)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallingModel {
    /// Sum per-allele activity values from the rule set.
    ActivityScore,
    /// Classify from curated non-functional, decreased and increased alleles.
    AlleleFunction(AlleleFunctionSets),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneFamily {
    pub naming: NamingConvention,
    pub model: CallingModel,
}

impl GeneFamily {
    pub fn uses_activity_score(&self) -> bool {
        matches!(self.model, CallingModel::ActivityScore)
    }
}

const NO_CURATED_ALLELES: AlleleFunctionSets = AlleleFunctionSets {
    non_functional: &[],
    decreased: &[],
    increased: &[],
};

const CYP2C19_ALLELES: AlleleFunctionSets = AlleleFunctionSets {
    non_functional: &["*2", "*3", "*4", "*5", "*6", "*7", "*8"],
    decreased: &[],
    increased: &["*17"],
};

const CYP2C9_ALLELES: AlleleFunctionSets = AlleleFunctionSets {
    non_functional: &["*3", "*5", "*6", "*11", "*13"],
    decreased: &["*2", "*8"],
    increased: &[],
};

const SLCO1B1_ALLELES: AlleleFunctionSets = AlleleFunctionSets {
    non_functional: &["*5"],
    decreased: &[],
    increased: &[],
};

const TPMT_ALLELES: AlleleFunctionSets = AlleleFunctionSets {
    non_functional: &["*2", "*3A", "*3B", "*3C"],
    decreased: &[],
    increased: &[],
};

const DPYD_ALLELES: AlleleFunctionSets = AlleleFunctionSets {
    non_functional: &["*2A", "*13"],
    decreased: &["HapB3", "c.1129-5923C>G"],
    increased: &[],
};

/// Look up the family for a gene symbol. Unlisted genes have no curated
/// alleles and call Normal unless the diplotype table says otherwise.
pub fn gene_family(gene: &str) -> GeneFamily {
    let metabolizer = |model| GeneFamily {
        naming: NamingConvention::Metabolizer,
        model,
    };

    match gene.trim().to_uppercase().as_str() {
        "CYP2D6" => metabolizer(CallingModel::ActivityScore),
        "CYP2C19" => metabolizer(CallingModel::AlleleFunction(CYP2C19_ALLELES)),
        "CYP2C9" => metabolizer(CallingModel::AlleleFunction(CYP2C9_ALLELES)),
        "TPMT" => metabolizer(CallingModel::AlleleFunction(TPMT_ALLELES)),
        "DPYD" => metabolizer(CallingModel::AlleleFunction(DPYD_ALLELES)),
        "SLCO1B1" => GeneFamily {
            naming: NamingConvention::Function,
            model: CallingModel::AlleleFunction(SLCO1B1_ALLELES),
        },
        _ => metabolizer(CallingModel::AlleleFunction(NO_CURATED_ALLELES)),
    }
}
