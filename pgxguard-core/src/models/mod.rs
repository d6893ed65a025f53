pub mod diplotype;
pub mod phenotype;
pub mod risk;
pub mod variant;

pub use diplotype::Diplotype;
pub use phenotype::{NamingConvention, Phenotype, PhenotypeCall};
pub use risk::{ConfidenceLevel, FdaRequirement, RiskAssessment, RiskLabel, Severity};
pub use variant::{DetectedVariant, Genotype, VariantRecord, Zygosity};
