//! # pgxguard-genotype
//!
//! From parsed variant records to a phenotype per gene:
//!
//! - [diplotype] folds each target gene's qualifying calls into a two-allele
//!   [Diplotype](pgxguard_core::models::Diplotype).
//! - [phenotype] maps a (gene, diplotype) pair to a
//!   [PhenotypeCall](pgxguard_core::models::PhenotypeCall) using the curated
//!   table, the activity-score model or curated allele function.
//! - [variants] lists the detected non-reference calls for reporting.
pub mod diplotype;
pub mod phenotype;
pub mod variants;

pub use diplotype::{resolve_diplotypes, resolve_gene_diplotype};
pub use phenotype::{activity_score, call_phenotype};
pub use variants::{clinical_significance, detected_variants};
