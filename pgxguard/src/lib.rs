//! # pgxguard
//!
//! Genotype-to-drug-risk pipeline: VCF parsing, diplotype resolution,
//! phenotype calling, phenoconversion, risk lookup and calibrated
//! confidence. Each stage lives in its own crate and is re-exported here
//! behind a feature of the same name.
//!
//! ```ignore
//! use std::path::Path;
//! use pgxguard::core::rules::RuleSet;
//! use pgxguard::risk::analysis::{AnalysisRequest, analyze};
//!
//! let rules = RuleSet::try_from(Path::new("rules.json"))?;
//! let batch = analyze(&rules, &AnalysisRequest {
//!     vcf: std::fs::read_to_string("patient.vcf")?,
//!     drugs: vec!["CODEINE".to_string()],
//!     ..Default::default()
//! })?;
//! ```

#[cfg(feature = "core")]
#[doc(inline)]
pub use pgxguard_core as core;

#[cfg(feature = "vcf")]
#[doc(inline)]
pub use pgxguard_vcf as vcf;

#[cfg(feature = "genotype")]
#[doc(inline)]
pub use pgxguard_genotype as genotype;

#[cfg(feature = "risk")]
#[doc(inline)]
pub use pgxguard_risk as risk;
