//! # pgxguard-core
//!
//! Shared building blocks for the pgxguard pipeline: the variant, diplotype,
//! phenotype and risk models, the gene family table, the clinical rule set
//! and the pipeline configuration.
//!
//! Every other pgxguard crate depends on this one. The rule set is loaded once
//! (from JSON or YAML) and is then passed by shared reference into each stage,
//! so that a single process can evaluate many patients against the same rules.
//!
//! ```rust,ignore
//! use std::path::Path;
//! use pgxguard_core::rules::RuleSet;
//!
//! let rules = RuleSet::try_from(Path::new("rules.v1.json"))?;
//! assert!(rules.is_target_gene("CYP2D6"));
//! ```
pub mod config;
pub mod consts;
pub mod errors;
pub mod genes;
pub mod models;
pub mod rules;
pub mod utils;
