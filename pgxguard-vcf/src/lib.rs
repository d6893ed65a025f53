//! # pgxguard-vcf
//!
//! Turns VCF text into [VariantRecord](pgxguard_core::models::VariantRecord)s
//! for the genes named in a [RuleSet](pgxguard_core::rules::RuleSet).
//!
//! Parsing is forgiving at the line level: short lines, unparseable
//! positions and low-quality calls are skipped and logged. Whole-file
//! problems (no `#CHROM` header, no data lines) are reported by
//! [validate_vcf_content] before any parsing happens.
pub mod errors;
pub mod metrics;
pub mod parser;

pub use errors::VcfError;
pub use metrics::{annotation_completeness, vcf_quality_score};
pub use parser::{
    InfoValue, ParseOptions, VcfParser, parse_info_field, parse_vcf_content, parse_vcf_file,
    validate_vcf_content,
};
