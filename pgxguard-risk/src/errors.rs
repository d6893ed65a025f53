use thiserror::Error;

use pgxguard_vcf::VcfError;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Drug '{0}' is not supported")]
    UnsupportedDrug(String),

    #[error("No drugs specified")]
    NoDrugs,

    #[error("Invalid VCF: {0}")]
    InvalidVcf(#[from] VcfError),
}

#[derive(Error, Debug)]
pub enum CalibrationError {
    #[error("Line {line}: {source}")]
    InvalidRow {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("No calibration rows found")]
    Empty,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ExplanationError {
    #[error("Explanation backend unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
