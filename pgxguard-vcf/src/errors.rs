use thiserror::Error;

#[derive(Error, Debug)]
pub enum VcfError {
    #[error("Missing #CHROM header line")]
    MissingHeader,

    #[error("No variant data found")]
    NoVariantData,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VcfError>;
