use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuleSetError {
    #[error("Missing or invalid file extension for rule set file. It must be `json`, `yaml` or `yml`")]
    InvalidFileType,

    #[error("Rule set document must be a mapping at the top level")]
    NotAMapping,

    #[error("Clinical rules file missing keys: {0:?}")]
    MissingKeys(Vec<String>),

    #[error("Invalid rule set entry `{key}`: {message}")]
    InvalidEntry { key: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid pipeline configuration: {0}")]
    InvalidValue(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, RuleSetError>;
