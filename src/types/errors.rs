use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("error parsing config file ({}): {reason}", path.display())]
    FileParse { path: PathBuf, reason: String },

    #[error("[{section}] {option} cannot be set in config file")]
    ReadOnlyViolation { section: String, option: String },

    #[error("cannot convert {value:?} to {kind} for {option} option in {section} section")]
    Coercion {
        section: String,
        option: String,
        kind: String,
        value: String,
    },

    #[error("unknown type = {0}")]
    UnsupportedType(String),

    #[error("could not parse '{0}', must be 'section.option=value'")]
    MalformedOverride(String),

    #[error("bad interpolation in {option} option in {section} section: {reason}")]
    Interpolation {
        section: String,
        option: String,
        reason: String,
    },

    #[error("no section: {0}")]
    NoSuchSection(String),

    #[error("no option {option} in section: {section}")]
    NoSuchOption { section: String, option: String },

    #[error("invalid section name: {0}")]
    InvalidSection(String),

    #[error("configuration has not been initialized")]
    NotInitialized,

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
