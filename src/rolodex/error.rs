use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RolodexError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("Corrupt data in {}: {reason}", path.display())]
    CorruptStorage { path: PathBuf, reason: String },

    #[error("No storage registered with id '{0}'")]
    UnknownStorage(String),

    #[error("Storage '{id}' holds {expected} data, not {requested}")]
    StorageType {
        id: String,
        expected: &'static str,
        requested: &'static str,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Logging error: {0}")]
    Logging(String),

    #[error("Signal error: {0}")]
    Signal(String),
}

impl RolodexError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::Duplicate(message.into())
    }
}

pub type Result<T> = std::result::Result<T, RolodexError>;
