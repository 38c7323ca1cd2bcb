use thiserror::Error;

use crate::core::types::CellPos;

#[derive(Error, Debug)]
pub enum SchellingError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Cell {0} is empty")]
    EmptyCell(CellPos),

    #[error("Cell {0} is outside the grid")]
    OutOfBounds(CellPos),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Missing credential: environment variable {0} is not set")]
    MissingCredential(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Malformed response: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SchellingError>;
