use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("couldn't parse resource key: {key}")]
    KeyFormat { key: String },

    #[error("resource key index out of range: {key}")]
    KeyIndex { key: String },

    #[error("invalid state document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("state pull failed in {}: {message}", dir.display())]
    StateSource { dir: PathBuf, message: String },

    #[error("no state found under {}", path.display())]
    NoState { path: PathBuf },

    #[error("configuration error: {0}")]
    Config(String),
}
