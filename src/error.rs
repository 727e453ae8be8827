use thiserror::Error;

/// Lookup failures from the level catalog
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("level {0} is out of range (expected 1..=10)")]
    OutOfRange(u8),

    #[error("unknown difficulty {0:?}")]
    UnknownDifficulty(String),
}

/// Failures reading or writing the high score file
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("high score file i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("high score file is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}
