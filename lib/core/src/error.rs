use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Corpus source not found: {0}")]
    CorpusSourceMissing(PathBuf),

    #[error("Cached index artifacts are corrupt: {0}")]
    CacheCorrupt(String),

    #[error("Vector index queried before build")]
    IndexNotBuilt,

    #[error("Embedding provider failure: {0}")]
    EmbeddingProvider(String),

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
