use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// invalid max feature count, invalid k, empty training corpus
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Vectorizer is not fitted; call fit() or load a model first")]
    NotFitted,

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Failed to load model from {}: {reason}", path.display())]
    ModelLoad { path: PathBuf, reason: String },

    #[error("Failed to load corpus from {}: {reason}", path.display())]
    CorpusLoad { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn model_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::ModelLoad { path: path.into(), reason: reason.to_string() }
    }

    pub(crate) fn corpus_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::CorpusLoad { path: path.into(), reason: reason.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
