use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures at the crate boundary: storage, rule files, materialized pages
/// and the oracle process. Data-model and merge operations never fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid style pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("could not read subject {path}: {source}")]
    Subject {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("oracle error: {0}")]
    Oracle(String),

    #[error("need at least {needed} subjects with a style-change anchor to generalize, found {found}")]
    NotEnoughSubjects { needed: usize, found: usize },

    #[error("invalid configuration: {message}")]
    Config { message: String },
}
