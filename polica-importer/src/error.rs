use thiserror::Error;

/// Failure modes for one chain's import (spec.md §4.D "Retry policy":
/// timeouts and exceptions both produce `FAILED` runs, no automatic retry).
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("database error: {0}")]
    Db(#[from] polica_entities::InfraError),
}
