use crate::row::TupleId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid feature dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Batch length mismatch: {features} feature rows, {rewards} rewards")]
    BatchMismatch { features: usize, rewards: usize },

    #[error("Row not found: {0}")]
    RowNotFound(TupleId),

    #[error("Numerical error: {0}")]
    Numerical(String),
}
