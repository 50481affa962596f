use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExperimentError>;

#[derive(Error, Debug)]
pub enum ExperimentError {
    #[error("Invalid experiment configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Core(#[from] linkx_core::Error),

    #[error(transparent)]
    Data(#[from] linkx_data::DataError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Repetition thread panicked")]
    ThreadPanicked,
}
