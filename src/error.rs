use thiserror::Error;

/// All errors produced by vadcut.
#[derive(Debug, Error)]
pub enum VadcutError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("output path is not an existing directory: {path}")]
    OutputPath { path: std::path::PathBuf },

    #[error("audio file error: {0}")]
    AudioFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, VadcutError>;
