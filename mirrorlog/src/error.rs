use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("log file path must not be empty")]
    EmptyPath,
    #[error("system logger unavailable: {0}")]
    SystemLogger(String),
}

pub type Result<T> = std::result::Result<T, LogError>;
