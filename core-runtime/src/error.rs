use thiserror::Error;

/// Errors raised while setting up runtime infrastructure.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),
}

pub type Result<T> = std::result::Result<T, Error>;
