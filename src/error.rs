//! Crate error type.

use thiserror::Error as ThisError;

/// Errors produced while loading points, validating configuration or
/// preparing a run.
///
/// Contract violations inside the optimizer (out-of-range move indices)
/// are not represented here; they panic.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("degenerate input: need at least 2 points, got {0}")]
    DegenerateInput(usize),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
