use thiserror::Error;

/// Errors raised by the estimation core
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EstimateError {
    /// Malformed or degenerate input (empty field, bad angle set, short row, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl EstimateError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, EstimateError>;
