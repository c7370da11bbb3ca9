use thiserror::Error;

use crate::cycles::{to_error_text, CycleCount, ERROR_INVALID_INPUT_CONFIGURATION};

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// An infeasible layer/strategy combination, carried as its cycle error code.
    #[error("Cost evaluation failed: {}", code_text(.0))]
    Cycles(CycleCount),

    #[error("Serialization error: {0}")]
    Serde(String),

    #[error("Hashing error: {0}")]
    Hash(String),
}

fn code_text(code: &CycleCount) -> &'static str {
    to_error_text(*code)
}

impl Error {
    /// The error expressed in the cycle domain.
    ///
    /// Plumbing failures have no dedicated code and map to
    /// `ERROR_INVALID_INPUT_CONFIGURATION`.
    pub fn cycles(&self) -> CycleCount {
        match self {
            Error::Cycles(code) => *code,
            _ => ERROR_INVALID_INPUT_CONFIGURATION,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serde(e.to_string())
    }
}
