use thiserror::Error;

/// Result type local to tilecost-layer.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] tilecost_core::Error),

    #[error("invalid model configuration: {0}")]
    Config(String),
}

impl Error {
    /// The error expressed in the cycle domain.
    pub fn cycles(&self) -> tilecost_core::CycleCount {
        match self {
            Error::Core(e) => e.cycles(),
            Error::Config(_) => tilecost_core::cycles::ERROR_INVALID_INPUT_CONFIGURATION,
        }
    }
}
