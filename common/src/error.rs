//! Error types for BondSwap ledger types.

use thiserror::Error;

/// Main error type for constructing ledger values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BondSwapError {
    /// Address text could not be decoded.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Application argument text could not be decoded.
    #[error("Invalid application argument: {0}")]
    InvalidApplicationArg(String),

    /// Group exceeds the ledger's member limit.
    #[error("Group too large: {size} members, maximum {max}")]
    GroupTooLarge { size: usize, max: usize },
}

impl BondSwapError {
    /// Get error code for reports.
    pub fn error_code(&self) -> &'static str {
        match self {
            BondSwapError::InvalidAddress(_) => "INVALID_ADDRESS",
            BondSwapError::InvalidApplicationArg(_) => "INVALID_APPLICATION_ARG",
            BondSwapError::GroupTooLarge { .. } => "GROUP_TOO_LARGE",
        }
    }
}

/// Result type alias for BondSwap operations.
pub type Result<T> = std::result::Result<T, BondSwapError>;
