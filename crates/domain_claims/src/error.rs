//! Claims domain errors

use thiserror::Error;

use core_kernel::{ClaimId, PortError};

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    /// One or more claim rules were violated; the message joins all of them
    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Claim with ID '{0}' not found")]
    NotFound(ClaimId),

    /// Backend failure, passed through unchanged
    #[error(transparent)]
    Store(#[from] PortError),
}

impl ClaimError {
    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            ClaimError::Validation(_) => "VALIDATION_ERROR",
            ClaimError::NotFound(_) => "NOT_FOUND",
            ClaimError::Store(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP-style status for translation at the boundary
    pub fn status_code(&self) -> u16 {
        match self {
            ClaimError::Validation(_) => 422,
            ClaimError::NotFound(_) => 404,
            ClaimError::Store(_) => 500,
        }
    }

    /// Checks if this error indicates a claim was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClaimError::NotFound(_))
    }
}
