//! Error types for the catalog client
//!
//! `ApiError` keeps the cause of a failed HTTP exchange for logging.
//! `CatalogError` is what callers see: a failed operation, without retry
//! classification.

use std::fmt;
use thiserror::Error;

use songdeck_common::forms::ValidationErrors;

/// Failure of a single Catalog API exchange
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network, DNS or timeout failure
    #[error("Catalog API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx status
    #[error("Catalog API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not the expected JSON
    #[error("Failed to parse Catalog API response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Request could not be built
    #[error("Failed to encode request: {0}")]
    Encode(String),
}

/// Mutating catalog operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Edit,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Add => "add song",
            Operation::Edit => "edit song",
            Operation::Delete => "delete song",
        })
    }
}

/// Error returned by `CatalogClient` operations
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to {operation}")]
    OperationFailed {
        operation: Operation,
        #[source]
        source: ApiError,
    },

    /// Rejected before any request was sent
    #[error("Invalid song form: {0}")]
    Validation(#[from] ValidationErrors),
}

impl CatalogError {
    pub(crate) fn failed(operation: Operation, source: ApiError) -> Self {
        CatalogError::OperationFailed { operation, source }
    }

    /// Operation that failed; `None` for validation errors
    pub fn operation(&self) -> Option<Operation> {
        match self {
            CatalogError::OperationFailed { operation, .. } => Some(*operation),
            CatalogError::Validation(_) => None,
        }
    }
}
