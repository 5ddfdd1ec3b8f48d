//! Application service errors

use folio_domain::DomainError;
use folio_store::StoreError;
use thiserror::Error;

/// Errors returned by the application services
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed or missing input caught before any mutation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity already exists for a create operation
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        /// Type of entity (company, portfolio)
        entity_type: String,
        /// Entity key
        id: String,
    },

    /// Domain invariant violation
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Storage layer failure (including not-found lookups)
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// True when the underlying failure is a missing-entity lookup
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Store(err) if err.is_not_found())
    }
}
