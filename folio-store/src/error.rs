//! Storage layer errors

use thiserror::Error;

/// Errors that can occur in the storage layer
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        /// Type of entity (company, portfolio)
        entity_type: String,
        /// Entity key
        id: String,
    },

    /// Invalid search range (min greater than max)
    #[error("Invalid score range: min {min} is greater than max {max}")]
    InvalidRange {
        /// Lower bound supplied by the caller
        min: f64,
        /// Upper bound supplied by the caller
        max: f64,
    },

    /// Backend failure (reserved for future remote storage engines)
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create a not found error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// True when this error is a missing-entity lookup
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
