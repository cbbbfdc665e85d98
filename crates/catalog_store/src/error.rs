//! Catalog store error types.

use thiserror::Error;

/// Errors that can occur during catalog store operations.
#[derive(Debug, Error)]
pub enum CatalogStoreError {
    /// No row matched an exact lookup.
    #[error("{entity_type} not found: {key}")]
    NotFound {
        entity_type: &'static str,
        key: String,
    },

    /// A referenced category or user does not exist.
    #[error("Foreign key constraint violation: {0}")]
    ForeignKeyViolation(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl CatalogStoreError {
    /// Creates a not found error.
    pub fn not_found(entity_type: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            key: key.to_string(),
        }
    }

    /// Returns true if this is a lookup miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for catalog store operations.
pub type CatalogStoreResult<T> = Result<T, CatalogStoreError>;
