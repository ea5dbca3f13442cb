//! Storage error types
//!
//! This module defines the errors that can occur during key-value store
//! operations. Backend failures keep their kind so callers can tell a
//! dropped connection from a rejected credential.

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to reach the backing store
    #[error("Failed to connect to store: {0}")]
    ConnectionFailed(String),

    /// The backing store did not answer in time
    #[error("Timeout after {duration_ms}ms: {operation}")]
    Timeout { operation: String, duration_ms: u64 },

    /// The caller is not allowed to perform the operation
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The table or index does not exist
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored item could not be read back as a domain value
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DatabaseError {
    /// Creates an error for an item that is missing an expected attribute
    ///
    /// # Example
    ///
    /// ```rust
    /// use infra_db::DatabaseError;
    ///
    /// let error = DatabaseError::missing_attribute("claimId");
    /// assert!(error.to_string().contains("claimId"));
    /// ```
    pub fn missing_attribute(name: &str) -> Self {
        DatabaseError::SerializationError(format!("item is missing attribute '{}'", name))
    }

    /// Creates an error for an attribute stored with the wrong type
    pub fn wrong_attribute_type(name: &str, expected: &str) -> Self {
        DatabaseError::SerializationError(format!(
            "attribute '{}' is not of type {}",
            name, expected
        ))
    }

    /// Checks if this error is a connection-related issue
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_) | DatabaseError::Timeout { .. }
        )
    }
}
