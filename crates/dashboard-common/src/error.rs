//! Error types shared across the dashboard crates

use thiserror::Error;

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Main error type for the dashboard
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors raised by a [`Store`](crate::store::Store) backend
#[derive(Error, Debug)]
pub enum StoreError {
    /// The requested field is not present under the key
    #[error("field {field} not found under key {key}")]
    NotFound { key: String, field: String },

    /// The store handle was closed before the operation
    #[error("store is closed")]
    Closed,

    /// Redis rejected the command or the connection failed
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

impl StoreError {
    pub fn not_found(key: impl Into<String>, field: impl Into<String>) -> Self {
        StoreError::NotFound {
            key: key.into(),
            field: field.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_key_and_field() {
        let err = StoreError::not_found("dashboard-7955", "genes");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "field genes not found under key dashboard-7955");
    }

    #[test]
    fn test_store_error_wraps_into_dashboard_error() {
        let err: DashboardError = StoreError::Closed.into();
        assert_eq!(err.to_string(), "Store error: store is closed");
    }
}
