//! # Error Types Module
//!
//! Structured errors for the catalog store and callback data decoding.
//! Handler code wraps these in `anyhow` with context.

use thiserror::Error;

/// Errors raised by the catalog store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Query or connection failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    /// A stored product type is not one of the known categories
    #[error("Invalid product type: {0}")]
    InvalidProductType(String),
    /// Filesystem error while preparing the database location
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while decoding inline keyboard callback data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallbackDataError {
    #[error("Unknown callback data: {0}")]
    Unknown(String),
    /// `buy_<id>` whose id is not a number; holds the raw id
    #[error("Invalid product id in callback data: {0}")]
    InvalidProductId(String),
    #[error("Invalid product type in callback data: {0}")]
    InvalidProductType(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_formatting() {
        let err = StoreError::InvalidProductType("kids".to_string());
        assert_eq!(err.to_string(), "Invalid product type: kids");

        let err = CallbackDataError::InvalidProductId("x".to_string());
        assert_eq!(err.to_string(), "Invalid product id in callback data: x");
    }
}
