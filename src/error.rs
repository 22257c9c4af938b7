//! Application-wide error types.
//!
//! This module aggregates the per-module error enums into one type so the
//! binary edge can propagate any failure with `?`.

pub use crate::config::ConfigError;
pub use crate::forms::FormError;
pub use crate::state::StateError;
pub use crate::store::StoreError;
pub use crate::table::TableError;

/// Main application error type.
///
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Store mutation and persistence errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Table view errors
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// Form validation errors
    #[error("Invalid form: {0}")]
    Form(#[from] FormError),

    /// State management errors
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Logger initialization errors
    #[error("Logger error: {0}")]
    Logger(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_from_config_error() {
        let app_error: AppError = ConfigError::FilePathNotSet.into();
        assert!(matches!(app_error, AppError::Config(_)));
        assert!(app_error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_app_error_from_store_error() {
        let app_error: AppError = StoreError::NotFound {
            kind: "email",
            id: "9".to_string(),
        }
        .into();
        assert!(matches!(app_error, AppError::Store(_)));
        assert_eq!(app_error.to_string(), "Store error: email not found: 9");
    }

    #[test]
    fn test_app_error_from_form_error() {
        let app_error: AppError = FormError::MissingField("Name".to_string()).into();
        assert!(matches!(app_error, AppError::Form(_)));
        assert!(app_error.to_string().contains("Name is required"));
    }

    #[test]
    fn test_app_error_from_table_error() {
        let app_error: AppError = TableError::ViewNotClosable {
            name: "All emails".to_string(),
        }
        .into();
        assert!(matches!(app_error, AppError::Table(_)));
    }

    #[test]
    fn test_app_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let app_error: AppError = io_error.into();
        assert!(matches!(app_error, AppError::Io(_)));
        assert!(app_error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_app_error_other() {
        let error = AppError::Other("Generic error".to_string());
        assert_eq!(error.to_string(), "Generic error");
    }
}
