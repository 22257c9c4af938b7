//! Table view error types.

/// Errors raised by view (tab) operations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// The view index does not exist
    #[error("View index {index} out of range ({len} views)")]
    ViewOutOfRange { index: usize, len: usize },

    /// The view is the default view and cannot be closed
    #[error("View '{name}' cannot be closed")]
    ViewNotClosable { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_error_display() {
        let error = TableError::ViewOutOfRange { index: 4, len: 2 };
        assert_eq!(error.to_string(), "View index 4 out of range (2 views)");

        let error = TableError::ViewNotClosable {
            name: "All emails".to_string(),
        };
        assert!(error.to_string().contains("All emails"));
    }
}
