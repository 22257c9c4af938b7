//! Form validation error types.

/// Errors raised when validating submitted form values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// A required field was left blank
    #[error("{0} is required")]
    MissingField(String),

    /// The value is not an email address
    #[error("{0} must be a valid email address")]
    InvalidEmail(String),

    /// The value is not a non-negative number
    #[error("{0} must be a number of zero or more")]
    InvalidNumber(String),

    /// The value is not a YYYY-MM-DD date
    #[error("{0} must be a date like 2025-03-31")]
    InvalidDate(String),

    /// The value is not an HH:MM time
    #[error("{0} must be a time like 09:30")]
    InvalidTime(String),

    /// The end of a date range precedes its start
    #[error("End date {end} is before start date {start}")]
    DateRange { start: String, end: String },

    /// The store refused the submitted record
    #[error("{0}")]
    Rejected(String),
}

impl From<crate::store::StoreError> for FormError {
    fn from(error: crate::store::StoreError) -> Self {
        FormError::Rejected(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_error_display() {
        assert_eq!(
            FormError::MissingField("Email".to_string()).to_string(),
            "Email is required"
        );
        assert!(FormError::InvalidEmail("Email".to_string())
            .to_string()
            .contains("valid email"));
        assert!(FormError::InvalidNumber("Budget".to_string())
            .to_string()
            .contains("Budget"));
        assert!(FormError::InvalidDate("Start date".to_string())
            .to_string()
            .contains("2025-03-31"));
        assert!(FormError::InvalidTime("Due time".to_string())
            .to_string()
            .contains("09:30"));
        let error = FormError::DateRange {
            start: "2025-02-01".to_string(),
            end: "2025-01-01".to_string(),
        };
        assert!(error.to_string().contains("before start date"));
    }

    #[test]
    fn store_errors_become_rejections() {
        let error: FormError = crate::store::StoreError::DuplicateId {
            kind: "email",
            id: "7".to_string(),
        }
        .into();
        assert_eq!(error, FormError::Rejected("Duplicate email id: 7".to_string()));
    }
}
