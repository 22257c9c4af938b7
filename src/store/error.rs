//! Store-specific error types.

/// Errors that can occur while mutating or persisting a slice.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record with the given id exists in the slice
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// A record with the given id already exists in the slice
    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },

    /// The patch names a field the record does not have
    #[error("Unknown {kind} field: {field}")]
    UnknownField { kind: &'static str, field: String },

    /// The patch tries to change a field that is fixed after creation
    #[error("Field cannot be changed: {field}")]
    ImmutableField { field: String },

    /// The patched record no longer matches the record schema
    #[error("Invalid {kind} update: {message}")]
    InvalidPatch { kind: &'static str, message: String },

    /// Failed to serialize records for storage
    #[error("Failed to serialize {key}: {message}")]
    SerializationFailed { key: String, message: String },

    /// Failed to read a value from storage
    #[error("Failed to read {key} from storage: {message}")]
    ReadFailed { key: String, message: String },

    /// Failed to write a value to storage
    #[error("Failed to write {key} to storage: {message}")]
    WriteFailed { key: String, message: String },
}
