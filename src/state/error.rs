//! State management-specific error types.

/// Errors that can occur during state operations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// The path does not name a page
    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    /// The action needs a collection page
    #[error("No collection page is open")]
    NoCollection,

    /// The action needs a highlighted row
    #[error("No row selected")]
    NoRowSelected,

    /// The action is not available on the current page
    #[error("Not available here: {0}")]
    Unavailable(String),

    /// A background action could not be handed to the worker
    #[error("Failed to dispatch background action: {0}")]
    DispatchFailed(String),
}
