//! Error types for fieldbook.

use thiserror::Error;

/// Result type alias using fieldbook's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for fieldbook operations.
///
/// Filtering and bulk-edit dispatch never produce errors: malformed rules and
/// dangling references degrade to a defined boolean or a skipped no-op.
/// `Validation` is raised only at the saved-view boundary, before anything is
/// persisted.
#[derive(Error, Debug)]
pub enum Error {
    /// Saved view input rejected before persistence
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
