use thiserror::Error;

use crate::api_client::ApiError;

/// Application-level error type.
/// Every controller and form operation returns `Result<T, AdminError>`.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("A submission is already in progress")]
    SubmitInFlight,

    #[error("No delete confirmation is open")]
    NoConfirmation,

    #[error("Operation not available for category '{0}'")]
    UnsupportedCategory(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AdminError {
    /// True for failures of the remote round-trip itself, as opposed to
    /// local validation or state errors.
    pub fn is_transport(&self) -> bool {
        matches!(self, AdminError::Api(_))
    }
}
