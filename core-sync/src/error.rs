use bridge_traits::error::BridgeError;
use core_library::LibraryError;
use thiserror::Error;

/// Failures at the boundary with the remote media store.
///
/// Every kind is recovered the same way: local state stays as it was and
/// the user is told. The kinds only differ in the message shown.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    /// The request produced no response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote store answered with a non-2xx status.
    #[error("Remote store rejected the request (status {status})")]
    RemoteRejected { status: u16, body: String },

    /// A 2xx response whose body is not the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Rejected locally before any network call.
    #[error("Validation failed: {field} - {message}")]
    Validation { field: String, message: String },
}

impl SyncError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Short kind name for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::Transport(_) => "transport",
            SyncError::RemoteRejected { .. } => "remote_rejected",
            SyncError::MalformedResponse(_) => "malformed_response",
            SyncError::Validation { .. } => "validation",
        }
    }

    /// Text suitable for a user-facing notification.
    pub fn user_message(&self) -> String {
        match self {
            SyncError::Transport(_) => "Could not reach the media server".to_string(),
            SyncError::RemoteRejected { status, .. } => {
                format!("The media server rejected the request (HTTP {})", status)
            }
            SyncError::MalformedResponse(_) => {
                "The media server returned an unexpected response".to_string()
            }
            SyncError::Validation { message, .. } => message.clone(),
        }
    }

    /// Whether the user may simply try again. No kind is retried automatically.
    pub fn is_recoverable(&self) -> bool {
        true
    }
}

impl From<BridgeError> for SyncError {
    fn from(error: BridgeError) -> Self {
        SyncError::Transport(error.to_string())
    }
}

impl From<LibraryError> for SyncError {
    fn from(error: LibraryError) -> Self {
        match error {
            LibraryError::InvalidInput { field, message } => {
                SyncError::Validation { field, message }
            }
            LibraryError::NotFound { entity_type, id } => SyncError::Validation {
                field: "id".to_string(),
                message: format!("{} {} is not in the catalog", entity_type, id),
            },
            other => SyncError::MalformedResponse(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
