use core_library::LibraryError;
use core_metadata::MetadataError;
use core_sync::SyncError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("Library error: {0}")]
    Library(#[from] LibraryError),

    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),
}

impl ServiceError {
    /// Text for the error notification that accompanies this failure.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Sync(e) => e.user_message(),
            ServiceError::Library(LibraryError::InvalidInput { message, .. }) => message.clone(),
            ServiceError::Library(LibraryError::NotFound { .. }) => {
                "That item is no longer in the catalog".to_string()
            }
            ServiceError::Library(e) => e.to_string(),
            ServiceError::Metadata(MetadataError::NotConfigured { provider }) => {
                format!("{} search is not configured", provider)
            }
            ServiceError::Metadata(e) => format!("External lookup failed: {}", e),
        }
    }

    /// True for failures raised before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ServiceError::Sync(SyncError::Validation { .. })
                | ServiceError::Library(LibraryError::InvalidInput { .. })
        )
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
